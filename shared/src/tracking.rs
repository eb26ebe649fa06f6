//! Analytics tracking.
//!
//! One semantic [`TrackingEvent`] is translated per [`Platform`] and handed to
//! every configured [`TrackingBackend`]. Delivery is best-effort: a backend
//! that is missing or fails is logged and skipped, the rest still run.

use std::fmt;
use std::sync::Arc;

use serde_json::{Map, Value, json};

use crate::error::TrackingError;
use crate::{BRAND, CURRENCY, Plan, Role, plan_label};

// =========================================================
// Events
// =========================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Login,
    SignUp,
    Conversion,
    PlanSelection,
    DashboardView,
    FeatureUsage,
    Error,
    PageView,
    ButtonClick,
    FormSubmission,
}

impl EventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::Login => "login",
            EventKind::SignUp => "sign_up",
            EventKind::Conversion => "conversion",
            EventKind::PlanSelection => "plan_selection",
            EventKind::DashboardView => "dashboard_view",
            EventKind::FeatureUsage => "feature_usage",
            EventKind::Error => "error",
            EventKind::PageView => "page_view",
            EventKind::ButtonClick => "button_click",
            EventKind::FormSubmission => "form_submission",
        }
    }
}

/// A semantic application event before per-platform translation.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackingEvent {
    pub kind: EventKind,
    pub category: Option<&'static str>,
    pub label: Option<String>,
    pub value: f64,
    pub user_type: String,
    pub plan_type: String,
    /// Event specific fields, passed through to platforms that accept them.
    pub extra: Map<String, Value>,
}

fn user_label(role: Option<Role>) -> String {
    role.map(|r| r.as_str()).unwrap_or("unknown").to_string()
}

impl TrackingEvent {
    fn new(kind: EventKind, category: Option<&'static str>, label: Option<&str>) -> Self {
        Self {
            kind,
            category,
            label: label.map(str::to_string),
            value: 0.0,
            user_type: "unknown".to_string(),
            plan_type: "unknown".to_string(),
            extra: Map::new(),
        }
    }

    fn with_user(mut self, role: Option<Role>) -> Self {
        self.user_type = user_label(role);
        self
    }

    fn with_plan(mut self, plan: Option<Plan>) -> Self {
        self.plan_type = plan_label(plan).to_string();
        self
    }

    fn with_value(mut self, value: f64) -> Self {
        self.value = value;
        self
    }

    fn with_extra(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.extra.insert(key.to_string(), value.into());
        self
    }

    pub fn login(role: Role, plan: Option<Plan>) -> Self {
        Self::new(EventKind::Login, Some("engagement"), Some("login"))
            .with_user(Some(role))
            .with_plan(plan)
    }

    pub fn sign_up(role: Role, plan: Plan) -> Self {
        Self::new(EventKind::SignUp, Some("engagement"), Some("sign_up"))
            .with_user(Some(role))
            .with_plan(Some(plan))
    }

    pub fn conversion(conversion_type: &str, value: f64, plan: Option<Plan>) -> Self {
        Self::new(EventKind::Conversion, Some("conversion"), Some(conversion_type))
            .with_value(value)
            .with_plan(plan)
    }

    pub fn plan_selection(plan: Plan) -> Self {
        Self::new(EventKind::PlanSelection, Some("ecommerce"), Some("plan_selection"))
            .with_value(plan.monthly_price() as f64)
            .with_plan(Some(plan))
    }

    pub fn dashboard_view(role: Role) -> Self {
        Self::new(EventKind::DashboardView, Some("engagement"), Some("dashboard_view"))
            .with_user(Some(role))
            .with_extra("dashboardType", role.as_str())
    }

    pub fn feature_usage(feature: &str, role: Option<Role>, plan: Option<Plan>) -> Self {
        Self::new(EventKind::FeatureUsage, Some("engagement"), Some("feature_usage"))
            .with_user(role)
            .with_plan(plan)
            .with_extra("featureName", feature)
    }

    pub fn error(error_type: &str, message: &str) -> Self {
        Self::new(EventKind::Error, Some("error"), Some("application_error"))
            .with_extra("errorType", error_type)
            .with_extra("errorMessage", message)
    }

    pub fn page_view(
        page_name: &str,
        location: &str,
        role: Option<Role>,
        plan: Option<Plan>,
    ) -> Self {
        Self::new(EventKind::PageView, None, None)
            .with_user(role)
            .with_plan(plan)
            .with_extra("page_title", format!("{} - {}", BRAND, page_name))
            .with_extra("page_location", location)
    }

    pub fn button_click(button: &str, location: &str, role: Option<Role>) -> Self {
        Self::new(EventKind::ButtonClick, Some("engagement"), Some("button_click"))
            .with_user(role)
            .with_extra("buttonName", button)
            .with_extra("location", location)
    }

    pub fn form_submission(form: &str, success: bool, role: Option<Role>) -> Self {
        Self::new(EventKind::FormSubmission, Some("engagement"), Some("form_submission"))
            .with_user(role)
            .with_extra("formName", form)
            .with_extra("success", success)
    }

    /// Common parameters plus extra fields.
    fn params(&self) -> Map<String, Value> {
        let mut params = Map::new();
        if let Some(category) = self.category {
            params.insert("category".into(), json!(category));
        }
        if let Some(label) = &self.label {
            params.insert("label".into(), json!(label));
        }
        params.insert("value".into(), json!(self.value));
        params.insert("userType".into(), json!(self.user_type));
        params.insert("planType".into(), json!(self.plan_type));
        params.extend(self.extra.clone());
        params
    }
}

// =========================================================
// Platforms
// =========================================================

/// Third-party collectors the product reports to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Platform {
    GoogleAnalytics,
    FacebookPixel,
    LinkedIn,
    Clarity,
    Hotjar,
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A concrete SDK invocation: `function(args...)` on the page's global scope.
#[derive(Debug, Clone, PartialEq)]
pub struct PlatformCall {
    pub function: &'static str,
    pub args: Vec<Value>,
}

impl Platform {
    pub const ALL: [Platform; 5] = [
        Platform::GoogleAnalytics,
        Platform::FacebookPixel,
        Platform::LinkedIn,
        Platform::Clarity,
        Platform::Hotjar,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::GoogleAnalytics => "ga4",
            Platform::FacebookPixel => "facebook",
            Platform::LinkedIn => "linkedin",
            Platform::Clarity => "clarity",
            Platform::Hotjar => "hotjar",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim().to_ascii_lowercase();
        Self::ALL.into_iter().find(|p| p.as_str() == value)
    }

    /// Name of the global function the SDK installs.
    pub fn global_function(&self) -> &'static str {
        match self {
            Platform::GoogleAnalytics => "gtag",
            Platform::FacebookPixel => "fbq",
            Platform::LinkedIn => "lintrk",
            Platform::Clarity => "clarity",
            Platform::Hotjar => "hj",
        }
    }

    fn event_name(&self, kind: EventKind) -> Option<&'static str> {
        use EventKind::*;
        match self {
            Platform::GoogleAnalytics => Some(match kind {
                Login => "login",
                SignUp => "sign_up",
                Conversion => "conversion",
                PlanSelection => "select_item",
                DashboardView => "page_view",
                FeatureUsage => "feature_usage",
                Error => "exception",
                PageView => "page_view",
                ButtonClick => "click",
                FormSubmission => "form_submit",
            }),
            Platform::FacebookPixel => match kind {
                Login => Some("Login"),
                SignUp => Some("CompleteRegistration"),
                Conversion => Some("Purchase"),
                PlanSelection => Some("AddToCart"),
                DashboardView => Some("ViewContent"),
                PageView => Some("PageView"),
                FeatureUsage | Error | ButtonClick | FormSubmission => None,
            },
            Platform::LinkedIn => match kind {
                SignUp | Conversion => Some(kind.as_str()),
                _ => None,
            },
            Platform::Clarity => Some(kind.as_str()),
            Platform::Hotjar => match kind {
                Login | SignUp | Conversion | PlanSelection | FeatureUsage => Some(kind.as_str()),
                _ => None,
            },
        }
    }

    /// Translates an event, or `None` if this platform does not record it.
    pub fn translate(&self, event: &TrackingEvent) -> Option<PlatformCall> {
        let name = self.event_name(event.kind)?;
        let function = self.global_function();

        let args = match self {
            Platform::GoogleAnalytics => {
                let mut params = Map::new();
                params.insert("event_category".into(), json!(BRAND));
                params.insert(
                    "event_label".into(),
                    json!(event.label.clone().unwrap_or_default()),
                );
                params.insert("value".into(), json!(event.value));
                params.insert("user_type".into(), json!(event.user_type));
                params.insert("plan_type".into(), json!(event.plan_type));
                params.extend(event.params());
                vec![json!("event"), json!(name), Value::Object(params)]
            }
            Platform::FacebookPixel => {
                let mut params = Map::new();
                params.insert("content_name".into(), json!(BRAND));
                params.insert(
                    "content_category".into(),
                    json!(event.category.unwrap_or("saas")),
                );
                params.insert("value".into(), json!(event.value));
                params.insert("currency".into(), json!(CURRENCY));
                params.extend(event.params());
                vec![json!("track"), json!(name), Value::Object(params)]
            }
            Platform::LinkedIn => vec![json!("track"), json!({ "conversion_id": name })],
            Platform::Clarity => {
                let params = Value::Object(event.params()).to_string();
                vec![json!("set"), json!(name), json!(params)]
            }
            Platform::Hotjar => vec![json!("event"), json!(name)],
        };

        Some(PlatformCall { function, args })
    }
}

// =========================================================
// Dispatcher
// =========================================================

/// Something that can hand a [`PlatformCall`] to an SDK.
pub trait TrackingBackend: Send + Sync {
    fn platform(&self) -> Platform;
    fn deliver(&self, call: &PlatformCall) -> Result<(), TrackingError>;
}

/// Fans every event out to all backends, isolating their failures.
#[derive(Clone, Default)]
pub struct TrackingDispatcher {
    backends: Vec<Arc<dyn TrackingBackend>>,
}

impl TrackingDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_backend(mut self, backend: impl TrackingBackend + 'static) -> Self {
        self.backends.push(Arc::new(backend));
        self
    }

    pub fn platforms(&self) -> Vec<Platform> {
        self.backends.iter().map(|b| b.platform()).collect()
    }

    /// Best-effort; nothing is returned and nothing is retried.
    pub fn emit(&self, event: TrackingEvent) {
        for backend in &self.backends {
            let platform = backend.platform();
            let Some(call) = platform.translate(&event) else {
                continue;
            };
            if let Err(e) = backend.deliver(&call) {
                log::debug!("tracking {} dropped: {}", event.kind.as_str(), e);
            }
        }
    }
}

impl fmt::Debug for TrackingDispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TrackingDispatcher")
            .field("platforms", &self.platforms())
            .finish()
    }
}

// =========================================================
// Test utility: RecordingBackend
// =========================================================

#[cfg(test)]
#[derive(Clone)]
pub struct RecordingBackend {
    platform: Platform,
    fail: bool,
    pub calls: Arc<std::sync::Mutex<Vec<PlatformCall>>>,
}

#[cfg(test)]
impl RecordingBackend {
    pub fn new(platform: Platform) -> Self {
        Self {
            platform,
            fail: false,
            calls: Arc::default(),
        }
    }

    pub fn failing(platform: Platform) -> Self {
        Self {
            fail: true,
            ..Self::new(platform)
        }
    }

    pub fn recorded(&self) -> Vec<PlatformCall> {
        self.calls.lock().unwrap().clone()
    }

    /// Event names delivered so far (second argument of every call).
    pub fn event_names(&self) -> Vec<String> {
        self.recorded()
            .iter()
            .filter_map(|c| c.args.get(1).and_then(|v| v.as_str()).map(str::to_string))
            .collect()
    }
}

#[cfg(test)]
impl TrackingBackend for RecordingBackend {
    fn platform(&self) -> Platform {
        self.platform
    }

    fn deliver(&self, call: &PlatformCall) -> Result<(), TrackingError> {
        self.calls.lock().unwrap().push(call.clone());
        if self.fail {
            return Err(TrackingError::Unavailable(self.platform));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests;
