//! Authentication flows.
//!
//! Views never talk to the gateway or the dispatcher directly: a flow here
//! performs the exchange, updates the [`SessionStore`] and emits the matching
//! analytics events in one place.

use crate::error::{ApiResult, AuthErrorKind, AuthFailure};
use crate::gateway::{AuthGateway, AuthResult, MSG_LOGIN_FAILED, MSG_REGISTER_FAILED};
use crate::request::HttpClient;
use crate::session::{Session, SessionStore, TokenStorage};
use crate::tracking::{TrackingDispatcher, TrackingEvent};
use crate::{Identity, Plan, Role};

#[derive(Debug, Clone)]
pub struct SessionController<C> {
    gateway: AuthGateway<C>,
    tracker: TrackingDispatcher,
}

impl<C: HttpClient> SessionController<C> {
    pub fn new(gateway: AuthGateway<C>, tracker: TrackingDispatcher) -> Self {
        Self { gateway, tracker }
    }

    pub fn gateway(&self) -> &AuthGateway<C> {
        &self.gateway
    }

    pub fn tracker(&self) -> &TrackingDispatcher {
        &self.tracker
    }

    pub fn track(&self, event: TrackingEvent) {
        self.tracker.emit(event);
    }

    /// Startup restore. Emits nothing.
    pub async fn restore<S: TokenStorage>(&self, store: &mut SessionStore<S>) -> Session {
        store.restore(&self.gateway).await
    }

    /// On failure the store is left exactly as it was.
    pub async fn login<S: TokenStorage>(
        &self,
        store: &mut SessionStore<S>,
        email: &str,
        password: &str,
    ) -> Result<Identity, AuthFailure> {
        match self.gateway.login(email, password).await {
            AuthResult::Success { identity, token } => {
                log::info!("logged in as {} ({})", identity.email, identity.role.as_str());
                self.tracker
                    .emit(TrackingEvent::login(identity.role, identity.plan()));
                store.set(identity.clone(), token);
                Ok(identity)
            }
            AuthResult::Failure(failure) => {
                log::info!("login failed: {}", failure.kind.as_str());
                self.track_rejection("login_failed", &failure, MSG_LOGIN_FAILED, "Login failed");
                Err(failure)
            }
        }
    }

    /// Client self-registration. A new account counts as a conversion for
    /// the chosen plan.
    pub async fn register<S: TokenStorage>(
        &self,
        store: &mut SessionStore<S>,
        name: &str,
        email: &str,
        password: &str,
        company_name: &str,
        plan: Plan,
    ) -> Result<Identity, AuthFailure> {
        match self
            .gateway
            .register(name, email, password, company_name, plan)
            .await
        {
            AuthResult::Success { identity, token } => {
                log::info!("registered {} on plan {}", identity.email, plan.as_str());
                self.tracker.emit(TrackingEvent::sign_up(Role::Client, plan));
                self.tracker
                    .emit(TrackingEvent::conversion("registration", 0.0, Some(plan)));
                store.set(identity.clone(), token);
                Ok(identity)
            }
            AuthResult::Failure(failure) => {
                log::info!("registration failed: {}", failure.kind.as_str());
                self.track_rejection(
                    "registration_failed",
                    &failure,
                    MSG_REGISTER_FAILED,
                    "Registration failed",
                );
                Err(failure)
            }
        }
    }

    /// Only answers from the server are tracked. When the server gave no
    /// message the event carries `reported` instead of the displayed fallback.
    fn track_rejection(
        &self,
        error_type: &str,
        failure: &AuthFailure,
        displayed: &str,
        reported: &str,
    ) {
        if failure.kind != AuthErrorKind::Credential {
            return;
        }
        let message = if failure.message == displayed {
            reported
        } else {
            failure.message.as_str()
        };
        self.tracker.emit(TrackingEvent::error(error_type, message));
    }

    pub fn logout<S: TokenStorage>(&self, store: &mut SessionStore<S>) {
        if let Some(user) = store.session().user() {
            log::info!("logging out {}", user.email);
        }
        store.clear();
    }

    /// Seeds the demo accounts on the server.
    pub async fn create_demo_data(&self, location: &str) -> ApiResult<()> {
        self.tracker
            .emit(TrackingEvent::button_click("criar_dados_demo", location, None));
        self.gateway.seed_demo_data().await
    }
}
