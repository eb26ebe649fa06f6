//! AI.GROWTH client core.
//!
//! Everything here is target independent so it can be exercised natively:
//! - `session`: token persistence and the in-memory session
//! - `gateway`: login / register / token validation against the remote API
//! - `route`: the route authorizer
//! - `tracking`: fan-out of analytics events to third-party collectors
//! - `controller`: the flows that tie the pieces above together

use serde::{Deserialize, Deserializer, Serialize};

pub mod config;
pub mod controller;
pub mod dashboard;
pub mod error;
pub mod gateway;
pub mod protocol;
pub mod request;
pub mod route;
pub mod session;
pub mod tracking;

pub use config::AppConfig;
pub use controller::SessionController;
pub use error::{ApiError, AuthErrorKind, AuthFailure, TrackingError};
pub use gateway::{AuthGateway, AuthResult};
pub use route::{AppRoute, RouteDecision};
pub use session::{Session, SessionStore, TokenStorage};
pub use tracking::{Platform, TrackingDispatcher, TrackingEvent};

// =========================================================
// Constants
// =========================================================

pub const BRAND: &str = "AI.GROWTH";
pub const CURRENCY: &str = "BRL";

// =========================================================
// Domain Models
// =========================================================

/// Who is signed in. Decides which dashboard and route subtree are reachable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Internal operator managing every client company.
    Agency,
    /// End customer looking at its own campaigns.
    Client,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Agency => "agency",
            Role::Client => "client",
        }
    }

    /// Landing route after sign-in.
    pub fn home_route(&self) -> AppRoute {
        match self {
            Role::Agency => AppRoute::Agency(route::AgencyView::Overview),
            Role::Client => AppRoute::Client(route::ClientView::Overview),
        }
    }
}

/// Resource ceiling attached to a plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlanLimits {
    pub campaigns: u32,
    pub budget: u64,
}

/// Client subscription tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Plan {
    #[default]
    Starter,
    Aceleracao,
    Crescimento,
}

impl Plan {
    pub const ALL: [Plan; 3] = [Plan::Starter, Plan::Aceleracao, Plan::Crescimento];

    pub fn as_str(&self) -> &'static str {
        match self {
            Plan::Starter => "starter",
            Plan::Aceleracao => "aceleracao",
            Plan::Crescimento => "crescimento",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.as_str() == value)
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Plan::Starter => "Starter",
            Plan::Aceleracao => "Aceleração",
            Plan::Crescimento => "Crescimento Exponencial",
        }
    }

    /// Badge colour used by both dashboards.
    pub fn color(&self) -> &'static str {
        match self {
            Plan::Starter => "#10B981",
            Plan::Aceleracao => "#8B5CF6",
            Plan::Crescimento => "#EC4899",
        }
    }

    /// Monthly price in BRL.
    pub fn monthly_price(&self) -> u32 {
        match self {
            Plan::Starter => 197,
            Plan::Aceleracao => 297,
            Plan::Crescimento => 397,
        }
    }

    pub fn limits(&self) -> PlanLimits {
        match self {
            Plan::Starter => PlanLimits {
                campaigns: 1,
                budget: 5_000,
            },
            Plan::Aceleracao => PlanLimits {
                campaigns: 2,
                budget: 20_000,
            },
            Plan::Crescimento => PlanLimits {
                campaigns: 4,
                budget: 50_000,
            },
        }
    }
}

/// Tracking label for an optional plan.
pub fn plan_label(plan: Option<Plan>) -> &'static str {
    plan.map(|p| p.as_str()).unwrap_or("unknown")
}

/// Unknown plan strings from the server are treated as "no plan" instead of
/// failing the whole identity.
fn lenient_plan<'de, D>(deserializer: D) -> Result<Option<Plan>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.as_deref().and_then(Plan::parse))
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Company {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub name: String,
    #[serde(default, deserialize_with = "lenient_plan")]
    pub plan: Option<Plan>,
    #[serde(default)]
    pub monthly_budget: Option<f64>,
}

/// Authenticated user as returned by the auth endpoints.
///
/// Immutable once received; a new login replaces it wholesale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Identity {
    #[serde(default)]
    pub id: Option<i64>,
    pub name: String,
    pub email: String,
    pub role: Role,
    #[serde(default)]
    pub company: Option<Company>,
}

impl Identity {
    pub fn plan(&self) -> Option<Plan> {
        self.company.as_ref().and_then(|c| c.plan)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_identity_with_unknown_plan_decodes_without_plan() {
        let identity: Identity = serde_json::from_value(json!({
            "name": "Ana",
            "email": "ana@techsolve.com",
            "role": "client",
            "company": { "name": "TechSolve", "plan": "enterprise" }
        }))
        .unwrap();

        assert_eq!(identity.role, Role::Client);
        assert_eq!(identity.plan(), None);
        assert_eq!(identity.company.unwrap().name, "TechSolve");
    }

    #[test]
    fn test_identity_rejects_unknown_role() {
        let result = serde_json::from_value::<Identity>(json!({
            "name": "x",
            "email": "x@x.com",
            "role": "superuser"
        }));
        assert!(result.is_err());
    }

    #[test]
    fn test_plan_parse_and_limits() {
        assert_eq!(Plan::parse("aceleracao"), Some(Plan::Aceleracao));
        assert_eq!(Plan::parse("gold"), None);
        assert_eq!(Plan::Crescimento.limits().campaigns, 4);
        assert_eq!(Plan::Starter.limits().budget, 5_000);
        assert_eq!(plan_label(None), "unknown");
    }
}
