//! Route model and the route authorizer.
//!
//! Pure domain logic, no DOM access. The browser router asks [`authorize`]
//! on every navigation and applies the decision.

use std::fmt::Display;

use crate::session::Session;
use crate::Role;

/// Sections under `/agency`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AgencyView {
    Overview,
    Companies,
    Campaigns,
    /// Any other sub-path; still inside the agency subtree.
    Other(String),
}

/// Sections under `/dashboard`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientView {
    Overview,
    Campaigns,
    Other(String),
}

/// Application routes.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum AppRoute {
    /// `/`, never rendered, always redirected.
    #[default]
    Root,
    Login,
    Agency(AgencyView),
    Client(ClientView),
    NotFound,
}

impl AppRoute {
    /// Parses a URL path. Trailing slashes are ignored.
    pub fn from_path(path: &str) -> Self {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let trimmed = path.trim_end_matches('/');
        let mut segments = trimmed.split('/').filter(|s| !s.is_empty());

        match segments.next() {
            None => Self::Root,
            Some("login") if segments.next().is_none() => Self::Login,
            Some("agency") => {
                let rest: Vec<&str> = segments.collect();
                Self::Agency(match rest.as_slice() {
                    [] => AgencyView::Overview,
                    ["companies"] => AgencyView::Companies,
                    ["campaigns"] => AgencyView::Campaigns,
                    other => AgencyView::Other(other.join("/")),
                })
            }
            Some("dashboard") => {
                let rest: Vec<&str> = segments.collect();
                Self::Client(match rest.as_slice() {
                    [] => ClientView::Overview,
                    ["campaigns"] => ClientView::Campaigns,
                    other => ClientView::Other(other.join("/")),
                })
            }
            _ => Self::NotFound,
        }
    }

    pub fn to_path(&self) -> String {
        match self {
            Self::Root => "/".to_string(),
            Self::Login => "/login".to_string(),
            Self::Agency(AgencyView::Overview) => "/agency".to_string(),
            Self::Agency(AgencyView::Companies) => "/agency/companies".to_string(),
            Self::Agency(AgencyView::Campaigns) => "/agency/campaigns".to_string(),
            Self::Agency(AgencyView::Other(rest)) => format!("/agency/{}", rest),
            Self::Client(ClientView::Overview) => "/dashboard".to_string(),
            Self::Client(ClientView::Campaigns) => "/dashboard/campaigns".to_string(),
            Self::Client(ClientView::Other(rest)) => format!("/dashboard/{}", rest),
            Self::NotFound => "/404".to_string(),
        }
    }

    /// Role a protected route belongs to. `None` for public routes.
    pub fn required_role(&self) -> Option<Role> {
        match self {
            Self::Agency(_) => Some(Role::Agency),
            Self::Client(_) => Some(Role::Client),
            Self::Root | Self::Login | Self::NotFound => None,
        }
    }

    /// Short name for page-view tracking.
    pub fn page_name(&self) -> String {
        match self {
            Self::Root => "Home".to_string(),
            other => other.to_path().trim_start_matches('/').to_string(),
        }
    }
}

impl Display for AppRoute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_path())
    }
}

/// What the router should do with a requested route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteDecision {
    Render(AppRoute),
    Redirect(AppRoute),
}

fn home_for(session: &Session) -> AppRoute {
    match session.role() {
        Some(role) => role.home_route(),
        None => AppRoute::Login,
    }
}

/// Route authorizer. A role that does not own the requested subtree is
/// treated as unauthenticated for it and sent to `/login`.
pub fn authorize(session: &Session, route: &AppRoute) -> RouteDecision {
    match route {
        AppRoute::Root => RouteDecision::Redirect(home_for(session)),
        AppRoute::Login if session.is_authenticated() => {
            RouteDecision::Redirect(home_for(session))
        }
        AppRoute::Login | AppRoute::NotFound => RouteDecision::Render(route.clone()),
        AppRoute::Agency(_) | AppRoute::Client(_) => {
            if session.role() == route.required_role() {
                RouteDecision::Render(route.clone())
            } else {
                RouteDecision::Redirect(AppRoute::Login)
            }
        }
    }
}

/// Follows redirects until a route renders. Returns the final route and
/// whether any redirect happened. Settles within two hops.
pub fn resolve(session: &Session, route: AppRoute) -> (AppRoute, bool) {
    const MAX_HOPS: usize = 4;

    let mut current = route;
    let mut redirected = false;
    for _ in 0..MAX_HOPS {
        match authorize(session, &current) {
            RouteDecision::Render(r) => return (r, redirected),
            RouteDecision::Redirect(r) => {
                current = r;
                redirected = true;
            }
        }
    }
    log::warn!("redirect chain did not settle, stopping at {}", current);
    (current, redirected)
}

#[cfg(test)]
mod tests;
