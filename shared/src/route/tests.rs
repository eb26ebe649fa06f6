use super::*;
use crate::{Company, Identity, Plan};

// =========================================================
// Helpers
// =========================================================

fn session_for(role: Role) -> Session {
    Session::authenticated(
        Identity {
            id: Some(1),
            name: "Test".into(),
            email: "test@ai.growth".into(),
            role,
            company: Some(Company {
                id: Some(7),
                name: "TechSolve".into(),
                plan: Some(Plan::Starter),
                monthly_budget: Some(3_000.0),
            }),
        },
        "token".into(),
    )
}

fn decide(session: &Session, path: &str) -> RouteDecision {
    authorize(session, &AppRoute::from_path(path))
}

// =========================================================
// Parsing
// =========================================================

#[test]
fn test_from_path() {
    assert_eq!(AppRoute::from_path("/"), AppRoute::Root);
    assert_eq!(AppRoute::from_path(""), AppRoute::Root);
    assert_eq!(AppRoute::from_path("/login"), AppRoute::Login);
    assert_eq!(AppRoute::from_path("/login/"), AppRoute::Login);
    assert_eq!(AppRoute::from_path("/agency"), AppRoute::Agency(AgencyView::Overview));
    assert_eq!(
        AppRoute::from_path("/agency/companies"),
        AppRoute::Agency(AgencyView::Companies)
    );
    assert_eq!(
        AppRoute::from_path("/agency/reports/q3"),
        AppRoute::Agency(AgencyView::Other("reports/q3".into()))
    );
    assert_eq!(
        AppRoute::from_path("/dashboard/campaigns?tab=all"),
        AppRoute::Client(ClientView::Campaigns)
    );
    assert_eq!(AppRoute::from_path("/pricing"), AppRoute::NotFound);
    assert_eq!(AppRoute::from_path("/login/extra"), AppRoute::NotFound);
}

#[test]
fn test_paths_round_trip_through_parser() {
    for path in ["/login", "/agency", "/agency/campaigns", "/dashboard", "/dashboard/x/y"] {
        assert_eq!(AppRoute::from_path(path).to_path(), path);
    }
}

#[test]
fn test_required_role() {
    assert_eq!(AppRoute::from_path("/agency/companies").required_role(), Some(Role::Agency));
    assert_eq!(AppRoute::from_path("/dashboard").required_role(), Some(Role::Client));
    assert_eq!(AppRoute::Login.required_role(), None);
    assert_eq!(AppRoute::NotFound.required_role(), None);
}

// =========================================================
// Authorization table
// =========================================================

#[test]
fn test_anonymous_decisions() {
    let anon = Session::default();
    assert_eq!(decide(&anon, "/"), RouteDecision::Redirect(AppRoute::Login));
    assert_eq!(decide(&anon, "/login"), RouteDecision::Render(AppRoute::Login));
    assert_eq!(decide(&anon, "/agency"), RouteDecision::Redirect(AppRoute::Login));
    assert_eq!(
        decide(&anon, "/dashboard/campaigns"),
        RouteDecision::Redirect(AppRoute::Login)
    );
    assert_eq!(decide(&anon, "/nope"), RouteDecision::Render(AppRoute::NotFound));
}

#[test]
fn test_agency_decisions() {
    let agency = session_for(Role::Agency);
    assert_eq!(
        decide(&agency, "/"),
        RouteDecision::Redirect(AppRoute::Agency(AgencyView::Overview))
    );
    assert_eq!(
        decide(&agency, "/login"),
        RouteDecision::Redirect(AppRoute::Agency(AgencyView::Overview))
    );
    assert_eq!(
        decide(&agency, "/agency/campaigns"),
        RouteDecision::Render(AppRoute::Agency(AgencyView::Campaigns))
    );
    assert_eq!(decide(&agency, "/dashboard"), RouteDecision::Redirect(AppRoute::Login));
}

#[test]
fn test_client_decisions() {
    let client = session_for(Role::Client);
    assert_eq!(
        decide(&client, "/"),
        RouteDecision::Redirect(AppRoute::Client(ClientView::Overview))
    );
    assert_eq!(
        decide(&client, "/login"),
        RouteDecision::Redirect(AppRoute::Client(ClientView::Overview))
    );
    assert_eq!(
        decide(&client, "/dashboard/campaigns"),
        RouteDecision::Render(AppRoute::Client(ClientView::Campaigns))
    );
    assert_eq!(decide(&client, "/agency"), RouteDecision::Redirect(AppRoute::Login));
}

#[test]
fn test_authorize_is_deterministic() {
    let sessions = [Session::default(), session_for(Role::Agency), session_for(Role::Client)];
    let paths = ["/", "/login", "/agency", "/agency/x", "/dashboard", "/dashboard/y", "/z"];
    for session in &sessions {
        for path in paths {
            assert_eq!(decide(session, path), decide(session, path));
        }
    }
}

// =========================================================
// Redirect resolution
// =========================================================

#[test]
fn test_resolve_role_mismatch_lands_on_role_home() {
    let client = session_for(Role::Client);
    let (route, redirected) = resolve(&client, AppRoute::from_path("/agency"));
    assert_eq!(route, AppRoute::Client(ClientView::Overview));
    assert!(redirected);
}

#[test]
fn test_resolve_always_settles_on_renderable_route() {
    let sessions = [Session::default(), session_for(Role::Agency), session_for(Role::Client)];
    let paths = ["/", "/login", "/agency", "/dashboard/campaigns", "/other"];
    for session in &sessions {
        for path in paths {
            let (route, _) = resolve(session, AppRoute::from_path(path));
            assert_eq!(authorize(session, &route), RouteDecision::Render(route.clone()));
        }
    }
}

#[test]
fn test_resolve_without_redirect() {
    let agency = session_for(Role::Agency);
    let (route, redirected) = resolve(&agency, AppRoute::from_path("/agency/companies"));
    assert_eq!(route, AppRoute::Agency(AgencyView::Companies));
    assert!(!redirected);
}
