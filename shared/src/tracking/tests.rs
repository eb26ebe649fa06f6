use super::*;
use serde_json::json;

fn dispatcher_with(backends: &[RecordingBackend]) -> TrackingDispatcher {
    backends
        .iter()
        .cloned()
        .fold(TrackingDispatcher::new(), |d, b| d.with_backend(b))
}

// =========================================================
// Translation
// =========================================================

#[test]
fn test_ga4_login_call() {
    let event = TrackingEvent::login(Role::Agency, None);
    let call = Platform::GoogleAnalytics.translate(&event).unwrap();

    assert_eq!(call.function, "gtag");
    assert_eq!(call.args[0], json!("event"));
    assert_eq!(call.args[1], json!("login"));
    let params = &call.args[2];
    assert_eq!(params["event_category"], "AI.GROWTH");
    assert_eq!(params["event_label"], "login");
    assert_eq!(params["user_type"], "agency");
    assert_eq!(params["plan_type"], "unknown");
}

#[test]
fn test_facebook_conversion_is_purchase_in_brl() {
    let event = TrackingEvent::conversion("registration", 0.0, Some(Plan::Aceleracao));
    let call = Platform::FacebookPixel.translate(&event).unwrap();

    assert_eq!(call.function, "fbq");
    assert_eq!(call.args[0], json!("track"));
    assert_eq!(call.args[1], json!("Purchase"));
    assert_eq!(call.args[2]["currency"], "BRL");
    assert_eq!(call.args[2]["content_name"], "AI.GROWTH");
    assert_eq!(call.args[2]["content_category"], "conversion");
    assert_eq!(call.args[2]["planType"], "aceleracao");
}

#[test]
fn test_facebook_page_view_defaults_category() {
    let event = TrackingEvent::page_view("Login", "/login", None, None);
    let call = Platform::FacebookPixel.translate(&event).unwrap();
    assert_eq!(call.args[1], json!("PageView"));
    assert_eq!(call.args[2]["content_category"], "saas");
}

#[test]
fn test_platform_specific_names() {
    let plan = TrackingEvent::plan_selection(Plan::Crescimento);
    assert_eq!(
        Platform::GoogleAnalytics.translate(&plan).unwrap().args[1],
        json!("select_item")
    );
    assert_eq!(
        Platform::FacebookPixel.translate(&plan).unwrap().args[1],
        json!("AddToCart")
    );
    assert_eq!(
        Platform::GoogleAnalytics.translate(&plan).unwrap().args[2]["value"],
        json!(397.0)
    );

    let dashboard = TrackingEvent::dashboard_view(Role::Client);
    assert_eq!(
        Platform::GoogleAnalytics.translate(&dashboard).unwrap().args[1],
        json!("page_view")
    );
    assert_eq!(
        Platform::FacebookPixel.translate(&dashboard).unwrap().args[1],
        json!("ViewContent")
    );

    let error = TrackingEvent::error("login_failed", "Invalid credentials");
    let call = Platform::GoogleAnalytics.translate(&error).unwrap();
    assert_eq!(call.args[1], json!("exception"));
    assert_eq!(call.args[2]["errorType"], "login_failed");
}

#[test]
fn test_platforms_skip_events_they_do_not_record() {
    let click = TrackingEvent::button_click("criar_dados_demo", "login", None);
    assert!(Platform::FacebookPixel.translate(&click).is_none());
    assert!(Platform::LinkedIn.translate(&click).is_none());
    assert!(Platform::Hotjar.translate(&click).is_none());
    assert!(Platform::Clarity.translate(&click).is_some());

    let login = TrackingEvent::login(Role::Client, Some(Plan::Starter));
    assert!(Platform::LinkedIn.translate(&login).is_none());
    assert!(Platform::Hotjar.translate(&login).is_some());
}

#[test]
fn test_linkedin_and_clarity_shapes() {
    let sign_up = TrackingEvent::sign_up(Role::Client, Plan::Starter);

    let call = Platform::LinkedIn.translate(&sign_up).unwrap();
    assert_eq!(call.function, "lintrk");
    assert_eq!(call.args, vec![json!("track"), json!({ "conversion_id": "sign_up" })]);

    let call = Platform::Clarity.translate(&sign_up).unwrap();
    assert_eq!(call.function, "clarity");
    assert_eq!(call.args[0], json!("set"));
    assert_eq!(call.args[1], json!("sign_up"));
    let payload: serde_json::Value = serde_json::from_str(call.args[2].as_str().unwrap()).unwrap();
    assert_eq!(payload["planType"], "starter");

    let call = Platform::Hotjar.translate(&sign_up).unwrap();
    assert_eq!(call.args, vec![json!("event"), json!("sign_up")]);
}

/// One event of every kind, in `EventKind` order.
fn one_of_each() -> Vec<TrackingEvent> {
    vec![
        TrackingEvent::login(Role::Agency, None),
        TrackingEvent::sign_up(Role::Client, Plan::Starter),
        TrackingEvent::conversion("registration", 0.0, Some(Plan::Starter)),
        TrackingEvent::plan_selection(Plan::Starter),
        TrackingEvent::dashboard_view(Role::Client),
        TrackingEvent::feature_usage("plan_upgrade", Some(Role::Client), Some(Plan::Starter)),
        TrackingEvent::error("login_failed", "Login failed"),
        TrackingEvent::page_view("login", "/login", None, None),
        TrackingEvent::button_click("criar_dados_demo", "login", None),
        TrackingEvent::form_submission("register", true, Some(Role::Client)),
    ]
}

fn name_on(platform: Platform, event: &TrackingEvent) -> Option<String> {
    let call = platform.translate(event)?;
    let name = match platform {
        Platform::LinkedIn => &call.args[1]["conversion_id"],
        _ => &call.args[1],
    };
    Some(name.as_str().unwrap().to_string())
}

#[test]
fn test_event_name_table() {
    // ga4, facebook, linkedin, clarity, hotjar
    let expected: [[Option<&str>; 5]; 10] = [
        [Some("login"), Some("Login"), None, Some("login"), Some("login")],
        [
            Some("sign_up"),
            Some("CompleteRegistration"),
            Some("sign_up"),
            Some("sign_up"),
            Some("sign_up"),
        ],
        [
            Some("conversion"),
            Some("Purchase"),
            Some("conversion"),
            Some("conversion"),
            Some("conversion"),
        ],
        [
            Some("select_item"),
            Some("AddToCart"),
            None,
            Some("plan_selection"),
            Some("plan_selection"),
        ],
        [Some("page_view"), Some("ViewContent"), None, Some("dashboard_view"), None],
        [Some("feature_usage"), None, None, Some("feature_usage"), Some("feature_usage")],
        [Some("exception"), None, None, Some("error"), None],
        [Some("page_view"), Some("PageView"), None, Some("page_view"), None],
        [Some("click"), None, None, Some("button_click"), None],
        [Some("form_submit"), None, None, Some("form_submission"), None],
    ];

    for (event, row) in one_of_each().iter().zip(expected) {
        for (platform, want) in Platform::ALL.into_iter().zip(row) {
            assert_eq!(
                name_on(platform, event).as_deref(),
                want,
                "{} on {}",
                event.kind.as_str(),
                platform
            );
        }
    }
}

#[test]
fn test_feature_usage_params() {
    let event =
        TrackingEvent::feature_usage("plan_upgrade", Some(Role::Client), Some(Plan::Crescimento));

    let call = Platform::GoogleAnalytics.translate(&event).unwrap();
    assert_eq!(call.args[2]["featureName"], "plan_upgrade");
    assert_eq!(call.args[2]["event_label"], "feature_usage");
    assert_eq!(call.args[2]["user_type"], "client");
    assert_eq!(call.args[2]["plan_type"], "crescimento");

    let call = Platform::Clarity.translate(&event).unwrap();
    let payload: serde_json::Value = serde_json::from_str(call.args[2].as_str().unwrap()).unwrap();
    assert_eq!(payload["featureName"], "plan_upgrade");

    let call = Platform::Hotjar.translate(&event).unwrap();
    assert_eq!(call.args, vec![json!("event"), json!("feature_usage")]);
}

#[test]
fn test_form_submission_params() {
    let event = TrackingEvent::form_submission("register", false, None);

    let call = Platform::GoogleAnalytics.translate(&event).unwrap();
    assert_eq!(call.args[1], json!("form_submit"));
    assert_eq!(call.args[2]["formName"], "register");
    assert_eq!(call.args[2]["success"], json!(false));
    assert_eq!(call.args[2]["user_type"], "unknown");

    let call = Platform::Clarity.translate(&event).unwrap();
    let payload: serde_json::Value = serde_json::from_str(call.args[2].as_str().unwrap()).unwrap();
    assert_eq!(payload["formName"], "register");
    assert_eq!(payload["success"], json!(false));
}

#[test]
fn test_platform_parse() {
    assert_eq!(Platform::parse(" GA4 "), Some(Platform::GoogleAnalytics));
    assert_eq!(Platform::parse("hotjar"), Some(Platform::Hotjar));
    assert_eq!(Platform::parse("mixpanel"), None);
}

// =========================================================
// Dispatch
// =========================================================

#[test]
fn test_emit_reaches_every_backend() {
    let ga = RecordingBackend::new(Platform::GoogleAnalytics);
    let fb = RecordingBackend::new(Platform::FacebookPixel);
    let hj = RecordingBackend::new(Platform::Hotjar);
    let dispatcher = dispatcher_with(&[ga.clone(), fb.clone(), hj.clone()]);

    dispatcher.emit(TrackingEvent::login(Role::Agency, None));

    assert_eq!(ga.event_names(), vec!["login"]);
    assert_eq!(fb.event_names(), vec!["Login"]);
    assert_eq!(hj.event_names(), vec!["login"]);
}

#[test]
fn test_failing_backend_does_not_block_others() {
    let broken = RecordingBackend::failing(Platform::FacebookPixel);
    let ga = RecordingBackend::new(Platform::GoogleAnalytics);
    let clarity = RecordingBackend::new(Platform::Clarity);
    let dispatcher = dispatcher_with(&[broken.clone(), ga.clone(), clarity.clone()]);

    dispatcher.emit(TrackingEvent::sign_up(Role::Client, Plan::Starter));
    dispatcher.emit(TrackingEvent::page_view("Dashboard", "/dashboard", None, None));

    assert_eq!(broken.recorded().len(), 2);
    assert_eq!(ga.event_names(), vec!["sign_up", "page_view"]);
    assert_eq!(clarity.event_names(), vec!["sign_up", "page_view"]);
}

#[test]
fn test_empty_dispatcher_is_a_no_op() {
    let dispatcher = TrackingDispatcher::new();
    dispatcher.emit(TrackingEvent::error("x", "y"));
    assert!(dispatcher.platforms().is_empty());
}
