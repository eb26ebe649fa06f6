//! Browser router.
//!
//! Owns every `window.history` interaction. Each navigation is settled with
//! the shared route authorizer against the injected session signal, so
//! the router never needs to know how authentication works.

use aigrowth_shared::route::resolve;
use aigrowth_shared::{AppRoute, Session, TrackingDispatcher, TrackingEvent};
use leptos::prelude::*;
use wasm_bindgen::prelude::*;

fn current_path() -> String {
    web_sys::window()
        .and_then(|w| w.location().pathname().ok())
        .unwrap_or_else(|| "/".to_string())
}

fn push_history_state(path: &str) {
    if let Some(window) = web_sys::window() {
        if let Ok(history) = window.history() {
            let _ = history.push_state_with_url(&JsValue::NULL, "", Some(path));
        }
    }
}

fn replace_history_state(path: &str) {
    if let Some(window) = web_sys::window() {
        if let Ok(history) = window.history() {
            let _ = history.replace_state_with_url(&JsValue::NULL, "", Some(path));
        }
    }
}

#[derive(Clone, Copy)]
pub struct RouterService {
    current_route: ReadSignal<AppRoute>,
    set_route: WriteSignal<AppRoute>,
    session: Signal<Session>,
}

impl RouterService {
    /// Settles the URL the page was loaded with.
    fn new(session: Signal<Session>) -> Self {
        let path = current_path();
        let (route, redirected) = resolve(&session.get_untracked(), AppRoute::from_path(&path));
        if redirected {
            log::debug!("[router] {} -> {}", path, route);
            replace_history_state(&route.to_path());
        }
        let (current_route, set_route) = signal(route);

        Self {
            current_route,
            set_route,
            session,
        }
    }

    pub fn current_route(&self) -> ReadSignal<AppRoute> {
        self.current_route
    }

    /// Navigates to `path`, landing wherever the authorizer allows.
    pub fn navigate(&self, path: &str) {
        let session = self.session.get_untracked();
        let (route, redirected) = resolve(&session, AppRoute::from_path(path));

        if redirected {
            log::debug!("[router] {} -> {}", path, route);
            replace_history_state(&route.to_path());
        } else {
            push_history_state(path);
        }
        self.set_route.set(route);
    }

    /// Back/forward buttons go through the same authorizer.
    fn init_popstate_listener(&self) {
        let set_route = self.set_route;
        let session = self.session;

        let closure = Closure::<dyn Fn()>::new(move || {
            let path = current_path();
            let (route, redirected) =
                resolve(&session.get_untracked(), AppRoute::from_path(&path));
            if redirected {
                replace_history_state(&route.to_path());
            }
            set_route.set(route);
        });

        if let Some(window) = web_sys::window() {
            let _ = window
                .add_event_listener_with_callback("popstate", closure.as_ref().unchecked_ref());
        }

        // The listener lives as long as the page.
        closure.forget();
    }

    /// Login and logout move the user off routes they can no longer see.
    fn setup_session_redirect(&self) {
        let current_route = self.current_route;
        let set_route = self.set_route;
        let session = self.session;

        Effect::new(move |_| {
            let session = session.get();
            let route = current_route.get_untracked();
            let (settled, redirected) = resolve(&session, route);
            if redirected {
                log::debug!("[router] session changed, moving to {}", settled);
                push_history_state(&settled.to_path());
                set_route.set(settled);
            }
        });
    }

    /// One page view per settled route.
    fn setup_page_views(&self, tracker: TrackingDispatcher) {
        let current_route = self.current_route;
        let session = self.session;

        Effect::new(move |_| {
            let route = current_route.get();
            let session = session.get_untracked();
            tracker.emit(TrackingEvent::page_view(
                &route.page_name(),
                &current_path(),
                session.role(),
                session.plan(),
            ));
        });
    }
}

fn provide_router(session: Signal<Session>, tracker: TrackingDispatcher) -> RouterService {
    let router = RouterService::new(session);

    router.init_popstate_listener();
    router.setup_session_redirect();
    router.setup_page_views(tracker);

    provide_context(router);
    router
}

pub fn use_router() -> RouterService {
    use_context::<RouterService>()
        .expect("RouterService not found in context. Ensure Router is provided.")
}

// ============================================================================
// Components
// ============================================================================

#[component]
pub fn Router(
    /// Session used to authorize every navigation.
    session: Signal<Session>,
    /// Receives a page view for each settled route.
    tracker: TrackingDispatcher,
    children: Children,
) -> impl IntoView {
    provide_router(session, tracker);

    children()
}

#[component]
pub fn RouterOutlet(matcher: fn(AppRoute) -> AnyView) -> impl IntoView {
    let router = use_router();

    move || {
        let current = router.current_route().get();
        matcher(current)
    }
}

/// In-app link that goes through [`RouterService::navigate`].
#[component]
pub fn Link(
    #[prop(into)] to: String,
    #[prop(into, optional)] class: MaybeProp<String>,
    children: Children,
) -> impl IntoView {
    let router = use_router();

    let target = to.clone();
    let on_click = move |ev: web_sys::MouseEvent| {
        ev.prevent_default();
        router.navigate(&target);
    };

    view! {
        <a href=to class=move || class.get().unwrap_or_default() on:click=on_click>
            {children()}
        </a>
    }
}
