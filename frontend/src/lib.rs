//! AI.GROWTH web client.
//!
//! Context-driven layout:
//! - `web::router`: history handling, guarded by the shared route authorizer
//! - `auth`: session context over the shared controller
//! - `components`: pages and widgets

mod auth;
mod components {
    pub mod agency_dashboard;
    pub mod client_dashboard;
    pub mod login;
    pub mod widgets;
}
mod serde_helper;

use aigrowth_shared::{AppConfig, AppRoute};
use leptos::prelude::*;

use crate::auth::{AuthContext, init_auth, use_auth};
use crate::components::agency_dashboard::AgencyDashboardPage;
use crate::components::client_dashboard::ClientDashboardPage;
use crate::components::login::LoginPage;
use crate::components::widgets::LoadingScreen;

/// Thin wrappers over browser APIs.
pub(crate) mod web {
    pub mod analytics;
    mod http;
    pub mod router;
    mod storage;

    pub use http::FetchClient;
    pub use storage::BrowserTokenStorage;
}

use web::router::{Router, RouterOutlet};

/// Build-time overrides, e.g. `AIGROWTH_API_BASE=https://api.example.com trunk build`.
pub fn app_config() -> AppConfig {
    AppConfig::from_vars(
        option_env!("AIGROWTH_API_BASE"),
        option_env!("AIGROWTH_TOKEN_KEY"),
        option_env!("AIGROWTH_TRACKING"),
    )
}

fn route_matcher(route: AppRoute) -> AnyView {
    match route {
        AppRoute::Login => view! { <LoginPage /> }.into_any(),
        AppRoute::Agency(section) => view! { <AgencyDashboardPage section=section /> }.into_any(),
        AppRoute::Client(section) => view! { <ClientDashboardPage section=section /> }.into_any(),
        // Root always redirects; reaching it here means nothing matched.
        AppRoute::Root | AppRoute::NotFound => view! {
            <div class="flex items-center justify-center min-h-screen bg-base-200">
                <div class="text-center">
                    <h1 class="text-6xl font-bold text-error">"404"</h1>
                    <p class="text-xl mt-4">"Página não encontrada"</p>
                </div>
            </div>
        }
        .into_any(),
    }
}

#[component]
fn Routed() -> impl IntoView {
    let auth = use_auth();

    view! {
        <Router session=auth.session_signal() tracker=auth.tracker()>
            <RouterOutlet matcher=route_matcher />
        </Router>
    }
}

#[component]
pub fn App() -> impl IntoView {
    let config = app_config();

    let auth_ctx = AuthContext::new(&config);
    provide_context(auth_ctx);

    // Validate any persisted token before the first route is settled.
    init_auth(&auth_ctx);

    view! {
        <Show
            when=move || !auth_ctx.is_loading()
            fallback=|| view! { <LoadingScreen message="Carregando..." /> }
        >
            <Routed />
        </Show>
    }
}
