//! Building blocks shared by both dashboards.

use std::future::Future;

use aigrowth_shared::dashboard::{PlanUsage, format_brl, format_number_br, scale_series};
use aigrowth_shared::{ApiError, BRAND, Plan, SessionController};
use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::auth::{logout, use_auth};
use crate::web::FetchClient;
use crate::web::router::Link;

// ============================================================================
// Data loading
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum Remote<T> {
    Loading,
    Ready(T),
    Failed(String),
}

/// Fetches dashboard data once with the current token.
///
/// A 401 means the token expired server-side, so the session is dropped and
/// the router takes the user back to the login page.
pub fn load_dashboard<T, F, Fut>(fetch: F) -> ReadSignal<Remote<T>>
where
    T: Send + Sync + 'static,
    F: FnOnce(SessionController<FetchClient>, String) -> Fut + 'static,
    Fut: Future<Output = Result<T, ApiError>> + 'static,
{
    let auth = use_auth();
    let (state, set_state) = signal(Remote::Loading);

    let Some(token) = auth.token() else {
        set_state.set(Remote::Failed("Sessão inválida".to_string()));
        return state;
    };

    spawn_local(async move {
        match fetch(auth.controller(), token).await {
            Ok(data) => set_state.set(Remote::Ready(data)),
            Err(ApiError::Rejected { status: 401, .. }) => {
                log::info!("dashboard rejected the token, logging out");
                logout(&auth);
            }
            Err(e) => {
                log::warn!("Erro ao carregar dashboard: {}", e);
                set_state.set(Remote::Failed("Erro ao carregar dashboard".to_string()));
            }
        }
    });

    state
}

// ============================================================================
// Layout
// ============================================================================

#[component]
pub fn LoadingScreen(#[prop(into)] message: String) -> impl IntoView {
    view! {
        <div class="flex items-center justify-center min-h-screen bg-base-200">
            <div class="text-center space-y-4">
                <span class="loading loading-spinner loading-lg text-primary"></span>
                <p class="text-base-content/70">{message}</p>
            </div>
        </div>
    }
}

#[derive(Debug, Clone)]
pub struct NavItem {
    pub label: &'static str,
    pub path: &'static str,
}

/// Header with brand, plan badge, user and logout, plus the section nav.
#[component]
pub fn DashboardShell(
    #[prop(into)] subtitle: Signal<String>,
    #[prop(into)] plan: Signal<Option<Plan>>,
    role_label: &'static str,
    nav: Vec<NavItem>,
    #[prop(into)] active_path: Signal<String>,
    children: Children,
) -> impl IntoView {
    let auth = use_auth();
    let user_name = move || auth.user().map(|u| u.name).unwrap_or_default();
    let on_logout = move |_| logout(&auth);

    view! {
        <div class="min-h-screen bg-base-200 font-sans">
            <div class="navbar bg-base-100 shadow-xl px-6">
                <div class="flex-1 gap-4">
                    <div>
                        <h1 class="text-xl font-bold text-primary">{BRAND}</h1>
                        <p class="text-sm text-base-content/70">{move || subtitle.get()}</p>
                    </div>
                </div>
                <div class="flex-none gap-4">
                    {move || plan.get().map(|p| view! { <PlanBadge plan=p /> })}
                    <div class="text-right hidden md:block">
                        <p class="text-sm font-medium">{user_name}</p>
                        <p class="text-xs text-base-content/70">{role_label}</p>
                    </div>
                    <button on:click=on_logout class="btn btn-outline btn-error btn-sm">
                        "Sair"
                    </button>
                </div>
            </div>

            <div class="tabs tabs-bordered bg-base-100 px-6">
                {nav
                    .into_iter()
                    .map(|item| {
                        let class = Signal::derive(move || {
                            let active = active_path.get() == item.path;
                            (if active { "tab tab-active" } else { "tab" }).to_string()
                        });
                        view! {
                            <Link to=item.path class=class>
                                {item.label}
                            </Link>
                        }
                    })
                    .collect_view()}
            </div>

            <main class="p-6 max-w-7xl mx-auto space-y-6">{children()}</main>
        </div>
    }
}

/// Shown for sub-sections that have no content yet.
#[component]
pub fn ComingSoon(#[prop(into)] title: String) -> impl IntoView {
    view! {
        <div class="card bg-base-100 shadow-xl">
            <div class="card-body items-center text-center">
                <h2 class="card-title">{title}</h2>
                <p class="text-base-content/70">"Em breve"</p>
            </div>
        </div>
    }
}

// ============================================================================
// Cards
// ============================================================================

#[component]
pub fn PlanBadge(plan: Plan) -> impl IntoView {
    let style = format!("border-color: {0}; color: {0};", plan.color());
    view! {
        <span class="badge badge-outline" style=style>
            {plan.display_name()}
        </span>
    }
}

#[component]
pub fn KpiCard(
    title: &'static str,
    #[prop(into)] value: String,
    hint: &'static str,
    #[prop(optional)] accent: &'static str,
) -> impl IntoView {
    let value_class = format!("stat-value text-2xl {}", accent);
    view! {
        <div class="stat bg-base-100 rounded-box shadow">
            <div class="stat-title">{title}</div>
            <div class=value_class>{value}</div>
            <div class="stat-desc">{hint}</div>
        </div>
    }
}

#[component]
pub fn UsageBar(label: &'static str, #[prop(into)] detail: String, percent: f64) -> impl IntoView {
    let value = PlanUsage::bar_percent(percent);
    view! {
        <div class="space-y-2">
            <div class="flex justify-between text-sm">
                <span>{label}</span>
                <span>{detail}</span>
            </div>
            <progress class="progress progress-primary w-full" value=value.to_string() max="100"></progress>
        </div>
    }
}

/// Round avatar with the first letter of a name.
#[component]
pub fn Initial(#[prop(into)] name: String) -> impl IntoView {
    let letter = name
        .chars()
        .next()
        .map(|c| c.to_uppercase().to_string())
        .unwrap_or_default();
    view! {
        <div class="avatar placeholder">
            <div class="bg-primary text-primary-content rounded-full w-10">
                <span class="text-sm font-bold">{letter}</span>
            </div>
        </div>
    }
}

// ============================================================================
// Charts
// ============================================================================

const CHART_HEIGHT: f64 = 160.0;
const BAR_WIDTH: f64 = 32.0;
const BAR_GAP: f64 = 16.0;

/// Minimal SVG bar chart; values are labelled with pt-BR formatting.
#[component]
pub fn BarChart(
    labels: Vec<String>,
    values: Vec<f64>,
    color: &'static str,
    #[prop(optional)] currency: bool,
) -> impl IntoView {
    let heights = scale_series(&values, CHART_HEIGHT);
    let width = (BAR_WIDTH + BAR_GAP) * values.len().max(1) as f64;
    let view_box = format!("0 0 {} {}", width, CHART_HEIGHT + 40.0);

    let bars = labels
        .into_iter()
        .zip(values)
        .zip(heights)
        .enumerate()
        .map(|(i, ((label, value), height))| {
            let x = i as f64 * (BAR_WIDTH + BAR_GAP) + BAR_GAP / 2.0;
            let y = CHART_HEIGHT - height + 16.0;
            let center = (x + BAR_WIDTH / 2.0).to_string();
            let text = if currency { format_brl(value) } else { format_number_br(value) };
            view! {
                <g>
                    <text
                        x=center.clone()
                        y=(y - 4.0).to_string()
                        text-anchor="middle"
                        font-size="10"
                        fill="currentColor"
                    >
                        {text}
                    </text>
                    <rect
                        x=x.to_string()
                        y=y.to_string()
                        width=BAR_WIDTH.to_string()
                        height=height.to_string()
                        fill=color
                        rx="4"
                    ></rect>
                    <text
                        x=center
                        y=(CHART_HEIGHT + 32.0).to_string()
                        text-anchor="middle"
                        font-size="12"
                        fill="currentColor"
                    >
                        {label}
                    </text>
                </g>
            }
        })
        .collect_view();

    view! {
        <svg viewBox=view_box class="w-full h-64" preserveAspectRatio="xMidYMid meet">
            {bars}
        </svg>
    }
}
