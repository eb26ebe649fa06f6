use aigrowth_shared::dashboard::{
    CLIENT_PERFORMANCE_TREND, Campaign, ClientDashboardData, PlatformStats, format_brl,
    format_number_br,
};
use aigrowth_shared::route::ClientView;
use aigrowth_shared::{AppRoute, Role, TrackingEvent};
use leptos::prelude::*;

use crate::auth::use_auth;
use crate::components::widgets::{
    BarChart, ComingSoon, DashboardShell, Initial, KpiCard, LoadingScreen, NavItem, Remote,
    UsageBar, load_dashboard,
};
use crate::web::router::Link;

/// Campaigns listed on the overview before the "see all" link.
const OVERVIEW_CAMPAIGNS: usize = 3;

fn nav() -> Vec<NavItem> {
    vec![
        NavItem {
            label: "Dashboard",
            path: "/dashboard",
        },
        NavItem {
            label: "Campanhas",
            path: "/dashboard/campaigns",
        },
    ]
}

#[component]
pub fn ClientDashboardPage(section: ClientView) -> impl IntoView {
    let auth = use_auth();
    auth.track(TrackingEvent::dashboard_view(Role::Client));

    let data = load_dashboard(|controller, token| async move {
        controller.gateway().client_dashboard(&token).await
    });
    let active_path = AppRoute::Client(section.clone()).to_path();

    move || match data.get() {
        Remote::Loading => view! { <LoadingScreen message="Carregando dashboard..." /> }.into_any(),
        Remote::Failed(msg) => view! {
            <div class="flex items-center justify-center min-h-screen bg-base-200">
                <div role="alert" class="alert alert-error max-w-md">
                    <span>{msg}</span>
                </div>
            </div>
        }
        .into_any(),
        Remote::Ready(dashboard) => {
            let subtitle = dashboard.company.name.clone();
            let plan = dashboard.company.plan();
            let body = match section.clone() {
                ClientView::Overview => view! { <Overview data=dashboard /> }.into_any(),
                ClientView::Campaigns => view! {
                    <CampaignList
                        title="Campanhas"
                        campaigns=dashboard.campaigns
                        limit=usize::MAX
                    />
                }
                .into_any(),
                ClientView::Other(path) => view! { <ComingSoon title=path /> }.into_any(),
            };
            view! {
                <DashboardShell
                    subtitle=subtitle
                    plan=plan
                    role_label="Cliente"
                    nav=nav()
                    active_path=active_path.clone()
                >
                    {body}
                </DashboardShell>
            }
            .into_any()
        }
    }
}

#[component]
fn Overview(data: ClientDashboardData) -> impl IntoView {
    let auth = use_auth();
    let usage = data.plan_usage();
    let limits = usage.plan.limits();
    let kpis = data.kpis;
    let plan = data.company.plan();
    let on_upgrade = move |_| {
        auth.track(TrackingEvent::feature_usage("plan_upgrade", Some(Role::Client), plan));
    };

    view! {
        <div class="card bg-base-100 shadow-xl">
            <div class="card-body">
                <div class="flex items-center justify-between">
                    <h3 class="card-title">{format!("Uso do Plano {}", usage.plan.display_name())}</h3>
                    <button class="btn btn-outline btn-sm" on:click=on_upgrade>
                        "Fazer Upgrade"
                    </button>
                </div>
                <p class="text-sm text-base-content/70">"Acompanhe o uso dos recursos do seu plano"</p>
                <div class="grid gap-4 md:grid-cols-2">
                    <UsageBar
                        label="Campanhas Ativas"
                        detail=format!("{}/{}", usage.campaigns_used, limits.campaigns)
                        percent=usage.campaign_percent
                    />
                    <UsageBar
                        label="Orçamento Mensal"
                        detail=format!(
                            "{}/{}",
                            format_brl(usage.budget_used),
                            format_brl(limits.budget as f64),
                        )
                        percent=usage.budget_percent
                    />
                </div>
            </div>
        </div>

        <div class="grid gap-4 md:grid-cols-2 lg:grid-cols-5">
            <KpiCard
                title="ROI"
                value=format!("{}%", format_number_br(kpis.roi))
                hint="+15% vs. mês anterior"
                accent="text-success"
            />
            <KpiCard title="CAC" value=format_brl(kpis.cac) hint="-12% vs. mês anterior" />
            <KpiCard
                title="LTV/CAC"
                value=format!("{}:1", format_number_br(kpis.ltv_cac))
                hint="+8% vs. mês anterior"
                accent="text-primary"
            />
            <KpiCard
                title="Taxa Conversão"
                value=format!("{}%", format_number_br(kpis.conversion_rate))
                hint="+3% vs. mês anterior"
            />
            <KpiCard
                title="Receita Atribuída"
                value=format_brl(kpis.revenue_attributed)
                hint="+23% vs. mês anterior"
                accent="text-success"
            />
        </div>

        <div class="grid gap-4 md:grid-cols-2">
            <div class="card bg-base-100 shadow-xl">
                <div class="card-body">
                    <h3 class="card-title">"Evolução do ROI"</h3>
                    <p class="text-sm text-base-content/70">"ROI dos últimos 6 meses"</p>
                    <BarChart
                        labels=CLIENT_PERFORMANCE_TREND.iter().map(|p| p.month.to_string()).collect()
                        values=CLIENT_PERFORMANCE_TREND.iter().map(|p| p.roi).collect()
                        color="#10B981"
                    />
                </div>
            </div>
            <PlatformPerformance platforms=data.platform_performance.into_iter().collect() />
        </div>

        <CampaignList
            title="Campanhas Ativas"
            campaigns=data.campaigns
            limit=OVERVIEW_CAMPAIGNS
        />
    }
}

#[component]
fn PlatformPerformance(platforms: Vec<(String, PlatformStats)>) -> impl IntoView {
    view! {
        <div class="card bg-base-100 shadow-xl">
            <div class="card-body">
                <h3 class="card-title">"Performance por Plataforma"</h3>
                <p class="text-sm text-base-content/70">"ROAS por canal de marketing"</p>
                <div class="space-y-4">
                    {platforms
                        .into_iter()
                        .map(|(name, stats)| {
                            view! {
                                <div class="flex items-center justify-between p-4 border border-base-300 rounded-lg">
                                    <div class="flex items-center gap-3">
                                        <Initial name=name.clone() />
                                        <div>
                                            <p class="font-medium capitalize">{name}</p>
                                            <p class="text-sm text-base-content/70">
                                                {format!("{} investido", format_brl(stats.spent))}
                                            </p>
                                        </div>
                                    </div>
                                    <div class="text-right">
                                        <p class="text-lg font-bold text-success">
                                            {format!("{}x ROAS", format_number_br(stats.roas))}
                                        </p>
                                        <p class="text-sm text-base-content/70">
                                            {format!("{} conversões", stats.conversions)}
                                        </p>
                                    </div>
                                </div>
                            }
                        })
                        .collect_view()}
                </div>
            </div>
        </div>
    }
}

/// First `limit` campaigns, with a link to the full list when some are hidden.
#[component]
fn CampaignList(title: &'static str, campaigns: Vec<Campaign>, limit: usize) -> impl IntoView {
    let total = campaigns.len();
    let rows = campaigns
        .into_iter()
        .take(limit)
        .map(|campaign| {
            view! {
                <div class="flex items-center justify-between p-4 border border-base-300 rounded-lg">
                    <div class="flex items-center gap-4">
                        <Initial name=campaign.platform.clone() />
                        <div>
                            <p class="font-medium">{campaign.name.clone()}</p>
                            <div class="flex gap-4 text-sm text-base-content/70">
                                <span>{format!("{} impressões", format_number_br(campaign.impressions as f64))}</span>
                                <span>{format!("{} cliques", format_number_br(campaign.clicks as f64))}</span>
                                <span>{format!("{} conversões", campaign.conversions)}</span>
                            </div>
                        </div>
                    </div>
                    <div class="text-right">
                        <p class="text-lg font-bold text-success">
                            {format!("{}x ROAS", format_number_br(campaign.roas))}
                        </p>
                        <p class="text-sm text-base-content/70">
                            {format!("{} / {}", format_brl(campaign.spent), format_brl(campaign.budget))}
                        </p>
                    </div>
                </div>
            }
        })
        .collect_view();

    let see_all = (total > limit).then(|| {
        view! {
            <div class="text-center pt-4">
                <Link to="/dashboard/campaigns" class={"btn btn-outline".to_string()}>
                    {format!("Ver Todas as Campanhas ({})", total)}
                </Link>
            </div>
        }
    });

    view! {
        <div class="card bg-base-100 shadow-xl">
            <div class="card-body">
                <h3 class="card-title">{title}</h3>
                <p class="text-sm text-base-content/70">"Visão geral das suas campanhas em andamento"</p>
                <div class="space-y-4">
                    {(total == 0).then(|| view! {
                        <p class="text-center py-8 text-base-content/50">"Nenhuma campanha ativa."</p>
                    })}
                    {rows}
                    {see_all}
                </div>
            </div>
        </div>
    }
}
