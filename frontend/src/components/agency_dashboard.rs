use aigrowth_shared::dashboard::{
    AGENCY_REVENUE_TREND, AgencyDashboardData, TopCompany, format_brl, format_number_br,
};
use aigrowth_shared::route::AgencyView;
use aigrowth_shared::{AppRoute, Plan, Role, TrackingEvent};
use leptos::prelude::*;

use crate::auth::use_auth;
use crate::components::widgets::{
    BarChart, ComingSoon, DashboardShell, KpiCard, LoadingScreen, NavItem, PlanBadge, Remote,
    load_dashboard,
};

fn nav() -> Vec<NavItem> {
    vec![
        NavItem {
            label: "Dashboard",
            path: "/agency",
        },
        NavItem {
            label: "Empresas",
            path: "/agency/companies",
        },
        NavItem {
            label: "Campanhas",
            path: "/agency/campaigns",
        },
    ]
}

#[component]
pub fn AgencyDashboardPage(section: AgencyView) -> impl IntoView {
    let auth = use_auth();
    auth.track(TrackingEvent::dashboard_view(Role::Agency));

    let data = load_dashboard(|controller, token| async move {
        controller.gateway().agency_dashboard(&token).await
    });
    let active_path = AppRoute::Agency(section.clone()).to_path();

    move || match data.get() {
        Remote::Loading => view! { <LoadingScreen message="Carregando dashboard..." /> }.into_any(),
        Remote::Failed(msg) => view! { <LoadingError message=msg /> }.into_any(),
        Remote::Ready(dashboard) => {
            let body = match section.clone() {
                AgencyView::Overview => view! { <Overview data=dashboard /> }.into_any(),
                AgencyView::Companies => {
                    view! { <TopPerformers companies=dashboard.top_companies /> }.into_any()
                }
                AgencyView::Campaigns => view! { <ComingSoon title="Campanhas" /> }.into_any(),
                AgencyView::Other(path) => view! { <ComingSoon title=path /> }.into_any(),
            };
            view! {
                <DashboardShell
                    subtitle={"Dashboard da Agência".to_string()}
                    plan={Option::<Plan>::None}
                    role_label="Agência"
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
fn LoadingError(message: String) -> impl IntoView {
    view! {
        <div class="flex items-center justify-center min-h-screen bg-base-200">
            <div role="alert" class="alert alert-error max-w-md">
                <span>{message}</span>
            </div>
        </div>
    }
}

#[component]
fn Overview(data: AgencyDashboardData) -> impl IntoView {
    let kpis = data.kpis;
    let (plan_labels, plan_counts): (Vec<String>, Vec<f64>) = data
        .plans_performance
        .iter()
        .map(|p| (p.plan.clone(), p.count as f64))
        .unzip();
    let plan_roas: Vec<f64> = data.plans_performance.iter().map(|p| p.avg_roas).collect();

    view! {
        <div class="grid gap-4 md:grid-cols-2 lg:grid-cols-5">
            <KpiCard
                title="Clientes Ativos"
                value=kpis.total_companies.to_string()
                hint="+12% vs. mês anterior"
                accent="text-primary"
            />
            <KpiCard
                title="Receita Gerenciada"
                value=format_brl(kpis.total_budget)
                hint="/mês em investimento"
                accent="text-success"
            />
            <KpiCard
                title="ROI Médio"
                value=format!("{}%", format_number_br(kpis.roi))
                hint="+8% vs. mês anterior"
                accent="text-success"
            />
            <KpiCard
                title="CAC Médio"
                value=format_brl(kpis.avg_cac)
                hint="-15% vs. mês anterior"
            />
            <KpiCard
                title="Conversões"
                value=kpis.total_conversions.to_string()
                hint="+23% vs. mês anterior"
                accent="text-primary"
            />
        </div>

        <div class="grid gap-4 md:grid-cols-2">
            <div class="card bg-base-100 shadow-xl">
                <div class="card-body">
                    <h3 class="card-title">"Evolução da Receita"</h3>
                    <p class="text-sm text-base-content/70">"Receita gerenciada nos últimos 6 meses"</p>
                    <BarChart
                        labels=AGENCY_REVENUE_TREND.iter().map(|p| p.month.to_string()).collect()
                        values=AGENCY_REVENUE_TREND.iter().map(|p| p.revenue).collect()
                        color="#8B5CF6"
                        currency=true
                    />
                </div>
            </div>
            <div class="card bg-base-100 shadow-xl">
                <div class="card-body">
                    <h3 class="card-title">"Performance por Plano"</h3>
                    <p class="text-sm text-base-content/70">"Distribuição de clientes e performance"</p>
                    <BarChart labels=plan_labels.clone() values=plan_counts color="#10B981" />
                    <p class="text-xs text-base-content/70">"ROAS médio"</p>
                    <BarChart labels=plan_labels values=plan_roas color="#8B5CF6" />
                </div>
            </div>
        </div>

        <TopPerformers companies=data.top_companies />
    }
}

#[component]
fn TopPerformers(companies: Vec<TopCompany>) -> impl IntoView {
    view! {
        <div class="card bg-base-100 shadow-xl">
            <div class="card-body">
                <h3 class="card-title">"Top Performers"</h3>
                <p class="text-sm text-base-content/70">"Clientes com melhor performance de ROAS"</p>
                <Show when={
                    let empty = companies.is_empty();
                    move || empty
                }>
                    <p class="text-center py-8 text-base-content/50">"Nenhuma empresa cadastrada."</p>
                </Show>
                <div class="space-y-4">
                    {companies
                        .into_iter()
                        .enumerate()
                        .map(|(index, company)| {
                            let badge = match company.plan() {
                                Some(plan) => view! { <PlanBadge plan=plan /> }.into_any(),
                                None => view! {
                                    <span class="badge badge-outline">{company.plan.clone()}</span>
                                }
                                .into_any(),
                            };
                            view! {
                                <div class="flex items-center justify-between p-4 border border-base-300 rounded-lg">
                                    <div class="flex items-center gap-4">
                                        <div class="badge badge-primary badge-lg">{index + 1}</div>
                                        <div>
                                            <p class="font-medium">{company.name.clone()}</p>
                                            {badge}
                                        </div>
                                    </div>
                                    <div class="text-right">
                                        <p class="text-lg font-bold text-success">
                                            {format!("{}x ROAS", format_number_br(company.roas))}
                                        </p>
                                        <p class="text-sm text-base-content/70">
                                            {format!("{} receita", format_brl(company.revenue))}
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
