use crate::auth::{Registration, login, register, use_auth};
use aigrowth_shared::{BRAND, Plan, TrackingEvent};
use leptos::prelude::*;
use leptos::task::spawn_local;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tab {
    Login,
    Register,
}

#[component]
pub fn LoginPage() -> impl IntoView {
    let (tab, set_tab) = signal(Tab::Login);
    let (is_submitting, set_is_submitting) = signal(false);
    let (error_msg, set_error_msg) = signal(Option::<String>::None);

    let select_tab = move |next: Tab| {
        set_error_msg.set(None);
        set_tab.set(next);
    };

    view! {
        <div class="hero min-h-screen bg-base-200">
            <div class="hero-content flex-col w-full max-w-md">
                <div class="text-center mb-4">
                    <h1 class="text-3xl font-bold text-primary">{BRAND}</h1>
                    <p class="text-base-content/70">"Plataforma de Growth Marketing + Tráfego Pago"</p>
                </div>

                <Show when=move || error_msg.get().is_some()>
                    <div role="alert" class="alert alert-error text-sm py-2 w-full">
                        <span>{move || error_msg.get().unwrap_or_default()}</span>
                    </div>
                </Show>

                <div role="tablist" class="tabs tabs-boxed w-full grid grid-cols-2">
                    <a
                        role="tab"
                        class=move || if tab.get() == Tab::Login { "tab tab-active" } else { "tab" }
                        on:click=move |_| select_tab(Tab::Login)
                    >
                        "Entrar"
                    </a>
                    <a
                        role="tab"
                        class=move || if tab.get() == Tab::Register { "tab tab-active" } else { "tab" }
                        on:click=move |_| select_tab(Tab::Register)
                    >
                        "Criar Conta"
                    </a>
                </div>

                <div class="card shrink-0 w-full shadow-2xl bg-base-100">
                    <Show
                        when=move || tab.get() == Tab::Login
                        fallback=move || view! {
                            <RegisterForm
                                is_submitting=is_submitting
                                set_is_submitting=set_is_submitting
                                set_error_msg=set_error_msg
                            />
                        }
                    >
                        <LoginForm
                            is_submitting=is_submitting
                            set_is_submitting=set_is_submitting
                            set_error_msg=set_error_msg
                        />
                        <DemoAccounts />
                    </Show>
                </div>
            </div>
        </div>
    }
}

#[component]
fn LoginForm(
    is_submitting: ReadSignal<bool>,
    set_is_submitting: WriteSignal<bool>,
    set_error_msg: WriteSignal<Option<String>>,
) -> impl IntoView {
    let auth = use_auth();
    let (email, set_email) = signal(String::new());
    let (password, set_password) = signal(String::new());

    let on_submit = move |ev: leptos::web_sys::SubmitEvent| {
        ev.prevent_default();
        set_is_submitting.set(true);
        set_error_msg.set(None);

        spawn_local(async move {
            // The router leaves /login on its own once the session is set.
            let result = login(&auth, email.get_untracked(), password.get_untracked()).await;
            if let Err(failure) = result {
                set_error_msg.set(Some(failure.message));
            }
            set_is_submitting.set(false);
        });
    };

    view! {
        <form class="card-body" on:submit=on_submit>
            <h2 class="card-title">"Entrar na Plataforma"</h2>
            <p class="text-sm text-base-content/70">"Acesse seu dashboard personalizado"</p>
            <div class="form-control">
                <label class="label" for="email">
                    <span class="label-text">"Email"</span>
                </label>
                <input
                    id="email"
                    type="email"
                    placeholder="seu@email.com"
                    on:input=move |ev| set_email.set(event_target_value(&ev))
                    prop:value=email
                    class="input input-bordered"
                    required
                />
            </div>
            <div class="form-control">
                <label class="label" for="password">
                    <span class="label-text">"Senha"</span>
                </label>
                <input
                    id="password"
                    type="password"
                    placeholder="••••••••"
                    on:input=move |ev| set_password.set(event_target_value(&ev))
                    prop:value=password
                    class="input input-bordered"
                    required
                />
            </div>
            <div class="form-control mt-6">
                <button class="btn btn-primary" disabled=move || is_submitting.get()>
                    {move || if is_submitting.get() { "Entrando..." } else { "Entrar" }}
                </button>
            </div>
        </form>
    }
}

#[component]
fn RegisterForm(
    is_submitting: ReadSignal<bool>,
    set_is_submitting: WriteSignal<bool>,
    set_error_msg: WriteSignal<Option<String>>,
) -> impl IntoView {
    let auth = use_auth();
    let form = RwSignal::new(Registration::default());

    let on_plan_change = move |ev: leptos::ev::Event| {
        let Some(plan) = Plan::parse(&event_target_value(&ev)) else {
            return;
        };
        form.update(|f| f.plan = plan);
        auth.track(TrackingEvent::plan_selection(plan));
    };

    let on_submit = move |ev: leptos::web_sys::SubmitEvent| {
        ev.prevent_default();
        set_is_submitting.set(true);
        set_error_msg.set(None);

        spawn_local(async move {
            if let Err(failure) = register(&auth, form.get_untracked()).await {
                set_error_msg.set(Some(failure.message));
            }
            set_is_submitting.set(false);
        });
    };

    view! {
        <form class="card-body" on:submit=on_submit>
            <h2 class="card-title">"Criar Conta"</h2>
            <p class="text-sm text-base-content/70">{format!("Comece a usar a plataforma {}", BRAND)}</p>
            <TextField
                id="reg-name"
                label="Nome Completo"
                kind="text"
                placeholder="Seu nome"
                on_input=move |v| form.update(|f| f.name = v)
            />
            <TextField
                id="reg-email"
                label="Email"
                kind="email"
                placeholder="seu@email.com"
                on_input=move |v| form.update(|f| f.email = v)
            />
            <TextField
                id="reg-password"
                label="Senha"
                kind="password"
                placeholder="••••••••"
                on_input=move |v| form.update(|f| f.password = v)
            />
            <TextField
                id="company-name"
                label="Nome da Empresa"
                kind="text"
                placeholder="Sua Empresa Ltda"
                on_input=move |v| form.update(|f| f.company_name = v)
            />
            <div class="form-control">
                <label class="label" for="plan">
                    <span class="label-text">"Plano"</span>
                </label>
                <select id="plan" class="select select-bordered" on:change=on_plan_change>
                    {Plan::ALL
                        .into_iter()
                        .map(|plan| {
                            view! {
                                <option value=plan.as_str() selected={plan == Plan::default()}>
                                    {format!("{} - R$ {}/mês", plan.display_name(), plan.monthly_price())}
                                </option>
                            }
                        })
                        .collect_view()}
                </select>
            </div>
            <div class="form-control mt-6">
                <button class="btn btn-primary" disabled=move || is_submitting.get()>
                    {move || if is_submitting.get() { "Criando conta..." } else { "Criar Conta" }}
                </button>
            </div>
        </form>
    }
}

#[component]
fn TextField(
    id: &'static str,
    label: &'static str,
    kind: &'static str,
    placeholder: &'static str,
    on_input: impl Fn(String) + 'static,
) -> impl IntoView {
    view! {
        <div class="form-control">
            <label class="label" for=id>
                <span class="label-text">{label}</span>
            </label>
            <input
                id=id
                type=kind
                placeholder=placeholder
                on:input=move |ev| on_input(event_target_value(&ev))
                class="input input-bordered"
                required
            />
        </div>
    }
}

/// Demo credentials and the button that seeds them on the server.
#[component]
fn DemoAccounts() -> impl IntoView {
    let auth = use_auth();
    let (notice, set_notice) = signal(Option::<(String, bool)>::None);

    let create_demo_data = move |_| {
        spawn_local(async move {
            match auth.controller().create_demo_data("login").await {
                Ok(()) => set_notice.set(Some((
                    "Dados de demonstração criados! Use admin@ai.growth / admin123 para agência"
                        .to_string(),
                    false,
                ))),
                Err(e) => {
                    log::warn!("demo data failed: {}", e);
                    set_notice.set(Some(("Erro ao criar dados demo".to_string(), true)));
                }
            }
        });
    };

    view! {
        <div class="px-8 pb-8 space-y-3">
            <div class="divider text-sm text-base-content/70">"Contas de demonstração"</div>
            <div class="text-xs space-y-2">
                <div class="bg-base-200 p-2 rounded">
                    <strong>"Agência: "</strong> "admin@ai.growth / admin123"
                </div>
                <div class="bg-base-200 p-2 rounded">
                    <strong>"Cliente: "</strong> "cliente@techsolve.com / cliente123"
                </div>
            </div>
            <Show when=move || notice.get().is_some()>
                <div class=move || {
                    match notice.get() {
                        Some((_, true)) => "alert alert-error text-xs py-2",
                        _ => "alert alert-success text-xs py-2",
                    }
                }>
                    <span>{move || notice.get().map(|(msg, _)| msg).unwrap_or_default()}</span>
                </div>
            </Show>
            <button class="btn btn-outline btn-sm w-full" on:click=create_demo_data>
                "Criar Dados Demo"
            </button>
        </div>
    }
}
