//! Authentication context.
//!
//! Wraps the shared [`SessionController`] for the view layer. The router only
//! ever sees the read-only session signal.

use aigrowth_shared::{
    AppConfig, AuthFailure, AuthGateway, Identity, Plan, Session, SessionController,
    SessionStore, TrackingDispatcher, TrackingEvent,
};
use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::web::{BrowserTokenStorage, FetchClient, analytics};

type Store = SessionStore<BrowserTokenStorage>;
type Controller = SessionController<FetchClient>;

#[derive(Clone, Copy)]
pub struct AuthContext {
    session: RwSignal<Session>,
    loading: RwSignal<bool>,
    store: StoredValue<Store>,
    controller: StoredValue<Controller>,
}

impl AuthContext {
    pub fn new(config: &AppConfig) -> Self {
        let gateway = AuthGateway::new(FetchClient, &config.api_base);
        let tracker = analytics::dispatcher_for(&config.tracking);
        log::debug!("api at {}, tracking {:?}", config.api_base, tracker.platforms());

        Self {
            session: RwSignal::new(Session::Anonymous),
            loading: RwSignal::new(true),
            store: StoredValue::new(SessionStore::new(
                BrowserTokenStorage,
                config.token_key.clone(),
            )),
            controller: StoredValue::new(SessionController::new(gateway, tracker)),
        }
    }

    /// Read-only session, injected into the router.
    pub fn session_signal(&self) -> Signal<Session> {
        self.session.into()
    }

    pub fn session(&self) -> Session {
        self.session.get()
    }

    pub fn user(&self) -> Option<Identity> {
        self.session.with(|s| s.user().cloned())
    }

    pub fn token(&self) -> Option<String> {
        self.session.with_untracked(|s| s.token().map(str::to_string))
    }

    pub fn is_loading(&self) -> bool {
        self.loading.get()
    }

    pub fn controller(&self) -> Controller {
        self.controller.get_value()
    }

    pub fn tracker(&self) -> TrackingDispatcher {
        self.controller.with_value(|c| c.tracker().clone())
    }

    pub fn track(&self, event: TrackingEvent) {
        self.controller.with_value(|c| c.track(event));
    }

    /// Runs a flow against a copy of the store and publishes the result.
    /// The copy shares the same LocalStorage, so nothing is lost.
    fn commit(&self, store: Store) {
        self.session.set(store.session().clone());
        self.store.set_value(store);
    }
}

pub fn use_auth() -> AuthContext {
    use_context::<AuthContext>().expect("AuthContext should be provided")
}

/// Validates any persisted token; the app shows a loading screen meanwhile.
pub fn init_auth(ctx: &AuthContext) {
    let ctx = *ctx;
    spawn_local(async move {
        let mut store = ctx.store.get_value();
        ctx.controller().restore(&mut store).await;
        ctx.commit(store);
        ctx.loading.set(false);
    });
}

pub async fn login(ctx: &AuthContext, email: String, password: String) -> Result<(), AuthFailure> {
    let mut store = ctx.store.get_value();
    let result = ctx.controller().login(&mut store, &email, &password).await;
    if result.is_ok() {
        ctx.commit(store);
    }
    result.map(|_| ())
}

/// Fields of the self-service sign-up form.
#[derive(Debug, Clone, Default)]
pub struct Registration {
    pub name: String,
    pub email: String,
    pub password: String,
    pub company_name: String,
    pub plan: Plan,
}

pub async fn register(ctx: &AuthContext, form: Registration) -> Result<(), AuthFailure> {
    let mut store = ctx.store.get_value();
    let result = ctx
        .controller()
        .register(
            &mut store,
            &form.name,
            &form.email,
            &form.password,
            &form.company_name,
            form.plan,
        )
        .await;
    if result.is_ok() {
        ctx.commit(store);
    }
    result.map(|_| ())
}

/// The router notices the session change and redirects to `/login`.
pub fn logout(ctx: &AuthContext) {
    let mut store = ctx.store.get_value();
    ctx.controller().logout(&mut store);
    ctx.commit(store);
}
