//! Auth gateway.
//!
//! Login, registration and token validation all end in one [`AuthResult`],
//! so callers handle "could not authenticate" the same way whatever the cause.

use crate::dashboard::{AgencyDashboardData, ClientDashboardData};
use crate::error::{ApiError, ApiResult, AuthFailure};
use crate::protocol::{
    AgencyDashboardRequest, ClientDashboardRequest, DemoDataRequest, LoginRequest, MeRequest,
    RegisterRequest,
};
use crate::request::{ApiClient, HttpClient};
use crate::{Identity, Plan};

pub const MSG_CONNECTION: &str = "Erro de conexão com o servidor";
pub const MSG_LOGIN_FAILED: &str = "Erro ao fazer login";
pub const MSG_REGISTER_FAILED: &str = "Erro ao criar conta";
pub const MSG_SESSION_INVALID: &str = "Sessão inválida";

/// Outcome of an authentication exchange. Never partially valid.
#[derive(Debug, Clone, PartialEq)]
pub enum AuthResult {
    Success { identity: Identity, token: String },
    Failure(AuthFailure),
}

impl AuthResult {
    pub fn is_success(&self) -> bool {
        matches!(self, AuthResult::Success { .. })
    }
}

/// Maps a credential exchange error to a displayable failure.
fn credential_failure(err: ApiError, fallback: &str) -> AuthFailure {
    match err {
        ApiError::Rejected { message, .. } => {
            AuthFailure::credential(message.unwrap_or_else(|| fallback.to_string()))
        }
        ApiError::Transport { .. } | ApiError::Decode { .. } => {
            log::debug!("auth exchange failed: {}", err);
            AuthFailure::transport(MSG_CONNECTION)
        }
    }
}

#[derive(Debug, Clone)]
pub struct AuthGateway<C> {
    api: ApiClient<C>,
}

impl<C: HttpClient> AuthGateway<C> {
    pub fn new(client: C, base_url: &str) -> Self {
        Self {
            api: ApiClient::new(client, base_url),
        }
    }

    pub async fn login(&self, email: &str, password: &str) -> AuthResult {
        let req = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        match self.api.call(&req, None).await {
            Ok(resp) => AuthResult::Success {
                identity: resp.user,
                token: resp.access_token,
            },
            Err(e) => AuthResult::Failure(credential_failure(e, MSG_LOGIN_FAILED)),
        }
    }

    /// Self-service sign-up, always as a `client`.
    pub async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
        company_name: &str,
        plan: Plan,
    ) -> AuthResult {
        let req = RegisterRequest::client(
            name.to_string(),
            email.to_string(),
            password.to_string(),
            company_name.to_string(),
            plan,
        );
        match self.api.call(&req, None).await {
            Ok(resp) => AuthResult::Success {
                identity: resp.user,
                token: resp.access_token,
            },
            Err(e) => AuthResult::Failure(credential_failure(e, MSG_REGISTER_FAILED)),
        }
    }

    /// Succeeds only when the server answers 2xx with a user object.
    pub async fn validate(&self, token: &str) -> AuthResult {
        match self.api.call(&MeRequest, Some(token)).await {
            Ok(resp) => match resp.user {
                Some(identity) => AuthResult::Success {
                    identity,
                    token: token.to_string(),
                },
                None => AuthResult::Failure(AuthFailure::token_invalid(MSG_SESSION_INVALID)),
            },
            Err(e) => {
                log::debug!("token validation failed: {}", e);
                AuthResult::Failure(AuthFailure::token_invalid(MSG_SESSION_INVALID))
            }
        }
    }

    pub async fn seed_demo_data(&self) -> ApiResult<()> {
        self.api.call(&DemoDataRequest, None).await.map(|_| ())
    }

    pub async fn agency_dashboard(&self, token: &str) -> ApiResult<AgencyDashboardData> {
        self.api.call(&AgencyDashboardRequest, Some(token)).await
    }

    pub async fn client_dashboard(&self, token: &str) -> ApiResult<ClientDashboardData> {
        self.api.call(&ClientDashboardRequest, Some(token)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AuthErrorKind;
    use crate::request::MockHttpClient;
    use crate::Role;
    use serde_json::json;

    const LOGIN: &str = "http://api.test/api/auth/login";
    const REGISTER: &str = "http://api.test/api/auth/register";
    const ME: &str = "http://api.test/api/auth/me";

    fn gateway() -> AuthGateway<MockHttpClient> {
        AuthGateway::new(MockHttpClient::new(), "http://api.test")
    }

    fn user_json(role: &str) -> serde_json::Value {
        json!({
            "id": 3,
            "name": "Admin",
            "email": "admin@ai.growth",
            "role": role,
            "company": null
        })
    }

    #[tokio::test]
    async fn test_login_success() {
        let gw = gateway();
        gw.api.client().mock_response(
            LOGIN,
            200,
            json!({ "user": user_json("agency"), "access_token": "jwt" }),
        );

        match gw.login("admin@ai.growth", "admin123").await {
            AuthResult::Success { identity, token } => {
                assert_eq!(identity.role, Role::Agency);
                assert_eq!(token, "jwt");
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_login_invalid_credentials_uses_server_message() {
        let gw = gateway();
        gw.api
            .client()
            .mock_response(LOGIN, 401, json!({ "error": "Invalid credentials" }));

        assert_eq!(
            gw.login("bad@x.com", "wrong").await,
            AuthResult::Failure(AuthFailure::credential("Invalid credentials"))
        );
    }

    #[tokio::test]
    async fn test_login_rejection_without_message_uses_fallback() {
        let gw = gateway();
        gw.api.client().mock_response(LOGIN, 500, json!({}));

        assert_eq!(
            gw.login("a@x.com", "pw").await,
            AuthResult::Failure(AuthFailure::credential(MSG_LOGIN_FAILED))
        );
    }

    #[tokio::test]
    async fn test_login_transport_failure() {
        let gw = gateway();
        gw.api.client().mock_transport_error(LOGIN, "connection refused");

        let AuthResult::Failure(failure) = gw.login("a@x.com", "pw").await else {
            panic!("expected failure");
        };
        assert_eq!(failure.kind, AuthErrorKind::Transport);
        assert_eq!(failure.message, MSG_CONNECTION);
    }

    #[tokio::test]
    async fn test_login_error_page_is_a_connection_failure() {
        let gw = gateway();
        gw.api
            .client()
            .mock_raw(LOGIN, 502, "<html><body>Bad Gateway</body></html>");

        assert_eq!(
            gw.login("a@x.com", "pw").await,
            AuthResult::Failure(AuthFailure::transport(MSG_CONNECTION))
        );
    }

    #[tokio::test]
    async fn test_login_malformed_success_body() {
        let gw = gateway();
        gw.api
            .client()
            .mock_response(LOGIN, 200, json!({ "access_token": "jwt" }));

        let AuthResult::Failure(failure) = gw.login("a@x.com", "pw").await else {
            panic!("expected failure");
        };
        assert_eq!(failure.kind, AuthErrorKind::Transport);
    }

    #[tokio::test]
    async fn test_register_sends_client_role_and_plan() {
        let gw = gateway();
        gw.api.client().mock_response(
            REGISTER,
            201,
            json!({ "user": user_json("client"), "access_token": "new" }),
        );

        let result = gw
            .register("Ana", "ana@x.com", "pw", "TechSolve", Plan::Crescimento)
            .await;
        assert!(result.is_success());

        let reqs = gw.api.client().requests.borrow();
        let body: serde_json::Value = serde_json::from_str(reqs[0].3.as_ref().unwrap()).unwrap();
        assert_eq!(body["role"], "client");
        assert_eq!(body["plan"], "crescimento");
        assert_eq!(body["company_name"], "TechSolve");
    }

    #[tokio::test]
    async fn test_register_conflict() {
        let gw = gateway();
        gw.api
            .client()
            .mock_response(REGISTER, 409, json!({ "error": "Email já cadastrado" }));

        assert_eq!(
            gw.register("Ana", "ana@x.com", "pw", "TechSolve", Plan::Starter)
                .await,
            AuthResult::Failure(AuthFailure::credential("Email já cadastrado"))
        );
    }

    #[tokio::test]
    async fn test_validate() {
        let gw = gateway();
        gw.api
            .client()
            .mock_response(ME, 200, json!({ "user": user_json("client") }));

        match gw.validate("tok").await {
            AuthResult::Success { token, identity } => {
                assert_eq!(token, "tok");
                assert_eq!(identity.role, Role::Client);
            }
            other => panic!("unexpected {:?}", other),
        }

        gw.api.client().mock_response(ME, 422, json!({ "msg": "Not enough segments" }));
        let AuthResult::Failure(failure) = gw.validate("garbage").await else {
            panic!("expected failure");
        };
        assert_eq!(failure.kind, AuthErrorKind::TokenInvalid);
    }
}
