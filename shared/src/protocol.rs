//! Wire shapes of the remote API.
//!
//! Each request type is bound to its path, method and response type through
//! [`ApiRequest`], so call sites cannot pair a request with the wrong answer.

use serde::de::{DeserializeOwned, IgnoredAny};
use serde::{Deserialize, Serialize};

use crate::dashboard::{AgencyDashboardData, ClientDashboardData};
use crate::request::HttpMethod;
use crate::{Identity, Plan, Role};

/// A trait that defines the request-response relationship and metadata for an API endpoint.
pub trait ApiRequest: Serialize {
    /// The response type returned by this request.
    type Response: DeserializeOwned;
    /// The URL path.
    const PATH: &'static str;
    /// The HTTP method.
    const METHOD: HttpMethod;
}

// =========================================================
// Auth
// =========================================================

/// Successful login / registration body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    pub user: Identity,
    pub access_token: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl ApiRequest for LoginRequest {
    type Response = AuthResponse;
    const PATH: &'static str = "/api/auth/login";
    const METHOD: HttpMethod = HttpMethod::Post;
}

/// Self-service sign-up. Always creates a `client` account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub name: String,
    pub role: Role,
    pub company_name: String,
    pub plan: Plan,
}

impl RegisterRequest {
    pub fn client(
        name: String,
        email: String,
        password: String,
        company_name: String,
        plan: Plan,
    ) -> Self {
        Self {
            email,
            password,
            name,
            role: Role::Client,
            company_name,
            plan,
        }
    }
}

impl ApiRequest for RegisterRequest {
    type Response = AuthResponse;
    const PATH: &'static str = "/api/auth/register";
    const METHOD: HttpMethod = HttpMethod::Post;
}

/// `user` is optional on purpose: an answer without it means the token is
/// not valid, it is not a decoding error.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MeResponse {
    #[serde(default)]
    pub user: Option<Identity>,
}

/// "Who am I" for the bearer token.
#[derive(Debug, Serialize, Deserialize)]
pub struct MeRequest;

impl ApiRequest for MeRequest {
    type Response = MeResponse;
    const PATH: &'static str = "/api/auth/me";
    const METHOD: HttpMethod = HttpMethod::Get;
}

/// Seeds the demo agency and client accounts. The answer is ignored.
#[derive(Debug, Serialize, Deserialize)]
pub struct DemoDataRequest;

impl ApiRequest for DemoDataRequest {
    type Response = IgnoredAny;
    const PATH: &'static str = "/api/auth/demo-data";
    const METHOD: HttpMethod = HttpMethod::Post;
}

// =========================================================
// Dashboards
// =========================================================

#[derive(Debug, Serialize, Deserialize)]
pub struct AgencyDashboardRequest;

impl ApiRequest for AgencyDashboardRequest {
    type Response = AgencyDashboardData;
    const PATH: &'static str = "/api/agency/dashboard";
    const METHOD: HttpMethod = HttpMethod::Get;
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ClientDashboardRequest;

impl ApiRequest for ClientDashboardRequest {
    type Response = ClientDashboardData;
    const PATH: &'static str = "/api/client/dashboard";
    const METHOD: HttpMethod = HttpMethod::Get;
}
