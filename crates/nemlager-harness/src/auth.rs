// crates/nemlager-harness/src/auth.rs
// ============================================================================
// Module: Authenticator
// Description: Password sign-in against the API's auth endpoint.
// Purpose: Obtain a bearer token for user-scoped endpoints.
// Dependencies: serde, reqwest
// ============================================================================

//! ## Overview
//! [`authenticate`] posts `{email, password}` to the sign-in endpoint with
//! `method=pw` and returns the issued token. Tokens are never cached; every
//! case signs in again. The JSON body is sent with
//! `Content-Type: application/json`, which the endpoint requires.

use serde::Deserialize;
use serde::Serialize;

use crate::client::ApiClient;
use crate::client::RequestAuth;
use crate::envelope::Envelope;
use crate::error::ApiError;

/// Sign-in path for password authentication.
pub const SIGN_IN_PATH: &str = "/api/v1/auth/sign-in?method=pw";

/// Email/password pair for sign-in.
///
/// # Invariants
/// - `Debug` output never includes the password.
#[derive(Clone, PartialEq, Eq, Serialize)]
pub struct Credentials {
    /// Account email.
    pub email: String,
    /// Account password.
    pub password: String,
}

impl Credentials {
    /// Creates a credential pair.
    #[must_use]
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Token issued at sign-in.
#[derive(Clone, PartialEq, Eq, Deserialize)]
pub struct AuthData {
    /// Bearer token.
    pub jwt: String,
}

impl std::fmt::Debug for AuthData {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthData").field("jwt", &"<redacted>").finish()
    }
}

/// Signs in with `credentials` and returns the issued token.
///
/// # Errors
///
/// Returns [`ApiError`] when the request fails, the credentials are rejected,
/// the body cannot be decoded, or the token is empty.
pub async fn authenticate(
    client: &ApiClient,
    credentials: &Credentials,
) -> Result<AuthData, ApiError> {
    let response = client
        .post::<_, Envelope<AuthData>>(SIGN_IN_PATH, Some(credentials), RequestAuth::None)
        .await?;
    if response.body.data.jwt.is_empty() {
        return Err(ApiError::Decode {
            status: response.status,
            message: "sign-in returned an empty jwt".to_string(),
        });
    }
    Ok(response.body.data)
}
