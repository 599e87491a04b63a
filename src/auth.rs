//! Identity gate: email/password account operations via the Firebase
//! Identity Toolkit REST API.
//!
//! Three operations are exposed, matching what the auth form depends on:
//! sign-up, sign-in, and password reset. Each resolves or fails with one
//! human-readable message; the provider is otherwise treated as opaque.

use serde::Deserialize;
use std::error::Error;
use std::fmt;
use tracing::{info, instrument, warn};

const IDENTITY_API_BASE: &str = "https://identitytoolkit.googleapis.com/v1";

/// A single user-facing failure message from an identity operation.
///
/// Provider prefixes (`Firebase: `) are stripped before display.
#[derive(Debug)]
pub struct AuthError(String);

impl AuthError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(user_message(&message.into()))
    }

    pub fn message(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Error for AuthError {}

/// Strip the provider name prefix from a raw error message.
fn user_message(raw: &str) -> String {
    raw.strip_prefix("Firebase: ").unwrap_or(raw).to_string()
}

/// An authenticated session as returned by sign-up or sign-in.
#[derive(Debug, Deserialize)]
pub struct AuthSession {
    #[serde(rename = "email", default)]
    pub email: String,
    #[serde(rename = "idToken", default)]
    pub id_token: String,
    #[serde(rename = "localId", default)]
    pub local_id: String,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: String,
}

/// Pull the provider's error message out of a failed response body.
///
/// Falls back to a generic message when the body is not the expected
/// error envelope.
fn error_message_from_body(body: &str) -> String {
    match serde_json::from_str::<ErrorEnvelope>(body) {
        Ok(envelope) if !envelope.error.message.is_empty() => {
            user_message(&envelope.error.message)
        }
        _ => "Authentication request failed.".to_string(),
    }
}

/// Build the request URL for one identity operation.
fn endpoint(operation: &str, api_key: &str) -> String {
    format!("{IDENTITY_API_BASE}/accounts:{operation}?key={api_key}")
}

/// Wraps the identity provider's three account operations.
pub struct IdentityGate {
    api_key: String,
    client: reqwest::Client,
}

impl IdentityGate {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            client: reqwest::Client::new(),
        }
    }

    /// Create an account and sign in.
    #[instrument(level = "info", skip(self, password), fields(%email))]
    pub async fn sign_up(&self, email: &str, password: &str) -> Result<AuthSession, AuthError> {
        let body = serde_json::json!({
            "email": email,
            "password": password,
            "returnSecureToken": true,
        });
        let session = self.post_for_session("signUp", &body).await?;
        info!("Account created");
        Ok(session)
    }

    /// Sign in to an existing account.
    #[instrument(level = "info", skip(self, password), fields(%email))]
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<AuthSession, AuthError> {
        let body = serde_json::json!({
            "email": email,
            "password": password,
            "returnSecureToken": true,
        });
        let session = self.post_for_session("signInWithPassword", &body).await?;
        info!("Signed in");
        Ok(session)
    }

    /// Send a password-reset email.
    ///
    /// An empty email is rejected locally before any network call.
    #[instrument(level = "info", skip(self), fields(%email))]
    pub async fn send_password_reset(&self, email: &str) -> Result<(), AuthError> {
        if email.trim().is_empty() {
            return Err(AuthError::new("Please enter your email address first."));
        }
        let body = serde_json::json!({
            "requestType": "PASSWORD_RESET",
            "email": email,
        });
        self.post("sendOobCode", &body).await?;
        info!("Password reset email requested");
        Ok(())
    }

    async fn post_for_session(
        &self,
        operation: &str,
        body: &serde_json::Value,
    ) -> Result<AuthSession, AuthError> {
        let response = self.post(operation, body).await?;
        serde_json::from_str::<AuthSession>(&response)
            .map_err(|_| AuthError::new("Authentication request failed."))
    }

    async fn post(
        &self,
        operation: &str,
        body: &serde_json::Value,
    ) -> Result<String, AuthError> {
        let url = endpoint(operation, &self.api_key);
        let result = self
            .client
            .post(&url)
            .header("Content-Type", "application/json")
            .body(body.to_string())
            .send()
            .await;

        let response = match result {
            Ok(response) => response,
            Err(e) => {
                warn!(operation, error = %e, "Identity request did not reach the provider");
                return Err(AuthError::new("Could not reach the sign-in service."));
            }
        };

        let status = response.status();
        let text = response.text().await.unwrap_or_default();
        if !status.is_success() {
            let message = error_message_from_body(&text);
            warn!(operation, %status, %message, "Identity operation failed");
            return Err(AuthError(message));
        }
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_urls() {
        assert_eq!(
            endpoint("signUp", "KEY123"),
            "https://identitytoolkit.googleapis.com/v1/accounts:signUp?key=KEY123"
        );
        assert!(endpoint("signInWithPassword", "k").contains("accounts:signInWithPassword"));
        assert!(endpoint("sendOobCode", "k").contains("accounts:sendOobCode"));
    }

    #[test]
    fn test_error_message_extracted_from_envelope() {
        let body = r#"{"error": {"code": 400, "message": "EMAIL_EXISTS"}}"#;
        assert_eq!(error_message_from_body(body), "EMAIL_EXISTS");
    }

    #[test]
    fn test_error_message_fallback_for_garbage_body() {
        assert_eq!(
            error_message_from_body("<html>502</html>"),
            "Authentication request failed."
        );
    }

    #[test]
    fn test_provider_prefix_is_stripped() {
        let err = AuthError::new("Firebase: Error (auth/invalid-credential).");
        assert_eq!(err.message(), "Error (auth/invalid-credential).");

        let plain = AuthError::new("INVALID_PASSWORD");
        assert_eq!(plain.message(), "INVALID_PASSWORD");
    }

    #[test]
    fn test_session_parses_provider_response() {
        let body = r#"{
            "idToken": "tok",
            "email": "a@b.example",
            "refreshToken": "r",
            "expiresIn": "3600",
            "localId": "uid1"
        }"#;
        let session: AuthSession = serde_json::from_str(body).unwrap();
        assert_eq!(session.email, "a@b.example");
        assert_eq!(session.id_token, "tok");
        assert_eq!(session.local_id, "uid1");
    }

    #[tokio::test]
    async fn test_reset_with_empty_email_rejected_locally() {
        let gate = IdentityGate::new("unused-key");
        let err = gate.send_password_reset("   ").await.unwrap_err();
        assert_eq!(err.message(), "Please enter your email address first.");
    }
}
