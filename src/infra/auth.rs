//! Client for the OTP endpoints under `{base}/auth/`.

use reqwest::{Client, StatusCode, Url};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

use crate::config::AppConfig;
use crate::domain::SignupForm;
use crate::infra::http::build_client;

const AUTH_PATH: &str = "auth/";

#[derive(Debug, Error)]
pub enum AuthClientError {
    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("http request error: {0}")]
    Http(#[from] reqwest::Error),
    /// The service answered with an error body; the message is meant for the user.
    #[error("{0}")]
    Rejected(String),
    #[error("request failed with status {0}")]
    Status(StatusCode),
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct AuthResponse {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

#[derive(Serialize)]
struct Credentials<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Serialize)]
struct OtpCheck<'a> {
    email: &'a str,
    otp: &'a str,
}

#[derive(Serialize)]
struct EmailOnly<'a> {
    email: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PasswordReset<'a> {
    email: &'a str,
    otp: &'a str,
    new_password: &'a str,
}

#[derive(Clone)]
pub struct AuthClient {
    http: Client,
    base_url: Url,
}

impl AuthClient {
    pub fn new(config: &AppConfig) -> Result<Self, AuthClientError> {
        let base_url = Url::parse(&config.api_base_url)?.join(AUTH_PATH)?;
        let http = build_client(config.request_timeout)?;
        Ok(Self { http, base_url })
    }

    pub async fn signup_request_otp(
        &self,
        form: &SignupForm,
    ) -> Result<AuthResponse, AuthClientError> {
        self.post("signup/request-otp", form).await
    }

    pub async fn signup_verify_otp(
        &self,
        email: &str,
        otp: &str,
    ) -> Result<AuthResponse, AuthClientError> {
        self.post("signup/verify-otp", &OtpCheck { email, otp }).await
    }

    pub async fn login_request_otp(
        &self,
        email: &str,
        password: &str,
    ) -> Result<AuthResponse, AuthClientError> {
        self.post("login/request-otp", &Credentials { email, password })
            .await
    }

    pub async fn login_verify_otp(
        &self,
        email: &str,
        otp: &str,
    ) -> Result<AuthResponse, AuthClientError> {
        self.post("login/verify-otp", &OtpCheck { email, otp }).await
    }

    pub async fn forgot_password_request_otp(
        &self,
        email: &str,
    ) -> Result<AuthResponse, AuthClientError> {
        self.post("forgot-password/request-otp", &EmailOnly { email })
            .await
    }

    pub async fn reset_password(
        &self,
        email: &str,
        otp: &str,
        new_password: &str,
    ) -> Result<AuthResponse, AuthClientError> {
        let body = PasswordReset {
            email,
            otp,
            new_password,
        };
        self.post("forgot-password/reset", &body).await
    }

    async fn post<B>(&self, path: &str, body: &B) -> Result<AuthResponse, AuthClientError>
    where
        B: Serialize + ?Sized,
    {
        let url = self.base_url.join(path)?;
        let response = self.http.post(url).json(body).send().await?;
        let status = response.status();
        let bytes = response.bytes().await?;

        if status.is_success() {
            info!(endpoint = path, %status, "auth request accepted");
            return Ok(serde_json::from_slice(&bytes).unwrap_or_default());
        }

        warn!(endpoint = path, %status, "auth request rejected");
        Err(rejection(status, &bytes))
    }
}

fn rejection(status: StatusCode, body: &[u8]) -> AuthClientError {
    match serde_json::from_slice::<ErrorBody>(body) {
        Ok(ErrorBody { message }) if !message.trim().is_empty() => {
            AuthClientError::Rejected(message)
        }
        _ => AuthClientError::Status(status),
    }
}
