use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{ACCEPT, AUTHORIZATION};
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, error};

use crate::{
    biotime::source::{AttendanceSource, TransactionQuery},
    config::Config,
    model::{employee::Employee, page::Page, transaction::Transaction},
};

const AUTH_PATH: &str = "/jwt-api-token-auth/";
const EMPLOYEES_PATH: &str = "/personnel/api/employees/";
const TRANSACTIONS_PATH: &str = "/iclock/api/transactions/";

const AUTH_TIMEOUT: Duration = Duration::from_secs(10);
const EMPLOYEES_TIMEOUT: Duration = Duration::from_secs(15);
const TRANSACTIONS_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Error)]
pub enum BiotimeError {
    #[error("HTTP request to BioTime failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("BioTime returned status {status}: {message}")]
    Api { status: u16, message: String },

    #[error("BioTime response could not be decoded: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("BioTime authentication returned no token")]
    MissingToken,

    #[error("BioTime {resource} did not fit in {pages} pages")]
    PageLimit { resource: &'static str, pages: u32 },
}

#[derive(Serialize)]
struct TokenRequest<'a> {
    username: &'a str,
    password: &'a str,
}

#[derive(Deserialize)]
struct TokenResponse {
    token: Option<String>,
}

/// HTTP client for the BioTime REST API.
#[derive(Clone)]
pub struct BiotimeClient {
    http: Client,
    base_url: String,
    username: String,
    password: String,
}

impl BiotimeClient {
    pub fn new(base_url: &str, username: &str, password: &str) -> Result<Self, BiotimeError> {
        let http = Client::builder().build()?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            username: username.to_string(),
            password: password.to_string(),
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, BiotimeError> {
        Self::new(
            &config.biotime_base,
            &config.biotime_username,
            &config.biotime_password,
        )
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Obtains a fresh JWT from BioTime.
    pub async fn token(&self) -> Result<String, BiotimeError> {
        let request = self
            .http
            .post(self.url(AUTH_PATH))
            .timeout(AUTH_TIMEOUT)
            .json(&TokenRequest {
                username: &self.username,
                password: &self.password,
            });

        let resp: TokenResponse = send_and_decode(request, "token").await?;
        resp.token
            .filter(|t| !t.is_empty())
            .ok_or(BiotimeError::MissingToken)
    }

    async fn authorized_get(&self, path: &str, timeout: Duration) -> Result<RequestBuilder, BiotimeError> {
        let token = self.token().await?;
        Ok(self
            .http
            .get(self.url(path))
            .timeout(timeout)
            .header(AUTHORIZATION, format!("JWT {}", token))
            .header(ACCEPT, "application/json"))
    }
}

async fn send_and_decode<T: DeserializeOwned>(
    request: RequestBuilder,
    context: &str,
) -> Result<T, BiotimeError> {
    let resp = request.send().await.map_err(|e| {
        error!(error = %e, context, "BioTime request failed before a response");
        BiotimeError::Request(e)
    })?;

    let status = resp.status();
    let url = resp.url().to_string();
    debug!(context, %status, url = %url, "BioTime response received");

    let body = resp.bytes().await?;

    if !status.is_success() {
        let message = String::from_utf8_lossy(&body).into_owned();
        error!(context, %status, url = %url, body = %message, "BioTime returned an error status");
        return Err(api_error(status, message));
    }

    serde_json::from_slice(&body).map_err(|e| {
        error!(error = %e, context, url = %url, "BioTime response body is not the expected JSON");
        BiotimeError::Decode(e)
    })
}

fn api_error(status: StatusCode, message: String) -> BiotimeError {
    BiotimeError::Api {
        status: status.as_u16(),
        message,
    }
}

#[async_trait]
impl AttendanceSource for BiotimeClient {
    async fn employees_page(&self, page: u32, page_size: u32) -> Result<Page<Employee>, BiotimeError> {
        let request = self
            .authorized_get(EMPLOYEES_PATH, EMPLOYEES_TIMEOUT)
            .await?
            .query(&[("page", page), ("page_size", page_size)]);

        send_and_decode(request, "employees").await
    }

    async fn transactions_page(&self, query: &TransactionQuery) -> Result<Page<Transaction>, BiotimeError> {
        let request = self
            .authorized_get(TRANSACTIONS_PATH, TRANSACTIONS_TIMEOUT)
            .await?
            .query(&query.to_params());

        send_and_decode(request, "transactions").await
    }
}
