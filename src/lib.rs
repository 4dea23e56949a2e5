#![cfg_attr(doc, doc = include_str!("../README.md"))]

pub mod client;
pub mod error;
pub mod rate_limit;
pub(crate) mod serde_helpers;
pub mod types;

use reqwest::Request;
use serde::de::DeserializeOwned;

pub use crate::client::{Client, Config};
use crate::error::Error;
use crate::rate_limit::RateLimiter;

pub type Result<T> = std::result::Result<T, Error>;

/// Environment variable [`Config::from_env`] reads the `User-Agent` from.
pub const USER_AGENT_VAR: &str = "EDGAR_USER_AGENT";

/// Executes a GET and deserializes its JSON body into `Response`.
async fn request<Response: DeserializeOwned>(
    client: &reqwest::Client,
    rate_limiter: &RateLimiter,
    request: Request,
) -> Result<Response> {
    let body = request_text(client, rate_limiter, request).await?;

    let json_value: serde_json::Value = serde_json::from_str(&body)?;
    serde_helpers::deserialize_with_warnings(json_value)
}

/// Executes a request once the rate limiter allows it and returns the body of a successful
/// response. A request that reaches the network counts against the quota whatever its outcome.
#[cfg_attr(
    feature = "tracing",
    tracing::instrument(
        level = "debug",
        skip(client, rate_limiter, request),
        fields(
            method = %request.method(),
            path = request.url().path(),
            status_code
        )
    )
)]
async fn request_text(
    client: &reqwest::Client,
    rate_limiter: &RateLimiter,
    request: Request,
) -> Result<String> {
    let method = request.method().clone();
    let path = request.url().path().to_owned();

    rate_limiter.acquire().await?;

    let response = client.execute(request).await.inspect_err(|e| {
        #[cfg(feature = "tracing")]
        tracing::warn!(method = %method, path = %path, error = %e, "API request failed");
        #[cfg(not(feature = "tracing"))]
        let _: &reqwest::Error = e;
    })?;
    let status_code = response.status();

    #[cfg(feature = "tracing")]
    tracing::Span::current().record("status_code", status_code.as_u16());

    if !status_code.is_success() {
        let message = response
            .text()
            .await
            .inspect_err(|e| {
                #[cfg(feature = "tracing")]
                tracing::warn!(
                    status = %status_code,
                    path = %path,
                    error = %e,
                    "unable to read error response body"
                );
                #[cfg(not(feature = "tracing"))]
                let _: &reqwest::Error = e;
            })
            .unwrap_or_default();

        #[cfg(feature = "tracing")]
        tracing::warn!(
            status = %status_code,
            method = %method,
            path = %path,
            message = %message,
            "API request failed"
        );

        return Err(Error::status(status_code, method, path, message));
    }

    Ok(response.text().await?)
}
