#![allow(
    clippy::unwrap_used,
    reason = "Do not need additional syntax for setting up tests"
)]

mod common;

use std::time::{Duration, Instant};

use common::{
    APPLE_CIK, APPLE_SUBMISSIONS_PATH, client_with_limit, submissions, unreachable_client,
};
use edgar_client_sdk::error::{Kind, RateLimitExceeded};
use edgar_client_sdk::rate_limit::RateLimitPolicy;
use edgar_client_sdk::types::request::FilerRequest;
use httpmock::{Method::GET, MockServer};
use reqwest::StatusCode;
use serde_json::json;

fn apple() -> FilerRequest {
    FilerRequest::builder().cik(APPLE_CIK).build()
}

#[tokio::test]
async fn fail_policy_should_reject_call_over_quota() -> anyhow::Result<()> {
    let server = MockServer::start();
    let client = client_with_limit(&server, 2, Duration::from_secs(10), RateLimitPolicy::Fail)?;

    let mock = server.mock(|when, then| {
        when.method(GET).path(APPLE_SUBMISSIONS_PATH);
        then.status(StatusCode::OK).json_body(submissions(json!([])));
    });

    client.filer(&apple()).await?;
    client.filer(&apple()).await?;
    let err = client.filer(&apple()).await.unwrap_err();

    assert_eq!(err.kind(), Kind::RateLimited);
    let exceeded = err.downcast_ref::<RateLimitExceeded>().unwrap();
    assert_eq!(exceeded.calls, 2);
    assert_eq!(exceeded.period, Duration::from_secs(10));
    assert!(exceeded.retry_after <= Duration::from_secs(10));
    assert!(exceeded.retry_after > Duration::ZERO);

    mock.assert_calls(2);

    Ok(())
}

#[tokio::test]
async fn wait_policy_should_delay_call_over_quota() -> anyhow::Result<()> {
    let server = MockServer::start();
    let period = Duration::from_millis(300);
    let client = client_with_limit(&server, 2, period, RateLimitPolicy::Wait)?;

    let mock = server.mock(|when, then| {
        when.method(GET).path(APPLE_SUBMISSIONS_PATH);
        then.status(StatusCode::OK).json_body(submissions(json!([])));
    });

    let start = Instant::now();
    client.filer(&apple()).await?;
    client.filer(&apple()).await?;
    client.filer(&apple()).await?;

    assert!(
        start.elapsed() >= period,
        "third call finished after {:?}",
        start.elapsed()
    );
    mock.assert_calls(3);

    Ok(())
}

#[tokio::test]
async fn concurrent_callers_should_never_exceed_quota() -> anyhow::Result<()> {
    let server = MockServer::start();
    let client = client_with_limit(&server, 3, Duration::from_secs(10), RateLimitPolicy::Fail)?;

    let mock = server.mock(|when, then| {
        when.method(GET).path(APPLE_SUBMISSIONS_PATH);
        then.status(StatusCode::OK).json_body(submissions(json!([])));
    });

    let handles: Vec<_> = (0..10)
        .map(|_| {
            let client = client.clone();
            tokio::spawn(async move { client.filer(&apple()).await })
        })
        .collect();

    let mut succeeded = 0;
    let mut limited = 0;
    for handle in handles {
        match handle.await? {
            Ok(_) => succeeded += 1,
            Err(e) => {
                assert_eq!(e.kind(), Kind::RateLimited);
                limited += 1;
            }
        }
    }

    assert_eq!(succeeded, 3);
    assert_eq!(limited, 7);
    mock.assert_calls(3);

    Ok(())
}

#[tokio::test]
async fn failed_requests_should_count_against_quota() -> anyhow::Result<()> {
    let server = MockServer::start();
    let client = client_with_limit(&server, 1, Duration::from_secs(10), RateLimitPolicy::Fail)?;

    let mock = server.mock(|when, then| {
        when.method(GET).path(APPLE_SUBMISSIONS_PATH);
        then.status(StatusCode::TOO_MANY_REQUESTS).body("slow down");
    });

    let err = client.filer(&apple()).await.unwrap_err();
    assert_eq!(err.kind(), Kind::Status);

    let err = client.filer(&apple()).await.unwrap_err();
    assert_eq!(err.kind(), Kind::RateLimited);

    mock.assert_calls(1);

    Ok(())
}

#[tokio::test]
async fn transport_failures_should_count_against_quota() -> anyhow::Result<()> {
    let client = unreachable_client(1, RateLimitPolicy::Fail)?;

    let err = client.filer(&apple()).await.unwrap_err();
    assert_eq!(err.kind(), Kind::Transport);
    assert_eq!(client.rate_limiter().calls_in_window().await, 1);

    let err = client.filer(&apple()).await.unwrap_err();
    assert_eq!(err.kind(), Kind::RateLimited);

    Ok(())
}

#[tokio::test]
async fn invalid_queries_should_not_consume_quota() -> anyhow::Result<()> {
    let server = MockServer::start();
    let client = client_with_limit(&server, 1, Duration::from_secs(10), RateLimitPolicy::Fail)?;

    let mock = server.mock(|when, then| {
        when.method(GET).path(APPLE_SUBMISSIONS_PATH);
        then.status(StatusCode::OK).json_body(submissions(json!([])));
    });

    let request = FilerRequest::builder().cik("CIK-APPLE").build();
    let err = client.filer(&request).await.unwrap_err();
    assert_eq!(err.kind(), Kind::InvalidQuery);

    client.filer(&apple()).await?;
    mock.assert();

    Ok(())
}

#[tokio::test]
async fn clones_should_share_quota() -> anyhow::Result<()> {
    let server = MockServer::start();
    let client = client_with_limit(&server, 1, Duration::from_secs(10), RateLimitPolicy::Fail)?;
    let clone = client.clone();

    let mock = server.mock(|when, then| {
        when.method(GET).path(APPLE_SUBMISSIONS_PATH);
        then.status(StatusCode::OK).json_body(submissions(json!([])));
    });

    client.filer(&apple()).await?;
    let err = clone.filer(&apple()).await.unwrap_err();

    assert_eq!(err.kind(), Kind::RateLimited);
    mock.assert();

    Ok(())
}
