//! Entity and ticker lookup.
//!
//! Searches the listed company table and the full entity name list for a name fragment.
//!
//! Run with tracing enabled:
//! ```sh
//! EDGAR_USER_AGENT="Sample Company admin@example.com" RUST_LOG=info,hyper_util=off,hyper=off,reqwest=off,h2=off,rustls=off cargo run --example lookup --features tracing -- tesla
//! ```

use edgar_client_sdk::rate_limit::RateLimitPolicy;
use edgar_client_sdk::types::request::{CompaniesRequest, FilersRequest};
use edgar_client_sdk::{Client, Config, USER_AGENT_VAR};
use tracing::{error, info};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let needle = std::env::args().nth(1).unwrap_or_else(|| "apple".to_owned());
    let user_agent = std::env::var(USER_AGENT_VAR)?;

    let config = Config::builder()
        .user_agent(user_agent)
        .rate_limit_calls(5)
        .rate_limit_policy(RateLimitPolicy::Fail)
        .build();
    let client = Client::new(config)?;

    let request = CompaniesRequest::builder()
        .contains(needle.as_str())
        .limit(10)
        .build();
    match client.companies(&request).await {
        Ok(companies) => {
            info!(endpoint = "companies", count = companies.len());
            for company in companies {
                info!(
                    endpoint = "companies",
                    cik = %company.cik,
                    ticker = %company.ticker,
                    exchange = ?company.exchange,
                    name = %company.name
                );
            }
        }
        Err(e) => error!(endpoint = "companies", error = %e),
    }

    let request = FilersRequest::builder()
        .contains(needle.as_str())
        .limit(25)
        .build();
    match client.filers(&request).await {
        Ok(filers) => {
            info!(endpoint = "filers", count = filers.len());
            for filer in filers {
                info!(endpoint = "filers", cik = %filer.cik, name = %filer.name);
            }
        }
        Err(e) => error!(endpoint = "filers", error = %e),
    }

    Ok(())
}
