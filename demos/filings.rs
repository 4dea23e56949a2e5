//! Filing history explorer.
//!
//! Prints a filer's profile and its most recent annual and quarterly reports, walking
//! into older history pages when needed.
//!
//! Run with tracing enabled:
//! ```sh
//! EDGAR_USER_AGENT="Sample Company admin@example.com" RUST_LOG=debug,hyper_util=off,hyper=off,reqwest=off,h2=off,rustls=off cargo run --example filings --features tracing -- 320193
//! ```
//!
//! Optionally log to a file:
//! ```sh
//! LOG_FILE=filings.log EDGAR_USER_AGENT="Sample Company admin@example.com" RUST_LOG=debug cargo run --example filings --features tracing
//! ```

use std::fs::File;

use edgar_client_sdk::types::NaiveDate;
use edgar_client_sdk::types::request::{FilerRequest, FilingsRequest};
use edgar_client_sdk::{Client, Config};
use futures::StreamExt as _;
use tokio::pin;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt as _;
use tracing_subscriber::util::SubscriberInitExt as _;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if let Ok(path) = std::env::var("LOG_FILE") {
        let file = File::create(path)?;
        tracing_subscriber::registry()
            .with(EnvFilter::from_default_env())
            .with(
                tracing_subscriber::fmt::layer()
                    .with_writer(file)
                    .with_ansi(false),
            )
            .init();
    } else {
        tracing_subscriber::fmt::init();
    }

    let cik = std::env::args().nth(1).unwrap_or_else(|| "320193".to_owned());
    let client = Client::new(Config::from_env()?)?;

    match client.filer(&FilerRequest::builder().cik(cik.as_str()).build()).await {
        Ok(filer) => info!(
            endpoint = "filer",
            cik = %filer.cik,
            name = %filer.name,
            tickers = ?filer.tickers,
            category = ?filer.category
        ),
        Err(e) => error!(endpoint = "filer", cik = %cik, error = %e),
    }

    let request = FilingsRequest::builder()
        .cik(cik.as_str())
        .forms(vec!["10-K".to_owned(), "10-Q".to_owned()])
        .maybe_start_date(NaiveDate::from_ymd_opt(2010, 1, 1))
        .limit(12)
        .build();

    match client.filings(&request).await {
        Ok(filings) => {
            info!(endpoint = "filings", count = filings.len());
            for filing in &filings {
                info!(
                    endpoint = "filings",
                    form = %filing.form,
                    filed = %filing.filing_date,
                    period = ?filing.report_date,
                    accession = %filing.accession_number,
                    document = %filing.primary_document
                );
            }
        }
        Err(e) => error!(endpoint = "filings", cik = %cik, error = %e),
    }

    // Current reports, one page at a time
    let request = FilingsRequest::builder()
        .cik(cik.as_str())
        .forms(vec!["8-K".to_owned()])
        .limit(5)
        .build();
    let stream = client.filings_stream(&request);
    pin!(stream);

    while let Some(filing) = stream.next().await {
        match filing {
            Ok(filing) => info!(
                endpoint = "filings_stream",
                filed = %filing.filing_date,
                items = ?filing.items
            ),
            Err(e) => {
                error!(endpoint = "filings_stream", error = %e);
                break;
            }
        }
    }

    info!(
        endpoint = "rate_limiter",
        in_window = client.rate_limiter().calls_in_window().await
    );

    Ok(())
}
