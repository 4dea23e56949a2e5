//! HTTP client for SEC EDGAR.
//!
//! # Example
//!
//! ```no_run
//! use edgar_client_sdk::{Client, Config};
//! use edgar_client_sdk::types::request::FilingsRequest;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = Client::new(Config::builder().user_agent("Sample Company admin@example.com").build())?;
//!
//! let request = FilingsRequest::builder()
//!     .cik("320193")
//!     .forms(vec!["10-K".to_owned()])
//!     .limit(5)
//!     .build();
//!
//! for filing in client.filings(&request).await? {
//!     println!("{} filed {}", filing.form, filing.filing_date);
//! }
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;
use std::time::Duration;

use async_stream::try_stream;
use bon::Builder;
use futures::{Stream, TryStreamExt as _};
use reqwest::{
    Client as ReqwestClient, Method,
    header::{HeaderMap, HeaderValue},
};
use serde::de::DeserializeOwned;
#[cfg(feature = "tracing")]
use tracing::debug;
use url::Url;

use crate::error::Error;
use crate::rate_limit::{RateLimitPolicy, RateLimiter};
use crate::types::Cik;
use crate::types::request::{
    CompaniesRequest, FilerRequest, FilersRequest, FilingsRequest, name_contains,
};
use crate::types::response::{
    CompanyMatch, CompanyTickers, Filer, FilerMatch, Filing, FilingColumns, Submissions,
};
use crate::{Result, USER_AGENT_VAR};

/// The default host for EDGAR archives and reference files.
pub const DEFAULT_BASE_URL: &str = "https://www.sec.gov";

/// The default host for the EDGAR submissions API.
pub const DEFAULT_DATA_URL: &str = "https://data.sec.gov";

/// Configuration for [`Client`]
///
/// The defaults follow the SEC fair access policy: at most ten requests per second, each
/// identified by a descriptive `User-Agent`.
#[derive(Clone, Debug, Builder)]
pub struct Config {
    /// Identifies the caller to the SEC, conventionally `"Company Name contact@example.com"`.
    /// Requests without a meaningful user agent are blocked by EDGAR.
    #[builder(into)]
    user_agent: String,
    /// Override for the archive host. Defaults to `https://www.sec.gov`.
    #[builder(into, default = DEFAULT_BASE_URL.to_owned())]
    base_url: String,
    /// Override for the submissions API host. Defaults to `https://data.sec.gov`.
    #[builder(into, default = DEFAULT_DATA_URL.to_owned())]
    data_url: String,
    /// Maximum number of requests in any `rate_limit_period`. The default is ten (10).
    #[builder(default = 10)]
    rate_limit_calls: u32,
    /// Length of the rolling rate limit window. The default is one (1) second.
    #[builder(default = Duration::from_secs(1))]
    rate_limit_period: Duration,
    /// Whether requests over quota wait for the window to roll or fail immediately.
    /// The default is [`RateLimitPolicy::Wait`].
    #[builder(default)]
    rate_limit_policy: RateLimitPolicy,
    /// A limiter to share with other clients, e.g. several clients using the same user agent.
    /// When set, the `rate_limit_*` settings are ignored.
    rate_limiter: Option<Arc<RateLimiter>>,
    /// Timeout applied to each request as a whole. The default is thirty (30) seconds.
    #[builder(default = Duration::from_secs(30))]
    timeout: Duration,
}

impl Config {
    /// Creates a default configuration with the user agent read from the
    /// [`USER_AGENT_VAR`] environment variable.
    pub fn from_env() -> Result<Config> {
        let user_agent = std::env::var(USER_AGENT_VAR).map_err(|e| {
            Error::invalid_config(format!("unable to read {USER_AGENT_VAR}: {e}"))
        })?;

        Ok(Config::builder().user_agent(user_agent).build())
    }
}

/// HTTP client for the SEC EDGAR APIs.
///
/// Every request goes through a shared [`RateLimiter`], which is also shared by clones of
/// the client, so a cloned client never doubles the allowed request rate.
///
/// # API Base URLs
///
/// The default endpoints are `https://www.sec.gov` for archive files and
/// `https://data.sec.gov` for the submissions API.
#[derive(Clone, Debug)]
pub struct Client {
    /// The [`Url`] archive and reference file requests are made against.
    base_url: Url,
    /// The [`Url`] submissions API requests are made against.
    data_url: Url,
    client: ReqwestClient,
    rate_limiter: Arc<RateLimiter>,
}

impl Client {
    /// Creates a new EDGAR client.
    ///
    /// # Errors
    ///
    /// Returns an error if the user agent is empty or not a valid header value, a host URL is
    /// invalid, the rate limit quota is zero, or the HTTP client fails to build.
    pub fn new(config: Config) -> Result<Client> {
        if config.user_agent.trim().is_empty() {
            return Err(Error::invalid_config("user agent must not be empty"));
        }

        let mut headers = HeaderMap::new();

        headers.insert("User-Agent", HeaderValue::from_str(&config.user_agent)?);
        headers.insert("Accept", HeaderValue::from_static("*/*"));
        headers.insert("Connection", HeaderValue::from_static("keep-alive"));
        let client = ReqwestClient::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .build()?;

        let rate_limiter = match config.rate_limiter {
            Some(limiter) => limiter,
            None => Arc::new(RateLimiter::new(
                config.rate_limit_calls,
                config.rate_limit_period,
                config.rate_limit_policy,
            )?),
        };

        Ok(Self {
            base_url: parse_host(&config.base_url)?,
            data_url: parse_host(&config.data_url)?,
            client,
            rate_limiter,
        })
    }

    /// Returns the archive host URL for the client.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Returns the submissions API host URL for the client.
    #[must_use]
    pub fn data_url(&self) -> &Url {
        &self.data_url
    }

    /// Returns the limiter every request of this client (and its clones) goes through.
    #[must_use]
    pub fn rate_limiter(&self) -> &Arc<RateLimiter> {
        &self.rate_limiter
    }

    async fn get<Res: DeserializeOwned>(&self, host: &Url, path: &str) -> Result<Res> {
        let request = self
            .client
            .request(Method::GET, format!("{host}{path}"))
            .build()?;

        crate::request(&self.client, &self.rate_limiter, request).await
    }

    async fn get_text(&self, host: &Url, path: &str) -> Result<String> {
        let request = self
            .client
            .request(Method::GET, format!("{host}{path}"))
            .build()?;

        crate::request_text(&self.client, &self.rate_limiter, request).await
    }

    /// Retrieves the full submissions document for a filer: profile plus the most recent
    /// filings in EDGAR's columnar layout.
    ///
    /// # Errors
    ///
    /// Fails with [`Kind::InvalidQuery`](crate::error::Kind::InvalidQuery) without making a
    /// request if the CIK is malformed.
    pub async fn submissions(&self, request: &FilerRequest) -> Result<Submissions> {
        let cik: Cik = request.cik.parse()?;

        self.get(&self.data_url, &format!("submissions/CIK{cik}.json"))
            .await
    }

    /// Retrieves a filer's profile information.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use edgar_client_sdk::{Client, Config};
    /// use edgar_client_sdk::types::request::FilerRequest;
    ///
    /// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
    /// let client = Client::new(Config::from_env()?)?;
    ///
    /// let filer = client.filer(&FilerRequest::builder().cik("789019").build()).await?;
    /// println!("{} ({:?})", filer.name, filer.tickers);
    /// # Ok(())
    /// # }
    /// ```
    pub async fn filer(&self, request: &FilerRequest) -> Result<Filer> {
        Ok(self.submissions(request).await?.filer)
    }

    /// Retrieves a filer's filings, newest first, filtered by form type and filing date.
    ///
    /// Older filing history is spread over additional documents which are fetched (and
    /// counted against the rate limit) only as needed: pages entirely outside the date range
    /// are skipped and nothing more is fetched once `limit` filings have been collected.
    ///
    /// # Errors
    ///
    /// Fails with [`Kind::InvalidQuery`](crate::error::Kind::InvalidQuery) without making a
    /// request if the CIK is malformed or the date range is inverted, and with
    /// [`Kind::Validation`](crate::error::Kind::Validation) if any fetched document does not
    /// match the expected schema.
    pub async fn filings(&self, request: &FilingsRequest) -> Result<Vec<Filing>> {
        self.filings_stream(request).try_collect().await
    }

    /// Streams a filer's filings page by page, newest first.
    ///
    /// Behaves like [`Self::filings`] but fetches each history page only when the stream is
    /// polled past the previous one.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use futures::StreamExt as _;
    /// use edgar_client_sdk::{Client, Config};
    /// use edgar_client_sdk::types::request::FilingsRequest;
    /// use tokio::pin;
    ///
    /// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
    /// let client = Client::new(Config::from_env()?)?;
    /// let request = FilingsRequest::builder().cik("320193").forms(vec!["8-K".to_owned()]).build();
    ///
    /// let stream = client.filings_stream(&request);
    /// pin!(stream);
    ///
    /// while let Some(filing) = stream.next().await {
    ///     let filing = filing?;
    ///     println!("{}: {:?}", filing.accession_number, filing.items);
    /// }
    /// # Ok(())
    /// # }
    /// ```
    pub fn filings_stream<'client>(
        &'client self,
        request: &'client FilingsRequest,
    ) -> impl Stream<Item = Result<Filing>> + 'client {
        try_stream! {
            let cik = request.validate()?;
            let limit = request.limit.unwrap_or(usize::MAX);

            if limit > 0 {
                let submissions: Submissions = self
                    .get(&self.data_url, &format!("submissions/CIK{cik}.json"))
                    .await?;

                let mut pages = submissions.filings.files.into_iter();
                let mut batch = submissions.filings.recent.into_filings()?;
                let mut produced = 0_usize;

                'pages: loop {
                    for filing in batch {
                        if !request.matches(&filing.form, filing.filing_date) {
                            continue;
                        }

                        yield filing;

                        produced += 1;
                        if produced >= limit {
                            break 'pages;
                        }
                    }

                    let Some(page) = pages.find(|page| request.overlaps(page)) else {
                        break;
                    };

                    #[cfg(feature = "tracing")]
                    debug!(cik = %cik, page = %page.name, "fetching filing history page");

                    let columns: FilingColumns = self
                        .get(&self.data_url, &format!("submissions/{}", page.name))
                        .await?;
                    batch = columns.into_filings()?;
                }
            }
        }
    }

    /// Searches the full EDGAR entity list for filers by name or CIK.
    ///
    /// The lookup file covers every entity that has ever filed and is several tens of
    /// megabytes; the whole file is downloaded and validated on every call.
    ///
    /// # Errors
    ///
    /// Fails with [`Kind::InvalidQuery`](crate::error::Kind::InvalidQuery) without making a
    /// request if any CIK filter is malformed.
    pub async fn filers(&self, request: &FilersRequest) -> Result<Vec<FilerMatch>> {
        let ciks = request.parsed_ciks()?;
        let needle = request.contains.as_deref().map(str::to_lowercase);

        let text = self
            .get_text(&self.base_url, "Archives/edgar/cik-lookup-data.txt")
            .await?;

        let filers = text
            .lines()
            .filter_map(|line| FilerMatch::parse_line(line).transpose())
            .collect::<Result<Vec<_>>>()?;

        Ok(filers
            .into_iter()
            .filter(|filer| ciks.is_empty() || ciks.contains(&filer.cik))
            .filter(|filer| name_contains(&filer.name, needle.as_deref()))
            .take(request.limit.unwrap_or(usize::MAX))
            .collect())
    }

    /// Searches listed companies by ticker, CIK, exchange or name.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use edgar_client_sdk::{Client, Config};
    /// use edgar_client_sdk::types::request::CompaniesRequest;
    ///
    /// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
    /// let client = Client::new(Config::from_env()?)?;
    /// let request = CompaniesRequest::builder()
    ///     .tickers(vec!["AAPL".to_owned(), "MSFT".to_owned()])
    ///     .build();
    ///
    /// for company in client.companies(&request).await? {
    ///     println!("{} {} {}", company.ticker, company.cik, company.name);
    /// }
    /// # Ok(())
    /// # }
    /// ```
    pub async fn companies(&self, request: &CompaniesRequest) -> Result<Vec<CompanyMatch>> {
        let ciks = request.parsed_ciks()?;
        let needle = request.contains.as_deref().map(str::to_lowercase);

        let tickers: CompanyTickers = self
            .get(&self.base_url, "files/company_tickers_exchange.json")
            .await?;

        Ok(tickers
            .into_matches()?
            .into_iter()
            .filter(|company| ciks.is_empty() || ciks.contains(&company.cik))
            .filter(|company| request.tickers.is_empty() || request.tickers.contains(&company.ticker))
            .filter(|company| {
                request.exchanges.is_empty()
                    || company
                        .exchange
                        .as_ref()
                        .is_some_and(|exchange| request.exchanges.contains(exchange))
            })
            .filter(|company| name_contains(&company.name, needle.as_deref()))
            .take(request.limit.unwrap_or(usize::MAX))
            .collect())
    }
}

/// Parses a host so that paths can be appended with `format!("{host}{path}")`.
fn parse_host(host: &str) -> Result<Url> {
    let mut url = Url::parse(host)?;
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }

    Ok(url)
}
