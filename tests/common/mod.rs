#![allow(
    clippy::unwrap_used,
    clippy::missing_panics_doc,
    reason = "Do not need additional syntax for setting up tests, and https://github.com/rust-lang/rust-clippy/issues/13981"
)]
#![allow(
    unused,
    reason = "Deeply nested uses in sub-modules are falsely flagged as being unused"
)]

use std::io::{Read as _, Write as _};
use std::net::{SocketAddr, TcpListener};
use std::time::Duration;

use edgar_client_sdk::rate_limit::RateLimitPolicy;
use edgar_client_sdk::{Client, Config};
use httpmock::MockServer;
use serde_json::{Value, json};

pub const USER_AGENT: &str = "Sample Company admin@example.com";

/// Nothing listens on port 1, so connections are refused.
pub const UNREACHABLE_URL: &str = "http://127.0.0.1:1";

pub const APPLE_CIK: &str = "320193";
pub const APPLE_SUBMISSIONS_PATH: &str = "/submissions/CIK0000320193.json";
pub const APPLE_PAGE_1: &str = "CIK0000320193-submissions-001.json";
pub const APPLE_PAGE_2: &str = "CIK0000320193-submissions-002.json";

/// A client pointed at `server` for both hosts, with a quota large enough to stay out of
/// the way.
pub fn client(server: &MockServer) -> anyhow::Result<Client> {
    client_with_limit(server, 100, Duration::from_secs(1), RateLimitPolicy::Fail)
}

pub fn client_with_limit(
    server: &MockServer,
    calls: u32,
    period: Duration,
    policy: RateLimitPolicy,
) -> anyhow::Result<Client> {
    let config = Config::builder()
        .user_agent(USER_AGENT)
        .base_url(server.base_url())
        .data_url(server.base_url())
        .rate_limit_calls(calls)
        .rate_limit_period(period)
        .rate_limit_policy(policy)
        .timeout(Duration::from_secs(5))
        .build();

    Ok(Client::new(config)?)
}

/// A client whose hosts refuse every connection.
pub fn unreachable_client(calls: u32, policy: RateLimitPolicy) -> anyhow::Result<Client> {
    let config = Config::builder()
        .user_agent(USER_AGENT)
        .base_url(UNREACHABLE_URL)
        .data_url(UNREACHABLE_URL)
        .rate_limit_calls(calls)
        .rate_limit_period(Duration::from_secs(10))
        .rate_limit_policy(policy)
        .timeout(Duration::from_secs(5))
        .build();

    Ok(Client::new(config)?)
}

/// Serves a single response whose body is cut off before its declared length.
pub fn serve_truncated_response(status_line: &'static str) -> anyhow::Result<SocketAddr> {
    let listener = TcpListener::bind("127.0.0.1:0")?;
    let address = listener.local_addr()?;

    std::thread::spawn(move || {
        let (mut stream, _) = listener.accept().unwrap();
        let mut request = [0_u8; 4096];
        let read = stream.read(&mut request).unwrap();
        assert!(read > 0, "expected a request before responding");
        stream
            .write_all(format!("{status_line}\r\ncontent-length: 100\r\n\r\npartial").as_bytes())
            .unwrap();
    });

    Ok(address)
}

/// Filing columns for two recent Apple filings.
#[must_use]
pub fn recent_columns() -> Value {
    json!({
        "accessionNumber": ["0000320193-24-000123", "0000320193-24-000120"],
        "filingDate": ["2024-11-01", "2024-10-31"],
        "reportDate": ["2024-09-28", ""],
        "acceptanceDateTime": ["2024-11-01T06:01:36.000Z", "2024-10-31T16:30:45.000Z"],
        "act": ["34", "34"],
        "form": ["10-K", "8-K"],
        "fileNumber": ["001-36743", "001-36743"],
        "filmNumber": ["241416806", "241413331"],
        "items": ["", "2.02,9.01"],
        "core_type": ["10-K", "8-K"],
        "size": [9_759_910, 401_035],
        "isXBRL": [1, 1],
        "isInlineXBRL": [1, 1],
        "primaryDocument": ["aapl-20240928.htm", "aapl-20241031.htm"],
        "primaryDocDescription": ["10-K", "8-K"]
    })
}

/// Filing columns for an older history page.
#[must_use]
pub fn page_columns(accession_prefix: &str, dates: &[&str], forms: &[&str]) -> Value {
    let accession: Vec<String> = (0..dates.len())
        .map(|i| format!("{accession_prefix}-{i:06}"))
        .collect();
    let accepted: Vec<String> = dates
        .iter()
        .map(|date| format!("{date}T12:00:00.000Z"))
        .collect();
    let sizes: Vec<u64> = dates.iter().map(|_| 1024).collect();

    json!({
        "accessionNumber": accession,
        "filingDate": dates,
        "acceptanceDateTime": accepted,
        "form": forms,
        "size": sizes
    })
}

/// A submissions document for Apple with the given filing history pages.
#[must_use]
pub fn submissions(files: Value) -> Value {
    json!({
        "cik": "320193",
        "entityType": "operating",
        "sic": "3571",
        "sicDescription": "Electronic Computers",
        "insiderTransactionForOwnerExists": 0,
        "insiderTransactionForIssuerExists": 1,
        "name": "Apple Inc.",
        "tickers": ["AAPL"],
        "exchanges": ["Nasdaq"],
        "ein": "942404110",
        "description": "",
        "website": "",
        "investorWebsite": "",
        "category": "Large Accelerated Filer",
        "fiscalYearEnd": "0928",
        "stateOfIncorporation": "CA",
        "stateOfIncorporationDescription": "CA",
        "phone": "(408) 996-1010",
        "flags": "",
        "filings": {
            "recent": recent_columns(),
            "files": files
        }
    })
}
