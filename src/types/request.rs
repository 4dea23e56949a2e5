//! Request types for the EDGAR endpoints.
//!
//! All request types use the [`bon`](https://docs.rs/bon) crate for the builder pattern.
//! Identifiers are carried as the caller supplied them and validated by the [`Client`]
//! before any network traffic, so a malformed CIK never costs a request.
//!
//! [`Client`]: crate::Client

#![allow(
    clippy::module_name_repetitions,
    reason = "Request suffix is intentional for clarity"
)]

use bon::Builder;

use super::response::FilingPage;
use super::{Cik, NaiveDate};
use crate::Result;
use crate::error::Error;

/// Request for a filer's submission history.
///
/// # Example
///
/// ```
/// use edgar_client_sdk::types::request::FilingsRequest;
/// use edgar_client_sdk::types::NaiveDate;
///
/// let request = FilingsRequest::builder()
///     .cik("320193")
///     .forms(vec!["10-K".to_owned(), "10-Q".to_owned()])
///     .start_date(NaiveDate::from_ymd_opt(2020, 1, 1).unwrap())
///     .limit(20)
///     .build();
/// ```
#[derive(Debug, Clone, Builder)]
#[non_exhaustive]
pub struct FilingsRequest {
    /// Central Index Key of the filer, padded or unpadded (required).
    #[builder(into)]
    pub cik: String,
    /// Only keep filings whose form type is one of these. Empty keeps every form.
    #[builder(default)]
    pub forms: Vec<String>,
    /// Only keep filings filed on or after this date.
    pub start_date: Option<NaiveDate>,
    /// Only keep filings filed on or before this date.
    pub end_date: Option<NaiveDate>,
    /// Stop after this many matching filings. Additional history pages are not fetched
    /// once the limit is reached.
    pub limit: Option<usize>,
}

impl FilingsRequest {
    pub(crate) fn validate(&self) -> Result<Cik> {
        if let (Some(start), Some(end)) = (self.start_date, self.end_date)
            && start > end
        {
            return Err(Error::invalid_query(format!(
                "start date {start} is after end date {end}"
            )));
        }

        self.cik.parse()
    }

    pub(crate) fn matches(&self, form: &str, filing_date: NaiveDate) -> bool {
        if self.start_date.is_some_and(|start| filing_date < start) {
            return false;
        }
        if self.end_date.is_some_and(|end| filing_date > end) {
            return false;
        }

        self.forms.is_empty() || self.forms.iter().any(|f| f == form)
    }

    /// Whether a history page may hold filings inside the date range. Pages without
    /// bounds are always fetched.
    pub(crate) fn overlaps(&self, page: &FilingPage) -> bool {
        let ends_before_start = self
            .start_date
            .zip(page.filing_to)
            .is_some_and(|(start, to)| to < start);
        let starts_after_end = self
            .end_date
            .zip(page.filing_from)
            .is_some_and(|(end, from)| from > end);

        !ends_before_start && !starts_after_end
    }
}

/// Request for a single filer's profile or raw submissions document.
///
/// # Example
///
/// ```
/// use edgar_client_sdk::types::request::FilerRequest;
///
/// let request = FilerRequest::builder().cik("0000789019").build();
/// ```
#[derive(Debug, Clone, Builder)]
#[non_exhaustive]
pub struct FilerRequest {
    /// Central Index Key of the filer, padded or unpadded (required).
    #[builder(into)]
    pub cik: String,
}

/// Request for the full-text entity name to CIK lookup.
///
/// The lookup file covers every entity that has ever filed, including individuals and funds,
/// so it is large. Narrow the result with `contains`, `ciks` and `limit`.
///
/// # Example
///
/// ```
/// use edgar_client_sdk::types::request::FilersRequest;
///
/// let request = FilersRequest::builder()
///     .contains("tesla")
///     .limit(5)
///     .build();
/// ```
#[derive(Debug, Clone, Default, Builder)]
#[non_exhaustive]
pub struct FilersRequest {
    /// Case-insensitive substring of the entity name.
    #[builder(into)]
    pub contains: Option<String>,
    /// Only keep entities with one of these CIKs.
    #[builder(default)]
    pub ciks: Vec<String>,
    /// Stop after this many matches.
    pub limit: Option<usize>,
}

impl FilersRequest {
    pub(crate) fn parsed_ciks(&self) -> Result<Vec<Cik>> {
        self.ciks.iter().map(|cik| cik.parse()).collect()
    }
}

/// Request for the company ticker and exchange listing.
///
/// # Example
///
/// ```
/// use edgar_client_sdk::types::request::CompaniesRequest;
///
/// let request = CompaniesRequest::builder()
///     .exchanges(vec!["Nasdaq".to_owned()])
///     .contains("apple")
///     .build();
/// ```
#[derive(Debug, Clone, Default, Builder)]
#[non_exhaustive]
pub struct CompaniesRequest {
    /// Only keep companies listed under one of these ticker symbols (exact match).
    #[builder(default)]
    pub tickers: Vec<String>,
    /// Only keep companies with one of these CIKs.
    #[builder(default)]
    pub ciks: Vec<String>,
    /// Only keep companies listed on one of these exchanges (exact match, e.g. `NYSE`).
    #[builder(default)]
    pub exchanges: Vec<String>,
    /// Case-insensitive substring of the company name.
    #[builder(into)]
    pub contains: Option<String>,
    /// Stop after this many matches.
    pub limit: Option<usize>,
}

impl CompaniesRequest {
    pub(crate) fn parsed_ciks(&self) -> Result<Vec<Cik>> {
        self.ciks.iter().map(|cik| cik.parse()).collect()
    }
}

/// Case-insensitive substring match used by the name filters. `needle` must already be
/// lowercase.
pub(crate) fn name_contains(name: &str, needle: Option<&str>) -> bool {
    needle.is_none_or(|needle| name.to_lowercase().contains(needle))
}
