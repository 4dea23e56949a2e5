//! Response types for the EDGAR endpoints.
//!
//! Documents are deserialized exactly as EDGAR publishes them and then converted into flat,
//! validated records. A record is only ever produced from a document that validated in full:
//! one malformed row fails the whole response rather than being skipped.

use bon::Builder;
use serde::{Deserialize, Serialize};
use serde_with::{BoolFromInt, serde_as};

use super::{Cik, DateTime, NaiveDate, Utc};
use crate::Result;
use crate::error::Error;
use crate::serde_helpers::EmptyAsNone;

/// A filer's profile as reported by the submissions API.
#[serde_as]
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Builder)]
#[builder(on(String, into))]
#[serde(rename_all = "camelCase")]
pub struct Filer {
    pub cik: Cik,
    /// E.g. `operating`, `other`, `individual`.
    pub entity_type: String,
    /// Standard Industrial Classification code.
    #[serde_as(as = "EmptyAsNone")]
    #[serde(default)]
    pub sic: Option<String>,
    #[serde_as(as = "EmptyAsNone")]
    #[serde(default)]
    pub sic_description: Option<String>,
    pub name: String,
    pub tickers: Vec<String>,
    pub exchanges: Vec<String>,
    /// Employer Identification Number.
    #[serde_as(as = "EmptyAsNone")]
    #[serde(default)]
    pub ein: Option<String>,
    #[serde_as(as = "EmptyAsNone")]
    #[serde(default)]
    pub description: Option<String>,
    #[serde_as(as = "EmptyAsNone")]
    #[serde(default)]
    pub website: Option<String>,
    /// Filer status, e.g. `Large Accelerated Filer`.
    #[serde_as(as = "EmptyAsNone")]
    #[serde(default)]
    pub category: Option<String>,
    /// Fiscal year end as `MMDD`.
    #[serde_as(as = "EmptyAsNone")]
    #[serde(default)]
    pub fiscal_year_end: Option<String>,
    #[serde_as(as = "EmptyAsNone")]
    #[serde(default)]
    pub state_of_incorporation: Option<String>,
    #[serde_as(as = "EmptyAsNone")]
    #[serde(default, rename = "phone")]
    pub phone_number: Option<String>,
    #[serde_as(as = "EmptyAsNone")]
    #[serde(default)]
    pub flags: Option<String>,
}

/// The `submissions/CIK##########.json` document: a filer profile plus its filing history.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Submissions {
    #[serde(flatten)]
    pub filer: Filer,
    pub filings: FilingHistory,
}

/// The filing history section of a [`Submissions`] document.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FilingHistory {
    /// The most recent filings (at least one year or 1000 filings, whichever is more).
    pub recent: FilingColumns,
    /// Older filings, each page held in a separate document.
    #[serde(default)]
    pub files: Vec<FilingPage>,
}

/// Reference to an additional page of filing history.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Builder)]
#[builder(on(String, into))]
#[serde(rename_all = "camelCase")]
pub struct FilingPage {
    /// Document name relative to the submissions directory, e.g.
    /// `CIK0000320193-submissions-001.json`.
    pub name: String,
    pub filing_count: Option<u32>,
    pub filing_from: Option<NaiveDate>,
    pub filing_to: Option<NaiveDate>,
}

/// Filing metadata in EDGAR's columnar layout: one array per attribute, indexed by filing.
///
/// The five required columns must all have the same length. The optional columns may be
/// absent or shorter, in which case the missing entries read as empty.
#[serde_as]
#[non_exhaustive]
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilingColumns {
    pub accession_number: Vec<String>,
    pub form: Vec<String>,
    pub filing_date: Vec<NaiveDate>,
    pub acceptance_date_time: Vec<DateTime<Utc>>,
    pub size: Vec<u64>,
    #[serde_as(as = "Vec<EmptyAsNone>")]
    #[serde(default)]
    pub report_date: Vec<Option<NaiveDate>>,
    #[serde_as(as = "Vec<EmptyAsNone>")]
    #[serde(default)]
    pub act: Vec<Option<String>>,
    #[serde_as(as = "Vec<EmptyAsNone>")]
    #[serde(default)]
    pub file_number: Vec<Option<String>>,
    #[serde_as(as = "Vec<EmptyAsNone>")]
    #[serde(default)]
    pub film_number: Vec<Option<String>>,
    #[serde_as(as = "Vec<EmptyAsNone>")]
    #[serde(default)]
    pub items: Vec<Option<String>>,
    #[serde(default, rename = "core_type")]
    pub core_type: Vec<String>,
    #[serde_as(as = "Vec<BoolFromInt>")]
    #[serde(default, rename = "isXBRL")]
    pub is_xbrl: Vec<bool>,
    #[serde_as(as = "Vec<BoolFromInt>")]
    #[serde(default, rename = "isInlineXBRL")]
    pub is_inline_xbrl: Vec<bool>,
    #[serde_as(as = "Vec<EmptyAsNone>")]
    #[serde(default)]
    pub primary_document: Vec<Option<String>>,
    #[serde_as(as = "Vec<EmptyAsNone>")]
    #[serde(default, rename = "primaryDocDescription")]
    pub primary_document_description: Vec<Option<String>>,
}

impl FilingColumns {
    /// Number of filings described by these columns.
    #[must_use]
    pub fn len(&self) -> usize {
        self.accession_number.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.accession_number.is_empty()
    }

    /// Transposes the columns into one [`Filing`] per row.
    ///
    /// # Errors
    ///
    /// Returns a [`Kind::Validation`](crate::error::Kind::Validation) error if a required
    /// column does not have one entry per accession number.
    pub fn into_filings(self) -> Result<Vec<Filing>> {
        let len = self.len();
        for (column, column_len) in [
            ("form", self.form.len()),
            ("filingDate", self.filing_date.len()),
            ("acceptanceDateTime", self.acceptance_date_time.len()),
            ("size", self.size.len()),
        ] {
            if column_len != len {
                return Err(Error::validation(format!(
                    "column `{column}` has {column_len} entries, expected {len}"
                )));
            }
        }

        let mut report_date = self.report_date.into_iter();
        let mut act = self.act.into_iter();
        let mut file_number = self.file_number.into_iter();
        let mut film_number = self.film_number.into_iter();
        let mut items = self.items.into_iter();
        let mut is_xbrl = self.is_xbrl.into_iter();
        let mut is_inline_xbrl = self.is_inline_xbrl.into_iter();
        let mut primary_document = self.primary_document.into_iter();
        let mut primary_document_description = self.primary_document_description.into_iter();

        let filings = self
            .accession_number
            .into_iter()
            .zip(self.form)
            .zip(self.filing_date)
            .zip(self.acceptance_date_time)
            .zip(self.size)
            .map(
                |((((accession_number, form), filing_date), acceptance_time), size)| Filing {
                    accession_number,
                    form,
                    filing_date,
                    report_date: report_date.next().flatten(),
                    acceptance_time,
                    act: act.next().flatten(),
                    file_number: file_number.next().flatten(),
                    film_number: film_number.next().flatten(),
                    size,
                    items: items.next().flatten().and_then(|items| split_items(&items)),
                    is_xbrl: is_xbrl.next().unwrap_or_default(),
                    is_inline_xbrl: is_inline_xbrl.next().unwrap_or_default(),
                    primary_document: primary_document.next().flatten().unwrap_or_default(),
                    primary_document_description: primary_document_description
                        .next()
                        .flatten()
                        .unwrap_or_default(),
                },
            )
            .collect();

        Ok(filings)
    }
}

/// Splits EDGAR's comma joined 8-K item list, e.g. `"2.02,9.01"`.
fn split_items(items: &str) -> Option<Vec<String>> {
    let items: Vec<String> = items
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_owned)
        .collect();

    (!items.is_empty()).then_some(items)
}

/// A single filing submission.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Builder)]
#[builder(on(String, into))]
pub struct Filing {
    /// Unique accession number, e.g. `0000320193-24-000123`.
    pub accession_number: String,
    /// Form type, e.g. `10-K`, `8-K`, `4`.
    pub form: String,
    pub filing_date: NaiveDate,
    /// Period the filing reports on, when applicable.
    pub report_date: Option<NaiveDate>,
    /// When EDGAR accepted the submission.
    pub acceptance_time: DateTime<Utc>,
    /// Securities act the filing was made under, e.g. `34`.
    pub act: Option<String>,
    pub file_number: Option<String>,
    pub film_number: Option<String>,
    /// Submission size in bytes.
    pub size: u64,
    /// Reported items, for forms that have them (8-K).
    pub items: Option<Vec<String>>,
    #[builder(default)]
    pub is_xbrl: bool,
    #[builder(default)]
    pub is_inline_xbrl: bool,
    #[builder(default)]
    pub primary_document: String,
    #[builder(default)]
    pub primary_document_description: String,
}

/// An entity name to CIK mapping from the full EDGAR lookup file.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Builder)]
#[builder(on(String, into))]
pub struct FilerMatch {
    pub name: String,
    pub cik: Cik,
}

impl FilerMatch {
    /// Parses one line of `cik-lookup-data.txt`, formatted `NAME:CIK:`.
    ///
    /// Names may themselves contain colons, so the CIK is taken from the last field.
    /// Returns `Ok(None)` for blank lines and lines without a CIK field.
    pub(crate) fn parse_line(line: &str) -> Result<Option<Self>> {
        let line = line.trim();
        let line = line.strip_suffix(':').unwrap_or(line);
        let Some((name, cik)) = line.rsplit_once(':') else {
            return Ok(None);
        };

        let cik = cik
            .parse::<Cik>()
            .map_err(|e| Error::validation(format!("malformed CIK lookup line {line:?}: {e}")))?;

        Ok(Some(Self {
            name: name.trim().to_owned(),
            cik,
        }))
    }
}

/// A company name to CIK mapping with its listing.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Builder)]
#[builder(on(String, into))]
pub struct CompanyMatch {
    pub cik: Cik,
    pub name: String,
    pub ticker: String,
    /// Listing exchange. EDGAR leaves this empty for some over-the-counter securities.
    pub exchange: Option<String>,
}

/// The `files/company_tickers_exchange.json` document: a header row and positional rows.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CompanyTickers {
    pub fields: Vec<String>,
    pub data: Vec<(Cik, String, String, Option<String>)>,
}

impl CompanyTickers {
    const FIELDS: [&str; 4] = ["cik", "name", "ticker", "exchange"];

    /// Converts the positional rows into [`CompanyMatch`] records.
    ///
    /// # Errors
    ///
    /// Returns a [`Kind::Validation`](crate::error::Kind::Validation) error if the header
    /// does not describe the expected `cik, name, ticker, exchange` layout.
    pub fn into_matches(self) -> Result<Vec<CompanyMatch>> {
        if self.fields != Self::FIELDS {
            return Err(Error::validation(format!(
                "unexpected company ticker fields {:?}, expected {:?}",
                self.fields,
                Self::FIELDS
            )));
        }

        Ok(self
            .data
            .into_iter()
            .map(|(cik, name, ticker, exchange)| CompanyMatch {
                cik,
                name,
                ticker,
                exchange: exchange.filter(|e| !e.is_empty()),
            })
            .collect())
    }
}
