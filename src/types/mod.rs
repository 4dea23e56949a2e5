//! Request and response types for the EDGAR endpoints, plus re-exported types from external
//! crates so users don't need to add these dependencies to their `Cargo.toml`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Date and time types for filing and acceptance timestamps.
pub use chrono::{DateTime, NaiveDate, Utc};

use crate::error::Error;

pub mod request;
pub mod response;

/// Largest value a ten digit Central Index Key can hold.
const MAX_CIK: u64 = 9_999_999_999;

/// A Central Index Key, the identifier EDGAR assigns to every filer.
///
/// EDGAR is inconsistent about how it spells these: the submissions API uses zero padded
/// ten digit strings in its paths, profile documents carry unpadded strings, and the ticker
/// file carries bare integers. [`Cik`] accepts all of them and always displays the padded form.
///
/// ```
/// use edgar_client_sdk::types::Cik;
///
/// let cik: Cik = "320193".parse()?;
/// assert_eq!(cik.to_string(), "0000320193");
/// assert_eq!(cik, "CIK0000320193".parse()?);
/// # Ok::<(), edgar_client_sdk::error::Error>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Cik(u64);

impl Cik {
    /// Creates a [`Cik`] from its numeric value.
    ///
    /// # Errors
    ///
    /// Returns [`Kind::InvalidQuery`](crate::error::Kind::InvalidQuery) if the value does not
    /// fit in ten digits.
    pub fn new(value: u64) -> crate::Result<Self> {
        if value > MAX_CIK {
            return Err(Error::invalid_query(format!(
                "CIK {value} is longer than 10 digits"
            )));
        }

        Ok(Self(value))
    }

    #[must_use]
    pub fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for Cik {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:010}", self.0)
    }
}

impl FromStr for Cik {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let digits = trimmed
            .strip_prefix("CIK")
            .or_else(|| trimmed.strip_prefix("cik"))
            .unwrap_or(trimmed);

        if digits.is_empty() || digits.len() > 10 || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(Error::invalid_query(format!(
                "{s:?} is not a valid CIK, expected 1 to 10 digits"
            )));
        }

        let value = digits
            .parse::<u64>()
            .map_err(|e| Error::invalid_query(format!("{s:?} is not a valid CIK: {e}")))?;

        Ok(Self(value))
    }
}

impl Serialize for Cik {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Cik {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        use serde::de::{self, Visitor};

        struct CikVisitor;

        impl Visitor<'_> for CikVisitor {
            type Value = Cik;

            fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
                formatter.write_str("a CIK as a string or integer")
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
                v.parse().map_err(E::custom)
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
                Cik::new(v).map_err(E::custom)
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
                let v = u64::try_from(v).map_err(E::custom)?;
                self.visit_u64(v)
            }
        }

        deserializer.deserialize_any(CikVisitor)
    }
}
