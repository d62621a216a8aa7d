//! The normalized datapoint every extractor emits.

use core::fmt;
use std::str::FromStr;

use chrono::{Datelike, Days, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::KepError;

/// Sampling frequency of a series, rendered as a single-character code on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[non_exhaustive]
pub enum Frequency {
    /// Daily observations (`d`).
    #[serde(rename = "d")]
    Daily,
    /// Weekly observations (`w`).
    #[serde(rename = "w")]
    Weekly,
    /// Monthly observations (`m`).
    #[serde(rename = "m")]
    Monthly,
    /// Quarterly observations (`q`).
    #[serde(rename = "q")]
    Quarterly,
    /// Annual observations (`a`).
    #[serde(rename = "a")]
    Annual,
}

impl Frequency {
    /// Single-character code used in serialized records.
    #[must_use]
    pub const fn code(self) -> char {
        match self {
            Self::Daily => 'd',
            Self::Weekly => 'w',
            Self::Monthly => 'm',
            Self::Quarterly => 'q',
            Self::Annual => 'a',
        }
    }

    /// First calendar day of the period of this frequency that contains `date`.
    ///
    /// Weeks start on Monday; quarters start in January, April, July and October.
    #[must_use]
    pub fn period_start(self, date: NaiveDate) -> NaiveDate {
        match self {
            Self::Daily => date,
            Self::Weekly => {
                let back = u64::from(date.weekday().num_days_from_monday());
                date.checked_sub_days(Days::new(back)).unwrap_or(date)
            }
            Self::Monthly => date.with_day(1).unwrap_or(date),
            Self::Quarterly => {
                let month = (date.month0() / 3) * 3 + 1;
                NaiveDate::from_ymd_opt(date.year(), month, 1).unwrap_or(date)
            }
            Self::Annual => NaiveDate::from_ymd_opt(date.year(), 1, 1).unwrap_or(date),
        }
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl FromStr for Frequency {
    type Err = KepError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "d" => Ok(Self::Daily),
            "w" => Ok(Self::Weekly),
            "m" => Ok(Self::Monthly),
            "q" => Ok(Self::Quarterly),
            "a" => Ok(Self::Annual),
            other => Err(KepError::InvalidArg(format!(
                "unknown frequency code '{other}'"
            ))),
        }
    }
}

/// A single normalized datapoint.
///
/// `value` stays an exact decimal in memory; it is converted to a floating
/// point JSON number only when serialized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// Observation date, `YYYY-MM-DD` on the wire.
    pub date: NaiveDate,
    /// Sampling frequency.
    pub freq: Frequency,
    /// Series identifier, e.g. `UST_10YEAR`.
    pub name: String,
    /// Observed value.
    #[serde(with = "float_value")]
    pub value: Decimal,
}

impl Record {
    /// Build a validated record.
    ///
    /// # Errors
    /// Returns `InvalidArg` if `name` is empty or contains whitespace.
    pub fn new(
        date: NaiveDate,
        freq: Frequency,
        name: impl Into<String>,
        value: Decimal,
    ) -> Result<Self, KepError> {
        let rec = Self {
            date,
            freq,
            name: name.into(),
            value,
        };
        rec.validate()?;
        Ok(rec)
    }

    /// Build a validated daily record.
    ///
    /// # Errors
    /// Same as [`Record::new`].
    pub fn daily(date: NaiveDate, name: impl Into<String>, value: Decimal) -> Result<Self, KepError> {
        Self::new(date, Frequency::Daily, name, value)
    }

    /// Check the name invariant on a record that may have been built field by field.
    ///
    /// # Errors
    /// Returns `InvalidArg` if `name` is empty or contains whitespace.
    pub fn validate(&self) -> Result<(), KepError> {
        if self.name.is_empty() {
            return Err(KepError::InvalidArg(format!(
                "record on {} has an empty series name",
                self.date
            )));
        }
        if self.name.chars().any(char::is_whitespace) {
            return Err(KepError::InvalidArg(format!(
                "series name '{}' contains whitespace",
                self.name
            )));
        }
        Ok(())
    }
}

// Lossy on purpose: the remote API expects plain JSON numbers.
mod float_value {
    use core::fmt;
    use std::str::FromStr;

    use rust_decimal::Decimal;
    use rust_decimal::prelude::ToPrimitive;
    use serde::de::{self, Visitor};
    use serde::ser::Error as _;
    use serde::{Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Decimal, s: S) -> Result<S::Ok, S::Error> {
        let f = value
            .to_f64()
            .filter(|f| f.is_finite())
            .ok_or_else(|| S::Error::custom(format!("{value} has no f64 representation")))?;
        s.serialize_f64(f)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Decimal, D::Error> {
        d.deserialize_any(DecimalVisitor)
    }

    struct DecimalVisitor;

    impl Visitor<'_> for DecimalVisitor {
        type Value = Decimal;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a number or a numeric string")
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<Decimal, E> {
            Ok(Decimal::from(v))
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<Decimal, E> {
            Ok(Decimal::from(v))
        }

        // Display of f64 is the shortest round-tripping form, so 1.23 stays 1.23.
        fn visit_f64<E: de::Error>(self, v: f64) -> Result<Decimal, E> {
            Decimal::from_str(&v.to_string()).map_err(E::custom)
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<Decimal, E> {
            Decimal::from_str(v).map_err(E::custom)
        }
    }
}
