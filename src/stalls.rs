//! Stalls
//!
//! Dated, timed sales points run by growers. Whether a stall is active is
//! derived from its end date and time on every read and never stored.

use jiff::{
    Zoned,
    civil::{Date, DateTime, Time},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{growers::GrowerId, ids::TypedId};

/// Stall Id
pub type StallId = TypedId<Stall>;

const DB_DATE_FORMAT: &str = "%Y-%m-%d";
const DISPLAY_DATE_FORMAT: &str = "%d.%m.%Y";

/// Errors reading stall dates and times.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StallError {
    /// Not a valid date in the expected format.
    #[error("invalid date: {0:?}")]
    InvalidDate(String),

    /// Not a valid `HH:MM` or `HH:MM:SS` time.
    #[error("invalid time: {0:?}")]
    InvalidTime(String),
}

/// A stall as stored in the `stanky` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stall {
    /// Stall id
    pub id: StallId,

    /// Operating grower
    #[serde(rename = "pestitel_id")]
    pub grower_id: GrowerId,

    /// Stall name
    #[serde(rename = "nazev")]
    pub name: String,

    /// Description
    #[serde(rename = "popis", default)]
    pub description: Option<String>,

    /// City
    #[serde(rename = "mesto", default)]
    pub city: String,

    /// Street and number
    #[serde(rename = "ulice", default)]
    pub street: String,

    /// Public photo URL
    #[serde(rename = "foto", default)]
    pub photo: Option<String>,

    /// First day, `YYYY-MM-DD`
    pub datum_od: String,

    /// Last day, `YYYY-MM-DD`
    pub datum_do: String,

    /// Opening time
    #[serde(default)]
    pub cas_od: Option<String>,

    /// Closing time; end of day when absent
    #[serde(default)]
    pub cas_do: Option<String>,
}

impl Stall {
    /// The moment the stall closes for good.
    ///
    /// # Errors
    ///
    /// Returns an error if `datum_do` or `cas_do` are malformed.
    pub fn ends_at(&self) -> Result<DateTime, StallError> {
        let date = parse_db_date(&self.datum_do)?;
        let time = match self.cas_do.as_deref().map(str::trim) {
            None | Some("") => Time::constant(23, 59, 59, 0),
            Some(time) => parse_time(time)?,
        };

        Ok(date.to_datetime(time))
    }

    /// `now <= end of range`
    ///
    /// # Errors
    ///
    /// Returns an error if `datum_do` or `cas_do` are malformed.
    pub fn is_active_at(&self, now: DateTime) -> Result<bool, StallError> {
        Ok(now <= self.ends_at()?)
    }

    /// "Street, City" for display and navigation.
    pub fn address(&self) -> String {
        [self.street.trim(), self.city.trim()]
            .into_iter()
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// A stall with its derived activity flag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StallView {
    /// The stored stall
    #[serde(flatten)]
    pub stall: Stall,

    /// Whether the stall has not ended yet
    pub aktivni: bool,
}

impl StallView {
    /// Derives the flag against `now`. A stall whose end cannot be read is
    /// reported as inactive.
    pub fn at(stall: Stall, now: DateTime) -> Self {
        let aktivni = stall.is_active_at(now).unwrap_or(false);

        Self { stall, aktivni }
    }

    /// Derives the flag against the device's current local time.
    pub fn now(stall: Stall) -> Self {
        Self::at(stall, Zoned::now().datetime())
    }
}

/// `YYYY-MM-DD` → `DD.MM.YYYY`
///
/// # Errors
///
/// Returns [`StallError::InvalidDate`] unless the input is a real date in
/// exactly the store format.
pub fn db_to_display(value: &str) -> Result<String, StallError> {
    Ok(parse_db_date(value)?.strftime(DISPLAY_DATE_FORMAT).to_string())
}

/// `DD.MM.YYYY` → `YYYY-MM-DD`
///
/// # Errors
///
/// Returns [`StallError::InvalidDate`] unless the input is a real date in
/// exactly the display format.
pub fn display_to_db(value: &str) -> Result<String, StallError> {
    Ok(parse_display_date(value)?.strftime(DB_DATE_FORMAT).to_string())
}

/// Parses a store date, requiring the zero-padded `YYYY-MM-DD` shape.
///
/// # Errors
///
/// Returns [`StallError::InvalidDate`] for anything else.
pub fn parse_db_date(value: &str) -> Result<Date, StallError> {
    parse_date(value, "dddd-dd-dd", DB_DATE_FORMAT)
}

/// Parses a display date, requiring the zero-padded `DD.MM.YYYY` shape.
///
/// # Errors
///
/// Returns [`StallError::InvalidDate`] for anything else.
pub fn parse_display_date(value: &str) -> Result<Date, StallError> {
    parse_date(value, "dd.dd.dddd", DISPLAY_DATE_FORMAT)
}

/// Parses `HH:MM` or `HH:MM:SS`.
///
/// # Errors
///
/// Returns [`StallError::InvalidTime`] for anything else.
pub fn parse_time(value: &str) -> Result<Time, StallError> {
    let format = if has_shape(value, "dd:dd") {
        "%H:%M"
    } else if has_shape(value, "dd:dd:dd") {
        "%H:%M:%S"
    } else {
        return Err(StallError::InvalidTime(value.to_string()));
    };

    Time::strptime(format, value).map_err(|_err| StallError::InvalidTime(value.to_string()))
}

fn parse_date(value: &str, shape: &str, format: &str) -> Result<Date, StallError> {
    if !has_shape(value, shape) {
        return Err(StallError::InvalidDate(value.to_string()));
    }

    Date::strptime(format, value).map_err(|_err| StallError::InvalidDate(value.to_string()))
}

/// `d` in the shape stands for an ASCII digit, anything else must match literally.
fn has_shape(value: &str, shape: &str) -> bool {
    value.len() == shape.len()
        && value.bytes().zip(shape.bytes()).all(|(byte, expected)| {
            if expected == b'd' {
                byte.is_ascii_digit()
            } else {
                byte == expected
            }
        })
}

#[cfg(test)]
mod tests {
    use jiff::civil::date;
    use testresult::TestResult;

    use super::*;

    fn stall(datum_do: &str, cas_do: Option<&str>) -> Stall {
        Stall {
            id: StallId::new(),
            grower_id: GrowerId::new(),
            name: "Stánek na návsi".to_string(),
            description: None,
            city: "Beroun".to_string(),
            street: "Husovo nám. 1".to_string(),
            photo: None,
            datum_od: "2025-06-01".to_string(),
            datum_do: datum_do.to_string(),
            cas_od: Some("08:00".to_string()),
            cas_do: cas_do.map(ToString::to_string),
        }
    }

    #[test]
    fn active_until_closing_time_inclusive() -> TestResult {
        let stall = stall("2025-06-02", Some("12:00"));

        assert!(stall.is_active_at(date(2025, 6, 2).at(11, 59, 0, 0))?);
        assert!(stall.is_active_at(date(2025, 6, 2).at(12, 0, 0, 0))?);
        assert!(!stall.is_active_at(date(2025, 6, 2).at(12, 0, 1, 0))?);

        Ok(())
    }

    #[test]
    fn accepts_seconds_in_closing_time() -> TestResult {
        let stall = stall("2025-06-02", Some("12:00:30"));

        assert!(stall.is_active_at(date(2025, 6, 2).at(12, 0, 15, 0))?);

        Ok(())
    }

    #[test]
    fn missing_closing_time_means_end_of_day() -> TestResult {
        let stall = stall("2025-06-02", None);

        assert!(stall.is_active_at(date(2025, 6, 2).at(23, 0, 0, 0))?);
        assert!(!stall.is_active_at(date(2025, 6, 3).at(0, 0, 0, 0))?);

        Ok(())
    }

    #[test]
    fn future_stall_is_active() -> TestResult {
        let stall = stall("2025-06-02", Some("12:00"));

        assert!(stall.is_active_at(date(2025, 5, 1).at(9, 0, 0, 0))?);

        Ok(())
    }

    #[test]
    fn malformed_end_is_inactive_in_view() {
        let view = StallView::at(stall("02.06.2025", None), date(2025, 1, 1).at(0, 0, 0, 0));

        assert!(!view.aktivni);
    }

    #[test]
    fn converts_between_formats() -> TestResult {
        assert_eq!(db_to_display("2025-06-01")?, "01.06.2025");
        assert_eq!(display_to_db("01.06.2025")?, "2025-06-01");

        Ok(())
    }

    #[test]
    fn rejects_unpadded_and_impossible_dates() {
        assert!(display_to_db("1.6.2025").is_err());
        assert!(db_to_display("2025-02-30").is_err());
        assert!(db_to_display("2025/06/01").is_err());
    }

    #[test]
    fn rejects_bad_times() {
        assert!(parse_time("25:00").is_err());
        assert!(parse_time("8:00").is_err());
        assert!(parse_time("noon").is_err());
    }

    #[test]
    fn address_skips_blank_parts() {
        let mut stall = stall("2025-06-02", None);
        assert_eq!(stall.address(), "Husovo nám. 1, Beroun");

        stall.street = String::new();
        assert_eq!(stall.address(), "Beroun");
    }
}
