//! Build version tokens and the next-version policy.
//!
//! Tokens have the shape `MMDDYY_flavor_NNN`, e.g. `042625_dev_001` for the
//! first Development build of April 26th 2025. The counter restarts at `001`
//! every calendar day and otherwise goes up by one per run.

use crate::runner::{BuildFlavor, Error, Result};
use chrono::NaiveDate;
use std::{fmt, str::FromStr};

/// `strftime` format of the date part.
pub const DATE_FORMAT: &str = "%m%d%y";

/// Formats `date` as the `MMDDYY` date part.
pub fn date_stamp(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// A parsed `DATE_FLAVOR_SEQ` build identifier.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct VersionToken {
    date: String,
    flavor: String,
    sequence: u32,
}

impl VersionToken {
    /// First token of `today` for `flavor` (`..._001`).
    pub fn first_of_day(today: NaiveDate, flavor: BuildFlavor) -> Self {
        Self {
            date: date_stamp(today),
            flavor: flavor.tag().to_string(),
            sequence: 1,
        }
    }

    /// Parses a stored token.
    ///
    /// # Errors
    ///
    /// [`Error::MalformedVersionToken`] unless the text splits on `_` into
    /// exactly three parts and the last one is a decimal number.
    pub fn parse(text: &str) -> Result<Self> {
        let malformed = |reason: &str| Error::MalformedVersionToken {
            token: text.to_string(),
            reason: reason.to_string(),
        };

        let parts: Vec<&str> = text.split('_').collect();
        let [date, flavor, sequence] = parts.as_slice() else {
            return Err(malformed("expected DATE_FLAVOR_SEQ"));
        };

        if sequence.is_empty() || !sequence.bytes().all(|b| b.is_ascii_digit()) {
            return Err(malformed("sequence is not a number"));
        }
        let sequence = sequence
            .parse()
            .map_err(|_| malformed("sequence is out of range"))?;

        Ok(Self {
            date: date.to_string(),
            flavor: flavor.to_string(),
            sequence,
        })
    }

    /// Returns the `MMDDYY` date part as stored.
    pub fn date(&self) -> &str {
        &self.date
    }

    /// Returns the flavor tag as stored.
    pub fn flavor_tag(&self) -> &str {
        &self.flavor
    }

    /// Returns the per-day counter.
    pub fn sequence(&self) -> u32 {
        self.sequence
    }

    /// Token following this one for a run on `today` with `flavor`.
    ///
    /// The counter only carries over when the stored date is `today`; the
    /// flavor always comes from the current run.
    pub fn next(&self, today: NaiveDate, flavor: BuildFlavor) -> Self {
        let date = date_stamp(today);
        if self.date != date {
            return Self::first_of_day(today, flavor);
        }

        Self {
            date,
            flavor: flavor.tag().to_string(),
            sequence: self.sequence.saturating_add(1),
        }
    }
}

impl fmt::Display for VersionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}_{:03}", self.date, self.flavor, self.sequence)
    }
}

impl FromStr for VersionToken {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

/// Computes the token for a run on `today` with `flavor`.
///
/// `previous` is the value currently stored in the project config; `None`
/// or an empty value starts the day at `001`.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use ue_build_orchestrator::runner::BuildFlavor;
/// use ue_build_orchestrator::version::compute_next;
///
/// let today = NaiveDate::from_ymd_opt(2025, 4, 1).unwrap();
/// let next = compute_next(Some("040125_dev_009"), today, BuildFlavor::Development).unwrap();
/// assert_eq!(next.to_string(), "040125_dev_010");
/// ```
///
/// # Errors
///
/// [`Error::MalformedVersionToken`] if `previous` is not a valid token.
pub fn compute_next(
    previous: Option<&str>,
    today: NaiveDate,
    flavor: BuildFlavor,
) -> Result<VersionToken> {
    match previous.map(str::trim).filter(|p| !p.is_empty()) {
        None => Ok(VersionToken::first_of_day(today, flavor)),
        Some(previous) => Ok(VersionToken::parse(previous)?.next(today, flavor)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runner::ErrorKind;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn date_stamp_is_mmddyy() {
        assert_eq!(date_stamp(date(2025, 4, 26)), "042625");
        assert_eq!(date_stamp(date(2031, 12, 3)), "120331");
    }

    #[test]
    fn absent_previous_starts_at_one() {
        for flavor in BuildFlavor::ALL {
            let token = compute_next(None, date(2025, 4, 1), flavor).unwrap();
            assert_eq!(token.to_string(), format!("040125_{}_001", flavor.tag()));
        }
    }

    #[test]
    fn empty_previous_is_treated_as_absent() {
        let token = compute_next(Some("  "), date(2025, 4, 1), BuildFlavor::Shipping).unwrap();
        assert_eq!(token.to_string(), "040125_shipping_001");
    }

    #[test]
    fn same_day_increments() {
        let today = date(2025, 4, 1);
        let dev = BuildFlavor::Development;
        assert_eq!(
            compute_next(Some("040125_dev_001"), today, dev).unwrap().to_string(),
            "040125_dev_002"
        );
        assert_eq!(
            compute_next(Some("040125_dev_009"), today, dev).unwrap().to_string(),
            "040125_dev_010"
        );
        assert_eq!(
            compute_next(Some("040125_dev_099"), today, dev).unwrap().to_string(),
            "040125_dev_100"
        );
    }

    #[test]
    fn new_day_resets_counter() {
        let token = compute_next(
            Some("040125_dev_007"),
            date(2025, 4, 2),
            BuildFlavor::Development,
        )
        .unwrap();
        assert_eq!(token.to_string(), "040225_dev_001");
    }

    #[test]
    fn flavor_comes_from_current_run() {
        let token = compute_next(
            Some("040125_dev_004"),
            date(2025, 4, 1),
            BuildFlavor::Shipping,
        )
        .unwrap();
        assert_eq!(token.to_string(), "040125_shipping_005");
    }

    #[test]
    fn counter_grows_past_three_digits() {
        let token = compute_next(
            Some("040125_dev_999"),
            date(2025, 4, 1),
            BuildFlavor::Development,
        )
        .unwrap();
        assert_eq!(token.to_string(), "040125_dev_1000");
    }

    #[test]
    fn malformed_tokens_are_rejected() {
        let today = date(2025, 4, 1);
        for bad in ["1.0.0.0", "040125_dev", "040125_dev_001_x", "040125_dev_x", "040125_dev_+1"] {
            let err = compute_next(Some(bad), today, BuildFlavor::Development).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::MalformedVersionToken, "{bad}");
        }
    }

    #[test]
    fn parse_exposes_parts() {
        let token: VersionToken = "042625_debug_012".parse().unwrap();
        assert_eq!(token.date(), "042625");
        assert_eq!(token.flavor_tag(), "debug");
        assert_eq!(token.sequence(), 12);
        assert_eq!(token.to_string(), "042625_debug_012");
    }
}
