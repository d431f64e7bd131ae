//! Basic types for the expense pipeline

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// Duration classification enumeration
///
/// Determines how a purchase's total value is amortized into a monthly
/// expense. Labels outside MONTHLY/YEARLY are not an error; they mark a
/// purchase whose recurrence cannot be amortized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum DurationKind {
    /// Recurs monthly; allocated at full value
    Monthly,
    /// Recurs yearly; allocated at value / 12
    Yearly,
    /// One-time or unclassified; unallocable
    Other,
}

impl DurationKind {
    /// Classify a raw duration label. The label is uppercased and trimmed
    /// first; anything not exactly MONTHLY or YEARLY is Other.
    pub fn classify(label: &str) -> Self {
        match label.trim().to_uppercase().as_str() {
            "MONTHLY" => DurationKind::Monthly,
            "YEARLY" => DurationKind::Yearly,
            _ => DurationKind::Other,
        }
    }
}

impl Default for DurationKind {
    fn default() -> Self {
        DurationKind::Other
    }
}

impl std::fmt::Display for DurationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DurationKind::Monthly => write!(f, "MONTHLY"),
            DurationKind::Yearly => write!(f, "YEARLY"),
            DurationKind::Other => write!(f, "OTHER"),
        }
    }
}

/// Calendar month identifier (year + month)
///
/// Displays and parses as `YYYY-MM`. Ordering is chronological.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(into = "String", try_from = "String")]
pub struct MonthKey {
    year: i32,
    month: u32,
}

impl MonthKey {
    /// Create a month key; month must be 1-12
    pub fn new(year: i32, month: u32) -> Option<Self> {
        if (1..=12).contains(&month) {
            Some(Self { year, month })
        } else {
            None
        }
    }

    /// The month a date falls in
    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    /// Calendar year
    pub fn year(&self) -> i32 {
        self.year
    }

    /// Month of year (1-12)
    pub fn month(&self) -> u32 {
        self.month
    }
}

impl std::fmt::Display for MonthKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl std::str::FromStr for MonthKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (year, month) = s
            .trim()
            .split_once('-')
            .ok_or_else(|| format!("Invalid month identifier: {}", s))?;
        let year: i32 = year
            .parse()
            .map_err(|_| format!("Invalid year in month identifier: {}", s))?;
        let month: u32 = month
            .parse()
            .map_err(|_| format!("Invalid month in month identifier: {}", s))?;
        MonthKey::new(year, month).ok_or_else(|| format!("Month out of range: {}", s))
    }
}

impl From<MonthKey> for String {
    fn from(key: MonthKey) -> Self {
        key.to_string()
    }
}

impl TryFrom<String> for MonthKey {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_exact_labels() {
        assert_eq!(DurationKind::classify("MONTHLY"), DurationKind::Monthly);
        assert_eq!(DurationKind::classify("YEARLY"), DurationKind::Yearly);
    }

    #[test]
    fn test_classify_trims_and_uppercases() {
        assert_eq!(DurationKind::classify("  monthly "), DurationKind::Monthly);
        assert_eq!(DurationKind::classify("Yearly"), DurationKind::Yearly);
    }

    #[test]
    fn test_classify_unknown_is_other() {
        assert_eq!(DurationKind::classify("ONE-TIME"), DurationKind::Other);
        assert_eq!(DurationKind::classify("QUARTERLY"), DurationKind::Other);
        assert_eq!(DurationKind::classify(""), DurationKind::Other);
    }

    #[test]
    fn test_month_key_display() {
        let key = MonthKey::new(2024, 3).unwrap();
        assert_eq!(key.to_string(), "2024-03");
    }

    #[test]
    fn test_month_key_round_trip() {
        let key: MonthKey = "2024-01".parse().unwrap();
        assert_eq!(key, MonthKey::new(2024, 1).unwrap());
        assert_eq!(key.to_string(), "2024-01");
    }

    #[test]
    fn test_month_key_rejects_garbage() {
        assert!("2024".parse::<MonthKey>().is_err());
        assert!("2024-13".parse::<MonthKey>().is_err());
        assert!("2024-00".parse::<MonthKey>().is_err());
        assert!("march".parse::<MonthKey>().is_err());
    }

    #[test]
    fn test_month_key_ordering_is_chronological() {
        let a = MonthKey::new(2023, 12).unwrap();
        let b = MonthKey::new(2024, 1).unwrap();
        let c = MonthKey::new(2024, 2).unwrap();
        assert!(a < b && b < c);
    }

    #[test]
    fn test_month_key_from_date() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 5).unwrap();
        assert_eq!(MonthKey::from_date(date), MonthKey::new(2024, 3).unwrap());
    }
}
