//! Month selection and distance inputs from query parameters
//!
//! Selection state lives in the page, not in the server; every request
//! carries the full selection:
//!
//! - `months` - comma-separated `YYYY-MM` identifiers
//! - `km_<YYYY-MM>` - distance travelled in that month, e.g. `km_2024-01=1200`
//!
//! Unparseable identifiers and distances are ignored rather than
//! rejected; a missing distance simply leaves that month's per-km metric
//! undefined.

use budgetweb_core::MonthKey;
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::str::FromStr;

/// A request's month selection and distance inputs
#[derive(Debug, Clone, Default)]
pub struct Selection {
    /// Selected months, as sent (aggregation sorts and dedups)
    pub months: Vec<MonthKey>,
    /// Distance per month
    pub distances: HashMap<MonthKey, Decimal>,
}

impl Selection {
    /// Whether no month is selected
    pub fn is_empty(&self) -> bool {
        self.months.is_empty()
    }

    /// Rebuild the query string for links that must carry the selection
    pub fn to_query(&self) -> String {
        let months: Vec<String> = self.months.iter().map(|m| m.to_string()).collect();
        let mut query = format!("months={}", urlencoding::encode(&months.join(",")));
        let mut km: Vec<(&MonthKey, &Decimal)> = self.distances.iter().collect();
        km.sort_by_key(|(m, _)| **m);
        for (month, distance) in km {
            query.push_str(&format!("&km_{}={}", month, distance));
        }
        query
    }
}

/// Parse the selection out of a request's query parameters
pub fn parse_selection(params: &HashMap<String, String>) -> Selection {
    let months: Vec<MonthKey> = params
        .get("months")
        .map(|list| {
            list.split(',')
                .filter_map(|m| MonthKey::from_str(m).ok())
                .collect()
        })
        .unwrap_or_default();

    let mut distances = HashMap::new();
    for (key, value) in params {
        if let Some(month) = key.strip_prefix("km_") {
            if let (Ok(month), Ok(distance)) =
                (MonthKey::from_str(month), Decimal::from_str(value.trim()))
            {
                distances.insert(month, distance);
            }
        }
    }

    Selection { months, distances }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn params(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_parse_months_list() {
        let selection = parse_selection(&params(&[("months", "2024-01,2024-02")]));
        let labels: Vec<String> = selection.months.iter().map(|m| m.to_string()).collect();
        assert_eq!(labels, vec!["2024-01", "2024-02"]);
    }

    #[test]
    fn test_parse_skips_bad_month_identifiers() {
        let selection = parse_selection(&params(&[("months", "2024-01,not-a-month,2024-13")]));
        assert_eq!(selection.months.len(), 1);
    }

    #[test]
    fn test_parse_distances() {
        let selection = parse_selection(&params(&[
            ("months", "2024-01"),
            ("km_2024-01", "1200"),
            ("km_2024-02", "900.5"),
        ]));
        assert_eq!(
            selection.distances.get(&"2024-01".parse().unwrap()),
            Some(&dec!(1200))
        );
        assert_eq!(
            selection.distances.get(&"2024-02".parse().unwrap()),
            Some(&dec!(900.5))
        );
    }

    #[test]
    fn test_parse_skips_bad_distances() {
        let selection = parse_selection(&params(&[("km_2024-01", "lots")]));
        assert!(selection.distances.is_empty());
    }

    #[test]
    fn test_empty_params_is_empty_selection() {
        let selection = parse_selection(&HashMap::new());
        assert!(selection.is_empty());
        assert!(selection.distances.is_empty());
    }

    #[test]
    fn test_to_query_round_trips() {
        let selection = parse_selection(&params(&[
            ("months", "2024-01,2024-02"),
            ("km_2024-01", "1200"),
        ]));
        let query = selection.to_query();
        assert!(query.contains("months=2024-01%2C2024-02"));
        assert!(query.contains("km_2024-01=1200"));
    }
}
