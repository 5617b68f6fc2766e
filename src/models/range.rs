use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde_json::Value;

/// A fetch result: provider-specific payloads keyed by calendar date.
///
/// An empty map is a valid, successful result meaning "no data in range".
pub type RangeData = BTreeMap<NaiveDate, Value>;

/// Whether a payload carries no information worth returning.
///
/// Cache files store placeholder entries for dates with nothing behind them;
/// those are dropped before the result leaves the provider.
pub fn is_empty_payload(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(fields) => fields.is_empty(),
        _ => false,
    }
}

/// Keep only entries inside `[start, end]` with a non-empty payload.
pub fn retain_range(data: &mut RangeData, start: NaiveDate, end: NaiveDate) {
    data.retain(|date, value| start <= *date && *date <= end && !is_empty_payload(value));
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    #[test]
    fn test_is_empty_payload() {
        assert!(is_empty_payload(&Value::Null));
        assert!(is_empty_payload(&json!("")));
        assert!(is_empty_payload(&json!([])));
        assert!(is_empty_payload(&json!({})));
        assert!(!is_empty_payload(&json!(0)));
        assert!(!is_empty_payload(&json!({"headline": "x"})));
    }

    #[test]
    fn test_retain_range_drops_out_of_range_and_empty() {
        let mut data = RangeData::new();
        data.insert(date("2024-01-01"), json!({"a": 1}));
        data.insert(date("2024-01-03"), json!([]));
        data.insert(date("2024-01-05"), json!({"b": 2}));
        data.insert(date("2024-02-01"), json!({"c": 3}));

        retain_range(&mut data, date("2024-01-01"), date("2024-01-31"));

        assert_eq!(data.len(), 2);
        assert!(data.contains_key(&date("2024-01-01")));
        assert!(data.contains_key(&date("2024-01-05")));
    }
}
