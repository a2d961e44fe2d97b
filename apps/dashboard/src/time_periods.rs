use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One aggregated trade record as returned by the API.
pub type TradeRecord = Map<String, Value>;

/// A year-keyed sum column and its display label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimePeriod {
    pub label: String,
    pub value: String,
}

/// A key names a time period when it contains four digits in a row.
pub fn is_time_period_key(key: &str) -> bool {
    key.as_bytes()
        .windows(4)
        .any(|window| window.iter().all(u8::is_ascii_digit))
}

/// Time-period columns of `record`, in the record's own key order.
pub fn extract_time_periods(record: &TradeRecord) -> Vec<TimePeriod> {
    record
        .keys()
        .filter(|key| is_time_period_key(key))
        .map(|key| TimePeriod {
            label: period_label(key),
            value: key.clone(),
        })
        .collect()
}

/// `sum_ytd_2019` -> `YTD 2019`
pub fn period_label(key: &str) -> String {
    let stripped = key.replacen("sum_", "", 1);
    split_words(&stripped).join(" ").to_uppercase()
}

// Words break on separators, on letter/digit boundaries and on lower-to-upper
// case changes.
fn split_words(input: &str) -> Vec<String> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut previous: Option<char> = None;

    for ch in input.chars() {
        if !ch.is_alphanumeric() {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            previous = None;
            continue;
        }

        if let Some(prev) = previous {
            let boundary = (prev.is_ascii_digit() != ch.is_ascii_digit())
                || (prev.is_lowercase() && ch.is_uppercase());
            if boundary && !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
        }

        current.push(ch);
        previous = Some(ch);
    }

    if !current.is_empty() {
        words.push(current);
    }

    words
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: Value) -> TradeRecord {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    #[test]
    fn extracts_year_sums_in_key_order() {
        let record = record(json!({"sum_2019": 100, "sum_2020": 200, "name": "Steel"}));
        let periods = extract_time_periods(&record);
        assert_eq!(
            periods,
            vec![
                TimePeriod {
                    label: "2019".to_string(),
                    value: "sum_2019".to_string()
                },
                TimePeriod {
                    label: "2020".to_string(),
                    value: "sum_2020".to_string()
                },
            ]
        );
    }

    #[test]
    fn keeps_record_order_rather_than_sorting() {
        let record = record(json!({"sum_2021": 1, "reporter_countries": "DE", "sum_2017": 2}));
        let values: Vec<_> = extract_time_periods(&record)
            .into_iter()
            .map(|period| period.value)
            .collect();
        assert_eq!(values, vec!["sum_2021", "sum_2017"]);
    }

    #[test]
    fn labels_are_spaced_and_upper_cased() {
        assert_eq!(period_label("sum_ytd_2019"), "YTD 2019");
        assert_eq!(period_label("sum_q1_2020"), "Q 1 2020");
        assert_eq!(period_label("ytd2019"), "YTD 2019");
        assert_eq!(period_label("sum_monthlyTotal_2018"), "MONTHLY TOTAL 2018");
    }

    #[test]
    fn short_digit_runs_do_not_qualify() {
        assert!(!is_time_period_key("q1_201"));
        assert!(!is_time_period_key("partner_countries"));
        assert!(is_time_period_key("percent_change_ytd_2019"));
    }

    #[test]
    fn empty_record_has_no_periods() {
        assert!(extract_time_periods(&TradeRecord::new()).is_empty());
    }
}
