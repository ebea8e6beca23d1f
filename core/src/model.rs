use chrono::NaiveDate;
use serde::Serialize;
use serde_json::Value;

/// One row of the `surnames` table as it goes out on the wire.
#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SurnameRecord {
    pub id: i64,
    pub surname: String,
    pub date: Option<NaiveDate>,
    /// Passed through as whatever the column holds.
    pub color: Value,
    pub counter: Option<i64>,
    /// Passed through like `color`; usually an integer id.
    pub linked_id: Value,
}

#[derive(Serialize, Debug, Clone)]
pub struct SurnameList {
    pub surnames: Vec<SurnameRecord>,
    pub total: usize,
}

impl From<Vec<SurnameRecord>> for SurnameList {
    fn from(surnames: Vec<SurnameRecord>) -> Self {
        let total = surnames.len();
        Self { surnames, total }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn missing_date_serializes_as_null() {
        let record = SurnameRecord {
            id: 7,
            surname: "Ivanov".to_string(),
            date: None,
            color: Value::Null,
            counter: Some(3),
            linked_id: Value::Null,
        };

        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["date"], Value::Null);
        assert_eq!(value["linkedId"], Value::Null);
        assert!(value.get("linked_id").is_none());
    }

    #[test]
    fn date_uses_calendar_format() {
        let record = SurnameRecord {
            id: 1,
            surname: "Smith".to_string(),
            date: NaiveDate::from_ymd_opt(2024, 1, 5),
            color: json!("red"),
            counter: Some(0),
            linked_id: json!(2),
        };

        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["date"], json!("2024-01-05"));
        assert_eq!(value["color"], json!("red"));
    }

    #[test]
    fn total_follows_row_count() {
        let list = SurnameList::from(Vec::new());
        assert_eq!(list.total, 0);
        assert_eq!(serde_json::to_string(&list).unwrap(), r#"{"surnames":[],"total":0}"#);
    }
}
