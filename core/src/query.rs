use std::collections::HashMap;

const BY_DATE_SQL: &str =
    "SELECT id, surname, date, color, counter, linked_id FROM surnames WHERE date = $1::date ORDER BY id";
const RECENT_SQL: &str =
    "SELECT id, surname, date, color, counter, linked_id FROM surnames ORDER BY date, id LIMIT 1000";

/// Which of the two fixed reads a request maps to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SurnameQuery {
    /// Rows for one day, ordered by id. The date is handed to the database as-is.
    ByDate(String),
    /// Every row ordered by date then id, capped at 1000 rows.
    Recent,
}

impl SurnameQuery {
    pub fn from_params(params: Option<&HashMap<String, String>>) -> Self {
        match params.and_then(|p| p.get("date")).filter(|d| !d.is_empty()) {
            Some(date) => SurnameQuery::ByDate(date.clone()),
            None => SurnameQuery::Recent,
        }
    }

    pub fn sql(&self) -> &'static str {
        match self {
            SurnameQuery::ByDate(_) => BY_DATE_SQL,
            SurnameQuery::Recent => RECENT_SQL,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            SurnameQuery::ByDate(_) => "by_date",
            SurnameQuery::Recent => "recent",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn date_param_selects_filtered_read() {
        let p = params(&[("date", "2024-01-15")]);
        let query = SurnameQuery::from_params(Some(&p));
        assert_eq!(query, SurnameQuery::ByDate("2024-01-15".to_string()));
        assert!(query.sql().contains("WHERE date = $1::date ORDER BY id"));
    }

    #[test]
    fn no_params_selects_capped_read() {
        let query = SurnameQuery::from_params(None);
        assert_eq!(query, SurnameQuery::Recent);
        assert!(query.sql().ends_with("ORDER BY date, id LIMIT 1000"));
    }

    #[test]
    fn empty_or_unrelated_params_fall_back_to_capped_read() {
        let empty = params(&[("date", "")]);
        assert_eq!(SurnameQuery::from_params(Some(&empty)), SurnameQuery::Recent);

        let other = params(&[("surname", "Smith")]);
        assert_eq!(SurnameQuery::from_params(Some(&other)), SurnameQuery::Recent);
    }
}
