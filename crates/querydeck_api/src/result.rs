use serde_json::{Map, Value};

/// One row of a query result: column name to value, in server order
pub type ResultRow = Map<String, Value>;

/// Rows returned by one query execution.
///
/// `columns` is fixed when the set is built from the keys of the first row
/// and is shared by the on-screen table and the CSV export.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultSet {
    rows: Vec<ResultRow>,
    columns: Vec<String>,
}

impl ResultSet {
    #[must_use]
    pub fn new(rows: Vec<ResultRow>) -> Self {
        let columns = rows
            .first()
            .map(|row| row.keys().cloned().collect())
            .unwrap_or_default();
        Self { rows, columns }
    }

    #[must_use]
    pub fn rows(&self) -> &[ResultRow] {
        &self.rows
    }

    #[must_use]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }
}

impl From<Vec<ResultRow>> for ResultSet {
    fn from(rows: Vec<ResultRow>) -> Self {
        Self::new(rows)
    }
}

/// String form of a cell used for filtering, sorting and display.
///
/// A missing value is the empty string; `null` is `"null"`; strings are
/// taken as-is; everything else is its compact JSON text.
#[must_use]
pub fn coerce(value: Option<&Value>) -> String {
    match value {
        None => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(Value::Null) => "null".to_string(),
        Some(other) => other.to_string(),
    }
}

/// String form of the cell at `column` of `row`
#[must_use]
pub fn cell(row: &ResultRow, column: &str) -> String {
    coerce(row.get(column))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn row(value: Value) -> ResultRow {
        match value {
            Value::Object(map) => map,
            _ => panic!("not an object"),
        }
    }

    #[test]
    fn test_columns_come_from_first_row_only() {
        let set = ResultSet::new(vec![
            row(json!({"b": 1, "a": 2})),
            row(json!({"a": 3, "c": 4})),
        ]);
        assert_eq!(set.columns(), ["b", "a"]);
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_empty_set_has_no_columns() {
        let set = ResultSet::new(Vec::new());
        assert!(set.columns().is_empty());
        assert!(set.is_empty());
    }

    #[test]
    fn test_coerce() {
        assert_eq!(coerce(None), "");
        assert_eq!(coerce(Some(&json!("x"))), "x");
        assert_eq!(coerce(Some(&json!(10))), "10");
        assert_eq!(coerce(Some(&json!(1.5))), "1.5");
        assert_eq!(coerce(Some(&json!(true))), "true");
        assert_eq!(coerce(Some(&Value::Null)), "null");
        assert_eq!(coerce(Some(&json!({"k": [1, 2]}))), r#"{"k":[1,2]}"#);
    }
}
