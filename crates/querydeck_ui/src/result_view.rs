//! Client-side view over a fetched result set.
//!
//! Everything shown on screen or exported is `sort(filter(result_set))`. The
//! result set itself is never reordered or trimmed.

use std::{cmp::Reverse, collections::BTreeMap};

use querydeck_api::{
    ResultRow, ResultSet,
    result::cell,
};
use serde_json::Value;

/// Column name to the substring its values must contain
pub type FilterState = BTreeMap<String, String>;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl SortDirection {
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Ascending => Self::Descending,
            Self::Descending => Self::Ascending,
        }
    }

    #[must_use]
    pub const fn arrow(self) -> &'static str {
        match self {
            Self::Ascending => "▲",
            Self::Descending => "▼",
        }
    }
}

/// The single active sort key
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortState {
    pub column: String,
    pub direction: SortDirection,
}

/// Rows of `result_set` that pass every filter, ordered by `sort`.
///
/// Filtering is a case-insensitive substring match on the string form of
/// each value (missing values are empty). Sorting compares string forms
/// lexicographically, so `"10"` sorts before `"2"`, and keeps the original
/// order of equal keys.
#[must_use]
pub fn derive_rows<'a>(
    result_set: &'a ResultSet,
    filters: &FilterState,
    sort: Option<&SortState>,
) -> Vec<&'a ResultRow> {
    let predicates: Vec<(&str, String)> = filters
        .iter()
        .filter(|(_, needle)| !needle.is_empty())
        .map(|(column, needle)| (column.as_str(), needle.to_lowercase()))
        .collect();

    let mut rows: Vec<&ResultRow> = result_set
        .rows()
        .iter()
        .filter(|row| {
            predicates.iter().all(|(column, needle)| {
                cell(row, column).to_lowercase().contains(needle.as_str())
            })
        })
        .collect();

    if let Some(sort) = sort {
        let column = sort.column.as_str();
        match sort.direction {
            SortDirection::Ascending => {
                rows.sort_by_cached_key(|row| cell(row, column));
            }
            SortDirection::Descending => {
                rows.sort_by_cached_key(|row| Reverse(cell(row, column)));
            }
        }
    }

    rows
}

/// CSV text for `rows` laid out under `columns`.
///
/// Each cell is the JSON encoding of its value, so strings are quoted and
/// escaped; missing and `null` cells are left empty. Keys absent from
/// `columns` are not exported.
#[must_use]
pub fn to_csv(columns: &[String], rows: &[&ResultRow]) -> String {
    let mut lines = Vec::with_capacity(rows.len() + 1);
    lines.push(columns.join(","));
    for row in rows {
        let line = columns
            .iter()
            .map(|column| match row.get(column) {
                None | Some(Value::Null) => String::new(),
                Some(value) => value.to_string(),
            })
            .collect::<Vec<_>>()
            .join(",");
        lines.push(line);
    }
    lines.join("\n")
}

/// The result set of the last successful query plus the live filter and
/// sort applied to it
#[derive(Debug, Clone, Default)]
pub struct ResultView {
    result_set: ResultSet,
    filters: FilterState,
    sort: Option<SortState>,
}

impl ResultView {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the rows wholesale; filters and sort stay as they are
    pub fn set_result_set(&mut self, result_set: ResultSet) {
        tracing::debug!(
            rows = result_set.len(),
            columns = result_set.columns().len(),
            "Result set replaced"
        );
        self.result_set = result_set;
    }

    #[must_use]
    pub const fn result_set(&self) -> &ResultSet {
        &self.result_set
    }

    /// Column order of the unfiltered result set
    #[must_use]
    pub fn columns(&self) -> &[String] {
        self.result_set.columns()
    }

    #[must_use]
    pub const fn filters(&self) -> &FilterState {
        &self.filters
    }

    /// Current predicate for `column`, empty when none was set
    #[must_use]
    pub fn filter(&self, column: &str) -> &str {
        self.filters.get(column).map_or("", String::as_str)
    }

    #[must_use]
    pub fn is_filtered(&self, column: &str) -> bool {
        !self.filter(column).is_empty()
    }

    #[must_use]
    pub const fn sort(&self) -> Option<&SortState> {
        self.sort.as_ref()
    }

    pub fn set_filter(&mut self, column: &str, substring: &str) {
        self.filters
            .insert(column.to_string(), substring.to_string());
    }

    /// Sort by `column`, flipping the direction if it is already the key
    pub fn set_sort(&mut self, column: &str) {
        let direction = match &self.sort {
            Some(current) if current.column == column => {
                current.direction.toggled()
            }
            _ => SortDirection::Ascending,
        };
        self.sort = Some(SortState {
            column: column.to_string(),
            direction,
        });
    }

    #[must_use]
    pub fn derive(&self) -> Vec<&ResultRow> {
        derive_rows(&self.result_set, &self.filters, self.sort.as_ref())
    }

    /// The visible rows as strings, one per column of the result set
    #[must_use]
    pub fn derive_cells(&self) -> Vec<Vec<String>> {
        let columns = self.columns();
        self.derive()
            .into_iter()
            .map(|row| columns.iter().map(|column| cell(row, column)).collect())
            .collect()
    }

    /// CSV of the visible rows, or `None` when there is nothing to export
    #[must_use]
    pub fn export_csv(&self) -> Option<String> {
        if self.result_set.is_empty() {
            return None;
        }
        Some(to_csv(self.columns(), &self.derive()))
    }
}
