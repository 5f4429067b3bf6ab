//! Client-side filter combinator for sliced entry lists.
//!
//! A [`RowFilter`] holds one accepted-value set per column. A row matches
//! when, for every constrained column, its value is a member of that column's
//! set: OR within a column, AND across columns. An empty set means the column
//! is unconstrained. A case-insensitive substring search over the row's
//! description is ANDed in on top.
//!
//! Row numbers are assigned once over the unfiltered base list (1-based, see
//! [`number`]) and behave like any other column, so they stay stable across
//! re-filtering.

use std::collections::{HashMap, HashSet};

use crate::entries::Entry;

/// A row that can be sliced by [`RowFilter`].
pub trait TableRow {
    /// Value of the named column, or `None` when the row has no such column.
    fn cell(&self, column: &str) -> Option<String>;

    /// Free text the substring search runs against.
    fn text(&self) -> &str;
}

/// A row paired with its stable 1-based position in the unfiltered list.
#[derive(Clone, Debug, PartialEq)]
pub struct Numbered<T> {
    pub row: u32,
    pub inner: T,
}

/// Assign 1-based row numbers to an unfiltered base list.
///
/// Call this once per base list; filtering never renumbers.
pub fn number<T>(rows: Vec<T>) -> Vec<Numbered<T>> {
    rows.into_iter()
        .enumerate()
        .map(|(index, inner)| Numbered {
            row: index as u32 + 1,
            inner,
        })
        .collect()
}

impl<T: TableRow> TableRow for Numbered<T> {
    fn cell(&self, column: &str) -> Option<String> {
        if column == "numero" {
            return Some(self.row.to_string());
        }
        self.inner.cell(column)
    }

    fn text(&self) -> &str {
        self.inner.text()
    }
}

/// Combines per-column accepted-value sets and a free-text search into one
/// predicate.
#[derive(Clone, Debug, Default)]
pub struct RowFilter {
    columns: HashMap<String, HashSet<String>>,
    search: Option<String>,
}

impl RowFilter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `value` to the accepted set for `column`.
    #[must_use]
    pub fn accept(mut self, column: &str, value: &str) -> Self {
        self.columns
            .entry(column.to_string())
            .or_default()
            .insert(value.to_string());
        self
    }

    /// Set the free-text search term (case-insensitive substring).
    #[must_use]
    pub fn search(mut self, term: &str) -> Self {
        self.search = Some(term.to_string());
        self
    }

    /// Returns `true` when no column constraint and no search term is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.columns.values().all(HashSet::is_empty) && self.search.is_none()
    }

    pub fn matches<T: TableRow>(&self, row: &T) -> bool {
        for (column, accepted) in &self.columns {
            if accepted.is_empty() {
                continue;
            }
            let Some(value) = row.cell(column) else {
                return false;
            };
            if !accepted.contains(&value) {
                return false;
            }
        }

        if let Some(term) = &self.search {
            let haystack = row.text().to_lowercase();
            if !haystack.contains(&term.to_lowercase()) {
                return false;
            }
        }

        true
    }

    /// Keep the rows accepted by every constraint.
    pub fn apply<'r, T: TableRow>(&self, rows: &'r [T]) -> Vec<&'r T> {
        rows.iter().filter(|row| self.matches(*row)).collect()
    }
}

impl TableRow for Entry {
    fn cell(&self, column: &str) -> Option<String> {
        match column {
            "tipo" => Some(self.direction.as_str().to_string()),
            "categoria" => Some(self.category.clone()),
            "estado" => Some(self.state.as_str().to_string()),
            "documento" => Some(self.document_kind.as_str().to_string()),
            "fecha" => Some(self.value_date.to_string()),
            _ => None,
        }
    }

    fn text(&self) -> &str {
        &self.description
    }
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, Utc};
    use uuid::Uuid;

    use super::*;
    use crate::{
        Money,
        entries::{Direction, DocumentKind, EntryState},
    };

    fn entry(direction: Direction, description: &str) -> Entry {
        Entry {
            id: Uuid::new_v4(),
            cash_box_id: Uuid::new_v4(),
            direction,
            category: "varios".to_string(),
            description: description.to_string(),
            amount: Money::new(1000),
            value_date: NaiveDate::from_ymd_opt(2025, 12, 5).unwrap(),
            document_kind: DocumentKind::Voucher,
            document_number: None,
            attachment: None,
            state: EntryState::Recorded,
            created_at: Utc::now(),
            created_by: "alice".to_string(),
            updated_at: None,
            updated_by: None,
        }
    }

    #[test]
    fn direction_filter_keeps_row_numbers() {
        let rows = number(vec![
            entry(Direction::Credit, "venta mostrador"),
            entry(Direction::Debit, "taxi"),
            entry(Direction::Credit, "venta delivery"),
        ]);

        let filter = RowFilter::new().accept("tipo", "ingreso");
        let kept = filter.apply(&rows);

        assert_eq!(kept.len(), 2);
        assert_eq!(kept[0].row, 1);
        assert_eq!(kept[1].row, 3);
        assert!(
            kept.iter()
                .all(|row| row.inner.direction == Direction::Credit)
        );
    }

    #[test]
    fn values_within_a_column_combine_with_or() {
        let rows = vec![
            entry(Direction::Credit, "a"),
            entry(Direction::Debit, "b"),
        ];

        let filter = RowFilter::new()
            .accept("tipo", "ingreso")
            .accept("tipo", "egreso");
        assert_eq!(filter.apply(&rows).len(), 2);
    }

    #[test]
    fn columns_combine_with_and() {
        let mut credit = entry(Direction::Credit, "venta");
        credit.category = "ventas".to_string();
        let rows = vec![credit, entry(Direction::Credit, "otro")];

        let filter = RowFilter::new()
            .accept("tipo", "ingreso")
            .accept("categoria", "ventas");
        let kept = filter.apply(&rows);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].category, "ventas");
    }

    #[test]
    fn empty_set_means_no_constraint() {
        let mut filter = RowFilter::new().accept("tipo", "ingreso");
        filter.columns.get_mut("tipo").unwrap().clear();

        let rows = vec![entry(Direction::Debit, "taxi")];
        assert_eq!(filter.apply(&rows).len(), 1);
        assert!(filter.is_empty());
    }

    #[test]
    fn numbering_column_is_filterable() {
        let rows = number(vec![
            entry(Direction::Credit, "a"),
            entry(Direction::Credit, "b"),
        ]);

        let filter = RowFilter::new().accept("numero", "2");
        let kept = filter.apply(&rows);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].inner.description, "b");
    }

    #[test]
    fn search_is_case_insensitive_and_anded() {
        let rows = vec![
            entry(Direction::Credit, "Venta mostrador"),
            entry(Direction::Debit, "venta online"),
            entry(Direction::Credit, "taxi"),
        ];

        let filter = RowFilter::new().search("VENTA");
        assert_eq!(filter.apply(&rows).len(), 2);

        let filter = RowFilter::new().accept("tipo", "ingreso").search("venta");
        let kept = filter.apply(&rows);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].description, "Venta mostrador");
    }

    #[test]
    fn unknown_column_rejects_the_row() {
        let rows = vec![entry(Direction::Credit, "a")];
        let filter = RowFilter::new().accept("proveedor", "acme");
        assert!(filter.apply(&rows).is_empty());
    }
}
