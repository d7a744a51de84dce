//! Record list: in-memory sort and free-text filter
//!
//! Sorting is stable and always puts missing values last, whichever
//! direction is selected. Filtering matches a lowercased substring against
//! the text form of every present field.

use std::borrow::Borrow;
use std::cmp::Ordering;

use carcass_common::compare::is_different;
use carcass_common::fields::LIST_COMPARISON_COLUMNS;
use carcass_common::{CarcassRecord, Field, FieldValue};

use crate::client::ApiClient;
use crate::view_state::ViewState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn reversed(self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }

    pub fn arrow(self) -> &'static str {
        match self {
            SortDirection::Ascending => "↑",
            SortDirection::Descending => "↓",
        }
    }
}

/// Selected sort column and direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortState {
    pub field: Field,
    pub direction: SortDirection,
}

impl Default for SortState {
    fn default() -> Self {
        Self::new(Field::CarcassId)
    }
}

impl SortState {
    /// Ascending sort on `field`
    pub fn new(field: Field) -> Self {
        Self {
            field,
            direction: SortDirection::Ascending,
        }
    }

    /// Same field flips direction; a new field starts ascending
    pub fn toggle(&mut self, field: Field) {
        if field == self.field {
            self.direction = self.direction.reversed();
        } else {
            *self = Self::new(field);
        }
    }
}

/// Stable sort by the selected field
pub fn sort_records<R: Borrow<CarcassRecord>>(records: &mut [R], sort: SortState) {
    records.sort_by(|a, b| {
        compare_for_sort(
            sort.field.get(Borrow::<CarcassRecord>::borrow(a)),
            sort.field.get(Borrow::<CarcassRecord>::borrow(b)),
            sort.direction,
        )
    });
}

fn compare_for_sort(
    a: Option<FieldValue<'_>>,
    b: Option<FieldValue<'_>>,
    direction: SortDirection,
) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        (Some(a), Some(b)) => {
            let ord = compare_values(a, b);
            match direction {
                SortDirection::Ascending => ord,
                SortDirection::Descending => ord.reverse(),
            }
        }
    }
}

/// Ordering key of one present value
///
/// Numbers and numeric-looking text (identifiers such as "9" and "10")
/// order by value, ahead of all other text. Other text orders
/// case-insensitively. Every value maps to exactly one key, so the
/// comparison is a total order.
#[derive(Debug)]
enum SortKey {
    Numeric(f64),
    Text(String),
}

impl SortKey {
    fn of(value: FieldValue<'_>) -> Self {
        match value {
            FieldValue::Number(n) => SortKey::Numeric(n),
            FieldValue::Text(s) => match s.trim().parse::<f64>() {
                Ok(n) => SortKey::Numeric(n),
                Err(_) => SortKey::Text(s.to_lowercase()),
            },
        }
    }

    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (SortKey::Numeric(x), SortKey::Numeric(y)) => x.total_cmp(y),
            (SortKey::Text(x), SortKey::Text(y)) => x.cmp(y),
            (SortKey::Numeric(_), SortKey::Text(_)) => Ordering::Less,
            (SortKey::Text(_), SortKey::Numeric(_)) => Ordering::Greater,
        }
    }
}

fn compare_values(a: FieldValue<'_>, b: FieldValue<'_>) -> Ordering {
    SortKey::of(a).cmp(&SortKey::of(b))
}

/// True when `search` (lowercased) occurs in any present field
pub fn matches_search(record: &CarcassRecord, search: &str) -> bool {
    if search.trim().is_empty() {
        return true;
    }
    let needle = search.to_lowercase();
    Field::ALL.iter().any(|field| {
        field
            .get(record)
            .map(|value| value.to_string().to_lowercase().contains(&needle))
            .unwrap_or(false)
    })
}

/// Records matching `search`, in their original order
pub fn filter_records<'a>(records: &'a [CarcassRecord], search: &str) -> Vec<&'a CarcassRecord> {
    records.iter().filter(|r| matches_search(r, search)).collect()
}

/// One legacy/predict cell pair of a list row
#[derive(Debug, Clone, PartialEq)]
pub struct ComparisonCell {
    pub group: &'static str,
    pub legacy: Option<String>,
    pub predict: Option<String>,
    /// Highlight the predict cell
    pub different: bool,
}

/// Display-ready list row
#[derive(Debug, Clone, PartialEq)]
pub struct ListRow<'a> {
    pub record: &'a CarcassRecord,
    pub cells: Vec<ComparisonCell>,
}

impl<'a> ListRow<'a> {
    pub fn new(record: &'a CarcassRecord) -> Self {
        let cells = LIST_COMPARISON_COLUMNS
            .iter()
            .map(|&(group, legacy, predict)| {
                let (l, p) = (legacy.get(record), predict.get(record));
                ComparisonCell {
                    group,
                    legacy: l.map(|v| v.to_string()),
                    predict: p.map(|v| v.to_string()),
                    different: is_different(l, p),
                }
            })
            .collect();
        Self { record, cells }
    }
}

/// Sortable, searchable record table
#[derive(Debug, Clone, Default)]
pub struct ListView {
    records: Vec<CarcassRecord>,
    sort: SortState,
    search: String,
}

impl ListView {
    pub fn new(records: Vec<CarcassRecord>) -> Self {
        Self {
            records,
            ..Default::default()
        }
    }

    /// Replace the data set (periodic refresh); sort and search are kept
    pub fn set_records(&mut self, records: Vec<CarcassRecord>) {
        self.records = records;
    }

    pub fn records(&self) -> &[CarcassRecord] {
        &self.records
    }

    pub fn sort(&self) -> SortState {
        self.sort
    }

    pub fn set_sort(&mut self, sort: SortState) {
        self.sort = sort;
    }

    /// Header click
    pub fn toggle_sort(&mut self, field: Field) {
        self.sort.toggle(field);
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn set_search(&mut self, search: impl Into<String>) {
        self.search = search.into();
    }

    /// Filtered, then sorted
    pub fn visible(&self) -> Vec<&CarcassRecord> {
        let mut rows = filter_records(&self.records, &self.search);
        sort_records(&mut rows, self.sort);
        rows
    }

    pub fn rows(&self) -> Vec<ListRow<'_>> {
        self.visible().into_iter().map(ListRow::new).collect()
    }

    /// (found, total) for the "found N of M" line
    pub fn summary(&self) -> (usize, usize) {
        (self.visible().len(), self.records.len())
    }
}

/// Fetch the full list and wrap it for display
pub async fn load_list(client: &ApiClient) -> ViewState<Vec<CarcassRecord>> {
    ViewState::from_list(client.list_records().await)
}
