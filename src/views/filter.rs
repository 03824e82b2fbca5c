//! Year selection and the filtered view it produces.

use crate::data::{AccidentRecord, CanonicalTable};
use std::fmt;

pub const ALL_YEARS_LABEL: &str = "All Years";

/// Value of the year selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum YearSelection {
    #[default]
    AllYears,
    Year(i32),
}

impl YearSelection {
    /// `"All Years"` first, then every year present in the table.
    pub fn options(table: &CanonicalTable) -> Vec<YearSelection> {
        std::iter::once(YearSelection::AllYears)
            .chain(table.years().into_iter().map(YearSelection::Year))
            .collect()
    }

    pub fn matches(&self, record: &AccidentRecord) -> bool {
        match self {
            YearSelection::AllYears => true,
            YearSelection::Year(y) => record.year == *y,
        }
    }
}

impl fmt::Display for YearSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            YearSelection::AllYears => f.write_str(ALL_YEARS_LABEL),
            YearSelection::Year(y) => write!(f, "{}", y),
        }
    }
}

/// Read-only subset of the canonical table.
#[derive(Debug, Clone)]
pub struct FilteredView<'a> {
    rows: Vec<&'a AccidentRecord>,
}

impl<'a> FilteredView<'a> {
    pub fn new(table: &'a CanonicalTable, selection: YearSelection) -> Self {
        Self {
            rows: table
                .records()
                .iter()
                .filter(|r| selection.matches(r))
                .collect(),
        }
    }

    pub fn all(table: &'a CanonicalTable) -> Self {
        Self::new(table, YearSelection::AllYears)
    }

    pub fn rows(&self) -> &[&'a AccidentRecord] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
