//! Views module - Year filtering and the derived tables behind each chart

mod aggregations;
mod filter;

pub use aggregations::{
    AboardFatalityPoint, Aggregations, CountryFatalities, EmptyDatasetWarning, ManufacturerCount,
    QuarterCount, ViewKind, ViewSet, YearCount, TOP_N,
};
pub use filter::{FilteredView, YearSelection};
