//! Data module - CSV loading, typed records and the cleaning pipeline

mod loader;
mod pipeline;
mod record;

pub use loader::{DataLoadError, DataLoader, LoaderError, SchemaError};
pub use pipeline::{CanonicalTable, CleaningPipeline, CleaningReport};
pub use record::{AccidentRecord, Month, Quarter, RawRecord, UNKNOWN};
