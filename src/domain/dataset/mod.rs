//! Dataset domain - corpora and test sets available for ingestion

mod source;

pub use source::{validate_dataset_id, DatasetFile, DatasetSource};
