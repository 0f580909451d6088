//! Read-only sources backed by local directories

mod datasets;
mod results;

pub use datasets::FsDatasetSource;
pub use results::FsResultsSource;

use std::path::Path;

/// Async `Path::is_dir`: follows symlinks, and any error reads as "not a directory"
async fn is_dir(path: &Path) -> bool {
    tokio::fs::metadata(path)
        .await
        .map(|meta| meta.is_dir())
        .unwrap_or(false)
}
