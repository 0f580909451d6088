//! Evaluation backend - HTTP client, SSE decoding and the backend-facing trait impls

mod catalog;
mod http_client;
mod run_backend;
mod sse;

pub use catalog::HttpCatalogProvider;
pub use http_client::{ByteStream, HttpClient, HttpClientTrait};
pub use run_backend::HttpRunBackend;
pub use sse::{sse_data_stream, SseDecoder};
