//! API request, response and error types

pub mod editor;
pub mod error;
pub mod json;

pub use editor::{
    ChangeAgentTypeRequest, ConfigBody, DraftResponse, EmptyDraftQuery, PathInput,
    SavedConfigResponse, SetDraftFieldRequest, SetFieldRequest, ValidateDraftRequest,
};
pub use error::{ApiError, ApiErrorResponse};
pub use json::Json;
