//! JSON body extractor whose rejections name the offending field

use axum::{
    extract::{rejection::JsonRejection, FromRequest, Request},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json as AxumJson,
};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::de::DeserializeOwned;

use super::error::{ApiError, ApiErrorType};

/// Prefix axum puts in front of every deserialization failure
const DATA_ERROR_PREFIX: &str = "Failed to deserialize the JSON body into the target type: ";

/// A field location as reported by the deserializer (`config.agents[0].llm`)
static FIELD_LOCATION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9_]+(?:\[\d+\])*(?:\.[A-Za-z0-9_]+(?:\[\d+\])*)*$").unwrap());

/// `axum::Json` with rejections in the API error body
///
/// A body that parses but does not fit the closed config schema is a 422
/// with `param` set to the field where decoding stopped.
#[derive(Debug, Clone, Copy, Default)]
pub struct Json<T>(pub T);

impl<S, T> FromRequest<S> for Json<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        AxumJson::<T>::from_request(req, state)
            .await
            .map(|AxumJson(value)| Json(value))
            .map_err(|rejection| rejection_error(&rejection))
    }
}

impl<T> IntoResponse for Json<T>
where
    T: serde::Serialize,
{
    fn into_response(self) -> Response {
        AxumJson(self.0).into_response()
    }
}

fn rejection_error(rejection: &JsonRejection) -> ApiError {
    match rejection {
        JsonRejection::JsonDataError(err) => schema_error(&err.body_text()),
        JsonRejection::JsonSyntaxError(err) => {
            ApiError::bad_request(format!("Body is not valid JSON: {}", err.body_text()))
                .with_code("json_syntax")
        }
        JsonRejection::MissingJsonContentType(_) => ApiError::new(
            StatusCode::UNSUPPORTED_MEDIA_TYPE,
            ApiErrorType::InvalidRequestError,
            "Expected 'Content-Type: application/json'",
        )
        .with_code("content_type"),
        other => ApiError::bad_request(format!("Could not read the body: {}", other.body_text()))
            .with_code("body_read"),
    }
}

/// Splits axum's `<location>: <reason>` text; the location is absent when
/// decoding failed at the document root
fn schema_error(text: &str) -> ApiError {
    let detail = text.strip_prefix(DATA_ERROR_PREFIX).unwrap_or(text);

    let located = detail
        .split_once(": ")
        .filter(|(location, _)| FIELD_LOCATION.is_match(location));

    match located {
        Some((location, reason)) => ApiError::unprocessable(format!(
            "Field '{}' does not match the schema: {}",
            location, reason
        ))
        .with_param(location)
        .with_code("schema_mismatch"),
        None => ApiError::unprocessable(format!("Body does not match the schema: {}", detail))
            .with_code("schema_mismatch"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::types::ConfigBody;
    use axum::body::Body;

    fn json_request(body: &'static str) -> Request {
        Request::builder()
            .header("content-type", "application/json")
            .body(Body::from(body))
            .unwrap()
    }

    #[tokio::test]
    async fn test_unknown_config_field_names_location() {
        let err = Json::<ConfigBody>::from_request(
            json_request(r#"{"config": {"name": "x", "chunking": {"colour": "red"}}}"#),
            &(),
        )
        .await
        .unwrap_err();

        assert_eq!(err.status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(err.response.error.error_type, ApiErrorType::ValidationError);
        assert!(err
            .response
            .error
            .param
            .as_deref()
            .is_some_and(|param| param.starts_with("config.chunking")));
        assert!(err.response.error.message.contains("colour"));
    }

    #[tokio::test]
    async fn test_syntax_error_is_bad_request() {
        let err = Json::<ConfigBody>::from_request(json_request(r#"{"config": "#), &())
            .await
            .unwrap_err();

        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert_eq!(err.response.error.code.as_deref(), Some("json_syntax"));
    }

    #[tokio::test]
    async fn test_missing_content_type() {
        let request = Request::builder().body(Body::from("{}")).unwrap();
        let err = Json::<ConfigBody>::from_request(request, &())
            .await
            .unwrap_err();

        assert_eq!(err.status, StatusCode::UNSUPPORTED_MEDIA_TYPE);
    }

    #[test]
    fn test_schema_error_without_location() {
        let err = schema_error(&format!("{}missing field `config`", DATA_ERROR_PREFIX));

        assert!(err.response.error.param.is_none());
        assert_eq!(
            err.response.error.message,
            "Body does not match the schema: missing field `config`"
        );
    }

    #[test]
    fn test_schema_error_ignores_reason_with_colon() {
        let err = schema_error(&format!(
            "{}invalid type: string \"x\", expected i64",
            DATA_ERROR_PREFIX
        ));

        assert!(err.response.error.param.is_none());
    }
}
