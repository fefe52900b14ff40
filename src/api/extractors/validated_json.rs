//! Validated JSON extractor - Combines deserialization with validation.

use axum::{
    async_trait,
    extract::{rejection::JsonRejection, FromRequest, Request},
    Json,
};
use serde::de::DeserializeOwned;
use validator::Validate;

use crate::errors::AppError;

/// Validated JSON extractor that automatically validates requests.
///
/// Malformed JSON and failed validation rules both become a 400
/// `VALIDATION_ERROR` in the standard failure envelope.
///
/// # Example
///
/// ```rust,ignore
/// use serde::Deserialize;
/// use validator::Validate;
/// use lms_api::api::extractors::ValidatedJson;
///
/// #[derive(Deserialize, Validate)]
/// struct SubmitRequest {
///     #[validate(length(min = 1))]
///     file_url: String,
/// }
///
/// async fn submit(ValidatedJson(payload): ValidatedJson<SubmitRequest>) {
///     // payload is already validated
/// }
/// ```
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate,
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|e| AppError::validation(e.body_text()))?;

        value
            .validate()
            .map_err(|e| AppError::validation(format_validation_errors(&e)))?;

        Ok(ValidatedJson(value))
    }
}

/// Format validation errors into a user-friendly string
fn format_validation_errors(errors: &validator::ValidationErrors) -> String {
    errors
        .field_errors()
        .iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |e| {
                e.message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("{} is invalid", field))
            })
        })
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use serde::Deserialize;

    #[derive(Debug, Deserialize, Validate)]
    struct Probe {
        #[validate(length(min = 1, message = "Title is required"))]
        title: String,
    }

    fn request(body: &'static str) -> Request {
        Request::builder()
            .method("POST")
            .header("content-type", "application/json")
            .body(Body::from(body))
            .unwrap()
    }

    #[tokio::test]
    async fn test_rule_failure_uses_rule_message() {
        let result = ValidatedJson::<Probe>::from_request(request(r#"{"title":""}"#), &()).await;
        assert!(matches!(result, Err(AppError::Validation(ref m)) if m == "Title is required"));
    }

    #[tokio::test]
    async fn test_malformed_body_is_validation_error() {
        let result = ValidatedJson::<Probe>::from_request(request("{"), &()).await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_valid_body_passes() {
        let ValidatedJson(probe) = ValidatedJson::<Probe>::from_request(request(r#"{"title":"HW1"}"#), &())
            .await
            .unwrap();
        assert_eq!(probe.title, "HW1");
    }
}
