//! Custom Axum extractors

use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequest, Request};
use axum::Json;
use serde::de::DeserializeOwned;

use patternbook_core::models::ValidationError;

use super::error::ApiError;

/// JSON body extractor that reports deserialization failures as the
/// field-level 422 shape instead of axum's plain-text rejection.
pub struct ValidJson<T>(pub T);

impl<S, T> FromRequest<S> for ValidJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(Self(value)),
            Err(rejection) => {
                let message = match &rejection {
                    JsonRejection::MissingJsonContentType(_) => {
                        "expected a JSON request body".to_string()
                    }
                    other => other.body_text(),
                };
                // axum prefixes the serde message ("Failed to deserialize
                // the JSON body into the target type: missing field ...");
                // strip it so field attribution sees the serde text.
                let serde_message = message
                    .split_once(": ")
                    .map(|(_, rest)| rest.to_string())
                    .unwrap_or(message);
                Err(ApiError::Validation(ValidationError::from_body_error(
                    &serde_message,
                )))
            }
        }
    }
}
