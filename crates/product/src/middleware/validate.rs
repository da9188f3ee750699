use axum::{
    extract::{FromRequestParts, Query},
    http::request::Parts,
};
use serde::de::DeserializeOwned;
use shared::errors::HttpError;
use validator::{Validate, ValidationErrors};

/// Query-string extractor that rejects malformed values and failed
/// validation rules with a JSON 400 instead of axum's plain-text rejection.
pub struct ValidatedQuery<T>(pub T);

impl<S, T> FromRequestParts<S> for ValidatedQuery<T>
where
    T: DeserializeOwned + Validate + Send,
    S: Send + Sync,
{
    type Rejection = HttpError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| HttpError::BadRequest(rejection.body_text()))?;

        value
            .validate()
            .map_err(|errors| HttpError::BadRequest(format_validation_errors(&errors)))?;

        Ok(Self(value))
    }
}

fn format_validation_errors(errors: &ValidationErrors) -> String {
    let mut messages = Vec::new();

    for (field, field_errors) in errors.field_errors() {
        for error in field_errors {
            let message = error
                .message
                .as_ref()
                .map(|m| m.to_string())
                .unwrap_or_else(|| format!("Invalid {field}"));
            messages.push(format!("{field}: {message}"));
        }
    }

    messages.sort();
    messages.join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::requests::product::SearchProductsQuery;
    use axum::http::Request;

    async fn extract(uri: &str) -> Result<SearchProductsQuery, HttpError> {
        let (mut parts, _) = Request::builder().uri(uri).body(()).unwrap().into_parts();
        ValidatedQuery::<SearchProductsQuery>::from_request_parts(&mut parts, &())
            .await
            .map(|ValidatedQuery(q)| q)
    }

    #[tokio::test]
    async fn defaults_apply_when_paging_is_omitted() {
        let query = extract("/products/search?keyword=w").await.unwrap();
        assert_eq!((query.page, query.size), (0, 5));
    }

    #[tokio::test]
    async fn out_of_range_size_is_a_bad_request() {
        let err = extract("/products/search?keyword=w&size=101").await.unwrap_err();
        match err {
            HttpError::BadRequest(msg) => {
                assert!(msg.contains("Page size must be between 1 and 100"))
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn malformed_or_missing_values_are_bad_requests() {
        assert!(matches!(
            extract("/products/search?keyword=w&page=abc").await,
            Err(HttpError::BadRequest(_))
        ));
        assert!(matches!(
            extract("/products/search?page=1").await,
            Err(HttpError::BadRequest(_))
        ));
    }
}
