//! # Custom Axum Extractors

use axum::extract::{FromRequestParts, OriginalUri};
use axum::http::request::Parts;
use std::convert::Infallible;

use crate::query::QueryParams;

/// Multi-valued query string of the request.
///
/// Unlike `axum::extract::Query`, repeated keys keep every value. The path
/// is taken from the original URI so pagination links survive nesting.
#[derive(Debug, Clone)]
pub struct ApiQuery(pub QueryParams);

impl<S> FromRequestParts<S> for ApiQuery
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let uri = parts
            .extensions
            .get::<OriginalUri>()
            .map(|original| original.0.clone())
            .unwrap_or_else(|| parts.uri.clone());

        Ok(Self(QueryParams::parse(uri.path(), uri.query())))
    }
}
