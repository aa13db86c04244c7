//! Query string extractor.

use aide::generate::GenContext;
use aide::openapi::Operation;
use axum::extract::rejection::QueryRejection;
use axum::extract::{FromRequestParts, OptionalFromRequestParts};
use axum::http::request::Parts;
use serde::de::DeserializeOwned;

use super::{first_line, quoted_name};
use crate::handler::{Error, ErrorKind};

/// Tracing target for query string parsing.
const TRACING_TARGET: &str = "polyhub_server::extract::query";

extractor_newtype! {
    /// Query parameters such as `?page=2&status=pending`.
    ///
    /// Parse failures name the offending parameter when serde reports one.
    Query
}

impl<T, S> FromRequestParts<S> for Query<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = Error<'static>;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let axum::extract::Query(params) =
            axum::extract::Query::<T>::from_request_parts(parts, state).await?;
        Ok(Self(params))
    }
}

/// A query string that fails to parse is treated as absent.
impl<T, S> OptionalFromRequestParts<S> for Query<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = Error<'static>;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &S,
    ) -> Result<Option<Self>, Self::Rejection> {
        Ok(<Self as FromRequestParts<S>>::from_request_parts(parts, state)
            .await
            .ok())
    }
}

impl From<QueryRejection> for Error<'static> {
    fn from(rejection: QueryRejection) -> Self {
        let detail = first_line(&rejection.body_text());
        tracing::debug!(target: TRACING_TARGET, %detail, "query string rejected");

        let message = match quoted_name(&detail) {
            Some(name) if detail.contains("missing field") => {
                format!("The query parameter '{name}' is required.")
            }
            Some(name) if detail.contains("duplicate field") => {
                format!("The query parameter '{name}' was given more than once.")
            }
            Some(value) if detail.contains("unknown variant") => {
                format!("'{value}' is not an accepted value.")
            }
            _ => "The query string is invalid.".to_owned(),
        };

        ErrorKind::BadRequest
            .with_message(message)
            .with_context(detail)
    }
}

impl<T: schemars::JsonSchema> aide::OperationInput for Query<T> {
    fn operation_input(ctx: &mut GenContext, operation: &mut Operation) {
        axum::extract::Query::<T>::operation_input(ctx, operation);
    }
}

#[cfg(test)]
mod tests {
    use axum::Router;
    use axum::http::StatusCode;
    use axum::routing::get;
    use axum_test::TestServer;
    use serde::Deserialize;
    use serde_json::Value;

    use super::*;

    #[derive(Deserialize)]
    #[serde(rename_all = "lowercase")]
    enum Status {
        Pending,
        Shipped,
    }

    #[derive(Deserialize)]
    struct Filter {
        status: Status,
    }

    async fn filter(Query(filter): Query<Filter>) -> &'static str {
        match filter.status {
            Status::Pending => "pending",
            Status::Shipped => "shipped",
        }
    }

    #[tokio::test]
    async fn rejections_explain_the_parameter() -> anyhow::Result<()> {
        let server = TestServer::new(Router::new().route("/", get(filter)))?;

        server.get("/?status=shipped").await.assert_text("shipped");

        let missing = server.get("/").await;
        missing.assert_status(StatusCode::BAD_REQUEST);
        assert_eq!(
            missing.json::<Value>()["message"],
            "The query parameter 'status' is required."
        );

        let unknown = server.get("/?status=bogus").await;
        unknown.assert_status(StatusCode::BAD_REQUEST);
        assert_eq!(unknown.json::<Value>()["message"], "'bogus' is not an accepted value.");
        Ok(())
    }
}
