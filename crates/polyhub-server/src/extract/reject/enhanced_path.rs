//! Path parameter extractor.

use aide::generate::GenContext;
use aide::openapi::{Operation, Response as ApiResponse};
use axum::extract::rejection::PathRejection;
use axum::extract::{FromRequestParts, OptionalFromRequestParts};
use axum::http::request::Parts;
use serde::de::DeserializeOwned;

use super::first_line;
use crate::handler::{Error, ErrorKind};

extractor_newtype! {
    /// Route parameters such as `{quoteId}`.
    ///
    /// An identifier that is not a UUID is reported as a bad request rather
    /// than axum's plain-text rejection.
    Path
}

impl<T, S> FromRequestParts<S> for Path<T>
where
    T: DeserializeOwned + Send + 'static,
    S: Send + Sync,
{
    type Rejection = Error<'static>;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let axum::extract::Path(params) =
            <axum::extract::Path<T> as FromRequestParts<S>>::from_request_parts(parts, state)
                .await?;
        Ok(Self(params))
    }
}

impl<T, S> OptionalFromRequestParts<S> for Path<T>
where
    T: DeserializeOwned + Send + 'static,
    S: Send + Sync,
{
    type Rejection = Error<'static>;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &S,
    ) -> Result<Option<Self>, Self::Rejection> {
        match <Self as FromRequestParts<S>>::from_request_parts(parts, state).await {
            Ok(path) => Ok(Some(path)),
            Err(error) if error.kind().status_code().is_server_error() => Err(error),
            Err(_) => Ok(None),
        }
    }
}

impl From<PathRejection> for Error<'static> {
    fn from(rejection: PathRejection) -> Self {
        let detail = first_line(&rejection.body_text());

        match rejection {
            PathRejection::FailedToDeserializePathParams(_) => ErrorKind::BadRequest
                .with_message(path_hint(&detail))
                .with_context(detail),
            PathRejection::MissingPathParams(_) => {
                ErrorKind::MissingPathParam.with_context(detail)
            }
            _ => ErrorKind::InternalServerError.with_context(detail),
        }
    }
}

/// Client-facing explanation for a parameter that failed to parse.
fn path_hint(detail: &str) -> &'static str {
    let detail = detail.to_ascii_lowercase();

    if detail.contains("uuid") {
        "Identifiers in the path must be UUIDs."
    } else if detail.contains("invalid digit") {
        "Numeric path parameters must contain only digits."
    } else {
        "A path parameter has an invalid format."
    }
}

impl<T: schemars::JsonSchema> aide::OperationInput for Path<T> {
    fn operation_input(ctx: &mut GenContext, operation: &mut Operation) {
        axum::extract::Path::<T>::operation_input(ctx, operation);
    }

    fn inferred_early_responses(
        ctx: &mut GenContext,
        operation: &mut Operation,
    ) -> Vec<(Option<u16>, ApiResponse)> {
        axum::extract::Path::<T>::inferred_early_responses(ctx, operation)
    }
}

#[cfg(test)]
mod tests {
    use axum::Router;
    use axum::http::StatusCode;
    use axum::routing::get;
    use axum_test::TestServer;
    use serde_json::Value;
    use uuid::Uuid;

    use super::*;

    async fn quote_id(Path(id): Path<Uuid>) -> String {
        id.to_string()
    }

    #[tokio::test]
    async fn non_uuid_identifier_is_a_bad_request() -> anyhow::Result<()> {
        let app = Router::new().route("/quotes/{quoteId}", get(quote_id));
        let server = TestServer::new(app)?;

        let id = Uuid::now_v7();
        server.get(&format!("/quotes/{id}")).await.assert_text(id.to_string());

        let response = server.get("/quotes/not-a-uuid").await;
        response.assert_status(StatusCode::BAD_REQUEST);
        assert_eq!(
            response.json::<Value>()["message"],
            "Identifiers in the path must be UUIDs."
        );
        Ok(())
    }

    #[test]
    fn unknown_failures_get_generic_hint() {
        assert_eq!(path_hint("something else"), "A path parameter has an invalid format.");
    }
}
