//! JSON body extractor and response wrapper.

use aide::generate::GenContext;
use aide::openapi::{Operation, Response as ApiResponse};
use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequest, OptionalFromRequest, Request};
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use serde::de::DeserializeOwned;

use super::{first_line, quoted_name};
use crate::handler::{Error, ErrorKind};

extractor_newtype! {
    /// Behaves like [`axum::Json`], but a body that does not match the
    /// expected shape is answered with an [`Error`] naming the first bad
    /// field.
    Json
}

impl<T, S> FromRequest<S> for Json<T>
where
    T: DeserializeOwned + 'static,
    S: Send + Sync,
{
    type Rejection = Error<'static>;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match <axum::Json<T> as FromRequest<S>>::from_request(req, state).await {
            Ok(axum::Json(value)) => Ok(Self(value)),
            Err(rejection) => Err(rejection.into()),
        }
    }
}

/// An absent or unreadable body becomes `None`; only server faults propagate.
impl<T, S> OptionalFromRequest<S> for Json<T>
where
    T: DeserializeOwned + 'static,
    S: Send + Sync,
{
    type Rejection = Error<'static>;

    async fn from_request(req: Request, state: &S) -> Result<Option<Self>, Self::Rejection> {
        match <Self as FromRequest<S>>::from_request(req, state).await {
            Ok(json) => Ok(Some(json)),
            Err(error) if error.kind().status_code().is_server_error() => Err(error),
            Err(_) => Ok(None),
        }
    }
}

impl<T: Serialize> IntoResponse for Json<T> {
    #[inline]
    fn into_response(self) -> Response {
        axum::Json(self.0).into_response()
    }
}

impl From<JsonRejection> for Error<'static> {
    fn from(rejection: JsonRejection) -> Self {
        let detail = first_line(&rejection.body_text());

        match rejection {
            JsonRejection::MissingJsonContentType(_) => ErrorKind::UnsupportedMediaType.into_error(),
            JsonRejection::JsonSyntaxError(_) => ErrorKind::BadRequest
                .with_message("The request body is not valid JSON.")
                .with_context(detail),
            JsonRejection::JsonDataError(_) => {
                let message = match quoted_name(&detail) {
                    Some(field) if detail.contains("missing field") => {
                        format!("The field '{field}' is required.")
                    }
                    _ => "The request body does not have the expected shape.".to_owned(),
                };
                ErrorKind::BadRequest
                    .with_message(message)
                    .with_context(detail)
            }
            JsonRejection::BytesRejection(_) => ErrorKind::BadRequest
                .with_message("The request body could not be read.")
                .with_context(detail),
            _ => ErrorKind::InternalServerError.with_context(detail),
        }
    }
}

impl<T: schemars::JsonSchema> aide::OperationInput for Json<T> {
    fn operation_input(ctx: &mut GenContext, operation: &mut Operation) {
        axum::Json::<T>::operation_input(ctx, operation);
    }

    fn inferred_early_responses(
        ctx: &mut GenContext,
        operation: &mut Operation,
    ) -> Vec<(Option<u16>, ApiResponse)> {
        axum::Json::<T>::inferred_early_responses(ctx, operation)
    }
}

impl<T: schemars::JsonSchema + Serialize> aide::OperationOutput for Json<T> {
    type Inner = T;

    fn operation_response(ctx: &mut GenContext, operation: &mut Operation) -> Option<ApiResponse> {
        axum::Json::<T>::operation_response(ctx, operation)
    }

    fn inferred_responses(
        ctx: &mut GenContext,
        operation: &mut Operation,
    ) -> Vec<(Option<u16>, ApiResponse)> {
        axum::Json::<T>::inferred_responses(ctx, operation)
    }
}

#[cfg(test)]
mod tests {
    use axum::Router;
    use axum::http::StatusCode;
    use axum::routing::post;
    use axum_test::TestServer;
    use serde::Deserialize;
    use serde_json::{Value, json};

    use super::*;

    #[derive(Deserialize, Serialize)]
    #[serde(rename_all = "camelCase")]
    struct Grade {
        grade_name: String,
        melt_index: f64,
    }

    async fn echo(Json(grade): Json<Grade>) -> Json<Grade> {
        Json(grade)
    }

    #[tokio::test]
    async fn missing_field_is_named() -> anyhow::Result<()> {
        let server = TestServer::new(Router::new().route("/", post(echo)))?;

        let response = server.post("/").json(&json!({ "gradeName": "HDPE" })).await;
        response.assert_status(StatusCode::BAD_REQUEST);
        let body = response.json::<Value>();
        assert_eq!(body["message"], "The field 'meltIndex' is required.");

        server
            .post("/")
            .text("{\"gradeName\":")
            .content_type("application/json")
            .await
            .assert_status(StatusCode::BAD_REQUEST);
        Ok(())
    }

    #[tokio::test]
    async fn non_json_content_type_is_unsupported() -> anyhow::Result<()> {
        let server = TestServer::new(Router::new().route("/", post(echo)))?;

        server
            .post("/")
            .text("gradeName=HDPE")
            .await
            .assert_status(StatusCode::UNSUPPORTED_MEDIA_TYPE);
        Ok(())
    }
}
