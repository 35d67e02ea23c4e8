use axum::{
    extract::{FromRequest, Request},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// JSON body extractor whose rejections are a JSON `{ message, status }` 400
/// instead of axum's plain text.
pub struct AppJson<T>(pub T);

impl<T, S> FromRequest<S> for AppJson<T>
where
    T: serde::de::DeserializeOwned + 'static,
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| {
                let message = rejection.body_text();
                tracing::warn!("Rejected request body ({}): {}", rejection.status(), message);

                (
                    StatusCode::BAD_REQUEST,
                    Json(json!({
                        "message": message,
                        "status": StatusCode::BAD_REQUEST.as_u16()
                    })),
                )
                    .into_response()
            })?;

        Ok(AppJson(value))
    }
}
