use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

/// Body shape for client-facing 4xx errors: `{"error": "..."}`.
#[derive(Serialize)]
pub struct ClientErrorBody {
    pub error: String,
}

/// Body shape for 5xx errors: `{"message": "...", "error": "..."}`.
/// `error` carries a sanitized label, never internal detail.
#[derive(Serialize)]
pub struct ServerErrorBody {
    pub message: String,
    pub error: String,
}

pub fn ok<T>(payload: T) -> Response
where
    T: Serialize,
{
    (StatusCode::OK, Json(payload)).into_response()
}

pub fn created<T>(payload: T) -> Response
where
    T: Serialize,
{
    (StatusCode::CREATED, Json(payload)).into_response()
}

pub fn client_error(status: StatusCode, message: impl Into<String>) -> Response {
    let body = ClientErrorBody {
        error: message.into(),
    };
    (status, Json(body)).into_response()
}

pub fn server_error(
    status: StatusCode,
    message: impl Into<String>,
    detail: impl Into<String>,
) -> Response {
    let body = ServerErrorBody {
        message: message.into(),
        error: detail.into(),
    };
    (status, Json(body)).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_error_body_serializes_to_error_key_only() {
        let body = ClientErrorBody {
            error: "Event not found".to_string(),
        };
        let value = serde_json::to_value(&body).unwrap();
        assert_eq!(value, serde_json::json!({"error": "Event not found"}));
    }

    #[test]
    fn server_error_body_carries_message_and_error() {
        let body = ServerErrorBody {
            message: "Event fetching failed".to_string(),
            error: "A database error occurred".to_string(),
        };
        let value = serde_json::to_value(&body).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "message": "Event fetching failed",
                "error": "A database error occurred"
            })
        );
    }

    #[test]
    fn status_helpers_use_expected_codes() {
        let response = client_error(StatusCode::NOT_FOUND, "Event not found");
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = server_error(StatusCode::INTERNAL_SERVER_ERROR, "failed", "detail");
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
