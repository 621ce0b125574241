use actix_web::error::InternalError;
use actix_web::http::StatusCode;
use actix_web::{web, Error, HttpResponse};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub(crate) struct JsonResponse<T> {
    pub(crate) message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) item: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) list: Option<Vec<T>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) meta: Option<serde_json::Value>,
}

pub(crate) struct JsonResponseBuilder<T> {
    item: Option<T>,
    list: Option<Vec<T>>,
    meta: Option<serde_json::Value>,
}

impl<T: Serialize> JsonResponse<T> {
    pub(crate) fn build() -> JsonResponseBuilder<T> {
        JsonResponseBuilder {
            item: None,
            list: None,
            meta: None,
        }
    }
}

impl<T: Serialize> JsonResponseBuilder<T> {
    pub(crate) fn set_item(mut self, item: T) -> Self {
        self.item = Some(item);
        self
    }

    pub(crate) fn set_list(mut self, list: Vec<T>) -> Self {
        self.list = Some(list);
        self
    }

    pub(crate) fn set_meta(mut self, meta: serde_json::Value) -> Self {
        self.meta = Some(meta);
        self
    }

    fn into_response(self, message: impl Into<String>) -> JsonResponse<T> {
        JsonResponse {
            message: message.into(),
            item: self.item,
            list: self.list,
            meta: self.meta,
        }
    }

    pub(crate) fn ok(self, message: impl Into<String>) -> web::Json<JsonResponse<T>> {
        web::Json(self.into_response(message))
    }

    fn error(self, status: StatusCode, message: impl Into<String>) -> Error {
        let message = message.into();
        let body = HttpResponse::build(status).json(self.into_response(message.clone()));
        InternalError::from_response(message, body).into()
    }

    /// 400 with the rendered validation errors under `meta.errors`.
    pub(crate) fn form_error(self, errors: String) -> Error {
        self.set_meta(serde_json::json!({ "errors": errors }))
            .error(StatusCode::BAD_REQUEST, "Invalid query parameters")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::to_bytes;
    use actix_web::ResponseError;

    #[test]
    fn test_empty_parts_are_not_serialized() {
        let response = JsonResponse::<i64>::build().set_item(42).ok("OK");
        let value = serde_json::to_value(&response.0).unwrap();
        assert_eq!(value, serde_json::json!({"message": "OK", "item": 42}));
    }

    #[actix_web::test]
    async fn test_form_error_has_json_body() {
        let err = JsonResponse::<i64>::build().form_error("limit: must be positive".to_string());
        let response = err.as_response_error().error_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = to_bytes(response.into_body()).await.unwrap();
        let value: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(value["message"], "Invalid query parameters");
        assert_eq!(value["meta"]["errors"], "limit: must be positive");
    }
}
