//! 请求体提取器

use axum::{
    async_trait,
    body::Bytes,
    extract::{FromRequest, Request},
    http::{header::CONTENT_TYPE, StatusCode},
};
use serde_json::{Map, Value};

use super::error::AppError;

/// 宽松的 JSON 对象请求体
///
/// 非 JSON Content-Type、空请求体以及非对象的 JSON 都视为空对象，
/// 字段是否合法交给校验层判断；只有语法错误的 JSON 才直接返回 400。
#[derive(Debug, Default)]
pub struct JsonObject(pub Map<String, Value>);

#[async_trait]
impl<S> FromRequest<S> for JsonObject
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let is_json = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(is_json_content_type)
            .unwrap_or(false);

        let bytes = Bytes::from_request(req, state).await.map_err(|rejection| {
            if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
                AppError::PayloadTooLarge
            } else {
                AppError::Validation("Failed to read request body".to_string())
            }
        })?;

        if !is_json || bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(JsonObject::default());
        }

        match serde_json::from_slice::<Value>(&bytes) {
            Ok(Value::Object(map)) => Ok(JsonObject(map)),
            Ok(_) => Ok(JsonObject::default()),
            Err(err) => Err(AppError::Validation(format!("Invalid JSON body: {}", err))),
        }
    }
}

fn is_json_content_type(value: &str) -> bool {
    let mime = value.split(';').next().unwrap_or("").trim().to_ascii_lowercase();
    mime == "application/json" || (mime.starts_with("application/") && mime.ends_with("+json"))
}
