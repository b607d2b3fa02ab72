//! APIレスポンスエンベロープの解釈
//!
//! 全エンドポイントは `{ "success": bool, ... }` を返す。
//! - 2xx 以外: `message` → `error` → `Server error: <status>` の順でメッセージを決定
//! - 2xx でも `success` が true でなければアプリケーションレベルの失敗
//! - 本文が読めない場合は操作ごとのフォールバックメッセージ

use crate::error::{ApiError, Result};
use serde::de::DeserializeOwned;
use serde_json::Value;

/// 2xx 判定
pub fn is_success_status(status: u16) -> bool {
    (200..300).contains(&status)
}

/// 本文からサーバー提供のメッセージを取り出す
///
/// `message` を優先し、なければ `error` を使う。空文字列は無視する。
pub fn server_message(body: &Value) -> Option<String> {
    ["message", "error"]
        .iter()
        .filter_map(|key| body.get(*key).and_then(Value::as_str))
        .map(str::trim)
        .find(|s| !s.is_empty())
        .map(str::to_string)
}

/// エンベロープを開き、成功時の本文を返す
///
/// # Arguments
/// * `status` - HTTPステータス
/// * `body` - レスポンス本文
/// * `fallback` - `success:false` でメッセージがない場合の文言
pub fn open_envelope(status: u16, body: &[u8], fallback: &str) -> Result<Value> {
    let parsed: Option<Value> = serde_json::from_slice(body).ok();

    if !is_success_status(status) {
        let message = parsed
            .as_ref()
            .and_then(server_message)
            .unwrap_or_else(|| format!("Server error: {}", status));
        return Err(ApiError::server(Some(status), message));
    }

    let value = parsed.ok_or_else(|| ApiError::server(Some(status), fallback))?;

    if value.get("success").and_then(Value::as_bool) != Some(true) {
        let message = server_message(&value).unwrap_or_else(|| fallback.to_string());
        return Err(ApiError::server(Some(status), message));
    }

    Ok(value)
}

/// エンベロープを開いて型に変換
///
/// 型に合わない本文はフォールバックメッセージのサーバーエラーになる。
pub fn decode<T: DeserializeOwned>(status: u16, body: &[u8], fallback: &str) -> Result<T> {
    let value = open_envelope(status, body, fallback)?;
    serde_json::from_value(value).map_err(|_| ApiError::server(Some(status), fallback))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    #[serde(rename_all = "camelCase")]
    struct Payload {
        image_id: String,
    }

    #[test]
    fn test_success_envelope() {
        let body = br#"{"success": true, "imageId": "img-1"}"#;
        let payload: Payload = decode(200, body, "Failed").unwrap();
        assert_eq!(payload.image_id, "img-1");
    }

    #[test]
    fn test_success_false_uses_server_message() {
        let body = br#"{"success": false, "message": "Image not found"}"#;
        let err = open_envelope(200, body, "Failed to get image detail").unwrap_err();
        assert_eq!(err.to_string(), "Image not found");
        assert_eq!(err.status(), Some(200));
    }

    #[test]
    fn test_success_false_uses_error_field() {
        let body = br#"{"success": false, "error": "quota exceeded"}"#;
        let err = open_envelope(200, body, "Failed").unwrap_err();
        assert_eq!(err.to_string(), "quota exceeded");
    }

    #[test]
    fn test_success_false_without_message_uses_fallback() {
        let body = br#"{"success": false}"#;
        let err = open_envelope(200, body, "Failed to analyze image").unwrap_err();
        assert_eq!(err.to_string(), "Failed to analyze image");
    }

    #[test]
    fn test_missing_success_is_failure() {
        let body = br#"{"imageId": "img-1"}"#;
        let err = open_envelope(200, body, "Failed to upload image").unwrap_err();
        assert_eq!(err.to_string(), "Failed to upload image");
    }

    #[test]
    fn test_http_error_with_message() {
        let body = r#"{"success": false, "message": "세션이 만료되었습니다"}"#.as_bytes();
        let err = open_envelope(401, body, "Failed").unwrap_err();
        assert_eq!(err.to_string(), "세션이 만료되었습니다");
        assert_eq!(err.status(), Some(401));
    }

    #[test]
    fn test_http_error_without_body() {
        let err = open_envelope(502, b"<html>Bad Gateway</html>", "Failed").unwrap_err();
        assert_eq!(err.to_string(), "Server error: 502");
    }

    #[test]
    fn test_http_error_blank_message_ignored() {
        let body = br#"{"message": "  ", "error": "boom"}"#;
        let err = open_envelope(500, body, "Failed").unwrap_err();
        assert_eq!(err.to_string(), "boom");
    }

    #[test]
    fn test_invalid_json_on_success_status() {
        let err = open_envelope(200, b"not json", "Failed to create session").unwrap_err();
        assert_eq!(err.to_string(), "Failed to create session");
    }

    #[test]
    fn test_shape_mismatch_uses_fallback() {
        let body = br#"{"success": true, "imageId": 42}"#;
        let err = decode::<Payload>(200, body, "Failed to confirm image upload").unwrap_err();
        assert_eq!(err.to_string(), "Failed to confirm image upload");
    }
}
