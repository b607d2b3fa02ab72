//! HTTPトランスポート
//!
//! APIクライアントはこのトレイト越しにしか通信しない。
//! 本番は `ReqwestTransport`、テストは記録用のモックを差し込む。

mod reqwest_client;

pub use reqwest_client::ReqwestTransport;

use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
}

impl std::fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HttpMethod::Get => write!(f, "GET"),
            HttpMethod::Post => write!(f, "POST"),
            HttpMethod::Put => write!(f, "PUT"),
        }
    }
}

/// マルチパートのファイル部
#[derive(Debug, Clone, PartialEq)]
pub struct FilePart {
    pub field: String,
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// リクエスト本文
#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    Empty,
    Json(serde_json::Value),
    /// テキストフィールド + ファイル1つ
    Multipart {
        fields: Vec<(String, String)>,
        file: FilePart,
    },
    /// 生バイト列（ストレージへの直接PUT）
    Binary {
        content_type: String,
        bytes: Vec<u8>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    /// 絶対URL
    pub url: String,
    pub body: RequestBody,
    pub timeout: Duration,
}

impl HttpRequest {
    pub fn new(method: HttpMethod, url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            method,
            url: url.into(),
            body: RequestBody::Empty,
            timeout,
        }
    }

    pub fn with_body(mut self, body: RequestBody) -> Self {
        self.body = body;
        self
    }

    /// JSON本文のフィールドを参照（テスト・ログ用）
    pub fn json_field(&self, key: &str) -> Option<&serde_json::Value> {
        match &self.body {
            RequestBody::Json(value) => value.get(key),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        fairstay_common::is_success_status(self.status)
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum TransportError {
    /// 送信したが応答が得られない（接続失敗・タイムアウト・切断）
    #[error("no response: {0}")]
    NoResponse(String),

    /// リクエストを組み立てられない
    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

#[async_trait]
pub trait Transport: Send + Sync {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError>;
}
