//! テスト用の記録付きトランスポート

#![allow(dead_code)]

use async_trait::async_trait;
use fairstay_client::config::ApiConfig;
use fairstay_client::transport::{HttpRequest, HttpResponse, Transport, TransportError};
use fairstay_client::ApiClient;
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

pub const BASE_URL: &str = "http://api.test";

/// 用意した応答を順に返し、受け取ったリクエストを記録する
#[derive(Default)]
pub struct MockTransport {
    responses: Mutex<VecDeque<Result<HttpResponse, TransportError>>>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl MockTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn push_json(&self, status: u16, body: Value) -> &Self {
        self.push(Ok(HttpResponse::new(status, body.to_string().into_bytes())))
    }

    pub fn push_status(&self, status: u16) -> &Self {
        self.push(Ok(HttpResponse::new(status, Vec::new())))
    }

    pub fn push_unreachable(&self) -> &Self {
        self.push(Err(TransportError::NoResponse("connection refused".into())))
    }

    pub fn push(&self, response: Result<HttpResponse, TransportError>) -> &Self {
        self.responses.lock().unwrap().push_back(response);
        self
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        self.requests.lock().unwrap().push(request);
        // 実際の通信と同様に一度スケジューラへ戻す
        tokio::task::yield_now().await;
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(TransportError::NoResponse("no mocked response".into())))
    }
}

/// 縮小なしのテスト用設定
pub fn test_config() -> ApiConfig {
    ApiConfig {
        base_url: BASE_URL.to_string(),
        max_image_dimension: None,
        ..Default::default()
    }
}

pub fn client_with(config: ApiConfig, transport: &Arc<MockTransport>) -> ApiClient {
    ApiClient::with_transport(config, transport.clone()).expect("クライアント作成失敗")
}

pub fn test_client(transport: &Arc<MockTransport>) -> ApiClient {
    client_with(test_config(), transport)
}

pub fn url(path: &str) -> String {
    format!("{}{}", BASE_URL, path)
}
