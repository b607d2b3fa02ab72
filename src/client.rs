//! APIクライアント
//!
//! ベースURL・操作ごとのタイムアウト・エンベロープ解釈をまとめる。
//! 各操作（セッション・アップロード・解析・共有…）は別モジュールで
//! `impl ApiClient` として定義している。

use crate::config::ApiConfig;
use crate::endpoints::Endpoint;
use crate::error::{FairstayError, Result};
use crate::transport::{HttpRequest, HttpResponse, ReqwestTransport, RequestBody, Transport, TransportError};
use fairstay_common::ApiError;
use reqwest::Url;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tracing::{debug, warn};

/// セッションIDが未取得のときのメッセージ
pub const MISSING_SESSION_MESSAGE: &str = "세션이 초기화되지 않았습니다.";

/// 画像IDが未取得のときのメッセージ
pub const MISSING_IMAGE_MESSAGE: &str = "이미지 ID가 없습니다.";

#[derive(Clone)]
pub struct ApiClient {
    config: ApiConfig,
    base_url: Url,
    transport: Arc<dyn Transport>,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url.as_str())
            .field("upload_strategy", &self.config.upload_strategy)
            .finish()
    }
}

impl ApiClient {
    /// reqwest トランスポートで作成
    pub fn new(config: ApiConfig) -> Result<Self> {
        Self::with_transport(config, Arc::new(ReqwestTransport::new()))
    }

    pub fn with_transport(config: ApiConfig, transport: Arc<dyn Transport>) -> Result<Self> {
        config.validate()?;

        let base_url = Url::parse(config.base_url.trim())
            .map_err(|e| FairstayError::Config(format!("baseUrl: {} ({})", config.base_url, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(FairstayError::Config(format!("baseUrl: {}", config.base_url)));
        }

        Ok(Self {
            config,
            base_url,
            transport,
        })
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    /// エンドポイントの絶対URL
    pub fn endpoint_url(&self, endpoint: &Endpoint<'_>) -> std::result::Result<String, ApiError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ApiError::application(format!("baseUrl: {}", self.base_url)))?
            .pop_if_empty()
            .extend(endpoint.segments());
        Ok(url.into())
    }

    /// エンドポイント用のリクエストを組み立てる
    pub(crate) fn request(
        &self,
        endpoint: &Endpoint<'_>,
        body: RequestBody,
    ) -> std::result::Result<HttpRequest, ApiError> {
        let url = self.endpoint_url(endpoint)?;
        let timeout = self.config.timeout(endpoint.budget());
        Ok(HttpRequest::new(endpoint.method(), url, timeout).with_body(body))
    }

    /// トランスポート呼び出し（失敗は分類済みエラーに変換）
    pub(crate) async fn send(&self, request: HttpRequest) -> std::result::Result<HttpResponse, ApiError> {
        debug!("{} {} (timeout {:?})", request.method, request.url, request.timeout);
        let method = request.method;
        let url = request.url.clone();

        self.transport.execute(request).await.map_err(|e| {
            warn!("{} {} failed: {}", method, url, e);
            classify_transport_error(e)
        })
    }

    /// エンドポイントを呼び、エンベロープを開いて型に変換
    pub(crate) async fn call<T: DeserializeOwned>(
        &self,
        endpoint: Endpoint<'_>,
        body: RequestBody,
    ) -> std::result::Result<T, ApiError> {
        let request = self.request(&endpoint, body)?;
        let response = self.send(request).await?;

        fairstay_common::decode(response.status, &response.body, endpoint.fallback_message())
            .inspect_err(|e| warn!("{} rejected: {}", endpoint.path(), e))
    }

    /// サーバー疎通確認
    ///
    /// `/health` が HTTP 200 を返せば true。失敗は常に false でエラーにしない。
    pub async fn check_connection(&self) -> bool {
        let request = match self.request(&Endpoint::Health, RequestBody::Empty) {
            Ok(request) => request,
            Err(_) => return false,
        };

        match self.transport.execute(request).await {
            Ok(response) => response.status == 200,
            Err(e) => {
                debug!("health check failed: {}", e);
                false
            }
        }
    }
}

/// トランスポートエラーの分類
pub fn classify_transport_error(error: TransportError) -> ApiError {
    match error {
        TransportError::NoResponse(_) => ApiError::NetworkUnreachable,
        TransportError::InvalidRequest(message) => ApiError::application(message),
    }
}

/// 必須IDのチェック（空白のみも未取得扱い）
pub(crate) fn require_id<'a>(value: &'a str, missing_message: &str) -> std::result::Result<&'a str, ApiError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(ApiError::application(missing_message))
    } else {
        Ok(trimmed)
    }
}
