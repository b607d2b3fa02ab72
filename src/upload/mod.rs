//! 画像アップロード
//!
//! 2つの方式を設定で切り替える:
//! - DirectMultipart: `/api/image/upload` にマルチパートで1往復
//! - PresignedThreePhase: URL発行 → ストレージへPUT → 完了確認
//!
//! どの段階で失敗しても全体を中断し、`FairstayError::Upload` に段階を載せて返す。

mod direct;
pub mod image_source;
mod presigned;

pub use image_source::{load_image, prepare_jpeg, resolve_local_path, upload_file_name, UPLOAD_CONTENT_TYPE};
pub use presigned::storage_upload_failed_message;

use crate::client::{require_id, ApiClient, MISSING_SESSION_MESSAGE};
use crate::endpoints::Endpoint;
use crate::error::{FairstayError, Result, UploadStage};
use fairstay_common::{ApiError, UploadedImage};
use serde::{Deserialize, Serialize};
use tracing::info;

/// アップロード方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum UploadStrategy {
    /// マルチパートPOST（1往復）
    DirectMultipart,
    /// Presigned URL + ストレージ直接PUT + 完了確認
    #[default]
    PresignedThreePhase,
}

impl UploadStrategy {
    /// 最初の通信段階
    pub fn first_stage(&self) -> UploadStage {
        match self {
            UploadStrategy::DirectMultipart => UploadStage::Direct,
            UploadStrategy::PresignedThreePhase => UploadStage::PresignedUrl,
        }
    }
}

impl std::fmt::Display for UploadStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UploadStrategy::DirectMultipart => write!(f, "direct-multipart"),
            UploadStrategy::PresignedThreePhase => write!(f, "presigned-three-phase"),
        }
    }
}

/// 画像IDのない成功レスポンスは失敗として扱う
pub(crate) fn require_image_id(
    stage: UploadStage,
    endpoint: Endpoint<'_>,
    uploaded: UploadedImage,
) -> Result<UploadedImage> {
    if uploaded.image_id.trim().is_empty() {
        return Err(FairstayError::upload(
            stage,
            ApiError::server(None, endpoint.fallback_message()),
        ));
    }
    Ok(uploaded)
}

impl ApiClient {
    /// 設定された方式で画像をアップロード
    pub async fn upload_image(&self, local_image_uri: &str, session_id: &str) -> Result<UploadedImage> {
        self.upload_image_with(self.config().upload_strategy, local_image_uri, session_id)
            .await
    }

    /// 方式を指定して画像をアップロード
    pub async fn upload_image_with(
        &self,
        strategy: UploadStrategy,
        local_image_uri: &str,
        session_id: &str,
    ) -> Result<UploadedImage> {
        let session_id = require_id(session_id, MISSING_SESSION_MESSAGE)
            .map_err(|e| FairstayError::upload(strategy.first_stage(), e))?;

        let config = self.config();
        let bytes = load_image(local_image_uri, config.max_image_dimension, config.jpeg_quality)
            .await
            .map_err(|e| FairstayError::upload(UploadStage::LoadImage, ApiError::application(e.to_string())))?;

        let file_name = upload_file_name(chrono::Utc::now().timestamp_millis());
        info!("upload via {} for session {}", strategy, session_id);

        match strategy {
            UploadStrategy::DirectMultipart => self.upload_direct(session_id, file_name, bytes).await,
            UploadStrategy::PresignedThreePhase => self.upload_presigned(session_id, file_name, bytes).await,
        }
    }
}
