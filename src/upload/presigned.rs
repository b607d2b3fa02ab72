//! 方式B: Presigned URL による3段階アップロード
//!
//! 1. Presigned URL を発行
//! 2. ストレージへ直接PUT（APIのベースURLは使わない）
//! 3. アップロード完了をAPIに通知して画像IDを得る
//!
//! 3で失敗した場合、2で置いたオブジェクトは残る（ロールバックしない）。

use super::image_source::UPLOAD_CONTENT_TYPE;
use super::require_image_id;
use crate::client::ApiClient;
use crate::config::TimeoutBudget;
use crate::endpoints::Endpoint;
use crate::error::{FairstayError, Result, UploadStage};
use crate::transport::{HttpMethod, HttpRequest, RequestBody};
use fairstay_common::{ApiError, PresignedUpload, UploadedImage};
use serde::Serialize;
use tracing::{info, warn};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PresignedUrlRequest<'a> {
    session_id: &'a str,
    filename: &'a str,
    content_type: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ConfirmUploadRequest<'a> {
    session_id: &'a str,
    s3_key: &'a str,
    image_url: &'a str,
}

/// ストレージへのPUTが失敗したときの文言
pub fn storage_upload_failed_message(status: u16) -> String {
    format!("Failed to upload image to storage (HTTP {})", status)
}

impl ApiClient {
    pub(crate) async fn upload_presigned(
        &self,
        session_id: &str,
        file_name: String,
        bytes: Vec<u8>,
    ) -> Result<UploadedImage> {
        let ticket = self.request_presigned_url(session_id, &file_name).await?;
        info!("[1/3] presigned URL issued: {}", ticket.s3_key);

        self.put_to_storage(&ticket.upload_url, bytes).await?;
        info!("[2/3] stored {}", ticket.s3_key);

        let uploaded = self
            .confirm_upload(session_id, &ticket)
            .await
            .inspect_err(|e| {
                warn!("confirm failed, storage object {} left orphaned: {}", ticket.s3_key, e);
            })?;
        info!("[3/3] confirmed as image {}", uploaded.image_id);

        Ok(uploaded)
    }

    async fn request_presigned_url(&self, session_id: &str, file_name: &str) -> Result<PresignedUpload> {
        let endpoint = Endpoint::PresignedUrl;
        let body = serde_json::to_value(PresignedUrlRequest {
            session_id,
            filename: file_name,
            content_type: UPLOAD_CONTENT_TYPE,
        })?;

        let ticket: PresignedUpload = self
            .call(endpoint, RequestBody::Json(body))
            .await
            .map_err(|e| FairstayError::upload(UploadStage::PresignedUrl, e))?;

        if ticket.upload_url.trim().is_empty() || ticket.s3_key.trim().is_empty() {
            return Err(FairstayError::upload(
                UploadStage::PresignedUrl,
                ApiError::server(None, endpoint.fallback_message()),
            ));
        }

        Ok(ticket)
    }

    /// Presigned URL へそのままPUTする
    async fn put_to_storage(&self, upload_url: &str, bytes: Vec<u8>) -> Result<()> {
        let request = HttpRequest::new(
            HttpMethod::Put,
            upload_url,
            self.config().timeout(TimeoutBudget::Upload),
        )
        .with_body(RequestBody::Binary {
            content_type: UPLOAD_CONTENT_TYPE.to_string(),
            bytes,
        });

        let response = self
            .send(request)
            .await
            .map_err(|e| FairstayError::upload(UploadStage::StorageUpload, e))?;

        if !response.is_success() {
            return Err(FairstayError::upload(
                UploadStage::StorageUpload,
                ApiError::server(Some(response.status), storage_upload_failed_message(response.status)),
            ));
        }

        Ok(())
    }

    async fn confirm_upload(&self, session_id: &str, ticket: &PresignedUpload) -> Result<UploadedImage> {
        let body = serde_json::to_value(ConfirmUploadRequest {
            session_id,
            s3_key: &ticket.s3_key,
            image_url: &ticket.image_url,
        })?;

        let endpoint = Endpoint::ConfirmUpload;
        let uploaded: UploadedImage = self
            .call(endpoint, RequestBody::Json(body))
            .await
            .map_err(|e| FairstayError::upload(UploadStage::Confirm, e))?;

        require_image_id(UploadStage::Confirm, endpoint, uploaded)
    }
}
