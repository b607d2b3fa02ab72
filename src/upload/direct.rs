//! 方式A: マルチパートで画像とセッションIDを一度に送る

use super::image_source::UPLOAD_CONTENT_TYPE;
use super::require_image_id;
use crate::client::ApiClient;
use crate::endpoints::Endpoint;
use crate::error::{FairstayError, Result, UploadStage};
use crate::transport::{FilePart, RequestBody};
use fairstay_common::UploadedImage;
use tracing::info;

impl ApiClient {
    pub(crate) async fn upload_direct(
        &self,
        session_id: &str,
        file_name: String,
        bytes: Vec<u8>,
    ) -> Result<UploadedImage> {
        info!("uploading {} ({} bytes, multipart)", file_name, bytes.len());

        let body = RequestBody::Multipart {
            fields: vec![("sessionId".to_string(), session_id.to_string())],
            file: FilePart {
                field: "image".to_string(),
                file_name,
                content_type: UPLOAD_CONTENT_TYPE.to_string(),
                bytes,
            },
        };

        let endpoint = Endpoint::UploadImage;
        let uploaded: UploadedImage = self
            .call(endpoint, body)
            .await
            .map_err(|e| FairstayError::upload(UploadStage::Direct, e))?;

        require_image_id(UploadStage::Direct, endpoint, uploaded)
    }
}
