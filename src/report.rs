//! 解析結果の参照

use crate::client::{require_id, ApiClient, MISSING_IMAGE_MESSAGE, MISSING_SESSION_MESSAGE};
use crate::endpoints::Endpoint;
use crate::error::{FairstayError, Result};
use crate::transport::RequestBody;
use fairstay_common::{ApiError, ImageDetail, SessionImages};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct ImagePayload {
    #[serde(default)]
    image: Option<ImageDetail>,
}

impl ApiClient {
    /// 画像詳細を取得
    pub async fn get_image_detail(&self, image_id: &str) -> Result<ImageDetail> {
        let image_id = require_id(image_id, MISSING_IMAGE_MESSAGE).map_err(FairstayError::NotFound)?;
        let endpoint = Endpoint::GetImage(image_id);

        let payload: ImagePayload = self
            .call(endpoint, RequestBody::Empty)
            .await
            .map_err(FairstayError::NotFound)?;

        payload.image.ok_or_else(|| {
            FairstayError::NotFound(ApiError::server(None, endpoint.fallback_message()))
        })
    }

    /// セッション内の画像一覧を取得（サーバーの並び順のまま）
    pub async fn get_session_images(&self, session_id: &str) -> Result<SessionImages> {
        let session_id = require_id(session_id, MISSING_SESSION_MESSAGE).map_err(FairstayError::NotFound)?;

        self.call(Endpoint::SessionImages(session_id), RequestBody::Empty)
            .await
            .map_err(FairstayError::NotFound)
    }
}
