//! 共有リンク・カカオトーク共有データ
//!
//! 共有リンクは `/api/share/generate/{imageId}` の拡張レスポンス
//! `{shareUrl, shareId?, expiresAt?}` に統一している。

use crate::client::{require_id, ApiClient, MISSING_IMAGE_MESSAGE};
use crate::endpoints::Endpoint;
use crate::error::{FairstayError, Result};
use crate::transport::RequestBody;
use fairstay_common::{ApiError, KakaoShareData, ShareLink};
use serde::Deserialize;
use tracing::info;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct KakaoPayload {
    kakao_share_data: KakaoShareData,
}

impl ApiClient {
    /// 共有リンクを発行
    pub async fn share_image(&self, image_id: &str) -> Result<ShareLink> {
        let image_id = require_id(image_id, MISSING_IMAGE_MESSAGE).map_err(FairstayError::Share)?;
        let endpoint = Endpoint::GenerateShareLink(image_id);

        let link: ShareLink = self
            .call(endpoint, RequestBody::Empty)
            .await
            .map_err(FairstayError::Share)?;

        if link.share_url.trim().is_empty() {
            return Err(FairstayError::Share(ApiError::server(None, endpoint.fallback_message())));
        }

        info!("share link for {}: {}", image_id, link.share_url);
        Ok(link)
    }

    /// カカオトーク共有用データを生成
    pub async fn get_kakao_share_data(&self, image_id: &str) -> Result<KakaoShareData> {
        let image_id = require_id(image_id, MISSING_IMAGE_MESSAGE).map_err(FairstayError::Share)?;

        let payload: KakaoPayload = self
            .call(Endpoint::KakaoShare(image_id), RequestBody::Empty)
            .await
            .map_err(FairstayError::Share)?;

        Ok(payload.kakao_share_data)
    }
}
