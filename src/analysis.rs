//! AI損傷解析の依頼
//!
//! 1往復のみ。サーバーは解析完了（または失敗）まで応答を保留する前提で、
//! 解析用の長いタイムアウトを使う。`pending` / `processing` が返っても
//! そのまま呼び出し側に渡し、ここではポーリングしない。

use crate::client::{require_id, ApiClient, MISSING_IMAGE_MESSAGE};
use crate::endpoints::Endpoint;
use crate::error::{FairstayError, Result};
use crate::transport::RequestBody;
use fairstay_common::AnalysisResult;
use tracing::{info, warn};

impl ApiClient {
    pub async fn analyze_image(&self, image_id: &str) -> Result<AnalysisResult> {
        let image_id = require_id(image_id, MISSING_IMAGE_MESSAGE).map_err(FairstayError::Analysis)?;

        info!("analyzing image {}", image_id);
        let result: AnalysisResult = self
            .call(
                Endpoint::AnalyzeImage(image_id),
                RequestBody::Json(serde_json::json!({})),
            )
            .await
            .map_err(FairstayError::Analysis)?;

        if result.status.is_in_progress() {
            warn!("analysis for {} returned while still {}", image_id, result.status);
        } else {
            info!("analysis {} for {}: {} damage(s)", result.status, image_id, result.damages.len());
        }

        Ok(result)
    }
}
