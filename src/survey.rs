use crate::client::{require_id, ApiClient, MISSING_SESSION_MESSAGE};
use crate::endpoints::Endpoint;
use crate::error::{FairstayError, Result};
use crate::transport::RequestBody;
use fairstay_common::{ApiError, SurveyRatings, SurveyReceipt, SurveySubmission};
use tracing::info;

/// 評価値が範囲外のときのメッセージ
fn invalid_rating_message(key: &str) -> String {
    format!(
        "{} 은(는) {}~{} 사이로 입력해주세요.",
        key,
        fairstay_common::types::RATING_MIN,
        fairstay_common::types::RATING_MAX
    )
}

/// 評価フォームから送信内容を作る（範囲外の評価はここで弾く）
pub fn build_survey(
    session_id: &str,
    image_id: Option<String>,
    ratings: &SurveyRatings,
) -> Result<SurveySubmission> {
    let session_id = require_id(session_id, MISSING_SESSION_MESSAGE).map_err(FairstayError::Survey)?;
    let image_id = image_id.filter(|id| !id.trim().is_empty());

    SurveySubmission::from_ratings(session_id, image_id, ratings)
        .map_err(|key| FairstayError::Survey(ApiError::application(invalid_rating_message(&key))))
}

impl ApiClient {
    pub async fn submit_survey(&self, survey: &SurveySubmission) -> Result<SurveyReceipt> {
        require_id(&survey.session_id, MISSING_SESSION_MESSAGE).map_err(FairstayError::Survey)?;
        if survey.responses.is_empty() {
            return Err(FairstayError::Survey(ApiError::application("설문 응답이 비어 있습니다.")));
        }

        let body = serde_json::to_value(survey)?;
        let receipt: SurveyReceipt = self
            .call(Endpoint::SubmitSurvey, RequestBody::Json(body))
            .await
            .map_err(FairstayError::Survey)?;

        info!("survey submitted for session {}", survey.session_id);
        Ok(receipt)
    }
}
