//! 点検フロー
//!
//! セッション確保 → 画像アップロード → AI解析 を1回の操作として実行する。
//! 同じセッション・画像に対して並行に呼ばないこと（内部で重複排除はしない）。

use crate::client::ApiClient;
use crate::error::Result;
use crate::session::SessionManager;
use fairstay_common::{AnalysisResult, InspectionReport, Session, UploadedImage, UserType};
use tracing::info;

/// 1回の点検結果
#[derive(Debug, Clone)]
pub struct Inspection {
    pub session: Session,
    pub upload: UploadedImage,
    pub analysis: AnalysisResult,
}

impl Inspection {
    pub fn report(&self) -> InspectionReport {
        InspectionReport::from_analysis(&self.analysis).with_image_url(self.upload.image_url.clone())
    }
}

pub struct Inspector {
    sessions: SessionManager,
}

impl Inspector {
    pub fn new(sessions: SessionManager) -> Self {
        Self { sessions }
    }

    pub fn client(&self) -> &ApiClient {
        self.sessions.client()
    }

    pub fn sessions(&self) -> &SessionManager {
        &self.sessions
    }

    /// 画像1枚を点検
    pub async fn inspect(&self, local_image_uri: &str, user_type: Option<UserType>) -> Result<Inspection> {
        info!("[1/3] session");
        let session = self.sessions.ensure_session(user_type).await?;

        info!("[2/3] upload");
        let upload = self
            .client()
            .upload_image(local_image_uri, &session.session_id)
            .await?;

        info!("[3/3] analyze");
        let analysis = self.client().analyze_image(&upload.image_id).await?;

        Ok(Inspection {
            session,
            upload,
            analysis,
        })
    }

    /// レポートを用意
    ///
    /// 手元に解析結果があればそれを使い、なければサーバーから取得する。
    pub async fn report_for(
        &self,
        image_id: &str,
        analysis: Option<&AnalysisResult>,
    ) -> Result<InspectionReport> {
        match analysis {
            Some(analysis) => Ok(InspectionReport::from_analysis(analysis)),
            None => {
                let detail = self.client().get_image_detail(image_id).await?;
                Ok(InspectionReport::from_detail(&detail))
            }
        }
    }
}
