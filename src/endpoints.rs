//! APIエンドポイント定義
//!
//! パス・メソッド・タイムアウト枠・失敗時のフォールバック文言を
//! 操作ごとに一箇所で管理する。

use crate::config::TimeoutBudget;
use crate::transport::HttpMethod;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint<'a> {
    CreateSession,
    PresignedUrl,
    UploadImage,
    ConfirmUpload,
    AnalyzeImage(&'a str),
    GetImage(&'a str),
    SessionImages(&'a str),
    GenerateShareLink(&'a str),
    KakaoShare(&'a str),
    SubmitSurvey,
    Health,
}

impl<'a> Endpoint<'a> {
    /// パスセグメント（IDはURL組み立て時にエンコードされる）
    pub fn segments(&self) -> Vec<&'a str> {
        match *self {
            Endpoint::CreateSession => vec!["api", "session", "create"],
            Endpoint::PresignedUrl => vec!["api", "image", "presigned-url"],
            Endpoint::UploadImage => vec!["api", "image", "upload"],
            Endpoint::ConfirmUpload => vec!["api", "image", "confirm"],
            Endpoint::AnalyzeImage(id) => vec!["api", "image", "analyze", id],
            Endpoint::GetImage(id) => vec!["api", "image", id],
            Endpoint::SessionImages(id) => vec!["api", "image", "session", id],
            Endpoint::GenerateShareLink(id) => vec!["api", "share", "generate", id],
            Endpoint::KakaoShare(id) => vec!["api", "share", "kakao-share", id],
            Endpoint::SubmitSurvey => vec!["api", "survey", "submit"],
            Endpoint::Health => vec!["health"],
        }
    }

    /// ログ表示用のパス
    pub fn path(&self) -> String {
        format!("/{}", self.segments().join("/"))
    }

    pub fn method(&self) -> HttpMethod {
        match self {
            Endpoint::GetImage(_) | Endpoint::SessionImages(_) | Endpoint::Health => HttpMethod::Get,
            _ => HttpMethod::Post,
        }
    }

    pub fn budget(&self) -> TimeoutBudget {
        match self {
            Endpoint::UploadImage | Endpoint::ConfirmUpload => TimeoutBudget::Upload,
            Endpoint::AnalyzeImage(_) => TimeoutBudget::Analysis,
            Endpoint::Health => TimeoutBudget::Health,
            _ => TimeoutBudget::Default,
        }
    }

    /// `success:false` でメッセージがない場合の文言
    pub fn fallback_message(&self) -> &'static str {
        match self {
            Endpoint::CreateSession => "Failed to create session",
            Endpoint::PresignedUrl => "Failed to get presigned URL",
            Endpoint::UploadImage => "Failed to upload image",
            Endpoint::ConfirmUpload => "Failed to confirm image upload",
            Endpoint::AnalyzeImage(_) => "Failed to analyze image",
            Endpoint::GetImage(_) => "Failed to get image detail",
            Endpoint::SessionImages(_) => "Failed to get session images",
            Endpoint::GenerateShareLink(_) => "Failed to create share link",
            Endpoint::KakaoShare(_) => "Failed to get kakao share data",
            Endpoint::SubmitSurvey => "Failed to submit survey",
            Endpoint::Health => "Health check failed",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths() {
        assert_eq!(Endpoint::CreateSession.path(), "/api/session/create");
        assert_eq!(Endpoint::AnalyzeImage("img-1").path(), "/api/image/analyze/img-1");
        assert_eq!(Endpoint::GetImage("img-1").path(), "/api/image/img-1");
        assert_eq!(Endpoint::SessionImages("s-1").path(), "/api/image/session/s-1");
        assert_eq!(Endpoint::GenerateShareLink("img-1").path(), "/api/share/generate/img-1");
        assert_eq!(Endpoint::KakaoShare("img-1").path(), "/api/share/kakao-share/img-1");
        assert_eq!(Endpoint::Health.path(), "/health");
    }

    #[test]
    fn test_budgets() {
        assert_eq!(Endpoint::AnalyzeImage("x").budget(), TimeoutBudget::Analysis);
        assert_eq!(Endpoint::ConfirmUpload.budget(), TimeoutBudget::Upload);
        assert_eq!(Endpoint::UploadImage.budget(), TimeoutBudget::Upload);
        assert_eq!(Endpoint::PresignedUrl.budget(), TimeoutBudget::Default);
        assert_eq!(Endpoint::Health.budget(), TimeoutBudget::Health);
    }

    #[test]
    fn test_methods() {
        assert_eq!(Endpoint::GetImage("x").method(), HttpMethod::Get);
        assert_eq!(Endpoint::GenerateShareLink("x").method(), HttpMethod::Post);
        assert_eq!(Endpoint::Health.method(), HttpMethod::Get);
    }
}
