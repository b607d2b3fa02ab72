//! FairStay Common Library
//!
//! APIクライアントとCLIで共有される型・エラー分類・レスポンス解釈。
//! ネットワークやファイルには触れない。

pub mod types;
pub mod error;
pub mod envelope;
pub mod report;

pub use types::{
    AnalysisResult, AnalysisStatus, BoundingBox, Damage, DamageAnalysis, ImageDetail,
    KakaoShareData, PresignedUpload, Session, SessionImages, ShareLink, SurveyRatings,
    SurveyReceipt, SurveySubmission, UploadedImage, UserType, millis_to_utc,
};
pub use error::{ApiError, Result, NETWORK_UNREACHABLE_MESSAGE, UNKNOWN_ERROR_MESSAGE};
pub use envelope::{decode, is_success_status, open_envelope, server_message};
pub use report::{format_confidence, summarize, DamageSummary, InspectionReport};
