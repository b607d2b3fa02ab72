use fairstay_common::ApiError;
use thiserror::Error;

/// 3段階アップロードのどこで失敗したか
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadStage {
    /// ローカル画像の読み込み
    LoadImage,
    /// Presigned URL 発行
    PresignedUrl,
    /// ストレージへの直接PUT
    StorageUpload,
    /// アップロード完了確認
    Confirm,
    /// マルチパート直接アップロード
    Direct,
}

impl std::fmt::Display for UploadStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UploadStage::LoadImage => write!(f, "load-image"),
            UploadStage::PresignedUrl => write!(f, "presigned-url"),
            UploadStage::StorageUpload => write!(f, "storage-upload"),
            UploadStage::Confirm => write!(f, "confirm"),
            UploadStage::Direct => write!(f, "direct"),
        }
    }
}

#[derive(Error, Debug)]
pub enum FairstayError {
    #[error("{0}")]
    SessionCreation(ApiError),

    #[error("{source}")]
    Upload {
        stage: UploadStage,
        #[source]
        source: ApiError,
    },

    #[error("{0}")]
    Analysis(ApiError),

    #[error("{0}")]
    NotFound(ApiError),

    #[error("{0}")]
    Share(ApiError),

    #[error("{0}")]
    Survey(ApiError),

    #[error("세션 저장소 오류: {0}")]
    SessionStore(String),

    #[error("설정 오류: {0}")]
    Config(String),

    #[error("이미지를 읽을 수 없습니다: {0}")]
    ImageLoad(String),

    #[error("JSON 오류: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IO 오류: {0}")]
    Io(#[from] std::io::Error),
}

impl FairstayError {
    pub fn upload(stage: UploadStage, source: ApiError) -> Self {
        FairstayError::Upload { stage, source }
    }

    /// API境界のエラー分類（ローカルエラーは None）
    pub fn api_error(&self) -> Option<&ApiError> {
        match self {
            FairstayError::SessionCreation(e)
            | FairstayError::Upload { source: e, .. }
            | FairstayError::Analysis(e)
            | FairstayError::NotFound(e)
            | FairstayError::Share(e)
            | FairstayError::Survey(e) => Some(e),
            _ => None,
        }
    }

    pub fn upload_stage(&self) -> Option<UploadStage> {
        match self {
            FairstayError::Upload { stage, .. } => Some(*stage),
            _ => None,
        }
    }

    pub fn is_network_unreachable(&self) -> bool {
        self.api_error().is_some_and(ApiError::is_network_unreachable)
    }
}

pub type Result<T> = std::result::Result<T, FairstayError>;
