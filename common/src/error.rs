//! エラー型定義
//!
//! APIクライアント境界で利用者に見せるエラー分類。
//! どの分類も空でないメッセージを持つ。

use thiserror::Error;

/// 応答が得られなかった場合の固定メッセージ
pub const NETWORK_UNREACHABLE_MESSAGE: &str =
    "서버에 연결할 수 없습니다. 네트워크 연결을 확인해주세요.";

/// 原因不明のローカルエラー
pub const UNKNOWN_ERROR_MESSAGE: &str = "알 수 없는 오류가 발생했습니다.";

/// 共通エラー型
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ApiError {
    /// リクエストは送ったが応答がない（接続失敗・タイムアウト）
    #[error("{}", NETWORK_UNREACHABLE_MESSAGE)]
    NetworkUnreachable,

    /// 応答あり: HTTPエラーまたは `success:false`
    #[error("{message}")]
    Server { status: Option<u16>, message: String },

    /// それ以外のローカルエラー
    #[error("{0}")]
    Application(String),
}

impl ApiError {
    pub fn server(status: Option<u16>, message: impl Into<String>) -> Self {
        ApiError::Server {
            status,
            message: non_empty(message.into()),
        }
    }

    pub fn application(message: impl Into<String>) -> Self {
        ApiError::Application(non_empty(message.into()))
    }

    /// HTTPステータス（サーバーエラーのみ）
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Server { status, .. } => *status,
            _ => None,
        }
    }

    pub fn is_network_unreachable(&self) -> bool {
        matches!(self, ApiError::NetworkUnreachable)
    }
}

fn non_empty(message: String) -> String {
    if message.trim().is_empty() {
        UNKNOWN_ERROR_MESSAGE.to_string()
    } else {
        message
    }
}

/// Result型エイリアス
pub type Result<T> = std::result::Result<T, ApiError>;
