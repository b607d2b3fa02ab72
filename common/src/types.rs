//! APIの型定義
//!
//! CLIと組み込み利用側で共有される型:
//! - Session: サーバー発行のセッション
//! - UploadedImage / PresignedUpload: アップロード結果
//! - AnalysisResult / Damage: AI損傷解析の出力
//! - ImageDetail: サーバー側で集約された画像情報
//! - ShareLink / KakaoShareData: 共有
//! - SurveySubmission / SurveyReceipt: アンケート

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// エポックミリ秒をUTC日時に変換（範囲外は None）
pub fn millis_to_utc(millis: i64) -> Option<DateTime<Utc>> {
    DateTime::<Utc>::from_timestamp_millis(millis)
}

/// 利用者区分
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserType {
    Tenant,
    Landlord,
}

impl UserType {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserType::Tenant => "tenant",
            UserType::Landlord => "landlord",
        }
    }
}

impl std::str::FromStr for UserType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "tenant" => Ok(UserType::Tenant),
            "landlord" => Ok(UserType::Landlord),
            _ => Err(format!("Unknown user type: {}. Use tenant or landlord", s)),
        }
    }
}

/// セッション
///
/// タイムスタンプはすべてエポックミリ秒。有効期限は参考値で、
/// クライアント側では期限切れを強制しない。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub session_id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_type: Option<UserType>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<i64>,
}

impl Session {
    /// キャッシュから復元したセッション（IDのみ）
    pub fn cached(session_id: impl Into<String>) -> Self {
        Self {
            session_id: session_id.into(),
            user_type: None,
            created_at: None,
            expires_at: None,
        }
    }

    /// 有効期限（UTC）
    pub fn expires_at_utc(&self) -> Option<DateTime<Utc>> {
        self.expires_at.and_then(millis_to_utc)
    }

    /// `now_millis` 時点で期限切れか（期限不明なら false）
    pub fn is_expired_at(&self, now_millis: i64) -> bool {
        self.expires_at.is_some_and(|exp| exp <= now_millis)
    }
}

/// アップロード完了結果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadedImage {
    pub image_id: String,
    pub image_url: String,
    #[serde(default)]
    pub message: String,
}

/// Presigned URL 発行結果（3段階アップロードの内部用）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PresignedUpload {
    pub upload_url: String,
    pub s3_key: String,
    pub image_url: String,
    #[serde(default)]
    pub expires_in: u64,
}

/// 損傷の位置（画像座標）
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// 検出された損傷1件
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Damage {
    #[serde(rename = "type")]
    pub damage_type: String,
    pub severity: String,
    pub location: String,

    /// 信頼度 (0.0-1.0)
    #[serde(default)]
    pub confidence: f64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bounding_box: Option<BoundingBox>,
}

/// 解析ステータス（サーバーが進める。クライアントは変更しない）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalysisStatus {
    Pending,
    Processing,
    Completed,
    Failed,
    /// 未知の値（新しいサーバーが追加したもの）
    #[serde(other)]
    Unknown,
}

impl AnalysisStatus {
    /// サーバー側でまだ処理中か
    pub fn is_in_progress(&self) -> bool {
        matches!(self, AnalysisStatus::Pending | AnalysisStatus::Processing)
    }
}

impl std::fmt::Display for AnalysisStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AnalysisStatus::Pending => write!(f, "pending"),
            AnalysisStatus::Processing => write!(f, "processing"),
            AnalysisStatus::Completed => write!(f, "completed"),
            AnalysisStatus::Failed => write!(f, "failed"),
            AnalysisStatus::Unknown => write!(f, "unknown"),
        }
    }
}

/// AI解析結果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub image_id: String,
    pub status: AnalysisStatus,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub processed_image_url: Option<String>,

    #[serde(default)]
    pub damages: Vec<Damage>,
}

/// 画像詳細の解析部分
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DamageAnalysis {
    pub status: AnalysisStatus,

    #[serde(default)]
    pub damages: Vec<Damage>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub processed_at: Option<i64>,
}

/// 画像詳細（サーバーが正）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageDetail {
    pub id: String,
    pub session_id: String,
    pub image_url: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub processed_image_url: Option<String>,

    pub damage_analysis: DamageAnalysis,
    pub created_at: i64,
}

/// セッション内の画像一覧
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionImages {
    pub count: usize,
    #[serde(default)]
    pub images: Vec<ImageDetail>,
}

/// 共有リンク（`/api/share/generate/{imageId}` の拡張レスポンス）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShareLink {
    pub share_url: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub share_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<i64>,
}

/// カカオトーク共有用データ
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KakaoShareData {
    pub title: String,
    pub description: String,
    pub image_url: String,
    pub share_url: String,
}

/// アンケート送信内容
///
/// 回答は質問キー → JSON値のマップ。フラットな評価フォームは
/// `SurveyRatings` から組み立てる。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SurveySubmission {
    pub session_id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_id: Option<String>,

    pub responses: BTreeMap<String, serde_json::Value>,
}

/// 評価フォームの回答
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SurveyRatings {
    pub has_real_estate_experience: bool,
    /// 説明のわかりやすさ (1-5)
    pub explanation: u8,
    /// 手続きの便利さ (1-5)
    pub process_convenience: u8,
    /// 総合満足度 (1-5)
    pub overall_satisfaction: u8,
    pub additional_comments: Option<String>,
}

pub const RATING_MIN: u8 = 1;
pub const RATING_MAX: u8 = 5;

impl SurveySubmission {
    /// 評価フォームから送信内容を組み立てる
    ///
    /// 評価値が1-5の範囲外なら `Err(質問キー)` を返す。
    pub fn from_ratings(
        session_id: impl Into<String>,
        image_id: Option<String>,
        ratings: &SurveyRatings,
    ) -> Result<Self, String> {
        let mut responses = BTreeMap::new();
        responses.insert(
            "hasRealEstateExperience".to_string(),
            serde_json::Value::Bool(ratings.has_real_estate_experience),
        );

        for (key, value) in [
            ("explanationRating", ratings.explanation),
            ("processConvenienceRating", ratings.process_convenience),
            ("overallSatisfactionRating", ratings.overall_satisfaction),
        ] {
            if !(RATING_MIN..=RATING_MAX).contains(&value) {
                return Err(key.to_string());
            }
            responses.insert(key.to_string(), serde_json::Value::from(value));
        }

        if let Some(comment) = ratings
            .additional_comments
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
        {
            responses.insert(
                "additionalComments".to_string(),
                serde_json::Value::String(comment.to_string()),
            );
        }

        Ok(Self {
            session_id: session_id.into(),
            image_id,
            responses,
        })
    }
}

/// アンケート送信結果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SurveyReceipt {
    pub success: bool,
    #[serde(default)]
    pub message: String,
}
