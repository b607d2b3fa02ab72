//! 損傷レポートの集計
//!
//! 解析直後の `AnalysisResult` とサーバーから取得した `ImageDetail` を
//! 同じ形で扱うためのビュー。損傷が0件の場合は空の状態として返し、
//! 代わりのサンプルデータは作らない。

use crate::types::{AnalysisResult, AnalysisStatus, Damage, ImageDetail};
use serde::Serialize;
use std::collections::BTreeMap;

/// 信頼度が不明な場合の表示
pub const UNKNOWN_CONFIDENCE: &str = "알 수 없음";

/// レポート表示用のビュー
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InspectionReport {
    pub image_id: String,
    pub image_url: Option<String>,
    pub processed_image_url: Option<String>,
    pub status: AnalysisStatus,
    pub damages: Vec<Damage>,
}

/// 損傷の集計
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DamageSummary {
    pub total: usize,
    pub by_severity: BTreeMap<String, usize>,
    pub highest_confidence: Option<f64>,
}

impl InspectionReport {
    /// 解析結果から作成（元画像URLは解析レスポンスに含まれない）
    pub fn from_analysis(analysis: &AnalysisResult) -> Self {
        Self {
            image_id: analysis.image_id.clone(),
            image_url: None,
            processed_image_url: analysis.processed_image_url.clone(),
            status: analysis.status,
            damages: analysis.damages.clone(),
        }
    }

    /// サーバーの画像詳細から作成
    pub fn from_detail(detail: &ImageDetail) -> Self {
        Self {
            image_id: detail.id.clone(),
            image_url: Some(detail.image_url.clone()),
            processed_image_url: detail.processed_image_url.clone(),
            status: detail.damage_analysis.status,
            damages: detail.damage_analysis.damages.clone(),
        }
    }

    /// 元画像URLを補う（アップロード結果などから）
    pub fn with_image_url(mut self, image_url: impl Into<String>) -> Self {
        self.image_url = Some(image_url.into());
        self
    }

    /// 損傷なし
    pub fn is_empty(&self) -> bool {
        self.damages.is_empty()
    }

    pub fn summary(&self) -> DamageSummary {
        summarize(&self.damages)
    }
}

/// 損傷リストを重大度ごとに集計
pub fn summarize(damages: &[Damage]) -> DamageSummary {
    let mut by_severity = BTreeMap::new();
    for damage in damages {
        *by_severity.entry(damage.severity.clone()).or_insert(0) += 1;
    }

    let highest_confidence = damages
        .iter()
        .map(|d| d.confidence)
        .filter(|c| c.is_finite())
        .fold(None, |acc: Option<f64>, c| Some(acc.map_or(c, |a| a.max(c))));

    DamageSummary {
        total: damages.len(),
        by_severity,
        highest_confidence,
    }
}

/// 信頼度をパーセント表示に整形
///
/// 0以下・非数は「알 수 없음」。1を超える値は100%に丸める。
pub fn format_confidence(confidence: f64) -> String {
    if !confidence.is_finite() || confidence <= 0.0 {
        return UNKNOWN_CONFIDENCE.to_string();
    }
    format!("{:.0}%", confidence.min(1.0) * 100.0)
}
