//! ローカル画像の読み込み
//!
//! パスまたは `file://` URI を受け取り、必要なら縮小してJPEGに再エンコードする。

use crate::error::{FairstayError, Result};
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::ImageFormat;
use reqwest::Url;
use std::path::PathBuf;

pub const UPLOAD_CONTENT_TYPE: &str = "image/jpeg";

/// アップロード時のファイル名（セッション内で衝突しないようミリ秒を使う）
pub fn upload_file_name(timestamp_millis: i64) -> String {
    format!("photo_{}.jpg", timestamp_millis)
}

/// URI をローカルパスに変換
///
/// `file://` はパーセントエンコードを解いてパスにする。それ以外のスキームは扱わない。
pub fn resolve_local_path(uri: &str) -> Result<PathBuf> {
    let uri = uri.trim();
    if uri.is_empty() {
        return Err(FairstayError::ImageLoad("경로가 비어 있습니다".into()));
    }

    if uri.starts_with("file:") {
        let url = Url::parse(uri)
            .map_err(|e| FairstayError::ImageLoad(format!("{}: {}", uri, e)))?;
        return url
            .to_file_path()
            .map_err(|_| FairstayError::ImageLoad(format!("로컬 파일 URI 가 아닙니다: {}", uri)));
    }

    if let Some((scheme, _)) = uri.split_once("://") {
        return Err(FairstayError::ImageLoad(format!(
            "지원하지 않는 URI 형식입니다: {}://",
            scheme
        )));
    }

    Ok(PathBuf::from(uri))
}

/// 画像を読み込み、送信用バイト列を返す
///
/// # Arguments
/// * `uri` - ローカルパスまたは `file://` URI
/// * `max_dimension` - 縮小上限。None なら読み込んだバイト列をそのまま返す
/// * `jpeg_quality` - 再エンコード時の品質
pub async fn load_image(uri: &str, max_dimension: Option<u32>, jpeg_quality: u8) -> Result<Vec<u8>> {
    let path = resolve_local_path(uri)?;

    let bytes = tokio::fs::read(&path)
        .await
        .map_err(|e| FairstayError::ImageLoad(format!("{}: {}", path.display(), e)))?;

    if bytes.is_empty() {
        return Err(FairstayError::ImageLoad(format!("{}: 빈 파일입니다", path.display())));
    }

    match max_dimension {
        None => Ok(bytes),
        Some(max) => tokio::task::spawn_blocking(move || prepare_jpeg(bytes, max, jpeg_quality))
            .await
            .map_err(|e| FairstayError::ImageLoad(e.to_string()))?,
    }
}

/// 上限内のJPEGはそのまま、それ以外は縮小してJPEGに変換
pub fn prepare_jpeg(bytes: Vec<u8>, max_dimension: u32, jpeg_quality: u8) -> Result<Vec<u8>> {
    let format = image::guess_format(&bytes)
        .map_err(|e| FairstayError::ImageLoad(format!("형식을 알 수 없습니다: {}", e)))?;
    let img = image::load_from_memory_with_format(&bytes, format)
        .map_err(|e| FairstayError::ImageLoad(e.to_string()))?;

    let fits = img.width() <= max_dimension && img.height() <= max_dimension;
    if fits && format == ImageFormat::Jpeg {
        return Ok(bytes);
    }

    let img = if fits {
        img
    } else {
        // アスペクト比を保って上限内に収める
        img.resize(max_dimension, max_dimension, FilterType::Triangle)
    };

    // JPEGはアルファを持てない
    let rgb = img.to_rgb8();
    let mut out = Vec::new();
    JpegEncoder::new_with_quality(&mut out, jpeg_quality)
        .encode_image(&rgb)
        .map_err(|e| FairstayError::ImageLoad(format!("JPEG 변환 실패: {}", e)))?;

    Ok(out)
}
