//! 画像入力モジュール
//!
//! アップロード画像1枚を読み込み、形式を判定して
//! Gemini APIに渡すBase64ペイロードへ変換する。

use crate::error::{ProfileAiError, Result};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use image::ImageFormat;
use std::path::Path;

/// 対応画像形式の拡張子
const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "webp"];

/// アップロード画像1枚分のペイロード
#[derive(Debug, Clone)]
pub struct ImagePayload {
    pub file_name: String,
    pub mime_type: &'static str,
    /// Base64エンコード済みの画像バイト列
    pub data: String,
}

/// 画像ファイルを読み込んでペイロードを生成
///
/// 拡張子チェックの後、マジックバイトから実際の形式を判定する。
/// 寸法やサイズの検証はしない（モデル側の制限に委ねる）。
pub fn load_image(path: &Path) -> Result<ImagePayload> {
    if !path.exists() {
        return Err(ProfileAiError::FileNotFound(path.display().to_string()));
    }

    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default();
    if !IMAGE_EXTENSIONS.contains(&ext.as_str()) {
        return Err(ProfileAiError::UnsupportedImage(format!(
            "{} (対応形式: {})",
            path.display(),
            IMAGE_EXTENSIONS.join("/")
        )));
    }

    let bytes = std::fs::read(path)?;
    let format =
        image::guess_format(&bytes).map_err(|e| ProfileAiError::ImageLoad(e.to_string()))?;
    let mime_type = mime_type_for(format)
        .ok_or_else(|| ProfileAiError::UnsupportedImage(format!("{:?}", format)))?;

    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();

    Ok(ImagePayload {
        file_name,
        mime_type,
        data: BASE64.encode(&bytes),
    })
}

fn mime_type_for(format: ImageFormat) -> Option<&'static str> {
    match format {
        ImageFormat::Png => Some("image/png"),
        ImageFormat::Jpeg => Some("image/jpeg"),
        ImageFormat::WebP => Some("image/webp"),
        _ => None,
    }
}
