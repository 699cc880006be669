use crate::error::{ProfileAiError, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Gemini APIキーの想定プレフィクス
const API_KEY_PREFIX: &str = "AI";

/// Gemini APIキーの想定長
const API_KEY_LEN: usize = 39;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    pub api_key: Option<String>,
    pub model: String,
    pub timeout_seconds: u64,
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: Config = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Self::default_config())
        }
    }

    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(&config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| ProfileAiError::Config("ホームディレクトリが見つかりません".into()))?;
        Ok(home.join(".config").join("profile-photo-ai").join("config.json"))
    }

    fn default_config() -> Self {
        Self {
            api_key: None,
            model: "gemini-2.0-flash-exp".into(),
            timeout_seconds: 120,
        }
    }

    pub fn get_api_key(&self) -> Result<String> {
        // 環境変数を優先
        if let Ok(key) = std::env::var("GEMINI_API_KEY") {
            if !key.trim().is_empty() {
                return Ok(key);
            }
        }

        self.api_key.clone().ok_or(ProfileAiError::MissingApiKey)
    }

    pub fn set_api_key(&mut self, key: String) -> Result<()> {
        self.api_key = Some(key);
        self.save()
    }

    pub fn set_model(&mut self, model: String) -> Result<()> {
        self.model = model;
        self.save()
    }
}

/// APIキーの簡易形式チェック
///
/// "AI" で始まる39文字であること。入力ミス検出用の事前チェックであり、
/// 実際の認証はAPI呼び出し時に行われる。
pub fn validate_key_shape(key: &str) -> Result<()> {
    let key = key.trim();
    if key.is_empty() {
        return Err(ProfileAiError::MissingApiKey);
    }
    if !key.starts_with(API_KEY_PREFIX) || key.len() != API_KEY_LEN {
        return Err(ProfileAiError::InvalidApiKey(format!(
            "\"{}\"で始まる{}文字のキーを指定してください（入力は{}文字）",
            API_KEY_PREFIX,
            API_KEY_LEN,
            key.len()
        )));
    }
    Ok(())
}
