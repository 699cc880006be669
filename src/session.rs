//! 解析セッション管理
//!
//! 1回の解析呼び出し（プロンプト生成 → API呼び出し → パース）を
//! セッションコンテキストとして束ねる。進行中の多重起動は拒否し、
//! 構築中のレポートは常に1つだけ。

use crate::config::Config;
use crate::error::{ProfileAiError, Result};
use crate::gemini;
use crate::media;
use indicatif::ProgressBar;
use profile_photo_common::{
    build_analysis_prompt, parse_response, AnalysisReport, ConfidencePolicy, ResponseFormat,
    RubricVariant,
};
use serde::Serialize;
use std::path::Path;
use std::time::Duration;

/// 1セッション分の解析コンテキスト
///
/// 資格情報・ルーブリック・直近レポートをまとめて持ち、
/// セッション間で状態を共有しない。
pub struct AnalysisSession {
    config: Config,
    api_key: String,
    variant: RubricVariant,
    format: ResponseFormat,
    policy: ConfidencePolicy,
    analyzing: bool,
    last_report: Option<AnalysisReport>,
}

impl AnalysisSession {
    pub fn new(
        config: Config,
        api_key: String,
        variant: RubricVariant,
        format: ResponseFormat,
        policy: ConfidencePolicy,
    ) -> Self {
        Self {
            config,
            api_key,
            variant,
            format,
            policy,
            analyzing: false,
            last_report: None,
        }
    }

    pub fn model(&self) -> &str {
        &self.config.model
    }

    pub fn last_report(&self) -> Option<&AnalysisReport> {
        self.last_report.as_ref()
    }

    /// 写真1枚を解析してレポートを返す
    ///
    /// 進行中の解析があれば `AnalysisInProgress` を返す。
    /// エラーはこの呼び出し限りで、自動リトライはしない。
    pub async fn analyze(&mut self, image_path: &Path, verbose: bool) -> Result<AnalysisReport> {
        if self.analyzing {
            return Err(ProfileAiError::AnalysisInProgress);
        }
        self.analyzing = true;
        let result = self.run(image_path, verbose).await;
        self.analyzing = false;

        if let Ok(report) = &result {
            self.last_report = Some(report.clone());
        }
        result
    }

    async fn run(&self, image_path: &Path, verbose: bool) -> Result<AnalysisReport> {
        let image = media::load_image(image_path)?;
        let prompt = build_analysis_prompt(self.variant, self.format);

        if verbose {
            println!("  プロンプト長: {} chars", prompt.len());
        }

        // API呼び出し中だけスピナーを表示
        let spinner = ProgressBar::new_spinner();
        spinner.set_message("AI解析中...");
        spinner.enable_steady_tick(Duration::from_millis(100));

        let response = gemini::analyze_image(
            &self.api_key,
            &self.config.model,
            self.config.timeout_seconds,
            prompt,
            &image,
            self.format,
        )
        .await;

        spinner.finish_and_clear();
        let response = response?;

        if verbose {
            println!("  レスポンス長: {} chars", response.len());
        }

        let report = parse_response(&response, self.variant, self.format, self.policy)?;
        Ok(report)
    }
}

/// `--output` 指定時に保存するレポートファイル
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedReport {
    pub analyzed_at: String,
    pub model: String,
    pub image: String,
    pub report: AnalysisReport,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_session() -> AnalysisSession {
        AnalysisSession::new(
            Config {
                api_key: None,
                model: "gemini-2.0-flash-exp".into(),
                timeout_seconds: 1,
            },
            "AI-test-key".to_string(),
            RubricVariant::Standard,
            ResponseFormat::Text,
            ConfidencePolicy::Reject,
        )
    }

    #[tokio::test]
    async fn test_analyze_missing_file() {
        let mut session = test_session();
        let result = session.analyze(Path::new("/nonexistent/photo.png"), false).await;
        assert!(matches!(result, Err(ProfileAiError::FileNotFound(_))));
        assert!(session.last_report().is_none());
    }

    #[tokio::test]
    async fn test_busy_flag_reset_after_failure() {
        let mut session = test_session();

        let first = session.analyze(Path::new("/nonexistent/a.png"), false).await;
        assert!(first.is_err());

        // 失敗後は進行中フラグが戻っており、次の呼び出しは
        // AnalysisInProgress にならない
        let second = session.analyze(Path::new("/nonexistent/b.png"), false).await;
        assert!(matches!(second, Err(ProfileAiError::FileNotFound(_))));
    }

    #[test]
    fn test_saved_report_serialize() {
        let saved = SavedReport {
            analyzed_at: "2026-02-01 12:00:00".to_string(),
            model: "gemini-2.0-flash-exp".to_string(),
            image: "photo.jpg".to_string(),
            report: AnalysisReport {
                criteria: vec![],
                final_review: "ok".to_string(),
            },
        };

        let json = serde_json::to_string(&saved).expect("serialize failed");
        assert!(json.contains("\"analyzedAt\":\"2026-02-01 12:00:00\""));
        assert!(json.contains("\"model\":\"gemini-2.0-flash-exp\""));
        assert!(json.contains("\"finalReview\":\"ok\""));
    }
}
