//! 解析結果の型定義
//!
//! CLIとテストで共有される型:
//! - AnalysisCriterion: 評価基準1件の判定結果
//! - AnalysisReport: パース済みレポート全体

use crate::rubric::FINAL_REVIEW_HEADING;
use serde::{Deserialize, Serialize};

/// 評価基準1件の判定結果
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisCriterion {
    /// スコアカードの見出し
    pub heading: String,

    /// モデルの自由記述による評価
    pub description: String,

    /// モデル自己申告の確信度 (0〜100)
    pub confidence: u8,
}

/// パース済みレポート全体
///
/// パーサーが成功を返した時点で criteria の本数はルーブリックの
/// 基準数Nと一致している。構築後は不変。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisReport {
    /// ルーブリック宣言順の評価結果
    pub criteria: Vec<AnalysisCriterion>,

    /// 最終講評（confidenceなし）
    pub final_review: String,
}

impl AnalysisReport {
    /// テキストエンコーディングへの正準シリアライズ
    ///
    /// この出力を `parse_text_response` に掛けると同一のレポートが
    /// 復元される。
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        for criterion in &self.criteria {
            out.push_str(&format!(
                "**{}**\n{} (confidence: {}%)\n\n",
                criterion.heading, criterion.description, criterion.confidence
            ));
        }
        out.push_str(&format!(
            "**{}**\n{}\n",
            FINAL_REVIEW_HEADING, self.final_review
        ));
        out
    }
}
