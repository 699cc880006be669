//! スコアカード描画
//!
//! パース済みレポートを端末向けのスコアカードに整形する。
//! 描画層では検証もパースもしない。

use profile_photo_common::AnalysisReport;

/// confidenceバーのセル数
const BAR_CELLS: usize = 10;

/// レポート全体をスコアカード文字列へ整形
pub fn render_report(report: &AnalysisReport) -> String {
    let mut out = String::new();

    for (i, criterion) in report.criteria.iter().enumerate() {
        out.push_str(&format!("{}. {}\n", i + 1, criterion.heading));
        out.push_str(&format!("   {}\n", criterion.description));
        out.push_str(&format!(
            "   {} {}%\n\n",
            confidence_bar(criterion.confidence),
            criterion.confidence
        ));
    }

    out.push_str("総評\n");
    out.push_str(&format!("   {}\n", report.final_review));
    out
}

/// 0〜100のconfidence値を10セルのバーへ変換（四捨五入）
pub fn confidence_bar(confidence: u8) -> String {
    let filled = (confidence as usize * BAR_CELLS + 50) / 100;
    format!("[{}{}]", "█".repeat(filled), "░".repeat(BAR_CELLS - filled))
}

pub fn print_report(report: &AnalysisReport) {
    print!("{}", render_report(report));
}
