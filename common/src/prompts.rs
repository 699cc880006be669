//! プロンプト生成モジュール
//!
//! CLIとテストで共有されるプロンプト生成ロジック:
//! - build_analysis_prompt: ロール + ルーブリック + 出力形式契約を結合

use crate::rubric::{Dimension, ResponseFormat, RubricVariant, FINAL_REVIEW_HEADING};

/// モデルに与えるロール指示
const ROLE: &str = "You are a highly skilled AI trained to review LinkedIn profile photos \
and provide feedback on their quality. You are a professional and your feedback should be \
constructive and helpful.";

/// 解析プロンプト生成
///
/// 静的テキストとルーブリック・出力形式の2引数のみから決まる純関数。
/// 画像内容による分岐はしない。
///
/// # Arguments
/// * `variant` - ルーブリック（5基準/6基準）
/// * `format` - モデルに要求する出力形式
///
/// # Returns
/// 解析用のプロンプト文字列（画像は呼び出し側がリクエストに添付）
pub fn build_analysis_prompt(variant: RubricVariant, format: ResponseFormat) -> String {
    let instructions = build_instructions(variant.dimensions());
    let contract = match format {
        ResponseFormat::Json => build_json_contract(variant.dimensions()),
        ResponseFormat::Text => build_text_contract(variant.dimensions()),
    };

    format!("{ROLE}\n\n{instructions}\n\n{contract}")
}

fn build_instructions(dimensions: &[Dimension]) -> String {
    let criteria = dimensions
        .iter()
        .enumerate()
        .map(|(i, d)| format!("{}. {}:\n\n{}", i + 1, d.name, d.guidance))
        .collect::<Vec<_>>()
        .join("\n\n");

    format!(
        r#"You are provided with an image file depicting a LinkedIn profile photo.

Your job is to provide a structured report analyzing the image based on the following criteria:

{criteria}"#
    )
}

fn build_text_contract(dimensions: &[Dimension]) -> String {
    let template = dimensions
        .iter()
        .enumerate()
        .map(|(i, d)| {
            format!(
                "**{}. {}**\nYour assessment of this criterion. (confidence: {}%)",
                i + 1,
                d.name,
                90 - i * 10
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n");

    format!(
        r#"Your report should be structured exactly as follows:

{template}

**{FINAL_REVIEW_HEADING}**
A short closing paragraph stating whether the photo works as a LinkedIn profile picture.

Keep each criterion heading in bold and in the order given above. After each assessment,
append the confidence marker "(confidence: NN%)" where NN is an integer between 0 and 100.
Do not append a confidence marker to the {FINAL_REVIEW_HEADING} section."#
    )
}

fn build_json_contract(dimensions: &[Dimension]) -> String {
    let mut keys = Vec::new();
    for dimension in dimensions {
        keys.push(format!(
            "  \"{}\": \"your assessment of this criterion\",",
            dimension.json_key()
        ));
        keys.push(format!("  \"{}\": 90,", dimension.confidence_key()));
    }
    let keys = keys.join("\n");

    format!(
        r#"Respond with a single JSON object and nothing else, using exactly these keys:

{{
{keys}
  "final_review": "a short closing paragraph stating whether the photo works as a LinkedIn profile picture"
}}

Every confidence value must be an integer between 0 and 100.
Do not wrap the JSON in code fences and do not add any other text."#
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    // =============================================
    // build_analysis_prompt テスト
    // =============================================

    #[test]
    fn test_prompt_contains_role() {
        let prompt = build_analysis_prompt(RubricVariant::Standard, ResponseFormat::Text);
        assert!(prompt.contains("LinkedIn profile photos"));
    }

    #[test]
    fn test_prompt_lists_all_standard_criteria() {
        let prompt = build_analysis_prompt(RubricVariant::Standard, ResponseFormat::Text);

        assert!(prompt.contains("1. Resolution and Clarity:"));
        assert!(prompt.contains("2. Professional Appearance:"));
        assert!(prompt.contains("3. Face Visibility:"));
        assert!(prompt.contains("4. Appropriate Expression:"));
        assert!(prompt.contains("5. Filters and Distortions:"));
        assert!(!prompt.contains("Single Person and No Pets:"));
    }

    #[test]
    fn test_prompt_extended_adds_sixth_criterion() {
        let prompt = build_analysis_prompt(RubricVariant::Extended, ResponseFormat::Text);
        assert!(prompt.contains("6. Single Person and No Pets:"));
    }

    #[test]
    fn test_prompt_contains_guidance_exemplars() {
        let prompt = build_analysis_prompt(RubricVariant::Standard, ResponseFormat::Text);
        assert!(prompt.contains("The image is high-resolution and clear"));
        assert!(prompt.contains("blurry or pixelated"));
    }

    #[test]
    fn test_text_contract_shows_marker_template() {
        let prompt = build_analysis_prompt(RubricVariant::Standard, ResponseFormat::Text);
        assert!(prompt.contains("**1. Resolution and Clarity**"));
        assert!(prompt.contains("(confidence: 90%)"));
        assert!(prompt.contains("**Final review**"));
    }

    #[test]
    fn test_json_contract_lists_exact_keys() {
        let prompt = build_analysis_prompt(RubricVariant::Standard, ResponseFormat::Json);

        assert!(prompt.contains("\"resolution and clarity\""));
        assert!(prompt.contains("\"resolution and clarity confidence\""));
        assert!(prompt.contains("\"filters and distortions confidence\""));
        assert!(prompt.contains("\"final_review\""));
        assert!(prompt.contains("Do not wrap the JSON in code fences"));
    }

    #[test]
    fn test_prompt_is_pure() {
        let a = build_analysis_prompt(RubricVariant::Standard, ResponseFormat::Json);
        let b = build_analysis_prompt(RubricVariant::Standard, ResponseFormat::Json);
        assert_eq!(a, b);
    }
}
