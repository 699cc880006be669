//! モデルレスポンスパーサー
//!
//! Geminiのレスポンス文字列を固定本数の評価結果
//! (heading, description, confidence) と最終講評にパースする。
//!
//! 2系統のエンコーディングに対応:
//! - JSON: 固定キーのオブジェクトをキー参照でパース
//! - テキスト: 太字見出し + `(confidence: NN%)` マーカーを
//!   3状態の走査（SeekHeading → CollectDescription → ExpectConfidence）で収集
//!
//! どちらも基準数Nちょうどの収集を要求し、不足・過剰・欠落は
//! それぞれ名前つきのエラーとして返す。部分的なレポートは返さない。

use crate::error::{Error, Result};
use crate::rubric::{ResponseFormat, RubricVariant, FINAL_REVIEW_HEADING, FINAL_REVIEW_KEY};
use crate::types::{AnalysisCriterion, AnalysisReport};

/// confidenceマーカーの開始リテラル
const CONFIDENCE_MARKER: &str = "(confidence:";

/// 見出しの太字デリミタ
const BOLD: &str = "**";

/// 範囲外confidence値の扱い
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConfidencePolicy {
    /// 0〜100の範囲外はエラー（デフォルト）
    #[default]
    Reject,
    /// 0〜100へ丸める
    Clamp,
}

/// レスポンスをパースしてレポートを生成
///
/// # Arguments
/// * `raw` - モデルのレスポンス文字列（未加工）
/// * `variant` - 期待するルーブリック
/// * `format` - 設定されている出力形式
/// * `policy` - 範囲外confidence値の扱い
pub fn parse_response(
    raw: &str,
    variant: RubricVariant,
    format: ResponseFormat,
    policy: ConfidencePolicy,
) -> Result<AnalysisReport> {
    match format {
        ResponseFormat::Json => parse_json_response(raw, variant, policy),
        ResponseFormat::Text => parse_text_response(raw, variant, policy),
    }
}

/// コードフェンスを除去
///
/// モデルがJSONを ```json ... ``` で包んで返した場合に備えて、
/// 先頭・末尾のフェンスを1組だけ剥がす。フェンスが揃っていなければ
/// trimのみ行う。
///
/// # Examples
/// ```
/// use profile_photo_common::strip_code_fence;
///
/// let fenced = "```json\n{\"key\": 1}\n```";
/// assert_eq!(strip_code_fence(fenced), "{\"key\": 1}");
/// ```
pub fn strip_code_fence(response: &str) -> &str {
    let trimmed = response.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // ```json などの言語タグ行を読み飛ばす
    let rest = match rest.find('\n') {
        Some(i) => &rest[i + 1..],
        None => rest,
    };
    match rest.strip_suffix("```") {
        Some(inner) => inner.trim(),
        None => trimmed,
    }
}

/// JSONエンコーディングのレスポンスをパース
///
/// キーは各評価基準の小文字名、対になる "<基準名> confidence"、
/// および "final_review"。いずれかが欠けていれば `MissingField`。
pub fn parse_json_response(
    raw: &str,
    variant: RubricVariant,
    policy: ConfidencePolicy,
) -> Result<AnalysisReport> {
    // まず素のJSONとして試し、失敗したらフェンス除去後に1回だけ再試行
    let value: serde_json::Value = match serde_json::from_str(raw.trim()) {
        Ok(v) => v,
        Err(_) => serde_json::from_str(strip_code_fence(raw))
            .map_err(|e| Error::MalformedJson(e.to_string()))?,
    };

    let Some(map) = value.as_object() else {
        return Err(Error::MalformedJson("JSON object expected".to_string()));
    };

    let mut criteria = Vec::with_capacity(variant.criterion_count());
    for dimension in variant.dimensions() {
        let description_key = dimension.json_key();
        let confidence_key = dimension.confidence_key();

        let description = map
            .get(&description_key)
            .ok_or_else(|| Error::MissingField(description_key.clone()))?;
        let confidence_value = map
            .get(&confidence_key)
            .ok_or_else(|| Error::MissingField(confidence_key.clone()))?;
        let confidence = coerce_confidence(confidence_value, &confidence_key, policy)?;

        criteria.push(AnalysisCriterion {
            heading: dimension.name.to_string(),
            description: value_to_text(description),
            confidence,
        });
    }

    let final_review = map
        .get(FINAL_REVIEW_KEY)
        .ok_or_else(|| Error::MissingField(FINAL_REVIEW_KEY.to_string()))?;

    Ok(AnalysisReport {
        criteria,
        final_review: value_to_text(final_review),
    })
}

/// テキスト走査の状態
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScanState {
    SeekHeading,
    CollectDescription,
    ExpectConfidence,
}

/// テキストエンコーディングのレスポンスをパース
///
/// 見出しは出現順に位置で割り当てる（名前による並べ替えはしない）。
/// 基準数Nちょうどの (見出し, 記述, confidence) を収集してから
/// 最終講評の本文を取り出す。
pub fn parse_text_response(
    raw: &str,
    variant: RubricVariant,
    policy: ConfidencePolicy,
) -> Result<AnalysisReport> {
    let expected = variant.criterion_count();
    let mut criteria = Vec::new();

    let mut state = ScanState::SeekHeading;
    let mut cursor = 0usize;
    let mut heading = String::new();
    let mut description = String::new();
    // 最終講評の開始位置（最後のマーカー直後、または太字の最終見出し直後）
    let mut tail_start = raw.len();
    let mut final_heading_seen = false;

    loop {
        match state {
            ScanState::SeekHeading => {
                let Some(open) = find_from(raw, cursor, BOLD) else {
                    break;
                };
                let text_start = open + BOLD.len();
                let Some(close) = find_from(raw, text_start, BOLD) else {
                    break;
                };
                let span = normalize_heading(&raw[text_start..close]);
                cursor = close + BOLD.len();
                if span.eq_ignore_ascii_case(FINAL_REVIEW_HEADING) {
                    final_heading_seen = true;
                    tail_start = cursor;
                    break;
                }
                heading = span;
                state = ScanState::CollectDescription;
            }
            ScanState::CollectDescription => {
                // マーカーのないセクション（途中打ち切り等）は三つ組に
                // ならず、後段の件数チェックで検出される
                let Some(marker) = find_from(raw, cursor, CONFIDENCE_MARKER) else {
                    break;
                };
                description = raw[cursor..marker].trim().to_string();
                cursor = marker + CONFIDENCE_MARKER.len();
                state = ScanState::ExpectConfidence;
            }
            ScanState::ExpectConfidence => {
                let Some(percent) = find_from(raw, cursor, "%") else {
                    return Err(Error::InvalidConfidence {
                        field: heading.clone(),
                        value: raw[cursor..].trim().to_string(),
                    });
                };
                let number = raw[cursor..percent].trim();
                let parsed = number.parse::<i64>().map_err(|_| Error::InvalidConfidence {
                    field: heading.clone(),
                    value: number.to_string(),
                })?;
                let confidence = check_range(parsed, &heading, policy)?;

                criteria.push(AnalysisCriterion {
                    heading: std::mem::take(&mut heading),
                    description: std::mem::take(&mut description),
                    confidence,
                });

                cursor = percent + 1;
                if raw[cursor..].starts_with(')') {
                    cursor += 1;
                }
                tail_start = cursor;
                state = ScanState::SeekHeading;
            }
        }
    }

    if criteria.len() != expected {
        return Err(Error::CriterionCountMismatch {
            expected,
            found: criteria.len(),
        });
    }

    let mut tail = raw[tail_start..].trim_start();
    if final_heading_seen {
        tail = tail.trim_start_matches(':').trim_start();
    } else {
        tail = strip_final_review_label(tail);
    }
    let tail = tail.trim();
    if tail.is_empty() {
        return Err(Error::MissingFinalReview);
    }

    Ok(AnalysisReport {
        criteria,
        final_review: tail.to_string(),
    })
}

fn find_from(haystack: &str, from: usize, needle: &str) -> Option<usize> {
    haystack[from..].find(needle).map(|i| from + i)
}

/// 見出しを正規化: 前後の空白、"1." 形式の先頭番号、末尾のコロンを除去
fn normalize_heading(span: &str) -> String {
    let mut span = span.trim().trim_end_matches(':').trim_end();
    let digits = span.chars().take_while(|c| c.is_ascii_digit()).count();
    if digits > 0 {
        let rest = &span[digits..];
        if let Some(stripped) = rest.strip_prefix('.').or_else(|| rest.strip_prefix(')')) {
            span = stripped.trim_start();
        }
    }
    span.to_string()
}

/// 太字でない "Final review:" ラベルが本文の先頭に残っていれば除去
fn strip_final_review_label(tail: &str) -> &str {
    match tail.get(..FINAL_REVIEW_HEADING.len()) {
        Some(head) if head.eq_ignore_ascii_case(FINAL_REVIEW_HEADING) => tail
            [FINAL_REVIEW_HEADING.len()..]
            .trim_start_matches(':')
            .trim_start(),
        _ => tail,
    }
}

fn value_to_text(value: &serde_json::Value) -> String {
    match value.as_str() {
        Some(s) => s.to_string(),
        None => value.to_string(),
    }
}

/// confidence値を整数へ強制
///
/// JSON整数、または整数を含む文字列（前後の空白は許容）のみ受理。
fn coerce_confidence(
    value: &serde_json::Value,
    field: &str,
    policy: ConfidencePolicy,
) -> Result<u8> {
    let parsed: Option<i64> = match value {
        serde_json::Value::Number(n) => n.as_i64(),
        serde_json::Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    };
    let Some(number) = parsed else {
        return Err(Error::InvalidConfidence {
            field: field.to_string(),
            value: value.to_string(),
        });
    };
    check_range(number, field, policy)
}

fn check_range(number: i64, field: &str, policy: ConfidencePolicy) -> Result<u8> {
    if (0..=100).contains(&number) {
        return Ok(number as u8);
    }
    match policy {
        ConfidencePolicy::Clamp => Ok(number.clamp(0, 100) as u8),
        ConfidencePolicy::Reject => Err(Error::InvalidConfidence {
            field: field.to_string(),
            value: number.to_string(),
        }),
    }
}
