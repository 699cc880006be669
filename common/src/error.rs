//! エラー型定義

use thiserror::Error;

/// レスポンスパース層の共通エラー型
///
/// どのバリアントも1回の解析呼び出しを打ち切る終端エラー。
/// 部分的なレポートを返すことはない。
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("Malformed JSON: {0}")]
    MalformedJson(String),

    #[error("Missing field: {0}")]
    MissingField(String),

    #[error("Invalid confidence for \"{field}\": {value}")]
    InvalidConfidence { field: String, value: String },

    #[error("Criterion count mismatch: expected {expected}, found {found}")]
    CriterionCountMismatch { expected: usize, found: usize },

    #[error("Missing final review")]
    MissingFinalReview,
}

/// Result型エイリアス
pub type Result<T> = std::result::Result<T, Error>;
