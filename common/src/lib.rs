//! Profile Photo AI Common Library
//!
//! CLIとテストで共有される型とユーティリティ

pub mod error;
pub mod parser;
pub mod prompts;
pub mod rubric;
pub mod types;

pub use error::{Error, Result};
pub use parser::{
    parse_json_response, parse_response, parse_text_response, strip_code_fence, ConfidencePolicy,
};
pub use prompts::build_analysis_prompt;
pub use rubric::{Dimension, ResponseFormat, RubricVariant, FINAL_REVIEW_HEADING, FINAL_REVIEW_KEY};
pub use types::{AnalysisCriterion, AnalysisReport};
