//! 評価ルーブリック定義
//!
//! CLIとパーサーで共有されるルーブリック:
//! - Dimension: 評価基準1件（表示名 + プロンプト用ガイダンス）
//! - RubricVariant: 5基準/6基準のバリアント
//! - ResponseFormat: モデルに要求する出力形式

/// 評価基準1件
///
/// `name` はスコアカードの見出しとしてそのまま表示される。
/// `guidance` はプロンプトに埋め込むGood/Bad例文。
#[derive(Debug, Clone, Copy)]
pub struct Dimension {
    pub name: &'static str,
    pub guidance: &'static str,
}

impl Dimension {
    /// JSONエンコーディングでの評価キー（表示名の小文字化）
    pub fn json_key(&self) -> String {
        self.name.to_lowercase()
    }

    /// JSONエンコーディングでのconfidenceキー
    pub fn confidence_key(&self) -> String {
        format!("{} confidence", self.name.to_lowercase())
    }
}

/// JSONエンコーディングでの最終講評キー
pub const FINAL_REVIEW_KEY: &str = "final_review";

/// テキストエンコーディングでの最終講評見出し
pub const FINAL_REVIEW_HEADING: &str = "Final review";

const RESOLUTION_AND_CLARITY: Dimension = Dimension {
    name: "Resolution and Clarity",
    guidance: r#"Good: "The image is high-resolution and clear, showcasing your facial features and details."
Bad: "The image is blurry or pixelated, making it difficult to discern your features. Consider uploading a higher-resolution photo.""#,
};

const PROFESSIONAL_APPEARANCE: Dimension = Dimension {
    name: "Professional Appearance",
    guidance: r#"Good: "Your attire is appropriate for a professional setting (business casual or formal)." (Highlight specific elements like a blazer, collared shirt, etc.)
Bad: "The attire might not be suitable for a professional setting. Consider wearing more formal clothing for your profile picture."
Neutral Background: "The background is simple and uncluttered, allowing the focus to remain on you."
Distracting Background: "The background is busy or cluttered, potentially drawing attention away from you. Consider using a plain background or cropping the image to remove distractions.""#,
};

const FACE_VISIBILITY: Dimension = Dimension {
    name: "Face Visibility",
    guidance: r#"Good: "Your face is clearly visible and unobstructed."
Bad: "Your face is partially covered by objects or hair, making it difficult to see you clearly. Reposition yourself or adjust the hairstyle for better visibility.""#,
};

const APPROPRIATE_EXPRESSION: Dimension = Dimension {
    name: "Appropriate Expression",
    guidance: r#"Good: "You have a friendly and approachable expression, making you look welcoming and open to connections."
Bad: "Your expression appears overly serious, stern, or unprofessional. Consider a more relaxed and natural smile for a more approachable look.""#,
};

const FILTERS_AND_DISTORTIONS: Dimension = Dimension {
    name: "Filters and Distortions",
    guidance: r#"Good: "The photo appears natural and unaltered, showcasing your authentic appearance."
Bad: "Excessive filters, editing, or retouching can misrepresent your look. Opt for a natural-looking photo for a more genuine impression.""#,
};

const SINGLE_PERSON_AND_NO_PETS: Dimension = Dimension {
    name: "Single Person and No Pets",
    guidance: r#"Good: "The photo shows only you, with no other people or pets in the frame."
Bad: "Other people or pets appear in the photo, drawing attention away from you. Crop the image or choose a photo where you are the only subject.""#,
};

/// 5基準の標準ルーブリック
const STANDARD_DIMENSIONS: &[Dimension] = &[
    RESOLUTION_AND_CLARITY,
    PROFESSIONAL_APPEARANCE,
    FACE_VISIBILITY,
    APPROPRIATE_EXPRESSION,
    FILTERS_AND_DISTORTIONS,
];

/// 6基準の拡張ルーブリック（被写体単独チェックつき）
const EXTENDED_DIMENSIONS: &[Dimension] = &[
    RESOLUTION_AND_CLARITY,
    PROFESSIONAL_APPEARANCE,
    FACE_VISIBILITY,
    APPROPRIATE_EXPRESSION,
    FILTERS_AND_DISTORTIONS,
    SINGLE_PERSON_AND_NO_PETS,
];

/// ルーブリックバリアント
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RubricVariant {
    /// 5基準（標準）
    #[default]
    Standard,
    /// 6基準（Single Person and No Pets を追加）
    Extended,
}

impl RubricVariant {
    /// 宣言順の評価基準一覧
    pub fn dimensions(&self) -> &'static [Dimension] {
        match self {
            RubricVariant::Standard => STANDARD_DIMENSIONS,
            RubricVariant::Extended => EXTENDED_DIMENSIONS,
        }
    }

    /// 期待する評価基準の本数N
    pub fn criterion_count(&self) -> usize {
        self.dimensions().len()
    }
}

impl std::str::FromStr for RubricVariant {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "standard" | "std" => Ok(RubricVariant::Standard),
            "extended" | "ext" => Ok(RubricVariant::Extended),
            _ => Err(format!("Unknown rubric: {}. Use standard or extended", s)),
        }
    }
}

impl std::fmt::Display for RubricVariant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RubricVariant::Standard => write!(f, "standard"),
            RubricVariant::Extended => write!(f, "extended"),
        }
    }
}

/// モデルに要求する出力形式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResponseFormat {
    /// 固定キーのJSONオブジェクト
    Json,
    /// 太字見出し + (confidence: NN%) マーカーのテキスト
    #[default]
    Text,
}

impl std::str::FromStr for ResponseFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(ResponseFormat::Json),
            "text" | "markdown" => Ok(ResponseFormat::Text),
            _ => Err(format!("Unknown format: {}. Use json or text", s)),
        }
    }
}

impl std::fmt::Display for ResponseFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ResponseFormat::Json => write!(f, "json"),
            ResponseFormat::Text => write!(f, "text"),
        }
    }
}
