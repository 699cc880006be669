use clap::{Parser, Subcommand};
use profile_photo_common::{ResponseFormat, RubricVariant};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "profile-ai")]
#[command(about = "プロフィール写真AI診断ツール", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 写真を解析してスコアカードを表示
    Analyze {
        /// 写真ファイルのパス (png/jpg/jpeg/webp)
        #[arg(required = true)]
        image: PathBuf,

        /// ルーブリック (standard: 5基準 / extended: 6基準)
        #[arg(short, long, default_value = "standard")]
        rubric: RubricVariant,

        /// モデルに要求する出力形式 (text/json)
        #[arg(short, long, default_value = "text")]
        format: ResponseFormat,

        /// 範囲外のconfidence値をエラーにせず0〜100へ丸める
        #[arg(long)]
        clamp_confidence: bool,

        /// レポートJSONの保存先（省略時は保存しない）
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// 設定を表示/編集
    Config {
        /// APIキーを設定
        #[arg(long)]
        set_api_key: Option<String>,

        /// モデル名を設定
        #[arg(long)]
        set_model: Option<String>,

        /// 設定を表示
        #[arg(long)]
        show: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_analyze_defaults() {
        let cli = Cli::try_parse_from(["profile-ai", "analyze", "photo.jpg"]).unwrap();
        match cli.command {
            Commands::Analyze {
                image,
                rubric,
                format,
                clamp_confidence,
                output,
            } => {
                assert_eq!(image, PathBuf::from("photo.jpg"));
                assert_eq!(rubric, RubricVariant::Standard);
                assert_eq!(format, ResponseFormat::Text);
                assert!(!clamp_confidence);
                assert!(output.is_none());
            }
            _ => panic!("expected Analyze"),
        }
    }

    #[test]
    fn test_parse_analyze_extended_json() {
        let cli = Cli::try_parse_from([
            "profile-ai",
            "analyze",
            "photo.png",
            "--rubric",
            "extended",
            "--format",
            "json",
            "--clamp-confidence",
        ])
        .unwrap();
        match cli.command {
            Commands::Analyze {
                rubric,
                format,
                clamp_confidence,
                ..
            } => {
                assert_eq!(rubric, RubricVariant::Extended);
                assert_eq!(format, ResponseFormat::Json);
                assert!(clamp_confidence);
            }
            _ => panic!("expected Analyze"),
        }
    }

    #[test]
    fn test_parse_analyze_rejects_unknown_rubric() {
        let result =
            Cli::try_parse_from(["profile-ai", "analyze", "photo.jpg", "--rubric", "huge"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_config_show() {
        let cli = Cli::try_parse_from(["profile-ai", "config", "--show"]).unwrap();
        match cli.command {
            Commands::Config {
                set_api_key,
                set_model,
                show,
            } => {
                assert!(set_api_key.is_none());
                assert!(set_model.is_none());
                assert!(show);
            }
            _ => panic!("expected Config"),
        }
    }

    #[test]
    fn test_global_verbose_flag() {
        let cli =
            Cli::try_parse_from(["profile-ai", "analyze", "photo.jpg", "--verbose"]).unwrap();
        assert!(cli.verbose);
    }
}
