use clap::Parser;
use profile_photo_ai::{cli, config, error, render, session};

use cli::{Cli, Commands};
use config::Config;
use error::{ProfileAiError, Result};
use profile_photo_common::ConfidencePolicy;
use session::{AnalysisSession, SavedReport};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::load()?;

    match cli.command {
        Commands::Analyze {
            image,
            rubric,
            format,
            clamp_confidence,
            output,
        } => {
            println!("📸 profile-ai - プロフィール写真診断\n");

            // 1. APIキー解決（環境変数 → 設定ファイル → 対話入力）
            let api_key = match config.get_api_key() {
                Ok(key) => key,
                Err(ProfileAiError::MissingApiKey) => prompt_api_key()?,
                Err(e) => return Err(e),
            };
            config::validate_key_shape(&api_key)?;

            let policy = if clamp_confidence {
                ConfidencePolicy::Clamp
            } else {
                ConfidencePolicy::Reject
            };

            // 2. 解析
            println!("[1/2] AI解析中...");
            let mut session = AnalysisSession::new(config, api_key, rubric, format, policy);
            let report = session.analyze(&image, cli.verbose).await?;
            println!("✔ 解析完了\n");

            // 3. スコアカード表示
            println!("[2/2] スコアカード\n");
            render::print_report(&report);

            // 4. 保存（オプション）
            if let Some(path) = output {
                let saved = SavedReport {
                    analyzed_at: chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
                    model: session.model().to_string(),
                    image: image
                        .file_name()
                        .map(|n| n.to_string_lossy().to_string())
                        .unwrap_or_default(),
                    report,
                };
                let json = serde_json::to_string_pretty(&saved)?;
                std::fs::write(&path, json)?;
                println!("\n✔ レポートを保存: {}", path.display());
            }

            println!("\n✅ 完了");
        }

        Commands::Config {
            set_api_key,
            set_model,
            show,
        } => {
            let mut config = config;

            if let Some(key) = set_api_key {
                config::validate_key_shape(&key)?;
                config.set_api_key(key)?;
                println!("✔ APIキーを設定しました");
            }

            if let Some(model) = set_model {
                config.set_model(model)?;
                println!("✔ モデルを設定しました");
            }

            if show {
                println!("設定:");
                println!("  モデル: {}", config.model);
                println!("  タイムアウト: {}秒", config.timeout_seconds);
                println!(
                    "  APIキー: {}",
                    if config.api_key.is_some() {
                        "設定済み"
                    } else {
                        "未設定"
                    }
                );
            }
        }
    }

    Ok(())
}

/// APIキーの対話入力（エコーなし）
fn prompt_api_key() -> Result<String> {
    let key = dialoguer::Password::new()
        .with_prompt("Gemini APIキーを入力")
        .interact()
        .map_err(|e| ProfileAiError::Config(e.to_string()))?;
    Ok(key)
}
