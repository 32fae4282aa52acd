use clap::Parser;
use report_ai_rust::{cli, config, error, extractor, scanner};
use cli::{Cli, Commands};
use config::Config;
use error::Result;
use report_ai_common::RecordStore;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::load()?;

    match cli.command {
        Commands::Extract { folder, output, ext } => {
            println!("📋 report-ai-rust - 報告書抽出\n");

            // 1. 画像スキャン
            println!("[1/2] 画像をスキャン中...");
            let extensions = if ext.is_empty() {
                config.extensions.clone()
            } else {
                ext
            };
            let images = scanner::scan_folder(&folder, &extensions)?;
            println!("✔ {}枚の画像を検出\n", images.len());

            let output_dir = output.unwrap_or_else(|| std::path::PathBuf::from(&config.output_dir));
            let store = RecordStore::open(&output_dir)?;

            // 画像0枚は正常終了（エラーではない）
            if images.is_empty() {
                println!("処理: 0件 / 失敗: 0件");
                println!("\n✅ 完了: {}", output_dir.display());
                return Ok(());
            }

            // 2. AI抽出
            println!("[2/2] AI抽出中...");
            let model = extractor::GeminiClient::new(&config)?;
            let summary = extractor::run_extraction(&images, &model, &store, cli.verbose).await?;
            println!("✔ 抽出完了\n");

            println!("処理: {}件 / 失敗: {}件", summary.processed, summary.failures.len());
            for failure in &summary.failures {
                println!("  ✗ {}: {}", failure.stem, failure.error);
            }

            println!("\n✅ 完了: {}", output_dir.display());
        }

        Commands::Config { set_api_key, show } => {
            let mut config = config;

            if let Some(key) = set_api_key {
                config.set_api_key(key)?;
                println!("✔ APIキーを設定しました");
            }

            if show {
                println!("設定:");
                println!("  モデル: {}", config.model);
                println!("  タイムアウト: {}秒", config.timeout_seconds);
                println!("  再試行回数: {}", config.max_retries);
                println!("  拡張子: {}", config.extensions.join(", "));
                println!("  出力先: {}", config.output_dir);
                println!("  APIキー: {}", if config.api_key.is_some() { "設定済み" } else { "未設定" });
            }
        }
    }

    Ok(())
}
