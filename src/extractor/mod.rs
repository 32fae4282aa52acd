//! 抽出パイプライン
//!
//! 画像ごとに1回のモデル呼び出しを行い、レスポンスをデコードして
//! レコードストアに保存する。1枚の失敗は実行全体を止めない:
//! ループは (成功数, 失敗リスト) を畳み込みで生成する。

mod gemini;

pub use gemini::GeminiClient;

use crate::error::Result;
use crate::scanner::SourceImage;
use async_trait::async_trait;
use indicatif::ProgressBar;
use report_ai_common::{parser, RecordStore};

/// ビジョンモデルの能力インターフェース
///
/// 画像バイト列と固定指示を渡し、テキストを受け取る。
/// レスポンスの形はスキーマ以上に仮定しない。
/// テストでは決定的なスタブに差し替える。
#[async_trait]
pub trait VisionModel: Send + Sync {
    async fn generate(&self, image: &[u8], mime_type: &str, instruction: &str) -> Result<String>;
}

/// 1枚分の失敗記録
#[derive(Debug, Clone)]
pub struct ExtractFailure {
    pub stem: String,
    pub error: String,
}

/// 実行サマリ
///
/// `processed + failures.len()` は発見された画像数に一致する。
/// 部分失敗で実行を失敗扱いしたい呼び出し側はこの値を自分で検査する。
#[derive(Debug)]
pub struct RunSummary {
    pub processed: usize,
    pub failures: Vec<ExtractFailure>,
}

/// 画像列を順番に抽出してストアへ保存
///
/// 逐次実行: 1枚を完全に処理（読み込み→モデル→デコード→保存）して
/// から次へ進む。画像0枚は成功（サマリ0件）。
pub async fn run_extraction(
    images: &[SourceImage],
    model: &dyn VisionModel,
    store: &RecordStore,
    verbose: bool,
) -> Result<RunSummary> {
    let mut processed = 0;
    let mut failures = Vec::new();

    let progress = ProgressBar::new(images.len() as u64);

    for image in images {
        if verbose {
            progress.println(format!("  処理中: {}", image.file_name));
        }

        match extract_one(image, model, store).await {
            Ok(()) => processed += 1,
            Err(e) => {
                progress.println(format!("  ✗ {}: {}", image.stem, e));
                failures.push(ExtractFailure {
                    stem: image.stem.clone(),
                    error: e.to_string(),
                });
            }
        }

        progress.inc(1);
    }

    progress.finish_and_clear();

    Ok(RunSummary {
        processed,
        failures,
    })
}

/// 1枚分の抽出
///
/// どのステップで失敗してもエラーを返すだけで、呼び出し側のループが
/// 失敗として記録して続行する。
async fn extract_one(
    image: &SourceImage,
    model: &dyn VisionModel,
    store: &RecordStore,
) -> Result<()> {
    let bytes = std::fs::read(&image.path)
        .map_err(|e| crate::error::ReportAiError::ImageRead(format!("{}: {}", image.file_name, e)))?;

    let response = model
        .generate(&bytes, &image.mime_type, report_ai_common::EXTRACTION_INSTRUCTION)
        .await?;

    let record = match parser::parse_report_response(&response) {
        Ok(record) => record,
        Err(e) => {
            // 生レスポンスを目視確認用に残す（保存失敗は元エラーを優先）
            if let Err(raw_err) = store.put_raw(&image.stem, &response) {
                eprintln!("警告: 生レスポンスの保存に失敗 ({}): {}", image.stem, raw_err);
            }
            return Err(crate::error::ReportAiError::Decode(e.to_string()));
        }
    };

    store.put(&image.stem, &record)?;
    Ok(())
}
