//! プロンプト定義
//!
//! 抽出指示は1回の実行中すべての画像で固定。
//! 出力はコーデックのスキーマに一致するJSONオブジェクトのみを要求する。

/// 抽出指示（モデルへのシステム指示）
///
/// 報告書は中国語のことが多いため、出力は英語に翻訳させる。
pub const EXTRACTION_INSTRUCTION: &str = r#"You extract information from a scanned medical test report image. The report text may be in Chinese. Follow these steps:

step 1: Analyze the image.
step 2: Read the report title from the image.
step 3: From the table in the image, read "test_name", "value", "unit" and "range" for every row. Remove unnecessary characters. Collect the rows in a "test_results" array. Use an empty string for any cell you cannot read.
step 4: Some images have poor lighting conditions. Work accordingly.
step 5: Translate the output into English.

Output ONLY a JSON object exactly in this format:
{
  "report_title": "...",
  "test_results": [
    {"test_name": "...", "value": "...", "unit": "...", "range": "..."}
  ]
}"#;
