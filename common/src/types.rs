//! 抽出結果の型定義
//!
//! CLIとビューアで共有される型:
//! - ExtractionRecord: 1画像 = 1レコードの永続化単位
//! - TestResult: 検査表の1行

use serde::{Deserialize, Serialize};

/// 検査報告書から抽出した1レコード
///
/// レコードのキーは元画像のファイル名stem。レコードとその元画像は
/// 必ず同じstemを共有する（ストアとビューアの結合キー）。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionRecord {
    /// 報告書タイトル（読み取れない場合は空文字）
    pub report_title: String,

    /// 検査結果の行（画像内の表の順序を保持）
    pub test_results: Vec<TestResult>,
}

/// 検査表の1行
///
/// 全フィールド文字列。基準値は "3.5–5.0" のような自由記述で、
/// 単位も正規化できないためテキストのまま保持する。
/// セルが読み取れない場合はどのフィールドも空文字になりうる。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestResult {
    pub test_name: String,
    pub value: String,
    pub unit: String,
    pub range: String,
}
