use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "report-ai")]
#[command(about = "医療検査報告書AI抽出ツール", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 画像フォルダを抽出して1画像=1JSONを出力
    Extract {
        /// 画像フォルダのパス
        #[arg(required = true)]
        folder: PathBuf,

        /// 出力ディレクトリ（デフォルト: 設定のoutput_dir）
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// 受理する拡張子（複数指定可、省略時は設定値）
        #[arg(short, long)]
        ext: Vec<String>,
    },

    /// 設定を表示/編集
    Config {
        /// APIキーを設定
        #[arg(long)]
        set_api_key: Option<String>,

        /// 設定を表示
        #[arg(long)]
        show: bool,
    },
}
