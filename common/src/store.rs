//! レコードストア
//!
//! JSONファイルをレコードとするファイルシステムKVストア。
//! キーは元画像のファイル名stem。組み込みDBへの置き換えが
//! パイプライン/ビューア側の変更なしで済むよう、
//! put/get/list_keysの抽象で閉じている。

use crate::codec;
use crate::error::{Error, Result};
use crate::types::ExtractionRecord;
use std::fs;
use std::path::{Path, PathBuf};

/// レビュー時に画像を探す拡張子候補
///
/// パイプライン側の受理拡張子設定とは独立。狭いフィルタで実行された
/// 場合でもレビューで画像が見つかるようにする。
const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "JPG", "JPEG", "PNG"];

/// 書き込み側ストア（1レコード = `<stem>.json`）
#[derive(Debug, Clone)]
pub struct RecordStore {
    dir: PathBuf,
}

impl RecordStore {
    /// ストアを開く（ディレクトリがなければ作成、冪等）
    pub fn open(dir: &Path) -> Result<Self> {
        fs::create_dir_all(dir)?;
        Ok(Self {
            dir: dir.to_path_buf(),
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// レコードを保存（既存レコードは無条件で上書き）
    pub fn put(&self, stem: &str, record: &ExtractionRecord) -> Result<()> {
        let content = codec::encode_record(record)?;
        fs::write(self.record_path(stem), content)?;
        Ok(())
    }

    /// デコード不能だった生レスポンスを `<stem>.raw.txt` に保存
    ///
    /// 捏造レコードに変換せず、後から目視確認できるよう残す。
    pub fn put_raw(&self, stem: &str, text: &str) -> Result<()> {
        fs::write(self.dir.join(format!("{}.raw.txt", stem)), text)?;
        Ok(())
    }

    /// レコードを読み込み
    pub fn get(&self, stem: &str) -> Result<ExtractionRecord> {
        let path = self.record_path(stem);
        if !path.exists() {
            return Err(Error::NotFound(format!("record {}", stem)));
        }

        let bytes = fs::read(&path)?;
        let text = match String::from_utf8(bytes) {
            Ok(text) => text,
            Err(e) => {
                // 不正なUTF-8は置換して読む（警告は出す）
                eprintln!(
                    "警告: {} に不正なUTF-8が含まれています（置換して読み込み）",
                    path.display()
                );
                String::from_utf8_lossy(e.as_bytes()).into_owned()
            }
        };
        codec::decode_record(&text)
    }

    /// 保存済みレコードのキー一覧（stem昇順）
    ///
    /// ソース画像と同じ順序契約。失敗がなければレビュー順 = 処理順になる。
    pub fn list_keys(&self) -> Result<Vec<String>> {
        let mut keys = Vec::new();

        for entry in fs::read_dir(&self.dir)? {
            let entry = entry?;
            let path = entry.path();
            if !path.is_file() {
                continue;
            }
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            if let Some(stem) = path.file_stem() {
                keys.push(stem.to_string_lossy().to_string());
            }
        }

        keys.sort();
        Ok(keys)
    }

    fn record_path(&self, stem: &str) -> PathBuf {
        self.dir.join(format!("{}.json", stem))
    }
}

/// レビュー用エントリ
#[derive(Debug, Clone)]
pub struct ReviewEntry {
    pub stem: String,
    pub has_image: bool,
}

/// 読み取り側ストア（レコードと元画像のペアリング）
///
/// ビューアはこのストア経由でのみ読む。どちらのディレクトリにも
/// 書き込まない。
#[derive(Debug, Clone)]
pub struct ReviewStore {
    records: RecordStore,
    image_dir: PathBuf,
}

impl ReviewStore {
    pub fn new(records_dir: &Path, image_dir: &Path) -> Result<Self> {
        Ok(Self {
            records: RecordStore::open(records_dir)?,
            image_dir: image_dir.to_path_buf(),
        })
    }

    /// レビュー対象の一覧（stem昇順）
    pub fn list(&self) -> Result<Vec<ReviewEntry>> {
        let entries = self
            .records
            .list_keys()?
            .into_iter()
            .map(|stem| {
                let has_image = self.image_path(&stem).is_some();
                ReviewEntry { stem, has_image }
            })
            .collect();
        Ok(entries)
    }

    /// stemのレコードを読み込み
    pub fn load(&self, stem: &str) -> Result<ExtractionRecord> {
        self.records.get(stem)
    }

    /// stemの元画像バイト列を読み込み
    ///
    /// 画像がないのは回復可能な状態。ビューアには「画像なし」として
    /// 表示させる。
    pub fn image_for(&self, stem: &str) -> Result<Vec<u8>> {
        let path = self
            .image_path(stem)
            .ok_or_else(|| Error::NotFound(format!("image {}", stem)))?;
        Ok(fs::read(path)?)
    }

    fn image_path(&self, stem: &str) -> Option<PathBuf> {
        for ext in IMAGE_EXTENSIONS {
            let path = self.image_dir.join(format!("{}.{}", stem, ext));
            if path.exists() {
                return Some(path);
            }
        }
        None
    }
}
