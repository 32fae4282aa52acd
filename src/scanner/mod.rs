use crate::error::{ReportAiError, Result};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// ソース画像
///
/// stemはレコードのキー。発見後は読み取り専用。
#[derive(Debug, Clone)]
pub struct SourceImage {
    pub path: PathBuf,
    pub file_name: String,
    pub stem: String,
    pub mime_type: String,
}

/// フォルダ直下の画像を列挙（stem昇順）
///
/// この順序はシステム全体の契約。ビューアの巡回順を決め、
/// 実行を再現可能にする。
pub fn scan_folder(folder: &Path, extensions: &[String]) -> Result<Vec<SourceImage>> {
    if !folder.exists() {
        return Err(ReportAiError::FolderNotFound(folder.display().to_string()));
    }

    let mut images = Vec::new();

    // 直下のみ（再帰しない）。列挙自体の失敗は実行全体を止める
    for entry in WalkDir::new(folder).max_depth(1) {
        let entry = entry.map_err(|e| {
            ReportAiError::FolderNotFound(format!("{}: {}", folder.display(), e))
        })?;
        let path = entry.path();

        if !path.is_file() {
            continue;
        }

        if let Some(ext) = path.extension() {
            let ext_str = ext.to_string_lossy();
            if extensions.iter().any(|e| e.eq_ignore_ascii_case(&ext_str)) {
                let file_name = path
                    .file_name()
                    .map(|n| n.to_string_lossy().to_string())
                    .unwrap_or_default();
                let stem = path
                    .file_stem()
                    .map(|s| s.to_string_lossy().to_string())
                    .unwrap_or_default();

                images.push(SourceImage {
                    path: path.to_path_buf(),
                    file_name,
                    stem,
                    mime_type: infer_mime_type(path),
                });
            }
        }
    }

    // stemでソート
    images.sort_by(|a, b| a.stem.cmp(&b.stem));

    Ok(images)
}

/// 拡張子からMIMEタイプを推定
///
/// 未知の拡張子は汎用バイナリにフォールバック（失敗しない）。
fn infer_mime_type(path: &Path) -> String {
    path.extension()
        .and_then(|ext| mime_guess::from_ext(&ext.to_string_lossy()).first())
        .map(|mime| mime.to_string())
        .unwrap_or_else(|| "application/octet-stream".to_string())
}
