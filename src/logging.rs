// ============================================
// src/logging.rs
// ログ出力の設定 (画面は TUI が使うのでファイルへ書く)
// ============================================

use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Context, anyhow};
use directories::ProjectDirs;
use tracing_subscriber::EnvFilter;

const LOG_FILE: &str = "vocabwiz.log";

// MARK:ログファイルのパスを取得する関数 (ディレクトリは作らない)
fn default_log_path() -> PathBuf {
    match ProjectDirs::from("jp", "Fukumoto0141", "VOCAB_WIZ") {
        // OSごとのデータ保存用ディレクトリ
        Some(proj_dirs) => proj_dirs.data_dir().join(LOG_FILE),
        // 取得できなかったらカレントディレクトリに (フォールバック)
        None => PathBuf::from(LOG_FILE),
    }
}

/// 親ディレクトリを作ってから追記モードで開く
fn open_log_file(path: &Path) -> anyhow::Result<File> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create log directory {}", parent.display()))?;
    }
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("failed to open log file {}", path.display()))
}

/// ロガーを初期化して、書き込み先のパスを返す
///
/// レベルは `RUST_LOG` で変えられる (デフォルトは info)。
pub fn init(path: Option<&Path>) -> anyhow::Result<PathBuf> {
    let path = path.map(Path::to_path_buf).unwrap_or_else(default_log_path);
    let file = open_log_file(&path)?;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .map_err(|e| anyhow!(e))?;

    Ok(path)
}
