// ============================================
// src/config.rs
// コマンドライン引数
// ============================================

use std::path::PathBuf;

use clap::Parser;

use crate::vocabulary::{Category, Language};

/// VOCAB WiZ: 英単語を German / French / Spanish に訳す 4 択クイズ
#[derive(Parser, Debug)]
#[command(name = "vocabwiz", version, about)]
pub struct Args {
    /// CSV (animals.csv など) が入っているディレクトリ
    #[arg(short, long, default_value = "data")]
    pub data_dir: PathBuf,

    /// 最初から選んでおく言語
    #[arg(short, long, value_enum)]
    pub language: Option<Language>,

    /// 最初に選ばれているカテゴリ
    #[arg(short, long, value_enum, default_value_t = Category::Animals)]
    pub category: Category,

    /// 乱数のシード (同じ値なら同じ出題順)
    #[arg(long)]
    pub seed: Option<u64>,

    /// ログの出力先 (省略時はユーザーのデータディレクトリ)
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// 終了時に最後の結果を JSON で出力する
    #[arg(long)]
    pub json: bool,
}
