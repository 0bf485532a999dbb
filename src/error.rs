// ============================================
// src/error.rs
// クイズ全体で使うエラー型
// ============================================

use std::path::PathBuf;

use thiserror::Error;

use crate::vocabulary::Category;

#[derive(Debug, Error)]
pub enum QuizError {
    /// 言語を選ばずにスタートしようとした
    #[error("Please select a language")]
    LanguageNotSelected,

    /// カテゴリの行数が 10 問に足りない
    #[error("Category \"{category}\" has only {found} words, at least {needed} are needed")]
    NotEnoughRows {
        category: Category,
        found: usize,
        needed: usize,
    },

    /// ダミー選択肢 (不正解) が 3 つ作れない
    #[error("Category \"{category}\" has only {found} other {language} words to use as wrong answers, {needed} are needed")]
    NotEnoughDistractors {
        category: Category,
        language: String,
        found: usize,
        needed: usize,
    },

    #[error("Category \"{0}\" is not loaded")]
    CategoryNotLoaded(Category),

    #[error("{}: missing column \"{column}\"", path.display())]
    MissingColumn { path: PathBuf, column: String },

    /// 今の状態では呼べない操作
    #[error("cannot {action} while {state}")]
    InvalidTransition {
        action: &'static str,
        state: &'static str,
    },

    #[error("{}: {source}", path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}
