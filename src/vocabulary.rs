// ============================================
// src/vocabulary.rs
// 単語データ (CSV) の読み込みと保持
// ============================================

use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::io;
use std::path::Path;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::QuizError;

/// 英単語の列名
const ENGLISH_COLUMN: &str = "English";

/// 対応している言語の数
pub const LANGUAGE_COUNT: usize = 3;

// --------------------------------------------------
// 言語とカテゴリ
// --------------------------------------------------

/// 出題できる言語 (CSV の列名と同じ)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ValueEnum)]
pub enum Language {
    German,
    French,
    Spanish,
}

impl Language {
    /// 画面の並び順
    pub const ALL: [Language; LANGUAGE_COUNT] = [Language::German, Language::French, Language::Spanish];

    pub fn name(self) -> &'static str {
        match self {
            Language::German => "German",
            Language::French => "French",
            Language::Spanish => "Spanish",
        }
    }

    /// `VocabularyRow::translations` の添字
    fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// 単語のカテゴリ。1 カテゴリ = 1 CSV ファイル
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ValueEnum)]
pub enum Category {
    Animals,
    #[serde(rename = "Food & Drink")]
    FoodDrink,
    Colours,
    Numbers,
    Hobbies,
}

impl Category {
    /// ドロップダウンの並び順 (先頭がデフォルト)
    pub const ALL: [Category; 5] = [
        Category::Animals,
        Category::FoodDrink,
        Category::Colours,
        Category::Numbers,
        Category::Hobbies,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Category::Animals => "Animals",
            Category::FoodDrink => "Food & Drink",
            Category::Colours => "Colours",
            Category::Numbers => "Numbers",
            Category::Hobbies => "Hobbies",
        }
    }

    pub fn file_name(self) -> &'static str {
        match self {
            Category::Animals => "animals.csv",
            Category::FoodDrink => "food_drink.csv",
            Category::Colours => "colours.csv",
            Category::Numbers => "numbers.csv",
            Category::Hobbies => "hobbies.csv",
        }
    }

    /// 一覧で 1 つ下 (末尾なら先頭へ)
    pub fn next(self) -> Self {
        let idx = Self::ALL.iter().position(|&c| c == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }

    /// 一覧で 1 つ上 (先頭なら末尾へ)
    pub fn prev(self) -> Self {
        let idx = Self::ALL.iter().position(|&c| c == self).unwrap_or(0);
        Self::ALL[(idx + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

impl Default for Category {
    fn default() -> Self {
        Category::ALL[0]
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// --------------------------------------------------
// データ構造
// --------------------------------------------------

/// CSV の 1 行 (英単語 + 各言語の訳)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VocabularyRow {
    english: String,
    translations: [String; LANGUAGE_COUNT],
}

impl VocabularyRow {
    pub fn new(english: impl Into<String>, translations: [String; LANGUAGE_COUNT]) -> Self {
        Self {
            english: english.into(),
            translations,
        }
    }

    pub fn english(&self) -> &str {
        &self.english
    }

    pub fn translation(&self, language: Language) -> &str {
        &self.translations[language.index()]
    }
}

/// 1 カテゴリ分の単語表。読み込み後は変更しない
#[derive(Debug, Clone)]
pub struct CategoryTable {
    category: Category,
    rows: Vec<VocabularyRow>,
}

impl CategoryTable {
    /// `dir/<category の file_name>` を読み込む
    pub fn load(dir: &Path, category: Category) -> Result<Self, QuizError> {
        let path = dir.join(category.file_name());
        let reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_path(&path)
            .map_err(|source| QuizError::Csv {
                path: path.clone(),
                source,
            })?;
        Self::from_csv(category, reader, &path)
    }

    /// 任意の Reader から読み込む (ファイル名はエラー表示用)
    #[cfg(test)]
    pub fn from_reader<R: io::Read>(category: Category, reader: R) -> Result<Self, QuizError> {
        let path = std::path::PathBuf::from(category.file_name());
        let reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);
        Self::from_csv(category, reader, &path)
    }

    fn from_csv<R: io::Read>(
        category: Category,
        mut reader: csv::Reader<R>,
        path: &Path,
    ) -> Result<Self, QuizError> {
        let csv_err = |source: csv::Error| QuizError::Csv {
            path: path.to_path_buf(),
            source,
        };

        // ヘッダーから列の位置を探す (列の順番は自由)
        let headers = reader.headers().map_err(csv_err)?.clone();
        let column = |name: &str| {
            headers
                .iter()
                .position(|h| h == name)
                .ok_or_else(|| QuizError::MissingColumn {
                    path: path.to_path_buf(),
                    column: name.to_string(),
                })
        };
        let english_col = column(ENGLISH_COLUMN)?;
        let mut language_cols = [0usize; LANGUAGE_COUNT];
        for language in Language::ALL {
            language_cols[language.index()] = column(language.name())?;
        }

        let mut rows = Vec::new();
        let mut seen = HashSet::new();

        for record in reader.records() {
            let record = record.map_err(csv_err)?;
            let line = record.position().map(|p| p.line()).unwrap_or(0);

            let english = record.get(english_col).unwrap_or_default();
            let translations = Language::ALL
                .map(|l| record.get(language_cols[l.index()]).unwrap_or_default().to_string());

            // 空欄のある行はスキップ
            if english.is_empty() || translations.iter().any(String::is_empty) {
                warn!(file = %path.display(), line, "skipping row with an empty cell");
                continue;
            }
            // 同じ英単語が 2 回出てくると「重複なし 10 問」が崩れる
            if !seen.insert(english.to_string()) {
                warn!(file = %path.display(), line, english, "skipping duplicate word");
                continue;
            }

            rows.push(VocabularyRow::new(english, translations));
        }

        Ok(Self { category, rows })
    }

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn rows(&self) -> &[VocabularyRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// ある言語の訳を重複なしで返す (ファイル順)
    pub fn distinct_translations(&self, language: Language) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.rows
            .iter()
            .map(|row| row.translation(language))
            .filter(|word| seen.insert(*word))
            .collect()
    }
}

/// 全カテゴリの単語表。起動時に 1 回だけ作る
#[derive(Debug, Clone, Default)]
pub struct VocabularyStore {
    tables: BTreeMap<Category, CategoryTable>,
}

impl VocabularyStore {
    /// データディレクトリから全カテゴリを読み込む
    pub fn load(dir: &Path) -> Result<Self, QuizError> {
        let mut tables = BTreeMap::new();
        for category in Category::ALL {
            let table = CategoryTable::load(dir, category)?;
            info!(%category, words = table.len(), "loaded vocabulary");
            tables.insert(category, table);
        }
        Ok(Self { tables })
    }

    #[cfg(test)]
    pub fn from_tables(tables: impl IntoIterator<Item = CategoryTable>) -> Self {
        Self {
            tables: tables.into_iter().map(|t| (t.category(), t)).collect(),
        }
    }

    pub fn table(&self, category: Category) -> Result<&CategoryTable, QuizError> {
        self.tables
            .get(&category)
            .ok_or(QuizError::CategoryNotLoaded(category))
    }
}

// --------------------------------------------------
// テスト用データ
// --------------------------------------------------
