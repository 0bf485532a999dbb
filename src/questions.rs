/*
 * src/questions.rs
 * お題 (英単語 → 訳) と選択肢を作るモジュール
 */

use std::collections::HashSet;

use rand::Rng;
use rand::seq::{IndexedRandom, SliceRandom};

use crate::error::QuizError;
use crate::vocabulary::{CategoryTable, Language};

/// 1 回のクイズの問題数
pub const QUESTION_COUNT: usize = 10;
/// 1 問あたりの選択肢の数 (正解 1 + ダミー 3)
pub const OPTION_COUNT: usize = 4;
const DISTRACTOR_COUNT: usize = OPTION_COUNT - 1;

/// お題 1 問分
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    pub english: String, // 表示用 (英語)
    pub answer: String,  // 正解 (選んだ言語)
}

impl Question {
    pub fn new(english: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            english: english.into(),
            answer: answer.into(),
        }
    }
}

/// 単語表からランダムに `QUESTION_COUNT` 問選ぶ (同じ行は 2 回使わない)
///
/// 行数が足りない表はループに入る前にエラーにする。
pub fn generate_questions<R: Rng + ?Sized>(
    table: &CategoryTable,
    language: Language,
    rng: &mut R,
) -> Result<Vec<Question>, QuizError> {
    if table.len() < QUESTION_COUNT {
        return Err(QuizError::NotEnoughRows {
            category: table.category(),
            found: table.len(),
            needed: QUESTION_COUNT,
        });
    }

    let mut questions = Vec::with_capacity(QUESTION_COUNT);
    let mut used_indices = HashSet::new();

    // 使っていない行が出るまで引き直す
    while questions.len() < QUESTION_COUNT {
        let idx = rng.random_range(0..table.len());
        if used_indices.insert(idx) {
            let row = &table.rows()[idx];
            questions.push(Question::new(row.english(), row.translation(language)));
        }
    }
    Ok(questions)
}

/// その言語の列でダミー選択肢が作れるか確認する
///
/// 列全体で訳が `OPTION_COUNT` 種類以上あれば、どの正解に対しても
/// 正解以外から `DISTRACTOR_COUNT` 個選べる。
pub fn check_distractors(table: &CategoryTable, language: Language) -> Result<(), QuizError> {
    let distinct = table.distinct_translations(language).len();
    if distinct < OPTION_COUNT {
        return Err(QuizError::NotEnoughDistractors {
            category: table.category(),
            language: language.name().to_string(),
            found: distinct.saturating_sub(1),
            needed: DISTRACTOR_COUNT,
        });
    }
    Ok(())
}

/// 正解 + ダミー 3 つをシャッフルした選択肢を作る
pub fn build_options<R: Rng + ?Sized>(
    table: &CategoryTable,
    language: Language,
    answer: &str,
    rng: &mut R,
) -> Result<Vec<String>, QuizError> {
    let candidates: Vec<&str> = table
        .distinct_translations(language)
        .into_iter()
        .filter(|word| *word != answer)
        .collect();

    if candidates.len() < DISTRACTOR_COUNT {
        return Err(QuizError::NotEnoughDistractors {
            category: table.category(),
            language: language.name().to_string(),
            found: candidates.len(),
            needed: DISTRACTOR_COUNT,
        });
    }

    let mut options = Vec::with_capacity(OPTION_COUNT);
    options.push(answer.to_string());
    options.extend(
        candidates
            .choose_multiple(rng, DISTRACTOR_COUNT)
            .map(|word| word.to_string()),
    );
    options.shuffle(rng);
    Ok(options)
}
