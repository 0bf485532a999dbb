// ============================================
// src/session.rs
// 1 回分のクイズの状態 (スコア・何問目か・ミスの記録)
// ============================================

use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::QuizError;
use crate::questions::{Question, build_options, check_distractors, generate_questions};
use crate::vocabulary::{Category, CategoryTable, Language};

/// 間違えた問題の記録
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mistake {
    pub english: String,
    pub correct: String,
    /// 何も選ばずに次へ進んだ場合は None
    pub given: Option<String>,
}

/// 最終結果 (リザルト画面と JSON 出力用)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizResult {
    pub language: Language,
    pub category: Category,
    pub score: u32,
    pub total: u32,
    pub mistakes: Vec<Mistake>,
}

impl QuizResult {
    /// "N/10" 形式のスコア
    pub fn score_text(&self) -> String {
        format!("{}/{}", self.score, self.total)
    }
}

impl fmt::Display for QuizResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Your score is {}", self.score_text())?;
        if !self.mistakes.is_empty() {
            writeln!(f)?;
            writeln!(f, "Incorrect Answers:")?;
            for m in &self.mistakes {
                writeln!(f)?;
                writeln!(
                    f,
                    "Question: {} - Answer: {} - Your Guess: {}",
                    m.english,
                    m.correct,
                    m.given.as_deref().unwrap_or("None")
                )?;
            }
        }
        Ok(())
    }
}

/// `advance` の結果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// 次の問題へ進んだ
    Next,
    /// 全問終わった
    Finished,
}

/// 1 回分のクイズ
#[derive(Debug, Clone)]
pub struct QuizSession<'v> {
    table: &'v CategoryTable, // 選択肢を作るための単語表
    language: Language,
    questions: Vec<Question>,
    current_index: usize,
    score: u32,
    selected_answer: Option<String>,
    options: Vec<String>,
    mistakes: Vec<Mistake>,
    finished: bool,
}

impl<'v> QuizSession<'v> {
    /// 問題を選んでクイズを始める
    pub fn start<R: Rng + ?Sized>(
        table: &'v CategoryTable,
        language: Language,
        rng: &mut R,
    ) -> Result<Self, QuizError> {
        check_distractors(table, language)?;
        let questions = generate_questions(table, language, rng)?;
        Self::with_questions(table, language, questions, rng)
    }

    /// 問題を指定して始める
    pub fn with_questions<R: Rng + ?Sized>(
        table: &'v CategoryTable,
        language: Language,
        questions: Vec<Question>,
        rng: &mut R,
    ) -> Result<Self, QuizError> {
        let Some(first) = questions.first() else {
            return Err(QuizError::NotEnoughRows {
                category: table.category(),
                found: 0,
                needed: 1,
            });
        };
        let options = build_options(table, language, &first.answer, rng)?;

        Ok(Self {
            table,
            language,
            questions,
            current_index: 0,
            score: 0,
            selected_answer: None,
            options,
            mistakes: Vec::new(),
            finished: false,
        })
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn category(&self) -> Category {
        self.table.category()
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn current_question(&self) -> &Question {
        &self.questions[self.current_index]
    }

    pub fn total(&self) -> usize {
        self.questions.len()
    }

    pub fn options(&self) -> &[String] {
        &self.options
    }

    pub fn selected_answer(&self) -> Option<&str> {
        self.selected_answer.as_deref()
    }

    /// 選んだ答えを記録する (何度でも選び直せる)
    pub fn select_answer(&mut self, answer: impl Into<String>) {
        let answer = answer.into();
        debug!(index = self.current_index, %answer, "answer selected");
        self.selected_answer = Some(answer);
    }

    /// 表示中の i 番目の選択肢を選ぶ。範囲外なら false
    pub fn select_option(&mut self, idx: usize) -> bool {
        match self.options.get(idx).cloned() {
            Some(option) => {
                self.select_answer(option);
                true
            }
            None => false,
        }
    }

    /// 採点して次の問題へ進む
    pub fn advance<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<Step, QuizError> {
        if self.finished {
            return Err(QuizError::InvalidTransition {
                action: "advance",
                state: "showing the result",
            });
        }

        // 次の選択肢は採点より前に作る。失敗したら何も変えずに返す
        let next_options = match self.questions.get(self.current_index + 1) {
            Some(next) => Some(build_options(self.table, self.language, &next.answer, rng)?),
            None => None,
        };

        let question = &self.questions[self.current_index];
        let given = self.selected_answer.take();

        if given.as_deref() == Some(question.answer.as_str()) {
            self.score += 1;
        } else {
            self.mistakes.push(Mistake {
                english: question.english.clone(),
                correct: question.answer.clone(),
                given,
            });
        }

        match next_options {
            Some(options) => {
                self.options = options;
                self.current_index += 1;
                Ok(Step::Next)
            }
            None => {
                self.finished = true;
                Ok(Step::Finished)
            }
        }
    }

    /// 現在までの結果
    pub fn result(&self) -> QuizResult {
        QuizResult {
            language: self.language,
            category: self.category(),
            score: self.score,
            total: self.questions.len() as u32,
            mistakes: self.mistakes.clone(),
        }
    }
}
