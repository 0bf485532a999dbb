// ============================================
// src/app.rs
// キー入力 → クイズ操作 の対応
// ============================================

use crossterm::event::KeyCode;
use tracing::warn;

use crate::error::QuizError;
use crate::questions::OPTION_COUNT;
use crate::quiz::{Quiz, State};
use crate::session::QuizResult;
use crate::vocabulary::Language;

/// TUI 側の状態 (クイズ本体 + 画面だけの情報)
pub struct App<'v> {
    pub quiz: Quiz<'v>,
    /// 選択肢のカーソル位置
    pub cursor: usize,
    /// エラーダイアログに出すメッセージ
    pub error: Option<String>,
    /// 最後に終わったクイズの結果 (終了時に表示)
    pub last_result: Option<QuizResult>,
}

impl<'v> App<'v> {
    pub fn new(mut quiz: Quiz<'v>) -> Self {
        quiz.open_selection();
        Self {
            quiz,
            cursor: 0,
            error: None,
            last_result: None,
        }
    }

    /// キー入力の処理。終了するなら true
    pub fn handle_key(&mut self, code: KeyCode) -> bool {
        // エラーダイアログは何かキーを押せば閉じる
        if self.error.take().is_some() {
            return false;
        }

        let outcome = match self.quiz.state() {
            State::AwaitingLanguageSelection | State::AwaitingQuizStart => {
                self.handle_selection_key(code)
            }
            State::ShowingQuestion(_) | State::AnswerSelected(_) => self.handle_question_key(code),
            State::ShowingResult => self.handle_result_key(code),
            State::Terminated => return true,
        };

        if let Err(e) = outcome {
            warn!(error = %e, "action rejected");
            self.error = Some(e.to_string());
        }
        self.quiz.state() == State::Terminated
    }

    /// 選択画面
    fn handle_selection_key(&mut self, code: KeyCode) -> Result<(), QuizError> {
        match code {
            KeyCode::Char(c @ '1'..='3') => {
                let idx = c as usize - '1' as usize;
                self.quiz.select_language(Language::ALL[idx])?;
            }
            KeyCode::Left | KeyCode::Char('h') => self.cycle_language(Language::ALL.len() - 1)?,
            KeyCode::Right | KeyCode::Char('l') => self.cycle_language(1)?,
            KeyCode::Up | KeyCode::Char('k') => {
                self.quiz.select_category(self.quiz.category().prev())?
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.quiz.select_category(self.quiz.category().next())?
            }
            KeyCode::Enter => {
                self.quiz.start_quiz()?;
                self.cursor = 0;
            }
            KeyCode::Char('q') | KeyCode::Esc => self.quiz.quit(),
            _ => {}
        }
        Ok(())
    }

    /// 言語ボタンを左右に移動 (未選択なら先頭から)
    fn cycle_language(&mut self, step: usize) -> Result<(), QuizError> {
        let next = match self.quiz.language() {
            Some(current) => {
                let idx = Language::ALL.iter().position(|&l| l == current).unwrap_or(0);
                Language::ALL[(idx + step) % Language::ALL.len()]
            }
            None => Language::ALL[0],
        };
        self.quiz.select_language(next)
    }

    /// 出題画面
    fn handle_question_key(&mut self, code: KeyCode) -> Result<(), QuizError> {
        match code {
            KeyCode::Char(c @ '1'..='4') => {
                self.cursor = c as usize - '1' as usize;
                self.quiz.select_option(self.cursor)?;
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.cursor = (self.cursor + OPTION_COUNT - 1) % OPTION_COUNT;
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.cursor = (self.cursor + 1) % OPTION_COUNT;
            }
            KeyCode::Char(' ') => {
                self.quiz.select_option(self.cursor)?;
            }
            KeyCode::Enter | KeyCode::Char('n') => {
                self.quiz.advance()?;
                self.cursor = 0;
            }
            KeyCode::Esc => self.quiz.abandon()?,
            _ => {}
        }
        Ok(())
    }

    /// リザルト画面
    fn handle_result_key(&mut self, code: KeyCode) -> Result<(), QuizError> {
        match code {
            KeyCode::Enter | KeyCode::Esc | KeyCode::Char(' ') => {
                self.last_result = Some(self.quiz.dismiss_result()?);
            }
            KeyCode::Char('q') => {
                self.last_result = self.quiz.result().cloned();
                self.quiz.quit();
            }
            _ => {}
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::questions::QUESTION_COUNT;
    use crate::vocabulary::{Category, VocabularyStore, fixtures};
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn app(store: &VocabularyStore) -> App<'_> {
        App::new(Quiz::new(store, StdRng::seed_from_u64(9)))
    }

    #[test]
    fn test_enter_without_language_shows_error_dialog() {
        let store = fixtures::store();
        let mut app = app(&store);

        assert!(!app.handle_key(KeyCode::Enter));
        assert_eq!(app.error.as_deref(), Some("Please select a language"));
        assert_eq!(app.quiz.state(), State::AwaitingQuizStart);

        // 何かキーで閉じる (そのキーは操作として扱わない)
        assert!(!app.handle_key(KeyCode::Char('2')));
        assert!(app.error.is_none());
        assert_eq!(app.quiz.language(), None);
    }

    #[test]
    fn test_selection_keys() {
        let store = fixtures::store();
        let mut app = app(&store);

        app.handle_key(KeyCode::Char('2'));
        assert_eq!(app.quiz.language(), Some(Language::French));
        app.handle_key(KeyCode::Right);
        assert_eq!(app.quiz.language(), Some(Language::Spanish));
        app.handle_key(KeyCode::Right);
        assert_eq!(app.quiz.language(), Some(Language::German));
        app.handle_key(KeyCode::Left);
        assert_eq!(app.quiz.language(), Some(Language::Spanish));

        app.handle_key(KeyCode::Down);
        assert_eq!(app.quiz.category(), Category::FoodDrink);
        app.handle_key(KeyCode::Up);
        app.handle_key(KeyCode::Up);
        assert_eq!(app.quiz.category(), Category::Hobbies);
    }

    #[test]
    fn test_play_through_with_keys() {
        let store = fixtures::store();
        let mut app = app(&store);
        app.quiz.select_category(Category::Numbers).unwrap();
        app.handle_key(KeyCode::Char('1'));
        app.handle_key(KeyCode::Enter);
        assert_eq!(app.quiz.state(), State::ShowingQuestion(0));

        for i in 0..QUESTION_COUNT {
            // 正解の位置を探して選ぶ
            let session = app.quiz.session().unwrap();
            let answer = &session.current_question().answer;
            let idx = session.options().iter().position(|o| o == answer).unwrap();
            for _ in 0..idx {
                app.handle_key(KeyCode::Down);
            }
            app.handle_key(KeyCode::Char(' '));
            assert_eq!(app.quiz.state(), State::AnswerSelected(i));
            app.handle_key(KeyCode::Enter);
            assert_eq!(app.cursor, 0);
        }

        assert_eq!(app.quiz.state(), State::ShowingResult);
        assert!(!app.handle_key(KeyCode::Enter));
        assert_eq!(app.quiz.state(), State::AwaitingQuizStart);
        let result = app.last_result.as_ref().unwrap();
        assert_eq!(result.score as usize, QUESTION_COUNT);
        assert!(result.mistakes.is_empty());
    }

    #[test]
    fn test_number_keys_select_option() {
        let store = fixtures::store();
        let mut app = app(&store);
        app.quiz.select_language(Language::German).unwrap();
        app.quiz.select_category(Category::Numbers).unwrap();
        app.handle_key(KeyCode::Enter);

        app.handle_key(KeyCode::Char('3'));
        let session = app.quiz.session().unwrap();
        assert_eq!(session.selected_answer(), Some(session.options()[2].as_str()));
        assert_eq!(app.cursor, 2);
    }

    #[test]
    fn test_esc_abandons_and_q_exits() {
        let store = fixtures::store();
        let mut app = app(&store);
        app.quiz.select_language(Language::German).unwrap();
        app.quiz.select_category(Category::Numbers).unwrap();
        app.handle_key(KeyCode::Enter);

        assert!(!app.handle_key(KeyCode::Esc));
        assert_eq!(app.quiz.state(), State::AwaitingQuizStart);
        assert!(app.handle_key(KeyCode::Char('q')));
        assert_eq!(app.quiz.state(), State::Terminated);
    }

    #[test]
    fn test_start_error_is_shown_for_short_category() {
        let store = fixtures::store();
        let mut app = app(&store);
        app.quiz.select_language(Language::French).unwrap();
        app.handle_key(KeyCode::Enter); // Animals は 5 行しかない

        let message = app.error.as_deref().unwrap();
        assert!(message.contains("Animals"), "{message}");
        assert_eq!(app.quiz.state(), State::AwaitingQuizStart);
    }
}
