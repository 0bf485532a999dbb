// ============================================
// src/quiz.rs
// 言語選択 → 出題 → リザルト の状態遷移
// ============================================

use rand::rngs::StdRng;
use tracing::{debug, info};

use crate::error::QuizError;
use crate::session::{QuizResult, QuizSession, Step};
use crate::vocabulary::{Category, Language, VocabularyStore};

/// 画面の状態 (添字は何問目か、0 始まり)
///
/// `AwaitingLanguageSelection` は選択画面を開く前だけ。
/// 画面を開いたらカテゴリはデフォルトで決まっているので `AwaitingQuizStart`。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    AwaitingLanguageSelection,
    AwaitingQuizStart,
    ShowingQuestion(usize),
    AnswerSelected(usize),
    ShowingResult,
    Terminated,
}

impl State {
    fn describe(self) -> &'static str {
        match self {
            State::AwaitingLanguageSelection | State::AwaitingQuizStart => "selecting a quiz",
            State::ShowingQuestion(_) | State::AnswerSelected(_) => "a quiz is running",
            State::ShowingResult => "showing the result",
            State::Terminated => "terminated",
        }
    }
}

/// アプリ全体の状態を管理する
pub struct Quiz<'v> {
    store: &'v VocabularyStore, // 単語表への参照
    rng: StdRng,
    language: Option<Language>,
    category: Category,
    session: Option<QuizSession<'v>>,
    result: Option<QuizResult>,
    selection_open: bool, // 選択画面を開いたか
    terminated: bool,
}

impl<'v> Quiz<'v> {
    pub fn new(store: &'v VocabularyStore, rng: StdRng) -> Self {
        Self {
            store,
            rng,
            language: None,
            category: Category::default(),
            session: None,
            result: None,
            selection_open: false,
            terminated: false,
        }
    }

    pub fn state(&self) -> State {
        if self.terminated {
            State::Terminated
        } else if self.result.is_some() {
            State::ShowingResult
        } else if let Some(session) = &self.session {
            match session.selected_answer() {
                Some(_) => State::AnswerSelected(session.current_index()),
                None => State::ShowingQuestion(session.current_index()),
            }
        } else if self.selection_open || self.language.is_some() {
            State::AwaitingQuizStart
        } else {
            State::AwaitingLanguageSelection
        }
    }

    /// 選択画面を開く
    pub fn open_selection(&mut self) {
        if self.session.is_none() && !self.terminated {
            self.selection_open = true;
        }
    }

    pub fn language(&self) -> Option<Language> {
        self.language
    }

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn session(&self) -> Option<&QuizSession<'v>> {
        self.session.as_ref()
    }

    pub fn result(&self) -> Option<&QuizResult> {
        self.result.as_ref()
    }

    /// 選択画面以外で呼ばれたらエラー
    fn require_selecting(&self, action: &'static str) -> Result<(), QuizError> {
        match self.state() {
            State::AwaitingLanguageSelection | State::AwaitingQuizStart => Ok(()),
            state => Err(QuizError::InvalidTransition {
                action,
                state: state.describe(),
            }),
        }
    }

    fn require_session(&self, action: &'static str) -> Result<(), QuizError> {
        match self.state() {
            State::ShowingQuestion(_) | State::AnswerSelected(_) => Ok(()),
            state => Err(QuizError::InvalidTransition {
                action,
                state: state.describe(),
            }),
        }
    }

    /// 言語を選ぶ (選び直したら上書き)
    pub fn select_language(&mut self, language: Language) -> Result<(), QuizError> {
        self.require_selecting("select a language")?;
        debug!(%language, "language selected");
        self.selection_open = true;
        self.language = Some(language);
        Ok(())
    }

    pub fn select_category(&mut self, category: Category) -> Result<(), QuizError> {
        self.require_selecting("select a category")?;
        debug!(%category, "category selected");
        self.selection_open = true;
        self.category = category;
        Ok(())
    }

    /// 10 問選んでクイズを始める。失敗したら状態はそのまま
    pub fn start_quiz(&mut self) -> Result<(), QuizError> {
        self.require_selecting("start a quiz")?;
        self.selection_open = true;
        let language = self.language.ok_or(QuizError::LanguageNotSelected)?;

        let table = self.store.table(self.category)?;
        let session = QuizSession::start(table, language, &mut self.rng)?;
        info!(%language, category = %self.category, "quiz started");
        self.session = Some(session);
        Ok(())
    }

    /// 表示中の i 番目の選択肢を選ぶ。範囲外なら false
    pub fn select_option(&mut self, idx: usize) -> Result<bool, QuizError> {
        self.require_session("select an answer")?;
        Ok(self
            .session
            .as_mut()
            .is_some_and(|session| session.select_option(idx)))
    }

    /// 「Next」: 採点して次の問題かリザルトへ
    pub fn advance(&mut self) -> Result<State, QuizError> {
        self.require_session("advance")?;
        let Some(session) = self.session.as_mut() else {
            return Ok(self.state());
        };

        if session.advance(&mut self.rng)? == Step::Finished {
            let result = session.result();
            info!(
                language = %result.language,
                category = %result.category,
                score = result.score,
                total = result.total,
                "quiz finished"
            );
            self.result = Some(result);
            self.session = None;
        }
        Ok(self.state())
    }

    /// リザルトを閉じて選択画面へ戻る (言語とカテゴリは残す)
    pub fn dismiss_result(&mut self) -> Result<QuizResult, QuizError> {
        match self.result.take() {
            Some(result) => Ok(result),
            None => Err(QuizError::InvalidTransition {
                action: "dismiss the result",
                state: self.state().describe(),
            }),
        }
    }

    /// 途中でやめて選択画面へ戻る
    pub fn abandon(&mut self) -> Result<(), QuizError> {
        self.require_session("abandon the quiz")?;
        if let Some(session) = self.session.take() {
            info!(index = session.current_index(), "quiz abandoned");
        }
        Ok(())
    }

    /// 「Exit」: どの状態からでも終了
    pub fn quit(&mut self) {
        self.session = None;
        self.terminated = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::questions::QUESTION_COUNT;
    use crate::vocabulary::fixtures;
    use rand::SeedableRng;

    fn quiz(store: &VocabularyStore) -> Quiz<'_> {
        Quiz::new(store, StdRng::seed_from_u64(42))
    }

    #[test]
    fn test_start_without_language_is_rejected() {
        let store = fixtures::store();
        let mut quiz = quiz(&store);
        quiz.select_category(Category::Numbers).unwrap();

        let err = quiz.start_quiz().unwrap_err();
        assert!(matches!(err, QuizError::LanguageNotSelected));
        assert_eq!(err.to_string(), "Please select a language");
        assert_eq!(quiz.state(), State::AwaitingQuizStart);
        assert!(quiz.session().is_none());

        // 言語を選べばやり直せる
        quiz.select_language(Language::French).unwrap();
        assert_eq!(quiz.state(), State::AwaitingQuizStart);
        quiz.start_quiz().unwrap();
        assert_eq!(quiz.state(), State::ShowingQuestion(0));
    }

    #[test]
    fn test_selection_screen_awaits_quiz_start() {
        let store = fixtures::store();
        let mut quiz = quiz(&store);
        assert_eq!(quiz.state(), State::AwaitingLanguageSelection);

        quiz.open_selection();
        assert_eq!(quiz.state(), State::AwaitingQuizStart);

        // 言語なしでスタートしても画面はそのまま
        assert!(matches!(quiz.start_quiz(), Err(QuizError::LanguageNotSelected)));
        assert_eq!(quiz.state(), State::AwaitingQuizStart);
        quiz.select_language(Language::Spanish).unwrap();
        assert_eq!(quiz.state(), State::AwaitingQuizStart);
    }

    #[test]
    fn test_language_selectable_before_screen_opens() {
        let store = fixtures::store();
        let mut quiz = quiz(&store);
        quiz.select_language(Language::German).unwrap();
        assert_eq!(quiz.state(), State::AwaitingQuizStart);
        assert_eq!(quiz.language(), Some(Language::German));
    }

    #[test]
    fn test_select_option_out_of_range() {
        let store = fixtures::store();
        let mut quiz = quiz(&store);
        quiz.select_language(Language::French).unwrap();
        quiz.select_category(Category::Numbers).unwrap();
        quiz.start_quiz().unwrap();

        assert!(!quiz.select_option(4).unwrap());
        assert_eq!(quiz.state(), State::ShowingQuestion(0));
        assert!(quiz.select_option(3).unwrap());
        assert_eq!(quiz.state(), State::AnswerSelected(0));
    }

    #[test]
    fn test_language_can_be_reselected() {
        let store = fixtures::store();
        let mut quiz = quiz(&store);
        quiz.select_language(Language::German).unwrap();
        quiz.select_language(Language::Spanish).unwrap();
        assert_eq!(quiz.language(), Some(Language::Spanish));
    }

    #[test]
    fn test_full_run_reaches_result() {
        let store = fixtures::store();
        let mut quiz = quiz(&store);
        quiz.select_language(Language::French).unwrap();
        quiz.select_category(Category::Numbers).unwrap();
        quiz.start_quiz().unwrap();

        for i in 0..QUESTION_COUNT {
            assert_eq!(quiz.state(), State::ShowingQuestion(i));
            assert!(quiz.select_option(0).unwrap());
            assert_eq!(quiz.state(), State::AnswerSelected(i));
            quiz.advance().unwrap();
        }

        assert_eq!(quiz.state(), State::ShowingResult);
        let result = quiz.result().unwrap();
        assert_eq!(result.category, Category::Numbers);
        assert_eq!(result.score as usize + result.mistakes.len(), QUESTION_COUNT);
    }

    #[test]
    fn test_dismissing_result_keeps_selection() {
        let store = fixtures::store();
        let mut quiz = quiz(&store);
        quiz.select_language(Language::German).unwrap();
        quiz.select_category(Category::Numbers).unwrap();
        quiz.start_quiz().unwrap();
        for _ in 0..QUESTION_COUNT {
            quiz.advance().unwrap();
        }

        let result = quiz.dismiss_result().unwrap();
        assert_eq!(result.score, 0);
        assert_eq!(result.mistakes.len(), QUESTION_COUNT);
        assert_eq!(quiz.state(), State::AwaitingQuizStart);
        assert_eq!(quiz.language(), Some(Language::German));
        assert_eq!(quiz.category(), Category::Numbers);
    }

    #[test]
    fn test_selection_is_locked_while_quiz_runs() {
        let store = fixtures::store();
        let mut quiz = quiz(&store);
        quiz.select_language(Language::German).unwrap();
        quiz.select_category(Category::Numbers).unwrap();
        quiz.start_quiz().unwrap();

        assert!(matches!(
            quiz.select_language(Language::French),
            Err(QuizError::InvalidTransition { .. })
        ));
        assert!(quiz.start_quiz().is_err());
        assert_eq!(quiz.language(), Some(Language::German));
    }

    #[test]
    fn test_answer_and_advance_need_a_running_quiz() {
        let store = fixtures::store();
        let mut quiz = quiz(&store);
        assert!(quiz.select_option(0).is_err());
        assert!(quiz.advance().is_err());
        assert!(quiz.dismiss_result().is_err());
    }

    #[test]
    fn test_short_category_reports_error_and_stays() {
        let store = fixtures::store();
        let mut quiz = quiz(&store);
        quiz.select_language(Language::German).unwrap();
        quiz.select_category(Category::Animals).unwrap();

        assert!(matches!(quiz.start_quiz(), Err(QuizError::NotEnoughRows { .. })));
        assert_eq!(quiz.state(), State::AwaitingQuizStart);

        quiz.select_category(Category::Hobbies).unwrap();
        assert!(matches!(
            quiz.start_quiz(),
            Err(QuizError::CategoryNotLoaded(Category::Hobbies))
        ));
    }

    #[test]
    fn test_abandon_and_quit() {
        let store = fixtures::store();
        let mut quiz = quiz(&store);
        quiz.select_language(Language::Spanish).unwrap();
        quiz.select_category(Category::Numbers).unwrap();
        quiz.start_quiz().unwrap();
        quiz.advance().unwrap();

        quiz.abandon().unwrap();
        assert_eq!(quiz.state(), State::AwaitingQuizStart);
        assert!(quiz.result().is_none());

        quiz.quit();
        assert_eq!(quiz.state(), State::Terminated);
        assert!(quiz.select_language(Language::German).is_err());
    }
}
