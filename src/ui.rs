// --------------------------------------------------
// UI描画
// --------------------------------------------------

use ratatui::{
    layout::Flex,
    prelude::*,
    style::{Color, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Gauge, Paragraph, Wrap},
};

use crate::app::App;
use crate::quiz::State;
use crate::session::QuizSession;
use crate::vocabulary::{Category, LANGUAGE_COUNT, Language};

/// ボタンの強調色
const ACCENT: Color = Color::Rgb(0x00, 0x8E, 0xFE);
const BUTTON_BG: Color = Color::Rgb(0xCC, 0xCC, 0xCC);
const BUTTON_FG: Color = Color::Rgb(0x30, 0x30, 0x30);

pub fn draw_ui(f: &mut Frame, app: &App) {
    let size = f.area();
    // 枠線を描画
    let block = Block::default().borders(Borders::ALL).title("Vocab Wiz !");
    let inner_area = block.inner(size);
    f.render_widget(block, size);

    match app.quiz.state() {
        State::ShowingQuestion(_) | State::AnswerSelected(_) => {
            if let Some(session) = app.quiz.session() {
                draw_question(f, inner_area, session, app.cursor);
            }
        }
        _ => draw_selection(f, inner_area, app),
    }

    // リザルトはダイアログで上に重ねる
    if let Some(result) = app.quiz.result() {
        draw_dialog(
            f,
            "Quiz Complete",
            &result.to_string(),
            "[Enter] Close  [q] Exit",
            Color::White,
        );
    }
    if let Some(message) = &app.error {
        draw_dialog(f, "Error", message, "Press any key", Color::Red);
    }
}

/// ボタン風のスタイル
fn button_style(active: bool) -> Style {
    if active {
        Style::default().fg(Color::White).bg(ACCENT).bold()
    } else {
        Style::default().fg(BUTTON_FG).bg(BUTTON_BG)
    }
}

// MARK:選択画面
fn draw_selection(f: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // [0] タイトル
            Constraint::Length(1), // [1] "Select Quiz Language:"
            Constraint::Length(3), // [2] 言語ボタン
            Constraint::Length(1), // [3] 選択中の言語
            Constraint::Length(1), // [4] 空白
            Constraint::Length(1), // [5] "Select Category:"
            Constraint::Length(Category::ALL.len() as u16), // [6] カテゴリ一覧
            Constraint::Min(1),    // [7] 空白
            Constraint::Length(1), // [8] 操作説明
        ])
        .split(area);

    f.render_widget(
        Paragraph::new("\nLANGUAGES EXAM PRACTICE")
            .style(Style::default().fg(Color::White).bold())
            .centered(),
        chunks[0],
    );

    f.render_widget(
        Paragraph::new("Select Quiz Language:").centered(),
        chunks[1],
    );

    // 言語ボタン (横並び 3 つ)
    let button_row = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(14); LANGUAGE_COUNT])
        .flex(Flex::SpaceAround)
        .split(chunks[2]);
    for (i, language) in Language::ALL.iter().enumerate() {
        let active = app.quiz.language() == Some(*language);
        f.render_widget(
            Paragraph::new(format!("[{}] {}", i + 1, language))
                .style(button_style(active))
                .block(Block::default().borders(Borders::ALL))
                .centered(),
            button_row[i],
        );
    }

    let selected = match app.quiz.language() {
        Some(language) => format!("Selected Quiz Language: {language}"),
        None => "Select Quiz Language: None".to_string(),
    };
    f.render_widget(
        Paragraph::new(selected)
            .style(Style::default().fg(Color::Gray))
            .centered(),
        chunks[3],
    );

    f.render_widget(Paragraph::new("Select Category:").centered(), chunks[5]);

    // カテゴリ一覧 (選択中だけ強調)
    let categories: Vec<Line> = Category::ALL
        .iter()
        .map(|category| {
            if *category == app.quiz.category() {
                Line::from(Span::styled(format!("> {category} <"), button_style(true)))
            } else {
                Line::from(Span::styled(
                    category.to_string(),
                    Style::default().fg(Color::Gray),
                ))
            }
        })
        .collect();
    f.render_widget(Paragraph::new(categories).centered(), chunks[6]);

    f.render_widget(
        Paragraph::new("[1-3/←→] Language  [↑↓] Category  [Enter] Start Quiz  [q] Exit")
            .style(Style::default().fg(Color::DarkGray))
            .centered(),
        chunks[8],
    );
}

// MARK:出題画面
fn draw_question(f: &mut Frame, area: Rect, session: &QuizSession, cursor: usize) {
    let mut constraints = vec![
        Constraint::Length(1), // [0] 進捗ゲージ
        Constraint::Length(1), // [1] 空白
        Constraint::Length(2), // [2] 問題文
    ];
    constraints.extend(session.options().iter().map(|_| Constraint::Length(3)));
    constraints.push(Constraint::Min(1));
    constraints.push(Constraint::Length(1)); // 操作説明

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(area);

    // 0. 進捗 (何問目か)
    let number = session.current_index() + 1;
    let total = session.total();
    let gauge = Gauge::default()
        .block(Block::default().borders(Borders::NONE))
        .gauge_style(Style::default().fg(ACCENT).bg(Color::Black))
        .ratio(number as f64 / total.max(1) as f64)
        .label(format!(
            "Question {number}/{total}  ({} / {})",
            session.language(),
            session.category()
        ));
    f.render_widget(gauge, chunks[0]);

    // 1. 問題文
    let question = session.current_question();
    f.render_widget(
        Paragraph::new(format!(
            "What is \"{}\" in {}?",
            question.english,
            session.language()
        ))
        .style(Style::default().fg(Color::White).bold())
        .wrap(Wrap { trim: true })
        .centered(),
        chunks[2],
    );

    // 2. 選択肢ボタン
    for (i, option) in session.options().iter().enumerate() {
        let active = session.selected_answer() == Some(option.as_str());
        let border = if i == cursor {
            Style::default().fg(ACCENT)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        let button_area = centered_width(chunks[3 + i], 30);
        f.render_widget(
            Paragraph::new(format!("{}. {}", i + 1, option))
                .style(button_style(active))
                .block(Block::default().borders(Borders::ALL).border_style(border))
                .centered(),
            button_area,
        );
    }

    let help_idx = chunks.len() - 1;
    f.render_widget(
        Paragraph::new("[1-4/Space] Select  [↑↓] Move  [Enter] Next  [Esc] Quit quiz")
            .style(Style::default().fg(Color::DarkGray))
            .centered(),
        chunks[help_idx],
    );
}

// MARK:ダイアログ
fn draw_dialog(f: &mut Frame, title: &str, body: &str, footer: &str, color: Color) {
    let area = popup_area(f.area(), 70, 70);
    f.render_widget(Clear, area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(color))
        .title(title.to_string())
        .title_bottom(Line::from(footer.to_string()).right_aligned());
    f.render_widget(
        Paragraph::new(body.to_string())
            .block(block)
            .wrap(Wrap { trim: false }),
        area,
    );
}

/// 横幅 `width` で中央寄せした領域
fn centered_width(area: Rect, width: u16) -> Rect {
    let [area] = Layout::horizontal([Constraint::Length(width)])
        .flex(Flex::Center)
        .areas(area);
    area
}

/// 画面中央のダイアログ領域
fn popup_area(area: Rect, percent_x: u16, percent_y: u16) -> Rect {
    let [area] = Layout::vertical([Constraint::Percentage(percent_y)])
        .flex(Flex::Center)
        .areas(area);
    let [area] = Layout::horizontal([Constraint::Percentage(percent_x)])
        .flex(Flex::Center)
        .areas(area);
    area
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quiz::Quiz;
    use crate::vocabulary::{VocabularyStore, fixtures};
    use crossterm::event::KeyCode;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use ratatui::backend::TestBackend;

    fn render(app: &App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(100, 40)).unwrap();
        terminal.draw(|f| draw_ui(f, app)).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    fn app(store: &VocabularyStore) -> App<'_> {
        App::new(Quiz::new(store, StdRng::seed_from_u64(11)))
    }

    #[test]
    fn test_selection_screen() {
        let store = fixtures::store();
        let mut app = app(&store);
        let screen = render(&app);
        assert!(screen.contains("LANGUAGES EXAM PRACTICE"));
        assert!(screen.contains("Select Quiz Language: None"));
        assert!(screen.contains("Food & Drink"));

        app.handle_key(KeyCode::Char('3'));
        assert!(render(&app).contains("Selected Quiz Language: Spanish"));
    }

    #[test]
    fn test_question_screen_shows_prompt_and_options() {
        let store = fixtures::store();
        let mut app = app(&store);
        app.quiz.select_language(Language::French).unwrap();
        app.quiz.select_category(Category::Numbers).unwrap();
        app.quiz.start_quiz().unwrap();

        let screen = render(&app);
        let session = app.quiz.session().unwrap();
        let prompt = format!("What is \"{}\" in French?", session.current_question().english);
        assert!(screen.contains(&prompt), "{screen}");
        assert!(screen.contains("Question 1/10"));
        for option in session.options() {
            assert!(screen.contains(option.as_str()));
        }
    }

    #[test]
    fn test_error_and_result_dialogs() {
        let store = fixtures::store();
        let mut app = app(&store);
        app.handle_key(KeyCode::Enter);
        assert!(render(&app).contains("Please select a language"));

        app.handle_key(KeyCode::Esc); // ダイアログを閉じる
        app.quiz.select_language(Language::German).unwrap();
        app.quiz.select_category(Category::Numbers).unwrap();
        app.quiz.start_quiz().unwrap();
        for _ in 0..10 {
            app.quiz.advance().unwrap();
        }
        let screen = render(&app);
        assert!(screen.contains("Quiz Complete"));
        assert!(screen.contains("Your score is 0/10"));
    }
}
