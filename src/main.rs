// ============================================
// src/main.rs (メインファイル)
// ============================================

use std::io::{Result, stdout};
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use console::{Term, style};
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::info;

// 単語表 (CSV)
mod vocabulary;
use vocabulary::VocabularyStore;

// お題と選択肢の生成
mod questions;

// 1 回分のクイズ
mod session;
use session::QuizResult;

// 状態遷移
mod quiz;
use quiz::Quiz;

mod app;
use app::App;

mod config;
use config::Args;

mod error;
mod logging;
mod ui;

use crossterm::{
    ExecutableCommand,
    cursor::Hide,
    event::{self, Event, KeyEventKind},
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};

use ratatui::{
    Terminal,
    backend::{Backend, CrosstermBackend},
};

// --------------------------------------------------
// メイン関数 (TUIセットアップと実行ループ)
// --------------------------------------------------

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let log_path = logging::init(args.log_file.as_deref())?;
    info!(log = %log_path.display(), data_dir = %args.data_dir.display(), "starting");

    // 単語表は起動時に 1 回だけ読む
    let store = VocabularyStore::load(&args.data_dir).with_context(|| {
        format!(
            "failed to load vocabulary from {}",
            args.data_dir.display()
        )
    })?;

    let rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };
    let mut quiz = Quiz::new(&store, rng);
    if let Some(language) = args.language {
        quiz.select_language(language)?;
    }
    quiz.select_category(args.category)?;
    let mut app = App::new(quiz);

    let mut terminal = setup_terminal()?;
    let outcome = run_app(&mut terminal, &mut app);
    restore_terminal(&mut terminal)?;
    outcome?;

    info!("exiting");
    if let Some(result) = &app.last_result {
        print_result(result, args.json)?;
    }
    Ok(())
}

fn setup_terminal() -> Result<Terminal<impl Backend>> {
    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?; // 代替スクリーンを使用
    stdout().execute(Hide)?; // カーソルを非表示
    let backend = CrosstermBackend::new(stdout());
    Terminal::new(backend)
}

fn restore_terminal(terminal: &mut Terminal<impl Backend>) -> Result<()> {
    disable_raw_mode()?;
    stdout().execute(LeaveAlternateScreen)?; // 代替スクリーンを終了
    terminal.show_cursor()?; // カーソルを再表示
    Ok(())
}

fn run_app(terminal: &mut Terminal<impl Backend>, app: &mut App) -> Result<()> {
    loop {
        terminal.draw(|f| ui::draw_ui(f, app))?;

        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press && app.handle_key(key.code) {
                    break;
                }
            }
        }
    }

    Ok(())
}

/// TUI を閉じたあとに最後の結果を表示する
fn print_result(result: &QuizResult, json: bool) -> anyhow::Result<()> {
    let term = Term::stdout();
    if json {
        term.write_line(&serde_json::to_string_pretty(result)?)?;
        return Ok(());
    }

    term.write_line(&format!(
        "{} ({} / {})",
        style(format!("Your score is {}", result.score_text())).bold().cyan(),
        result.language,
        result.category
    ))?;
    if !result.mistakes.is_empty() {
        term.write_line(&style("Incorrect Answers:").bold().to_string())?;
        for m in &result.mistakes {
            term.write_line(&format!(
                "  Question: {} - Answer: {} - Your Guess: {}",
                m.english,
                style(&m.correct).green(),
                style(m.given.as_deref().unwrap_or("None")).red()
            ))?;
        }
    }
    Ok(())
}
