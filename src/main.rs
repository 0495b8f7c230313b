mod board;
mod config;
mod error;
mod models;
mod ordering;
mod search;
mod storage;
mod store;
mod timefmt;
mod ui;

use std::fs::OpenOptions;
use std::io;
use std::sync::Mutex;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::prelude::*;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use crate::config::{Args, Config};
use crate::storage::FileSlot;
use crate::store::Store;
use crate::ui::{App, render};

/// 日志写入文件，终端留给 TUI
fn init_logging(config: &Config) -> Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&config.log_path)
        .with_context(|| format!("cannot open log file {}", config.log_path.display()))?;

    let filter = EnvFilter::try_new(&config.log_filter)
        .with_context(|| format!("invalid log filter {:?}", config.log_filter))?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

fn main() -> Result<()> {
    let config = Config::from_args(Args::parse()).context("failed to prepare data directory")?;
    init_logging(&config)?;
    info!(data_dir = %config.data_dir.display(), "starting parley");

    // 加载问题集合
    let mut store = Store::open(Box::new(FileSlot::new(&config.slot_path)));
    store.subscribe(|event, questions| {
        debug!(?event, total = questions.len(), "board changed");
    });

    // 创建应用状态
    let mut app = App::new(store);

    // 崩溃时也要恢复终端
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen, DisableMouseCapture);
        original_hook(info);
    }));

    // 设置终端
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // 主循环
    let result = run_app(&mut terminal, &mut app);

    // 恢复终端
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    // 每次变更都已写入，这里只做提示
    info!(questions = app.store.len(), "shutting down");
    println!("Board saved to {}", config.slot_path.display());

    result
}

fn run_app(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, app: &mut App) -> Result<()> {
    loop {
        terminal.draw(|f| render(f, app))?;

        if let crossterm::event::Event::Key(key) = crossterm::event::read()? {
            if key.kind == crossterm::event::KeyEventKind::Press {
                if ui::handle_key_event(app, key)? {
                    break;
                }
            }
        }
    }
    Ok(())
}
