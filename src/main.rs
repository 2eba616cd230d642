// SPDX-FileCopyrightText: 2025 The tagtree Contributors
// SPDX-License-Identifier: GPL-3.0-or-later

mod app;
mod config;
mod errors;
mod export;
mod theme;
mod tree;
mod tui;

use app::App;

use std::env;
use std::fs;
use std::io::stdout;
use std::path::PathBuf;

use tracing_appender::rolling::RollingFileAppender;
use tracing_appender::rolling::Rotation;

use ratatui::{backend::CrosstermBackend, Terminal};

use tracing_subscriber::filter::Targets;
use tracing_subscriber::{filter::LevelFilter, fmt, prelude::*};

use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};

use clap::Parser;

const DEFAULT_LOG_FILTER: LevelFilter = LevelFilter::INFO;

#[derive(Parser, Debug)]
#[command(name = "tagtree", version, about = "Terminal editor for nested tag trees")]
struct Cli {
    /// Tracing filter for the log file, e.g. "tagtree=debug".
    #[arg(long)]
    log_filter: Option<String>,

    /// Do not copy exports to the system clipboard.
    #[arg(long)]
    no_clipboard: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let base_data_dir = config::get_app_paths()
        .map(|(_, data_dir)| data_dir)
        .unwrap_or_else(|| env::current_dir().unwrap_or_else(|_| PathBuf::from(".")));
    let log_dir = base_data_dir.join("logs");
    let general_log = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .max_log_files(7)
        .filename_prefix("app")
        .filename_suffix("log")
        .build(&log_dir)
        .expect("Failed to initialize rolling file appender");
    let (non_blocking_general, _guard_general) = tracing_appender::non_blocking(general_log);
    let _subscriber_result = {
        if fs::create_dir_all(&log_dir).is_ok() {
            let filter = cli
                .log_filter
                .as_deref()
                .and_then(|raw| raw.parse::<Targets>().ok())
                .unwrap_or_else(|| Targets::new().with_default(DEFAULT_LOG_FILTER));

            let general_layer = fmt::layer()
                .with_writer(non_blocking_general)
                .with_ansi(false)
                .with_filter(filter);

            tracing_subscriber::registry()
                .with(general_layer)
                .try_init()
        } else {
            tracing_subscriber::registry().try_init()
        }
    };

    tracing::info!("STARTING TAGTREE");

    let mut settings = config::load_settings();
    if cli.no_clipboard {
        settings.copy_on_export = false;
    }

    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = cleanup_terminal();
        original_hook(panic_info);
    }));

    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(settings);
    let run_result = app.run(&mut terminal);

    cleanup_terminal()?;
    if let Err(e) = run_result {
        eprintln!("[Error] Application failed: {}", e);
    }

    Ok(())
}

fn cleanup_terminal() -> Result<(), Box<dyn std::error::Error>> {
    disable_raw_mode()?;
    execute!(stdout(), LeaveAlternateScreen)?;
    Ok(())
}
