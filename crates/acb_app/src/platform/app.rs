use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::sync::{mpsc, Arc};
use std::thread;

use acb_core::{update, AppState, Msg};
use acb_logging::{acb_info, acb_warn};

use super::config::{self, AppConfig};
use super::effects::EffectRunner;
use super::files;
use super::tabulate::TabulatingEngine;
use super::ui;
use super::ui::commands::Command;

/// Everything the main loop reacts to: core messages plus shell-only requests.
pub enum AppEvent {
    Msg(Msg),
    Redraw,
    Help,
    Invalid(String),
    Quit,
}

pub fn run_app() -> anyhow::Result<()> {
    let config = match config::load_config(Path::new(config::CONFIG_FILENAME)) {
        Ok(config) => {
            acb_logging::initialize(config.log_destination, config.log_level);
            config
        }
        Err(err) => {
            let config = AppConfig::default();
            acb_logging::initialize(config.log_destination, config.log_level);
            acb_warn!("{}; using defaults", err);
            config
        }
    };
    acb_info!("starting with {:?}", config);

    let (event_tx, event_rx) = mpsc::channel::<AppEvent>();
    let runner = EffectRunner::new(
        config.source_settings(),
        Arc::new(TabulatingEngine),
        event_tx.clone(),
    );

    let initial_paths: Vec<PathBuf> = std::env::args_os().skip(1).map(PathBuf::from).collect();
    if !initial_paths.is_empty() {
        let _ = event_tx.send(AppEvent::Msg(Msg::FilesSelected(
            files::candidates_from_paths(&initial_paths),
        )));
    }
    spawn_input_loop(event_tx);

    let mut state = AppState::with_display_mode(config.initial_mode);
    let mut stdout = io::stdout();
    writeln!(stdout, "{}", ui::render::render(&state.view()))?;

    while let Ok(event) = event_rx.recv() {
        match event {
            AppEvent::Msg(msg) => {
                let (next, effects) = update(state, msg);
                state = next;
                runner.enqueue(effects);
                if state.consume_dirty() {
                    writeln!(stdout, "{}", ui::render::render(&state.view()))?;
                }
            }
            AppEvent::Redraw => writeln!(stdout, "{}", ui::render::render(&state.view()))?,
            AppEvent::Help => writeln!(stdout, "{}", ui::commands::HELP)?,
            AppEvent::Invalid(message) => writeln!(stdout, "{message}")?,
            AppEvent::Quit => break,
        }
        stdout.flush()?;
    }

    acb_info!("exiting");
    Ok(())
}

/// Reads commands from stdin until `quit` or end of input.
fn spawn_input_loop(event_tx: mpsc::Sender<AppEvent>) {
    thread::spawn(move || {
        let stdin = io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else {
                break;
            };
            let event = match ui::commands::parse_command(&line) {
                Ok(Some(command)) => to_event(command),
                Ok(None) => continue,
                Err(message) => AppEvent::Invalid(message),
            };
            let quit = matches!(event, AppEvent::Quit);
            if event_tx.send(event).is_err() || quit {
                return;
            }
        }
        let _ = event_tx.send(AppEvent::Quit);
    });
}

fn to_event(command: Command) -> AppEvent {
    match command {
        Command::Add(paths) => {
            AppEvent::Msg(Msg::FilesSelected(files::candidates_from_paths(&paths)))
        }
        Command::Remove(file_id) => AppEvent::Msg(Msg::RemoveFileClicked(file_id)),
        Command::Run => AppEvent::Msg(Msg::RunClicked),
        Command::ShowText => AppEvent::Msg(Msg::ShowText),
        Command::ShowTable => AppEvent::Msg(Msg::ShowTable),
        Command::List => AppEvent::Redraw,
        Command::Help => AppEvent::Help,
        Command::Quit => AppEvent::Quit,
    }
}
