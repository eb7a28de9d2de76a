use anyhow::{Context, Result};
use crossterm::{
    event::{KeyCode, KeyModifiers},
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand,
};
use ratatui::prelude::*;
use std::io::{stdout, Stdout};
use std::path::PathBuf;
use std::time::Duration;
use web_tools::tui::{App, Event, EventHandler, Focus};

type Tui = Terminal<CrosstermBackend<Stdout>>;

fn init_terminal() -> Result<Tui> {
    enable_raw_mode().context("Failed to enable raw mode")?;
    stdout()
        .execute(EnterAlternateScreen)
        .context("Failed to enter alternate screen")?;
    let backend = CrosstermBackend::new(stdout());
    let terminal = Terminal::new(backend).context("Failed to create terminal")?;
    Ok(terminal)
}

fn restore_terminal() -> Result<()> {
    disable_raw_mode().context("Failed to disable raw mode")?;
    stdout()
        .execute(LeaveAlternateScreen)
        .context("Failed to leave alternate screen")?;
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    // Arguments: [api-url] [state-file]
    let args: Vec<String> = std::env::args().collect();
    let api_url = args
        .get(1)
        .cloned()
        .unwrap_or_else(|| "http://localhost:8080/api".to_string());
    let state_path = args
        .get(2)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(".web-tools-state.json"));

    let mut app = App::new(api_url, state_path);
    app.restore_session();
    app.reload_tools().await;

    let mut terminal = init_terminal().context("Failed to initialize terminal")?;
    terminal.clear().context("Failed to clear terminal")?;

    let mut events = EventHandler::new(Duration::from_millis(250));

    let result = run_app(&mut terminal, &mut app, &mut events).await;

    restore_terminal().context("Failed to restore terminal")?;

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        return Err(e);
    }

    Ok(())
}

async fn run_app(terminal: &mut Tui, app: &mut App, events: &mut EventHandler) -> Result<()> {
    loop {
        terminal
            .draw(|frame| web_tools::tui::ui::render(frame, app))
            .context("Failed to draw terminal")?;

        if let Some(event) = events.next().await {
            match event {
                Event::Tick | Event::Resize => {}
                Event::Key(key) => match app.focus {
                    Focus::Tools => match key.code {
                        KeyCode::Char('q') | KeyCode::Esc => app.quit(),
                        KeyCode::Up | KeyCode::Char('k') => app.select_previous_tool(),
                        KeyCode::Down | KeyCode::Char('j') => app.select_next_tool(),
                        KeyCode::Enter => app.open_selected_tool(),
                        KeyCode::Char('i') => app.start_editing(),
                        KeyCode::Char('m') => app.cycle_mode(),
                        KeyCode::Char('p') => app.process_current().await,
                        KeyCode::Char('c') => app.clear_current(),
                        KeyCode::Char('r') => app.reload_tools().await,
                        KeyCode::Char('s') => app.save_settings().await,
                        KeyCode::Char('t') => app.toggle_theme(),
                        _ => {}
                    },
                    Focus::Input => match key.code {
                        KeyCode::Esc => app.stop_editing(),
                        KeyCode::Char('p') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                            app.process_current().await
                        }
                        KeyCode::Enter => app.push_input_newline(),
                        KeyCode::Backspace => app.pop_input_char(),
                        KeyCode::Char(c) => app.push_input_char(c),
                        _ => {}
                    },
                },
            }
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}
