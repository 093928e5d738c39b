use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen, SetTitle},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    buffer::Buffer,
    Terminal,
};
use std::{env, io, path::PathBuf, time::Duration};

use simpledit::{ui, App, Config, TerminalDialogs};

fn main() -> Result<()> {
    let log_path = simpledit::logging::init();

    let (config, config_warning) = match Config::load() {
        Ok(config) => (config, None),
        Err(e) => {
            log::error!("Failed to load config, using defaults: {:#}", e);
            (Config::default(), Some(format!("Config not loaded, using defaults: {:#}", e)))
        }
    };

    // Setup panic hook to restore terminal
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = restore_terminal();
        original_hook(panic_info);
    }));

    // Setup terminal
    if let Err(e) = enable_raw_mode() {
        eprintln!("Failed to initialize the terminal: {}", e);
        return Err(e.into());
    }
    let mut stdout = io::stdout();
    if let Err(e) = execute!(stdout, EnterAlternateScreen) {
        let _ = disable_raw_mode();
        eprintln!("Failed to configure the terminal: {}", e);
        return Err(e.into());
    }
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(config);
    if let Some(warning) = config_warning {
        app.ui_state.set_warning_message(warning);
    }
    match env::args_os().nth(1) {
        Some(arg) => app.open_from_command_line(&PathBuf::from(arg)),
        None => log::info!("No file specified, starting with empty buffer"),
    }

    let res = run_app(&mut terminal, &mut app);

    // Restore terminal
    restore_terminal()?;

    if let Err(err) = &res {
        log::error!("Application error: {:#}", err);
        eprintln!("simpledit stopped because of an error: {:#}", err);
        if let Some(path) = log_path {
            eprintln!("Details may be in the log: {}", path.display());
        }
    }

    res
}

fn run_app<B: Backend + io::Write>(terminal: &mut Terminal<B>, app: &mut App) -> Result<()> {
    let mut backdrop = Buffer::default();

    loop {
        match terminal.draw(|f| ui::draw(f, app)) {
            Ok(frame) => backdrop = frame.buffer.clone(),
            Err(e) => log::error!("Terminal draw error: {}", e),
        }

        if let Some(title) = app.title_if_changed() {
            if let Err(e) = execute!(terminal.backend_mut(), SetTitle(&title)) {
                log::warn!("Failed to set window title: {}", e);
            }
        }

        // Expire transient status messages
        app.update_status();

        if app.should_quit() {
            break;
        }

        if event::poll(Duration::from_millis(100))? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    let mut dialogs = TerminalDialogs::new(terminal, backdrop.clone());
                    app.handle_key_event(key, &mut dialogs);
                    let notices = dialogs.into_notices();
                    app.show_notices(notices);
                }
                Event::Resize(width, height) => {
                    log::debug!("Terminal resized to {}x{}", width, height);
                }
                _ => {}
            }
        }
    }

    log::info!("Application loop ended");
    Ok(())
}

/// Restore terminal to normal state
fn restore_terminal() -> Result<()> {
    disable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, LeaveAlternateScreen)?;
    // Attempt to show cursor, but don't fail if it errors
    let _ = execute!(stdout, crossterm::cursor::Show);
    Ok(())
}
