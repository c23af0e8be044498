// src/main.rs
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use filtui::app::App;
use filtui::config::Config;
use filtui::filesystem::Category;
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::path::PathBuf;
use std::sync::Mutex;
use tracing::info;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging();
    let config = Config::load();
    let start = start_dir(&config);
    let category = config.category.unwrap_or(Category::Images);
    let mut app = App::new(start, category, config.show_hidden);
    info!(
        "filtui {} starting in {}",
        env!("CARGO_PKG_VERSION"),
        app.lister.current_path.display()
    );

    enable_raw_mode()?;
    execute!(io::stdout(), EnterAlternateScreen, EnableMouseCapture)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(io::stdout()))?;

    let result = run(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(io::stdout(), LeaveAlternateScreen, DisableMouseCapture)?;
    terminal.show_cursor()?;

    let config = Config {
        last_dir: Some(app.lister.current_path.clone()),
        category: Some(app.lister.category),
        show_hidden: app.lister.show_hidden,
    };
    if let Err(e) = config.save() {
        eprintln!("Failed to save config: {}", e);
    }

    result
}

fn run(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        terminal.draw(|f| filtui::ui::draw(f, app))?;
        let frame = terminal.size()?;

        match event::read()? {
            Event::Key(key) if key.kind == KeyEventKind::Press => app.handle_key(key, frame),
            Event::Mouse(mouse) => app.handle_mouse(mouse, frame),
            _ => {}
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn start_dir(config: &Config) -> PathBuf {
    if let Some(arg) = std::env::args().nth(1) {
        let path = PathBuf::from(arg);
        if path.is_dir() {
            return path;
        }
    }
    if let Some(ref last) = config.last_dir {
        if last.is_dir() {
            return last.clone();
        }
    }
    dirs::home_dir()
        .filter(|p| p.is_dir())
        .or_else(|| std::env::current_dir().ok())
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Log to a file under the cache dir; the terminal belongs to the TUI.
fn init_logging() {
    let Some(cache) = dirs::cache_dir() else { return };
    let dir = cache.join("filtui");
    if std::fs::create_dir_all(&dir).is_err() {
        return;
    }
    let Ok(file) = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(dir.join("filtui.log"))
    else {
        return;
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .init();
}
