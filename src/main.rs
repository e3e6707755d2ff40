use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    event::{DisableBracketedPaste, EnableBracketedPaste},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use paper::{
    app::App,
    app_dirs::AppDirs,
    config::{Config, ConfigStore, FileConfigStore},
    error::PaperError,
    runtime::{CrosstermEventSource, FixedTicker, Runner},
    text,
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use std::{
    error::Error,
    io::{self, stdin},
    path::PathBuf,
    time::Duration,
};
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

/// minimal typing practice: paste a text, type it back
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "Type a text back character by character. Mistakes stay visible until you fix them; the session ends once the whole text matches, with accuracy and speed."
)]
pub struct Cli {
    /// text to type (otherwise paste one once the app is running)
    #[clap(short = 'p', long, conflicts_with = "file")]
    prompt: Option<String>,

    /// read the text to type from a file
    #[clap(short = 'f', long)]
    file: Option<PathBuf>,

    /// config file to use instead of the default location
    #[clap(long)]
    config: Option<PathBuf>,

    /// how long the paper flashes when the end is reached with errors, in ms
    #[clap(long)]
    flash_ms: Option<u64>,

    /// screen refresh interval while idle, in ms
    #[clap(long)]
    tick_rate_ms: Option<u64>,

    /// write the effective settings back to the config file
    #[clap(long)]
    save_config: bool,

    /// print the last session readout as json after exiting
    #[clap(long)]
    json: bool,
}

impl Cli {
    fn config_store(&self) -> FileConfigStore {
        match &self.config {
            Some(path) => FileConfigStore::with_path(path),
            None => FileConfigStore::new(),
        }
    }

    /// Flags win over whatever the config file says.
    fn apply_overrides(&self, mut config: Config) -> Config {
        if let Some(ms) = self.flash_ms {
            config.error_flash_ms = ms;
        }
        if let Some(ms) = self.tick_rate_ms {
            config.tick_rate_ms = ms.max(1);
        }
        config
    }
}

fn init_tracing(filter: &str) -> Option<WorkerGuard> {
    let log_dir = AppDirs::log_dir();
    std::fs::create_dir_all(&log_dir).ok()?;

    let file_appender = tracing_appender::rolling::never(&log_dir, AppDirs::log_file_name());
    let (writer, guard) = tracing_appender::non_blocking(file_appender);
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(filter))
        .unwrap_or_else(|_| EnvFilter::new("paper=info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(writer)
        .with_ansi(false)
        .try_init()
        .ok()?;

    Some(guard)
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, PaperError::NotATty).exit();
    }

    let store = cli.config_store();
    let config = cli.apply_overrides(store.load());
    if cli.save_config {
        store.save(&config)?;
    }

    let _log_guard = init_tracing(&config.log_filter);
    let text = text::initial_text(cli.prompt.as_deref(), cli.file.as_deref())?;
    info!(
        chars = text.chars().count(),
        config = %store.path().display(),
        "starting session"
    );

    let mut app = App::new(text, config);

    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableBracketedPaste)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = start_tui(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        DisableBracketedPaste,
        LeaveAlternateScreen
    )?;
    terminal.show_cursor()?;
    result?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&app.state().snapshot())?);
    }

    Ok(())
}

fn start_tui<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<(), Box<dyn Error>> {
    let runner = Runner::new(
        CrosstermEventSource::new(),
        FixedTicker::new(Duration::from_millis(app.config.tick_rate_ms.max(1))),
    );

    terminal.draw(|f| f.render_widget(&*app, f.area()))?;

    loop {
        let redraw = app.on_event(runner.step());
        if app.should_quit {
            break;
        }
        if redraw {
            terminal.draw(|f| f.render_widget(&*app, f.area()))?;
        }
    }

    info!(
        complete = app.state().is_complete(),
        notifications = app.view().notifications(),
        "leaving"
    );
    Ok(())
}
