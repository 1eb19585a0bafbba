use std::io::stdout;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use clap::Parser;
use color_eyre::Result;
use crossterm::event::{DisableMouseCapture, EnableMouseCapture};
use crossterm::execute;
use ratatui::DefaultTerminal;

use tripfield::app::{App, InitialValues};
use tripfield::config::{self, Config, SourceKind};
use tripfield::logging;
use tripfield::search::{CatalogSource, HttpSource, SuggestionSource};

/// Upper bound on how long the loop sleeps waiting for input; search
/// responses arrive on a channel and are only noticed on a tick
const MAX_TICK: Duration = Duration::from_millis(50);

#[derive(Parser, Debug)]
#[command(
    name = "tripfield",
    about = "Flight search form with debounced location autocomplete",
    version,
    long_about = None
)]
struct Args {
    /// Config file (default: ~/.config/tripfield/config.toml)
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Query a remote JSON endpoint instead of the built-in catalog
    #[arg(long, value_name = "URL")]
    endpoint: Option<String>,

    /// Catalog file with [[locations]] entries
    #[arg(long, value_name = "PATH")]
    catalog: Option<PathBuf>,

    /// Simulated catalog latency in milliseconds
    #[arg(long, value_name = "MS")]
    latency_ms: Option<u64>,

    /// Make short catalog keywords answer slower (exercises stale responses)
    #[arg(long)]
    stagger: bool,

    /// Quiet period before a search is issued
    #[arg(long, value_name = "MS")]
    debounce_ms: Option<u64>,

    /// Initial origin key
    #[arg(long, value_name = "KEY", default_value = "")]
    origin: String,

    /// Initial destination key
    #[arg(long, value_name = "KEY", default_value = "")]
    destination: String,

    /// Log file (default: platform data dir)
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,

    /// Print the effective configuration and exit
    #[arg(long)]
    dump_config: bool,
}

impl Args {
    fn apply_overrides(&self, config: &mut Config) {
        if let Some(endpoint) = &self.endpoint {
            config.source.kind = SourceKind::Http;
            config.source.endpoint = Some(endpoint.clone());
        }
        if let Some(path) = &self.catalog {
            config.source.catalog_path = Some(path.clone());
        }
        if let Some(latency) = self.latency_ms {
            config.source.latency_ms = latency;
        }
        if self.stagger {
            config.source.stagger = true;
        }
        if let Some(debounce) = self.debounce_ms {
            config.field.debounce_ms = debounce;
        }
    }
}

fn main() -> Result<()> {
    // Install color-eyre panic hook for better error messages
    color_eyre::install()?;

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => config::load_config_from_path(path)?,
        None => config::load_config()?,
    };
    args.apply_overrides(&mut config);
    config::validate(&config)?;

    if args.dump_config {
        print!("{}", config::dump_config(&config)?);
        return Ok(());
    }

    if let Some(path) = args.log_file.clone().or_else(logging::default_log_path)
        && let Err(e) = logging::init_logging(&path)
    {
        eprintln!("Logging disabled: {}", e);
    }

    let initial = InitialValues {
        origin: args.origin.trim().to_string(),
        destination: args.destination.trim().to_string(),
    };

    // Build the source before touching the terminal so errors print normally
    match config.source.kind {
        SourceKind::Catalog => {
            let source = CatalogSource::from_config(&config.source)?;
            log::info!("Using catalog source ({} locations)", source.len());
            start(Arc::new(source), &config, initial)
        }
        SourceKind::Http => {
            let source = HttpSource::from_config(&config.source)?;
            log::info!("Using HTTP source {}", source.endpoint());
            start(Arc::new(source), &config, initial)
        }
    }
}

fn start<S: SuggestionSource>(
    source: Arc<S>,
    config: &Config,
    initial: InitialValues,
) -> Result<()> {
    // Initialize terminal (handles raw mode, alternate screen, etc.)
    let terminal = ratatui::init();
    execute!(stdout(), EnableMouseCapture)?;

    let result = run(terminal, App::new(source, config, initial));

    // Restore terminal (automatic cleanup)
    let _ = execute!(stdout(), DisableMouseCapture);
    ratatui::restore();

    result
}

fn run(mut terminal: DefaultTerminal, mut app: App) -> Result<()> {
    loop {
        terminal.draw(|frame| app.render(frame))?;

        app.handle_events(poll_timeout(app.next_deadline(), Instant::now()))?;
        app.tick(Instant::now());

        if app.should_quit() {
            break;
        }
    }

    if let Some(query) = app.form.last_submission() {
        log::info!("Last search {} -> {}", query.origin, query.destination);
    }
    Ok(())
}

fn poll_timeout(deadline: Option<Instant>, now: Instant) -> Duration {
    deadline.map_or(MAX_TICK, |d| d.saturating_duration_since(now).min(MAX_TICK))
}
