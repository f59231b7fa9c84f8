//! `insview`: browse insurance policies with cascading filters.
//!
//! # Usage
//!
//! ```
//! insview                                   # import data.csv, then browse
//! insview import --data ~/policies.csv
//! insview query --field earthquake --value Yes
//! insview values --field state
//! ```

mod app;
mod format;
mod sheet;
mod settings;
mod ui;

use std::{
  io,
  path::{Path, PathBuf},
  sync::Mutex,
  time::Duration,
};

use anyhow::{Context, Result, bail};
use app::App;
use clap::{Parser, Subcommand};
use crossterm::{
  event::{self, Event},
  execute,
  terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use insview_core::{
  field::{FieldValue, Selector},
  filter::FilterEngine,
  store::PolicyStore,
};
use insview_store_sqlite::SqliteStore;
use ratatui::{Terminal, backend::CrosstermBackend};
use settings::{Overrides, ViewerConfig};
use tracing::{info, level_filters::LevelFilter, warn};
use tracing_subscriber::EnvFilter;

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "insview", version, about = "Browse insurance policy records")]
struct Args {
  /// Path to a TOML config file (store_path, data_path, log_path).
  #[arg(short, long, value_name = "FILE", default_value = "insview.toml")]
  config: PathBuf,

  /// SQLite store file.
  #[arg(long, value_name = "FILE")]
  store: Option<PathBuf>,

  /// Spreadsheet (CSV export) to ingest.
  #[arg(long, value_name = "FILE")]
  data: Option<PathBuf>,

  #[command(subcommand)]
  command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
  /// Import the spreadsheet, then browse it interactively (the default).
  Browse,
  /// Import the spreadsheet and report inserted and skipped rows.
  Import,
  /// Print the policies matching a filter.
  Query {
    /// Field to filter on, or `all`.
    #[arg(long, default_value = "all")]
    field: String,
    /// Value the field must equal ("Yes"/"No" for earthquake and flood).
    #[arg(long)]
    value: Option<String>,
    /// Emit JSON instead of a tab-separated table.
    #[arg(long)]
    json: bool,
  },
  /// Print the secondary filter options for a field.
  Values {
    #[arg(long)]
    field: String,
  },
}

// ─── Entry point ──────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
  let args = Args::parse();
  let cfg = ViewerConfig::load(&args.config, Overrides {
    store_path: args.store,
    data_path:  args.data,
  })?;
  let command = args.command.unwrap_or(Command::Browse);

  // The browser owns the terminal, so its logs go to a file.
  let log_file = matches!(command, Command::Browse).then_some(cfg.log_path.as_path());
  init_tracing(log_file)?;

  let store = SqliteStore::open(&cfg.store_path)
    .await
    .with_context(|| format!("failed to open store at {:?}", cfg.store_path))?;

  match command {
    Command::Browse => {
      if cfg.data_path.exists() {
        import(&store, &cfg.data_path).await?;
      } else {
        warn!(path = %cfg.data_path.display(), "spreadsheet not found; browsing stored policies");
      }
      browse(store).await
    }
    Command::Import => {
      let report = import(&store, &cfg.data_path).await?;
      println!("inserted {}, skipped {}", report.inserted, report.skipped);
      Ok(())
    }
    Command::Query { field, value, json } => query(store, &field, value.as_deref(), json).await,
    Command::Values { field } => {
      let mut engine = FilterEngine::new(store).await?;
      engine.select_primary(Selector::Field(field.parse()?)).await?;
      for option in engine.options() {
        println!("{option}");
      }
      Ok(())
    }
  }
}

fn init_tracing(log_file: Option<&Path>) -> Result<()> {
  let filter = EnvFilter::builder()
    .with_default_directive(LevelFilter::INFO.into())
    .from_env_lossy();

  match log_file {
    Some(path) => {
      let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("opening log file {}", path.display()))?;
      tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .init();
    }
    None => {
      tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
    }
  }
  Ok(())
}

// ─── Commands ─────────────────────────────────────────────────────────────────

async fn import(
  store: &SqliteStore,
  path: &Path,
) -> Result<insview_core::store::IngestReport> {
  let rows = sheet::read_rows(path)?;
  info!(rows = rows.len(), path = %path.display(), "importing spreadsheet");
  store
    .ingest(rows)
    .await
    .context("ingest aborted; the store may be partially updated")
}

async fn query(store: SqliteStore, field: &str, value: Option<&str>, json: bool) -> Result<()> {
  let mut engine = FilterEngine::new(store).await?;

  if let Selector::Field(field) = field.parse::<Selector>()? {
    let Some(value) = value else {
      bail!("--value is required when filtering on {field}");
    };
    engine.select_primary(Selector::Field(field)).await?;
    engine
      .select_secondary(FieldValue::parse_for(field, value)?)
      .await?;
  }

  if json {
    println!("{}", serde_json::to_string_pretty(engine.visible_rows())?);
    return Ok(());
  }

  println!("{}", format::headings().join("\t"));
  for record in engine.visible_rows() {
    println!("{}", format::row_cells(record).join("\t"));
  }
  eprintln!("{} entries", engine.entry_count());
  Ok(())
}

// ─── Browser ──────────────────────────────────────────────────────────────────

async fn browse(store: SqliteStore) -> Result<()> {
  let engine = FilterEngine::new(store).await?;
  let mut app = App::new(engine);

  enable_raw_mode().context("enabling raw mode")?;
  let mut stdout = io::stdout();
  execute!(stdout, EnterAlternateScreen).context("entering alternate screen")?;
  let backend = CrosstermBackend::new(stdout);
  let mut terminal = Terminal::new(backend).context("creating terminal")?;

  let run_result = run_event_loop(&mut terminal, &mut app).await;

  // Restore terminal regardless of result.
  disable_raw_mode().ok();
  execute!(terminal.backend_mut(), LeaveAlternateScreen).ok();
  terminal.show_cursor().ok();

  run_result
}

async fn run_event_loop<S: PolicyStore>(
  terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
  app: &mut App<S>,
) -> Result<()> {
  loop {
    terminal.draw(|f| ui::draw(f, app)).context("drawing frame")?;

    // Poll for an event, yielding control to tokio while waiting.
    let maybe_event = tokio::task::block_in_place(|| {
      if event::poll(Duration::from_millis(50))? {
        Ok::<_, io::Error>(Some(event::read()?))
      } else {
        Ok(None)
      }
    })?;

    if let Some(Event::Key(key)) = maybe_event
      && !app.handle_key(key).await
    {
      break;
    }
  }

  Ok(())
}
