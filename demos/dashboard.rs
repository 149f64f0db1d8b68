//! Demo application recording events and printing the metrics dashboard.
//!
//! Run with:
//! ```bash
//! cargo run --example dashboard --features demo -- --help
//! ```

use clap::{Parser, ValueEnum};
use conteggi::config::{Config, CounterConfig};
use conteggi::dashboard::Dashboard;
use conteggi::keys::EventKey;
use conteggi::observers::json::JsonObserver;
use conteggi::observers::table::{TableObserver, TableStyle};
use conteggi::store::{FileStore, KeyValueStore, MemoryStore};
use conteggi::EventCounter;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

/// Output format for the dashboard.
#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    /// Table with name, description and value
    Table,
    /// Two-column grid of "name: value" cells
    Compact,
    /// JSON snapshot with timestamp
    Json,
}

/// Event to record.
#[derive(Debug, Clone, Copy, ValueEnum)]
enum EventChoice {
    AppLoad,
    NavSwitch,
    ProjectClick,
    StreamView,
}

impl From<EventChoice> for EventKey {
    fn from(choice: EventChoice) -> Self {
        match choice {
            EventChoice::AppLoad => EventKey::APP_LOADS,
            EventChoice::NavSwitch => EventKey::NAV_SWITCHES,
            EventChoice::ProjectClick => EventKey::PROJECT_CLICKS,
            EventChoice::StreamView => EventKey::STREAM_INTERACTIONS,
        }
    }
}

/// Record events and show the dev metrics dashboard.
#[derive(Debug, Parser)]
#[command(name = "dashboard", version)]
struct Args {
    /// Events to record before rendering (repeatable)
    #[arg(short, long, value_enum)]
    record: Vec<EventChoice>,

    /// JSON file used as the durable local store (in-memory if omitted)
    #[arg(short, long)]
    store: Option<PathBuf>,

    /// JSON configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the remote base URL
    #[arg(long)]
    base_url: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
    format: OutputFormat,

    /// Draw tables with plain ASCII borders
    #[arg(long)]
    ascii: bool,

    /// Keep polling and re-render this many times
    #[arg(long, default_value_t = 1)]
    rounds: u32,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => Config::from_json_file(path)?,
        None => Config::default(),
    };
    let counter_config = match &args.base_url {
        Some(url) => config.counter.clone().with_base_url(url.clone()),
        None => config.counter.clone(),
    };

    let store: Arc<dyn KeyValueStore> = match &args.store {
        Some(path) => Arc::new(FileStore::open(path)?),
        None => Arc::new(MemoryStore::new()),
    };

    let counter = Arc::new(EventCounter::connect(store, counter_config)?);
    let dashboard = Arc::new(Dashboard::with_config(
        counter.clone(),
        config.dashboard.clone(),
    ));
    let handle = dashboard.spawn();

    for choice in &args.record {
        let key = EventKey::from(*choice);
        let value = counter.record_event(&key);
        println!("recorded {key} -> local {value}");
    }

    for round in 0..args.rounds.max(1) {
        if round > 0 {
            tokio::time::sleep(config.dashboard.poll_interval()).await;
        } else {
            // let the first sync and the recorded updates land
            dashboard.sync().await;
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
        render(&dashboard, &args, &config.counter)?;
    }

    handle.stop().await;

    println!();
    for line in dashboard.activity() {
        println!("> {line}");
    }
    Ok(())
}

fn render(
    dashboard: &Dashboard,
    args: &Args,
    counter: &CounterConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let style = if args.ascii {
        TableStyle::Ascii
    } else {
        TableStyle::Rounded
    };
    match args.format {
        OutputFormat::Table => {
            let observer = TableObserver::new()
                .with_style(style)
                .with_title(format!("// DEV_METRICS_DASHBOARD ({})", counter.namespace));
            println!("{}", observer.render(dashboard.panels()));
        }
        OutputFormat::Compact => {
            let observer = TableObserver::new().with_style(style).compact(true).columns(2);
            println!("{}", observer.render(dashboard.panels()));
        }
        OutputFormat::Json => {
            let observer = JsonObserver::new()
                .pretty(true)
                .include_timestamp(true)
                .wrap_in_snapshot(true);
            println!("{}", observer.to_json(dashboard.panels())?);
        }
    }
    Ok(())
}
