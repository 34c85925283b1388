//! # Pickflow Station Library
//!
//! Terminal front end for the picking workflow. Reads commands from stdin,
//! answers with one JSON line per response on stdout, logs to stderr.
//!
//! ## Module Organization
//! ```text
//! pickflow_cli/
//! ├── lib.rs          ◄─── You are here (start-up & command loop)
//! ├── config.rs       ◄─── pickflow.toml + environment overrides
//! ├── error.rs        ◄─── ApiError for commands, CliError for start-up
//! ├── events.rs       ◄─── Session callbacks into the log
//! ├── timer.rs        ◄─── Delayed auto-advance
//! ├── state/
//! │   ├── session.rs      ◄─── Arc<Mutex<PickingSession>>
//! │   └── preferences.rs  ◄─── Favorites on disk
//! └── commands/
//!     ├── mod.rs      ◄─── Parsing, responses, dispatch
//!     ├── picking.rs  ◄─── Scan, navigation, filter, storage, end
//!     └── favorites.rs
//! ```
//!
//! ## Example Session
//! ```text
//! $ pickflow orders.json --filter past
//! {"type":"snapshot","snapshot":{"phase":{"phase":"awaiting_storage",...}}}
//! > confirm WA-01
//! {"type":"storage","transition":"resumed","snapshot":{...}}
//! > scan A-01-03
//! {"type":"scan","outcome":{"kind":"item_complete",...},"snapshot":{...}}
//! {"type":"advanced","advance":"next_item","automatic":true,"snapshot":{...}}
//! ```

pub mod commands;
pub mod config;
pub mod error;
pub mod events;
pub mod state;
pub mod timer;

use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::Parser;
use pickflow_core::{
    DeliveryFilter, Order, PickingMethod, PickingSession, SessionOptions, SessionOutcome,
};
use pickflow_store::{default_data_dir, Preferences};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tokio::sync::mpsc::{self, UnboundedReceiver};
use tracing::{debug, info, info_span};
use tracing_subscriber::EnvFilter;

use commands::{local_clock, Clock, Command, Response, Station};
use config::PickflowConfig;
use error::{CliError, CliResult};
use events::TracingEvents;
use state::{PreferencesState, SessionState};
use timer::AutoAdvanceTimer;

/// Command-line arguments.
#[derive(Debug, Parser)]
#[command(name = "pickflow", version, about = "Warehouse picking station")]
pub struct Cli {
    /// Order file (JSON array of orders)
    pub orders: PathBuf,

    /// Delivery filter: all, past or YYYY-MM-DD
    #[arg(long)]
    pub filter: Option<DeliveryFilter>,

    /// Picking method: manual or scale
    #[arg(long)]
    pub method: Option<PickingMethod>,

    /// Config file (default: platform config directory)
    #[arg(long)]
    pub config: Option<PathBuf>,
}

/// Runs the station until the session ends or stdin closes.
///
/// ## Startup Sequence
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │                       Station Startup                                   │
/// │                                                                         │
/// │  1. Initialize Logging ───────────────────────────────────────────────► │
/// │     • tracing-subscriber with env filter, to stderr                     │
/// │     • Default: INFO, can be overridden with RUST_LOG                    │
/// │                                                                         │
/// │  2. Load Configuration ───────────────────────────────────────────────► │
/// │     • defaults → pickflow.toml → PICKFLOW_* → command-line flags        │
/// │                                                                         │
/// │  3. Read Orders ──────────────────────────────────────────────────────► │
/// │     • JSON array, validated when the session starts                     │
/// │                                                                         │
/// │  4. Initialize State Objects ─────────────────────────────────────────► │
/// │     • SessionState: picking session behind Arc<Mutex>                   │
/// │     • PreferencesState: favorites in the data directory                 │
/// │                                                                         │
/// │  5. Command Loop ─────────────────────────────────────────────────────► │
/// │     • stdin lines and auto-advance responses, one JSON line each        │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
pub async fn run() -> CliResult<()> {
    let cli = Cli::parse();

    init_tracing();
    info!("Starting Pickflow station");

    let mut config = match &cli.config {
        Some(path) => PickflowConfig::load(Some(path.clone()))?,
        None => PickflowConfig::load_or_default(None),
    };
    if let Some(filter) = cli.filter {
        config.picking.default_filter = filter;
    }
    if let Some(method) = cli.method {
        config.picking.method = method;
    }

    let orders = load_orders(&cli.orders)?;
    info!(path = ?cli.orders, orders = orders.len(), "Orders loaded");

    let data_dir = match &config.storage.data_dir {
        Some(dir) => dir.clone(),
        None => default_data_dir()?,
    };
    let preferences = Preferences::open(data_dir);

    let (station, mut outbox) = open_station(orders, &config, preferences, local_clock())?;

    let stdin = BufReader::new(tokio::io::stdin());
    let mut stdout = std::io::stdout();
    let outcome = drive(&station, &mut outbox, stdin, &mut stdout).await?;

    info!(outcome = ?outcome, "Station stopped");
    Ok(())
}

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=pickflow_cli=trace` - Show trace for the station only
/// - Default: INFO, DEBUG for pickflow crates
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,pickflow_cli=debug,pickflow_store=debug"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Reads the order file.
pub fn load_orders(path: &Path) -> CliResult<Vec<Order>> {
    let contents = std::fs::read_to_string(path).map_err(|source| CliError::OrdersRead {
        path: path.to_path_buf(),
        source,
    })?;

    Order::list_from_json(&contents).map_err(|source| CliError::OrdersParse {
        path: path.to_path_buf(),
        source,
    })
}

/// Starts a picking session and wires up the station around it.
///
/// The receiver yields responses produced outside the command loop
/// (auto-advances). `clock` supplies "today" for the start filter and for
/// every later filter change.
pub fn open_station(
    orders: Vec<Order>,
    config: &PickflowConfig,
    preferences: Preferences,
    clock: Clock,
) -> CliResult<(Station, UnboundedReceiver<Response>)> {
    let span = info_span!("session", session_id = tracing::field::Empty);

    let options = SessionOptions::new(clock())
        .with_filter(config.picking.default_filter)
        .with_method(config.picking.method)
        .with_auto_advance_delay(Duration::from_millis(
            config.picking.auto_advance_delay_ms,
        ));

    let session = PickingSession::new(orders, options, Box::new(TracingEvents::new(span.clone())))?;
    span.record("session_id", tracing::field::display(session.id()));

    info!(
        session_id = %session.id(),
        filter = %session.filter(),
        method = %session.method(),
        items = session.progress().items_total,
        "Picking session started"
    );

    let session = SessionState::new(session);
    let (tx, rx) = mpsc::unbounded_channel();

    let station = Station {
        timer: AutoAdvanceTimer::new(session.clone(), tx),
        session,
        preferences: PreferencesState::new(preferences),
        clock,
    };

    Ok((station, rx))
}

/// The command loop.
///
/// Writes the initial snapshot, then one response per input line and per
/// fired auto-advance. Stops when the session ends; closing the input
/// dismisses a session that is still open.
pub async fn drive<R, W>(
    station: &Station,
    outbox: &mut UnboundedReceiver<Response>,
    input: R,
    output: &mut W,
) -> CliResult<Option<SessionOutcome>>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    write_response(output, &commands::picking::status(&station.session))?;

    let mut lines = input.lines();
    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else {
                    debug!("Input closed");
                    break;
                };

                let response = match Command::parse(&line)
                    .and_then(|command| commands::execute(station, command))
                {
                    Ok(response) => response,
                    Err(error) => {
                        debug!(code = ?error.code, "Command rejected: {}", error.message);
                        Response::from(error)
                    }
                };
                write_response(output, &response)?;

                if station.session.with_session(|s| s.is_ended()) {
                    break;
                }
            }
            Some(response) = outbox.recv() => {
                write_response(output, &response)?;
            }
        }
    }

    if !station.session.with_session(|s| s.is_ended()) {
        let response = match commands::picking::quit(&station.session) {
            Ok(response) => response,
            Err(error) => Response::from(error),
        };
        write_response(output, &response)?;
    }

    Ok(station.session.with_session(|s| s.outcome().cloned()))
}

fn write_response<W: Write>(output: &mut W, response: &Response) -> CliResult<()> {
    let line = serde_json::to_string(response).map_err(std::io::Error::from)?;
    writeln!(output, "{}", line)?;
    output.flush()?;
    Ok(())
}
