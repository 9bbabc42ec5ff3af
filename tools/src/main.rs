//! risk-runner: headless driver for the transaction risk desk.
//!
//! Usage:
//!   risk-runner --seed 12345 --count 25 --db history.db
//!   risk-runner --ipc-mode --db history.db --data-dir ./data

use anyhow::Result;
use chrono::{TimeZone, Utc};
use riskdesk_core::{
    clock::Clock,
    config::RiskConfig,
    desk::RiskDesk,
    event::DeskEvent,
    history::History,
    record::ResultRecord,
    rng::InputRng,
    storage::{SnapshotStorage, SqliteStorage},
    types::{RiskStatus, Timestamp, TransactionInput},
};
use std::env;
use std::io::{self, BufRead, Write};

#[derive(serde::Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum IpcCommand {
    GetState,
    Submit {
        #[serde(default)]
        input: TransactionInput,
    },
    Reset,
    ClearHistory,
    Quit,
}

#[derive(serde::Serialize)]
struct UiState<'a> {
    events:  Vec<DeskEvent>,
    current: Option<&'a ResultRecord>,
    history: &'a History,
}

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let seed = parse_arg(&args, "--seed", 42u64);
    let count = parse_arg(&args, "--count", 25usize);
    let ipc_mode = args.iter().any(|a| a == "--ipc-mode");
    let db = args
        .windows(2)
        .find(|w| w[0] == "--db")
        .map(|w| w[1].as_str())
        .unwrap_or(":memory:");
    let data_dir = args
        .windows(2)
        .find(|w| w[0] == "--data-dir")
        .map(|w| w[1].as_str())
        .unwrap_or("./data");

    if !ipc_mode {
        println!("Transaction Risk Desk: risk-runner");
        println!("  seed:      {seed}");
        println!("  count:     {count}");
        println!("  db:        {db}");
        println!("  data_dir:  {data_dir}");
        println!();
    }

    let config = RiskConfig::load(data_dir).unwrap_or_else(|e| {
        log::warn!("{e}; using default thresholds");
        RiskConfig::default()
    });

    let storage = SqliteStorage::open(db)?;
    storage.migrate()?;
    let mut desk = RiskDesk::open(&config, storage);

    if ipc_mode {
        let stdin = io::stdin();
        run_ipc_loop(&mut desk, stdin.lock(), io::stdout())?;
    } else {
        run_batch(&mut desk, seed, count);
        print_summary(desk.history(), count);
    }

    Ok(())
}

/// One JSON command per input line, one JSON state (or `{"error": ..}`)
/// per output line. Stops at EOF or `quit`.
fn run_ipc_loop<S, C, R, W>(desk: &mut RiskDesk<S, C>, mut handle: R, mut stdout: W) -> Result<()>
where
    S: SnapshotStorage,
    C: Clock,
    R: BufRead,
    W: Write,
{
    let mut buffer = String::new();

    loop {
        buffer.clear();
        let bytes_read = handle.read_line(&mut buffer)?;
        if bytes_read == 0 {
            break; // EOF
        }
        if buffer.trim().is_empty() {
            continue;
        }

        let cmd: IpcCommand = match serde_json::from_str(&buffer) {
            Ok(c) => c,
            Err(e) => {
                log::warn!("Unparseable command: {e}");
                let err_json = serde_json::json!({ "error": e.to_string() });
                writeln!(stdout, "{}", err_json)?;
                stdout.flush()?;
                continue;
            }
        };

        let events = match cmd {
            IpcCommand::Quit => break,
            IpcCommand::GetState => Vec::new(),
            IpcCommand::Submit { input } => desk.submit(&input),
            IpcCommand::Reset => desk.reset(),
            IpcCommand::ClearHistory => desk.clear_history(),
        };

        let state = UiState {
            events,
            current: desk.current_result(),
            history: desk.history(),
        };
        writeln!(stdout, "{}", serde_json::to_string(&state)?)?;
        stdout.flush()?;
    }
    Ok(())
}

fn run_batch(desk: &mut RiskDesk<SqliteStorage>, seed: u64, count: usize) {
    let mut rng = InputRng::new(seed);
    let mut tally = [0usize; 3];

    for _ in 0..count {
        let input = rng.transaction();
        for event in desk.submit(&input) {
            if let DeskEvent::TransactionScored { status, .. } = event {
                tally[status_slot(status)] += 1;
            }
        }
    }

    println!("=== SCORED ({count}) ===");
    for status in [RiskStatus::Fraudulent, RiskStatus::MediumRisk, RiskStatus::Legitimate] {
        println!("  {:<24} {}", status.label(), tally[status_slot(status)]);
    }
    println!();
}

fn print_summary(history: &History, submitted: usize) {
    println!("=== HISTORY ({} of {submitted} retained) ===", history.len());
    if history.is_empty() {
        println!("  (No results yet)");
        return;
    }
    for record in history {
        let outcome = record.outcome();
        println!(
            "  {} | {} | {:<24} | {:>3}% | {}",
            record.id(),
            format_timestamp(record.timestamp()),
            outcome.status().label(),
            outcome.score(),
            outcome.recommendation().label(),
        );
    }
}

fn status_slot(status: RiskStatus) -> usize {
    match status {
        RiskStatus::Fraudulent => 0,
        RiskStatus::MediumRisk => 1,
        RiskStatus::Legitimate => 2,
    }
}

fn format_timestamp(ts: Timestamp) -> String {
    Utc.timestamp_millis_opt(ts)
        .single()
        .map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|| ts.to_string())
}

fn parse_arg<T: std::str::FromStr + Copy>(args: &[String], flag: &str, default: T) -> T {
    args.windows(2)
        .find(|w| w[0] == flag)
        .and_then(|w| w[1].parse().ok())
        .unwrap_or(default)
}
