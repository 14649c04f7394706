//! PrefHub scenario runner.
//!
//! Replays scripted test scenarios against a PrefHub server running in
//! scenario mode.
//!
//! # Usage
//!
//! ```bash
//! # Run a test against the default server
//! cargo run -p prefhub_scenarios -- run test0
//!
//! # Point at another server and storage directory
//! cargo run -p prefhub_scenarios -- run test0 --base-url http://localhost:9000 \
//!     --storage-dir /tmp/game-data-scenarios
//!
//! # List and validate tests
//! cargo run -p prefhub_scenarios -- list
//! cargo run -p prefhub_scenarios -- validate
//! ```
//!
//! Logs go to stderr; result banners go to stdout. The exit code is 0 when
//! everything passed and 1 otherwise.

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Duration;

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use prefhub_client::{ClientConfig, DEFAULT_BASE_URL};
use prefhub_core::PlayerSeat;
use prefhub_scenarios::{
    config::DEFAULT_TOKEN_FILE, default_scenarios_file, default_storage_root, validate_store,
    ExecutorConfig, ScenarioExecutor, ScenarioStore, StorageDirTokenSource,
};

#[derive(Parser)]
#[command(name = "prefhub-scenarios")]
#[command(about = "Scenario-driven integration tests for the PrefHub server")]
#[command(version)]
struct Cli {
    /// Enable verbose logging to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Scenario file (defaults to the server's test-scenarios.json)
    #[arg(long, global = true)]
    scenarios: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run one named test
    Run {
        /// Test name from the scenario file
        test: String,

        /// Server base URL
        #[arg(long, default_value = DEFAULT_BASE_URL)]
        base_url: String,

        /// Scenario storage root holding the run directories
        #[arg(long)]
        storage_dir: Option<PathBuf>,

        /// Token file name inside the run directory
        #[arg(long, default_value = DEFAULT_TOKEN_FILE)]
        token_file: String,

        /// Seat used to read the final game state
        #[arg(long, default_value = "playerSouth")]
        observer: PlayerSeat,

        /// Pause after each move, in milliseconds
        #[arg(long, default_value = "100")]
        move_delay_ms: u64,

        /// Request timeout in seconds
        #[arg(long)]
        timeout_secs: Option<u64>,

        /// Write a JSON report of the run here
        #[arg(long)]
        report: Option<PathBuf>,
    },

    /// List the tests in the scenario file
    List,

    /// Check the scenario file without contacting a server
    Validate,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let log_level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_ansi(true),
        )
        .with(tracing_subscriber::filter::LevelFilter::from_level(
            log_level,
        ))
        .init();

    let Some(store) = load_store(cli.scenarios.as_deref()) else {
        return ExitCode::FAILURE;
    };

    let passed = match cli.command {
        Commands::Run {
            test,
            base_url,
            storage_dir,
            token_file,
            observer,
            move_delay_ms,
            timeout_secs,
            report,
        } => {
            let mut client = ClientConfig::new(base_url);
            if let Some(secs) = timeout_secs {
                client = client.with_timeout(Duration::from_secs(secs));
            }
            let config = ExecutorConfig::default()
                .with_move_delay(Duration::from_millis(move_delay_ms))
                .with_observer(observer);
            let storage = storage_dir
                .or_else(default_storage_root)
                .unwrap_or_else(|| PathBuf::from("game-data-scenarios"));
            cmd_run(
                store,
                &test,
                client,
                StorageDirTokenSource::new(storage).with_file_name(token_file),
                config,
                report.as_deref(),
            )
        }
        Commands::List => cmd_list(&store),
        Commands::Validate => cmd_validate(&store),
    };

    if passed {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

fn load_store(path: Option<&Path>) -> Option<ScenarioStore> {
    let Some(path) = path.map(Path::to_path_buf).or_else(default_scenarios_file) else {
        tracing::error!("No scenario file given and none found in the default locations");
        eprintln!("FATAL: No scenario file found. Pass --scenarios <FILE>.");
        return None;
    };

    match ScenarioStore::load(&path) {
        Ok(store) => {
            tracing::info!(path = %path.display(), tests = store.len(), "Loaded scenarios");
            Some(store)
        }
        Err(e) => {
            tracing::error!(error = %e, path = %path.display(), "Failed to load scenarios");
            eprintln!("FATAL: {e}");
            None
        }
    }
}

/// Run a single test and print the result banner.
fn cmd_run(
    store: ScenarioStore,
    test: &str,
    client: ClientConfig,
    tokens: StorageDirTokenSource,
    config: ExecutorConfig,
    report_path: Option<&Path>,
) -> bool {
    tracing::info!(
        test = test,
        server = %client.base_url,
        storage = %tokens.root().display(),
        move_delay_ms = config.move_delay.as_millis(),
        observer = %config.observer,
        "Run configuration"
    );

    let mut executor = ScenarioExecutor::new(store, tokens, client, config);
    let result = executor.execute_test(test);

    // Written before the banner; a failed write fails the run.
    let report_saved = match (&result, report_path) {
        (Ok(report), Some(path)) => match report.save(path) {
            Ok(()) => true,
            Err(e) => {
                tracing::error!(error = %e, path = %path.display(), "Failed to save report");
                false
            }
        },
        _ => true,
    };

    println!("\n{}", "=".repeat(60));
    let passed = match &result {
        Ok(report) if report_saved => {
            println!("TEST PASSED: {test}");
            for scenario in &report.scenarios {
                let phase = scenario.final_phase.as_deref().unwrap_or("unknown");
                println!(
                    "  {}: {} moves, final phase {}",
                    scenario.name, scenario.moves_dispatched, phase
                );
            }
            true
        }
        Ok(_) => {
            println!("TEST FAILED: {test}");
            if let Some(path) = report_path {
                println!("  REPORT NOT SAVED: {}", path.display());
            }
            false
        }
        Err(e) => {
            tracing::error!(test = test, error = %e, "Test failed");
            println!("TEST FAILED: {test}");
            println!("  {e}");
            false
        }
    };
    println!("{}", "=".repeat(60));

    if let (true, Some(path)) = (passed, report_path) {
        println!("Report saved to: {}", path.display());
    }

    passed
}

/// Print every test with its description and scenario count.
fn cmd_list(store: &ScenarioStore) -> bool {
    if store.is_empty() {
        println!("No tests defined.");
        return true;
    }
    println!("Available tests:");
    for (name, test) in store.tests() {
        println!(
            "  {name} ({} scenarios, game {}): {}",
            test.scenarios.len(),
            test.game,
            test.description
        );
    }
    true
}

/// Print every problem found in the scenario file.
fn cmd_validate(store: &ScenarioStore) -> bool {
    let issues = validate_store(store);
    if issues.is_empty() {
        println!("OK: {} tests, no issues found", store.len());
        return true;
    }
    println!("Found {} issue(s):", issues.len());
    for issue in &issues {
        println!("  {issue}");
    }
    false
}
