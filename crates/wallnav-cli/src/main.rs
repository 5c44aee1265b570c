//! `wallnav` – wall-following controller command line
//!
//! Replays a recorded sensor trace through the navigation controller:
//!
//! 1. Loads `wallnav.toml` (or the file given with `--config`) and applies
//!    `WALLNAV_*` overrides; falls back to defaults on a bad config.
//! 2. Builds a [`SimRobot`] from the trace and runs the controller until the
//!    goal is seen, the robot gets stuck, the trace ends, or Ctrl-C.
//! 3. Prints the results block and saves it to a timestamped file.

mod config;

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use clap::Parser;
use colored::Colorize;
use tracing::{error, warn};

use wallnav_hal::{SensorTrace, SimRobot};
use wallnav_kernel::{GoalDetection, NavigationEngine};
use wallnav_runtime::{RunLoop, init_tracing, persist_or_warn, render_text};
use wallnav_types::TerminationCause;

/// Reactive wall-following controller
///
/// Replays a recorded sensor trace and reports how the run went.
#[derive(Debug, Parser)]
#[command(name = "wallnav")]
#[command(version)]
#[command(about = "Reactive wall-following controller", long_about = None)]
struct Cli {
    /// Config file (defaults to ./wallnav.toml when present)
    #[arg(long, short)]
    config: Option<PathBuf>,

    /// Sensor trace to replay (JSON); falls back to `run.trace` in the config
    #[arg(value_name = "TRACE")]
    trace: Option<PathBuf>,
}

fn main() -> ExitCode {
    // Held until exit so buffered spans are flushed.
    let _telemetry = init_tracing("wallnav");

    let cli = Cli::parse();

    print_banner();

    // ── Configuration ─────────────────────────────────────────────────────
    let cfg = match config::load(cli.config.as_deref()) {
        Ok(cfg) => cfg,
        Err(e) => {
            println!("{}: {}", "Config error".red(), e);
            println!("  Using default configuration.");
            config::Config::default()
        }
    };

    let Some(trace_path) = cli.trace.or_else(|| cfg.run.trace.clone()) else {
        eprintln!(
            "{}: no sensor trace given (pass TRACE or set run.trace)",
            "error".red().bold()
        );
        return ExitCode::from(2);
    };

    // ── Device ────────────────────────────────────────────────────────────
    let trace = match SensorTrace::load(&trace_path) {
        Ok(trace) => trace,
        Err(e) => {
            error!(error = %e, "cannot start controller");
            eprintln!("{}: {e}", "error".red().bold());
            return ExitCode::FAILURE;
        }
    };
    println!(
        "  Replaying {} ({} samples)",
        trace_path.display().to_string().bold(),
        trace.samples.len()
    );

    // ── Ctrl-C handler ────────────────────────────────────────────────────
    let stop = Arc::new(AtomicBool::new(false));
    let stop_clone = stop.clone();
    if let Err(e) = ctrlc::set_handler(move || {
        println!();
        println!("{}", "⚠  Ctrl-C received, stopping the robot …".yellow().bold());
        stop_clone.store(true, Ordering::SeqCst);
    }) {
        warn!(error = %e, "Failed to install Ctrl-C handler; the run can only end on its own");
    }

    // ── Run ───────────────────────────────────────────────────────────────
    // Goal detection is switched off by the run loop when there is no light sensor.
    let engine = NavigationEngine::new(cfg.thresholds, GoalDetection::Enabled);
    let mut run_loop =
        RunLoop::new(SimRobot::new(trace), engine, cfg.run_loop_config()).with_stop_flag(stop);
    let report = run_loop.run();

    println!();
    let text = render_text(&report);
    match report.final_cause {
        TerminationCause::GoalReached => println!("{}", text.green()),
        TerminationCause::Stuck => println!("{}", text.yellow()),
        _ => println!("{text}"),
    }

    if cfg.report.enabled
        && let Some(path) = persist_or_warn(&cfg.report_sink(), &report)
    {
        println!("  {} Results saved to {}", "✓".green().bold(), path.display().to_string().bold());
    }

    ExitCode::SUCCESS
}

// ─────────────────────────────────────────────────────────────────────────────
// Banner
// ─────────────────────────────────────────────────────────────────────────────

fn print_banner() {
    println!();
    println!("{}", r#" _      __     ____             "#.bold().cyan());
    println!("{}", r#"| | /| / /__ _/ / /__  ___ __  __"#.bold().cyan());
    println!("{}", r#"| |/ |/ / _ `/ / / _ \/ _ `/ |/ /"#.bold().cyan());
    println!("{}", r#"|__/|__/\_,_/_/_/_//_/\_,_/|___/ "#.bold().cyan());
    println!();
    println!("  {}", "Reactive wall-following controller".dimmed());
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn trace_and_config_are_parsed() {
        let cli = Cli::try_parse_from(["wallnav", "--config", "nav.toml", "arena.json"]).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("nav.toml")));
        assert_eq!(cli.trace, Some(PathBuf::from("arena.json")));
    }

    #[test]
    fn short_config_flag_is_accepted() {
        let cli = Cli::try_parse_from(["wallnav", "-c", "nav.toml"]).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("nav.toml")));
        assert!(cli.trace.is_none());
    }

    #[test]
    fn no_arguments_is_valid() {
        let cli = Cli::try_parse_from(["wallnav"]).unwrap();
        assert!(cli.config.is_none());
        assert!(cli.trace.is_none());
    }

    #[test]
    fn config_flag_needs_a_value() {
        assert!(Cli::try_parse_from(["wallnav", "-c"]).is_err());
    }

    #[test]
    fn unknown_flag_is_rejected() {
        assert!(Cli::try_parse_from(["wallnav", "--fast"]).is_err());
    }

    #[test]
    fn second_trace_is_rejected() {
        assert!(Cli::try_parse_from(["wallnav", "a.json", "b.json"]).is_err());
    }
}
