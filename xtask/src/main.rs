use std::path::Path;
use std::process::{exit, Command, ExitStatus};

use clap::{Parser, Subcommand, ValueEnum};

// ── CLI definition ─────────────────────────────────────────────────

#[derive(Parser)]
#[command(
    name = "xtask",
    about = "Task runner for the ride dispatch workspace",
    long_about = "A unified CLI for running the dispatch demo, timeout sweeps,\n\
                  benchmarks, load tests and CI checks."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the dispatch demo (500 vehicles, 5000 riders)
    Run {
        /// Optional JSON file with dispatch parameters
        #[arg(long, env = "DISPATCH_PARAMS")]
        params: Option<String>,
        /// Log filter passed through RUST_LOG
        #[arg(long, default_value = "info")]
        log: String,
    },
    /// Run the solicitation timeout sweep
    Sweep,
    /// Run Criterion benchmarks
    Bench,
    /// Compare benchmarks: stash changes, create baseline, restore, compare
    BenchCompare,
    /// Run CI checks (fmt, clippy, tests, examples, benchmarks)
    Ci {
        /// Job to run
        #[arg(value_enum, default_value_t = CiJob::Check)]
        job: CiJob,
    },
    /// Run load tests (ignored tests in dispatch_core)
    LoadTest,
}

#[derive(Clone, ValueEnum)]
enum CiJob {
    /// Formatting, clippy, and tests
    Check,
    /// Build and run the examples
    Examples,
    /// Run benchmarks
    Bench,
    /// Run check + examples + bench
    All,
}

// ── helpers ────────────────────────────────────────────────────────

fn step(label: &str) {
    eprintln!("\n=== {label} ===");
}

fn spawn(program: &str, args: &[&str], envs: &[(&str, &str)]) -> ExitStatus {
    eprintln!("+ {program} {}", args.join(" "));
    match Command::new(program)
        .args(args)
        .envs(envs.iter().copied())
        .status()
    {
        Ok(status) => status,
        Err(error) => {
            eprintln!("failed to execute {program}: {error}");
            exit(1);
        }
    }
}

fn exit_on_failure(status: ExitStatus) {
    if !status.success() {
        exit(status.code().unwrap_or(1));
    }
}

fn run_cargo(args: &[&str]) {
    exit_on_failure(spawn("cargo", args, &[]));
}

fn run_cargo_with_env(args: &[&str], envs: &[(&str, &str)]) {
    exit_on_failure(spawn("cargo", args, envs));
}

fn run_git(args: &[&str]) {
    exit_on_failure(spawn("git", args, &[]));
}

fn run_bench(extra: &[&str]) {
    let mut args = vec!["bench", "--package", "dispatch_core", "--bench", "performance"];
    if !extra.is_empty() {
        args.push("--");
        args.extend_from_slice(extra);
    }
    run_cargo(&args);
}

// ── CI jobs ────────────────────────────────────────────────────────

fn ci_check() {
    step("Check formatting");
    run_cargo(&["fmt", "--all", "--", "--check"]);

    step("Clippy");
    run_cargo(&[
        "clippy",
        "--all-targets",
        "--all-features",
        "--",
        "-D",
        "warnings",
    ]);

    step("Test dispatch_core");
    run_cargo(&["test", "-p", "dispatch_core"]);

    step("Test dispatch_experiments");
    run_cargo(&["test", "-p", "dispatch_experiments"]);
}

fn ci_examples() {
    step("Run dispatch_run (500 vehicles, 5000 riders)");
    run_cargo_with_env(
        &["run", "-p", "dispatch_core", "--example", "dispatch_run", "--release"],
        &[("RUST_LOG", "warn")],
    );

    step("Run timeout_sweep");
    run_cargo(&[
        "run",
        "-p",
        "dispatch_experiments",
        "--example",
        "timeout_sweep",
        "--release",
    ]);
}

fn ci_bench() {
    step("Run benchmarks");
    run_bench(&[]);
}

// ── main ───────────────────────────────────────────────────────────

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Commands::Run { params, log } => {
            let mut args = vec![
                "run",
                "-p",
                "dispatch_core",
                "--example",
                "dispatch_run",
                "--release",
            ];
            if let Some(path) = params.as_deref() {
                args.push("--");
                args.push(path);
            }
            run_cargo_with_env(&args, &[("RUST_LOG", log.as_str())]);
        }
        Commands::Sweep => {
            run_cargo(&[
                "run",
                "-p",
                "dispatch_experiments",
                "--example",
                "timeout_sweep",
                "--release",
            ]);
        }
        Commands::Bench => run_bench(&[]),
        Commands::BenchCompare => {
            let baseline_dir = Path::new("target/criterion");
            if baseline_dir.exists() {
                step("Removing existing benchmark data");
                if let Err(error) = std::fs::remove_dir_all(baseline_dir) {
                    eprintln!("failed to remove target/criterion: {error}");
                    exit(1);
                }
            }

            step("Stashing current changes");
            run_git(&[
                "stash",
                "push",
                "-m",
                "Temporary stash for benchmark comparison",
            ]);

            step("Running benchmark to create baseline");
            run_bench(&["--save-baseline", "main"]);

            step("Reapplying changes");
            run_git(&["stash", "pop"]);

            step("Running benchmark comparing against baseline");
            run_bench(&["--baseline", "main"]);

            eprintln!("\nDone! Check the output above to see performance comparison.");
        }
        Commands::Ci { job } => {
            match job {
                CiJob::Check => ci_check(),
                CiJob::Examples => ci_examples(),
                CiJob::Bench => ci_bench(),
                CiJob::All => {
                    ci_check();
                    ci_examples();
                    ci_bench();
                }
            }
            eprintln!("\nCI job passed.");
        }
        Commands::LoadTest => {
            run_cargo(&[
                "test",
                "-p",
                "dispatch_core",
                "--release",
                "--test",
                "load_tests",
                "--",
                "--ignored",
                "--nocapture",
            ]);
        }
    }
}
