use std::process::{exit, Command};

use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(name = "xtask", about = "Task runner for the scar-io workspace")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run CI checks
    Ci {
        #[arg(value_enum, default_value_t = CiJob::All)]
        job: CiJob,
    },
    /// Build the release scar_io step binary
    Package {
        /// Optional target triple, e.g. x86_64-unknown-linux-musl
        #[arg(long, env = "SCAR_IO_TARGET")]
        target: Option<String>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum CiJob {
    /// rustfmt and clippy
    Lint,
    /// Workspace tests
    Test,
    All,
}

fn run_cargo(args: &[&str]) {
    eprintln!("+ cargo {}", args.join(" "));
    let status = Command::new("cargo")
        .args(args)
        .status()
        .unwrap_or_else(|error| {
            eprintln!("failed to execute cargo: {error}");
            exit(1);
        });
    if !status.success() {
        exit(status.code().unwrap_or(1));
    }
}

fn lint() {
    run_cargo(&["fmt", "--all", "--", "--check"]);
    run_cargo(&["clippy", "--workspace", "--all-targets", "--", "-D", "warnings"]);
}

fn test() {
    run_cargo(&["test", "--workspace"]);
}

fn package(target: Option<&str>) {
    let mut args = vec!["build", "--release", "-p", "scar_io_lambda", "--bin", "scar_io"];
    if let Some(target) = target {
        args.extend(["--target", target]);
    }
    run_cargo(&args);
}

fn main() {
    match Cli::parse().command {
        Commands::Ci { job } => match job {
            CiJob::Lint => lint(),
            CiJob::Test => test(),
            CiJob::All => {
                lint();
                test();
            }
        },
        Commands::Package { target } => package(target.as_deref()),
    }
}
