//! Souvenir CLI - run the bubble simulation headless

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::{config, simulate};
use log::LevelFilter;
use std::io::Write;

#[derive(Parser)]
#[command(name = "souvenir")]
#[command(about = "Headless driver for the ambient souvenir bubble engine", long_about = None)]
#[command(version)]
struct Cli {
    /// Print debug-level engine logs
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the simulation against a headless page and print frame stats
    Simulate {
        /// Simulated wall-clock seconds
        #[arg(long, default_value = "30")]
        seconds: f64,

        /// Frame callbacks per second
        #[arg(long, default_value = "60")]
        fps: u32,

        /// Path to a TOML config file
        #[arg(long)]
        config: Option<String>,

        /// Path to a catalog JSON file
        #[arg(long)]
        catalog: Option<String>,

        /// Simulate a signed-in visitor
        #[arg(long)]
        authenticated: bool,

        /// Scripted click (comma-separated x,y), repeatable
        #[arg(long, value_parser = parse_point)]
        click: Vec<[f32; 2]>,

        /// Content panel rectangle (comma-separated left,top,right,bottom)
        #[arg(long, value_parser = parse_rect)]
        panel: Option<[f32; 4]>,

        /// Viewport width in pixels
        #[arg(long, default_value = "1280")]
        width: f32,

        /// Viewport height in pixels
        #[arg(long, default_value = "720")]
        height: f32,

        /// Fixed RNG seed (overrides the config)
        #[arg(long)]
        seed: Option<u32>,

        /// Print stats every N frames
        #[arg(long, default_value = "60")]
        report_every: u64,
    },

    /// Print the effective configuration as TOML
    Config {
        /// Path to a TOML config file; defaults are printed when omitted
        #[arg(long)]
        config: Option<String>,
    },
}

fn parse_floats<const N: usize>(s: &str) -> Result<[f32; N], String> {
    let parts: Vec<&str> = s.split(',').collect();
    if parts.len() != N {
        return Err(format!(
            "expected {} comma-separated values, got {}",
            N,
            parts.len()
        ));
    }
    let mut out = [0.0; N];
    for (slot, part) in out.iter_mut().zip(&parts) {
        *slot = part
            .trim()
            .parse()
            .map_err(|e| format!("invalid value '{}': {}", part.trim(), e))?;
    }
    Ok(out)
}

fn parse_point(s: &str) -> Result<[f32; 2], String> {
    parse_floats::<2>(s)
}

fn parse_rect(s: &str) -> Result<[f32; 4], String> {
    let [left, top, right, bottom] = parse_floats::<4>(s)?;
    if ![left, top, right, bottom].iter().all(|v| v.is_finite()) {
        return Err("panel bounds must be finite".to_string());
    }
    if left > right || top > bottom {
        return Err(format!(
            "panel must be left,top,right,bottom with left <= right and top <= bottom, got {}",
            s
        ));
    }
    Ok([left, top, right, bottom])
}

/// `souvenir_bubbles::engine` -> `engine`
fn short_target(target: &str) -> &str {
    target.rsplit("::").next().unwrap_or(target)
}

/// Info by default, debug with `--verbose`
fn init_logging(verbose: bool) {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    env_logger::Builder::from_default_env()
        .filter_level(level)
        .format(|buf, record| {
            writeln!(buf, "[{}] {}", short_target(record.target()), record.args())
        })
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Simulate {
            seconds,
            fps,
            config,
            catalog,
            authenticated,
            click,
            panel,
            width,
            height,
            seed,
            report_every,
        } => simulate::run(simulate::SimulateArgs {
            seconds,
            fps,
            config,
            catalog,
            authenticated,
            clicks: click,
            panel,
            width,
            height,
            seed,
            report_every,
        }),
        Commands::Config { config } => config::run(config.as_deref()),
    }
}
