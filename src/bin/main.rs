use anyhow::Result;
use clap::{Parser, Subcommand};
use std::io::BufRead;
use std::path::PathBuf;
use tracing::{Level, info};
use tracing_subscriber::EnvFilter;

use multitask_demo::{DemoConfig, create_driver, load_config};

#[derive(Parser)]
#[command(name = "multitask-demo")]
#[command(about = "Console demos of parallel-execution primitives")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the demo sequence
    Run {
        /// Path to a JSON config file (default: ./demo.json if present)
        #[arg(long, env = "DEMO_CONFIG")]
        config: Option<PathBuf>,
        /// Iterations of the CPU-bound loop
        #[arg(long)]
        cpu_iterations: Option<u64>,
        /// Simulated I/O latency in milliseconds
        #[arg(long)]
        io_delay_ms: Option<u64>,
        /// Iteration count for the bounded parallel iteration
        #[arg(long)]
        iterations: Option<usize>,
        /// Input count for the parallel map
        #[arg(long)]
        items: Option<usize>,
        /// Per-item delay in the parallel map, in milliseconds
        #[arg(long)]
        item_delay_ms: Option<u64>,
        /// Run the sequence this many times in a row
        #[arg(long, default_value_t = 1)]
        repeat: u32,
        /// Exit immediately instead of waiting for a key press
        #[arg(long, default_value_t = false)]
        no_wait: bool,
    },
    /// Print the effective configuration as JSON
    ShowConfig {
        /// Path to a JSON config file (default: ./demo.json if present)
        #[arg(long, env = "DEMO_CONFIG")]
        config: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive("multitask_demo=info".parse()?),
        )
        .with_max_level(Level::INFO)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            config,
            cpu_iterations,
            io_delay_ms,
            iterations,
            items,
            item_delay_ms,
            repeat,
            no_wait,
        } => {
            let base = load_config(config.as_deref())?;
            let effective = apply_overrides(
                base,
                cpu_iterations,
                io_delay_ms,
                iterations,
                items,
                item_delay_ms,
            );

            println!("Starting parallel debug demo...\n");

            let driver = create_driver(effective);
            for pass in 1..=repeat {
                if repeat > 1 {
                    info!("Demo pass {}/{}", pass, repeat);
                }
                let report = driver.run_all_demos().await?;
                info!("Demo pass finished in {} ms", report.elapsed.as_millis());
            }

            if !no_wait {
                println!("\nPress Enter to exit.");
                let mut line = String::new();
                std::io::stdin().lock().read_line(&mut line)?;
            }
        }
        Commands::ShowConfig { config } => {
            let effective = load_config(config.as_deref())?;
            println!("{}", serde_json::to_string_pretty(&effective)?);
        }
    }

    Ok(())
}

/// Apply CLI flag overrides on top of the file/default configuration.
fn apply_overrides(
    mut config: DemoConfig,
    cpu_iterations: Option<u64>,
    io_delay_ms: Option<u64>,
    iterations: Option<usize>,
    items: Option<usize>,
    item_delay_ms: Option<u64>,
) -> DemoConfig {
    if let Some(v) = cpu_iterations {
        config.cpu_iterations = v;
    }
    if let Some(v) = io_delay_ms {
        config.io_delay_ms = v;
    }
    if let Some(v) = iterations {
        config.parallel_for_iterations = v;
    }
    if let Some(v) = items {
        config.parallel_map_items = v;
    }
    if let Some(v) = item_delay_ms {
        config.per_item_delay_ms = v;
    }
    config
}
