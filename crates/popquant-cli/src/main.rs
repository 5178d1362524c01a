//! CLI for popquant — distributional statistics for weighted populations.

mod commands;
mod input;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "popquant")]
#[command(about = "popquant — quantile statistics and mobility forecasts for weighted populations")]
#[command(version = popquant_core::VERSION)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Quantile share and mean statistics for a population file
    Stats {
        /// Path to a population JSON file ({"values": [...], "weights": [...]})
        input: String,

        /// Number of equal-probability buckets
        #[arg(long, default_value = "5", conflicts_with = "cuts")]
        buckets: usize,

        /// Explicit comma-separated cut points in (0,1), e.g. "0.5,0.9,0.99"
        #[arg(long)]
        cuts: Option<String>,

        /// Variable key used in reports
        #[arg(long, default_value = "value")]
        key: String,

        /// Also report the Gini coefficient
        #[arg(long)]
        gini: bool,

        /// Write the statistic records as JSON
        #[arg(long)]
        output: Option<String>,
    },

    /// Gini coefficient of a population file
    Gini {
        /// Path to a population JSON file
        input: String,

        /// Variable key used in reports
        #[arg(long, default_value = "value")]
        key: String,

        /// Write the statistic record as JSON
        #[arg(long)]
        output: Option<String>,
    },

    /// Forecast quantile mobility through a transition-matrix sequence
    Mobility {
        /// Path to a population JSON file
        input: String,

        /// Path to a transitions JSON file ({"matrices": [...]})
        #[arg(long)]
        transitions: String,

        /// Number of equal-probability buckets
        #[arg(long, default_value = "5")]
        buckets: usize,

        /// Starting bucket index (0 = bottom)
        #[arg(long, default_value = "0")]
        from_bucket: usize,

        /// Forecast horizon in periods
        #[arg(long, default_value = "1")]
        horizon: usize,

        /// Report conditional reach probabilities instead of the future distribution
        #[arg(long)]
        probabilities: bool,

        /// Variable key used in reports
        #[arg(long, default_value = "value")]
        key: String,

        /// Write the statistic record as JSON
        #[arg(long)]
        output: Option<String>,
    },

    /// Generate a synthetic log-normal population file
    Generate {
        /// Output path for the population JSON file
        output: String,

        /// Number of agents
        #[arg(long, default_value = "1000")]
        agents: usize,

        /// RNG seed
        #[arg(long, default_value = "42")]
        seed: u64,

        /// Log-scale location of the value distribution
        #[arg(long, default_value = "0.0")]
        mu: f64,

        /// Log-scale spread of the value distribution
        #[arg(long, default_value = "0.75")]
        sigma: f64,

        /// Half-width of the uniform weight jitter around 1.0 (0 = equal weights)
        #[arg(long, default_value = "0.5")]
        weight_spread: f64,
    },
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Stats {
            input,
            buckets,
            cuts,
            key,
            gini,
            output,
        } => commands::stats::run(commands::stats::StatsConfig {
            input: &input,
            buckets,
            cuts: cuts.as_deref(),
            key: &key,
            gini,
            output: output.as_deref(),
        }),
        Commands::Gini { input, key, output } => {
            commands::gini::run(&input, &key, output.as_deref())
        }
        Commands::Mobility {
            input,
            transitions,
            buckets,
            from_bucket,
            horizon,
            probabilities,
            key,
            output,
        } => commands::mobility::run(commands::mobility::MobilityConfig {
            input: &input,
            transitions: &transitions,
            buckets,
            from_bucket,
            horizon,
            probabilities,
            key: &key,
            output: output.as_deref(),
        }),
        Commands::Generate {
            output,
            agents,
            seed,
            mu,
            sigma,
            weight_spread,
        } => commands::generate::run(commands::generate::GenerateConfig {
            output: &output,
            agents,
            seed,
            mu,
            sigma,
            weight_spread,
        }),
    };

    if let Err(err) = result {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}
