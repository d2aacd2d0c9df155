//! Next-destination prediction CLI
//!
//! One-shot batch pipeline: aggregate booking histories, train the
//! classifier, and print classification reports for the training and
//! held-out corpora.

use clap::{Parser, Subcommand};
use nextstay::{Config, Result};

#[derive(Parser)]
#[command(name = "nextstay")]
#[command(about = "Next hotel-destination prediction from booking histories", long_about = None)]
struct Cli {
    /// Config file path
    #[arg(short, long, default_value = "config.toml")]
    config: String,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the batch pipeline: train, then report on both corpora
    Run {
        /// Override the training CSV path
        #[arg(long)]
        train: Option<String>,
        /// Override the held-out CSV path
        #[arg(long)]
        holdout: Option<String>,
    },
    /// Initialize a new project with default config
    Init,
}

fn main() {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level))
        .format_timestamp(None)
        .init();

    // Load or create config
    let config = if std::path::Path::new(&cli.config).exists() {
        match Config::load(&cli.config) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("Error loading config: {}", e);
                std::process::exit(1);
            }
        }
    } else {
        Config::default()
    };

    let result = match cli.command {
        Commands::Run { train, holdout } => commands::run(&config, train, holdout),
        Commands::Init => commands::init(&cli.config),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

mod commands {
    use super::*;
    use nextstay::data::{drop_missing_destination, load_bookings, EncodedDataset};
    use nextstay::features::encoding::drop_placeholder_rows;
    use nextstay::features::{aggregate_users, OrdinalEncoder};
    use nextstay::predict::Predictor;
    use nextstay::training::{ClassificationReport, GbdtTrainer};
    use nextstay::NextstayError;

    pub fn init(config_path: &str) -> Result<()> {
        let config = Config::default();
        config.save(config_path)?;
        println!("Created default config at {}", config_path);

        std::fs::create_dir_all("data")?;
        println!("Created data/ directory");

        println!("\nNext steps:");
        println!("  1. Edit {} to point at the booking CSVs", config_path);
        println!("  2. Run 'nextstay run' to train and evaluate");

        Ok(())
    }

    pub fn run(config: &Config, train: Option<String>, holdout: Option<String>) -> Result<()> {
        let train_path = train.unwrap_or_else(|| config.data.train_path.clone());
        let holdout_path = holdout.unwrap_or_else(|| config.data.holdout_path.clone());

        // One reference date for both corpora, so recency features agree.
        let reference_date = chrono::Local::now().date_naive();

        println!("Loading training corpus from {}...", train_path);
        let records = load_bookings(&train_path, reference_date)?;
        println!("  {} bookings", records.len());

        let aggregates = aggregate_users(&records);
        println!("  {} users with feature history", aggregates.len());
        if aggregates.is_empty() {
            return Err(NextstayError::EmptyDataset(
                "training corpus has no users with two or more bookings".to_string(),
            ));
        }

        let encoder = OrdinalEncoder::fit(&aggregates);
        let train_set = EncodedDataset::from_aggregates(&aggregates, &encoder)?;

        println!("\nTraining classifier...");
        let trainer = GbdtTrainer::new(config.model.clone());
        let (model, labels) = trainer.train(&train_set)?;
        println!("  {} destination classes", model.n_classes());
        let predictor = Predictor::new(model, labels);

        let train_predictions = predictor.predict(&train_set);
        let train_report = ClassificationReport::compute(&train_set.labels, &train_predictions);
        println!("\nTraining-set report ({} users):", train_set.len());
        println!("{}", train_report);

        println!("Loading held-out corpus from {}...", holdout_path);
        let records = drop_missing_destination(load_bookings(&holdout_path, reference_date)?);
        println!("  {} labeled bookings", records.len());

        let aggregates = drop_placeholder_rows(aggregate_users(&records));
        println!("  {} users with feature history", aggregates.len());

        let holdout_set = EncodedDataset::from_aggregates(&aggregates, &encoder)?;
        let holdout_predictions = predictor.predict(&holdout_set);
        let holdout_report =
            ClassificationReport::compute(&holdout_set.labels, &holdout_predictions);
        println!("\nHeld-out report ({} users):", holdout_set.len());
        println!("{}", holdout_report);

        Ok(())
    }
}
