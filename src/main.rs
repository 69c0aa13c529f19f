mod report;

use std::{io, path::PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use log::info;

use predictor::{
    configs::{PredictorConfig, SourceConfig, load_config},
    data::{DatasetSummary, TableCache, encode},
};

/// Estimates residential land prices in Abha from past sales.
#[derive(Parser)]
#[command(author, version, about)]
struct Cli {
    /// JSON config file; every field falls back to its default
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Read the sales from a local CSV file instead of the configured source
    #[arg(long, global = true, conflicts_with = "url")]
    file: Option<PathBuf>,

    /// Fetch the sales CSV from an http(s) URL instead of the configured source
    #[arg(long, global = true)]
    url: Option<String>,

    /// Print JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Predict the price of a property
    Predict {
        /// Neighborhood name as written in the data
        #[arg(short, long)]
        neighborhood: String,

        /// Area in square meters
        #[arg(short, long, allow_negative_numbers = true)]
        area: f64,
    },
    /// Show the held-out scores of the model
    Evaluate,
    /// Show the loaded sales and their summary statistics
    Dataset,
    /// List the encoded neighborhoods
    Neighborhoods,
}

impl Cli {
    fn predictor_config(&self) -> Result<PredictorConfig> {
        let mut config = match &self.config {
            Some(path) => load_config(path)?,
            None => PredictorConfig::default(),
        };

        if let Some(path) = &self.file {
            config.source = SourceConfig::Local { path: path.clone() };
        } else if let Some(url) = &self.url {
            config.source = SourceConfig::Remote { url: url.clone() };
        }

        config.validate()?;
        Ok(config)
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let config = cli.predictor_config()?;
    let cache = TableCache::new();
    let mut out = io::stdout().lock();

    match &cli.command {
        Command::Predict { neighborhood, area } => {
            let session = predictor::train(&config, &cache)?;
            let prediction = session
                .predict(neighborhood, *area)
                .with_context(|| format!("cannot predict {neighborhood} at {area} sqm"))?;
            info!("predicted {:.2} SAR", prediction.price);
            report::prediction(&mut out, &prediction, session.metrics(), cli.json)?;
        }
        Command::Evaluate => {
            let session = predictor::train(&config, &cache)?;
            report::evaluation(&mut out, &session, cli.json)?;
        }
        Command::Dataset => {
            let encoded = encode(cache.get_or_load(&config.source)?);
            let summary = DatasetSummary::new(encoded.table(), encoded.price_per_area());
            report::dataset(&mut out, encoded.table(), &summary, cli.json)?;
        }
        Command::Neighborhoods => {
            let encoded = encode(cache.get_or_load(&config.source)?);
            let encoding = encoded
                .encoding()
                .context("the data has no neighborhood column")?;
            report::neighborhoods(&mut out, encoding, cli.json)?;
        }
    }

    Ok(())
}
