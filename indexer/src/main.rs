use anyhow::Result;
use apart_core::dataset::load_listings;
use apart_core::index::{FitOptions, TfidfModel};
use apart_core::persist::{save_matrix, save_meta, save_model, MetaFile, ModelPaths, FORMAT_VERSION};
use apart_core::tokenizer::{StemLanguage, TokenizerOptions};
use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, fmt};

#[derive(Parser)]
#[command(name = "apart-indexer")]
#[command(about = "Fit the TF-IDF model and listing matrix used by the recommendation server", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build model artifacts from the listing dataset
    Build {
        /// Listing dataset (CSV with header)
        #[arg(long, default_value = "data/Data_Apart_Listing.csv")]
        data: String,
        /// Output model directory
        #[arg(long, default_value = "models")]
        output: String,
        /// Use smoothed IDF = ln((1 + N) / (1 + df)) + 1 instead of ln(N / df) + 1
        #[arg(long, default_value_t = true, action = clap::ArgAction::Set)]
        smoothed_idf: bool,
        /// Use 1 + ln(tf) instead of raw term counts
        #[arg(long, default_value_t = false)]
        sublinear_tf: bool,
        /// Drop terms found in fewer listings than this
        #[arg(long, default_value_t = 1)]
        min_df: u32,
        /// Snowball stemmer language (no stemming when omitted)
        #[arg(long)]
        stem: Option<StemLanguage>,
        /// Remove English stopwords
        #[arg(long, default_value_t = false)]
        stopwords: bool,
    },
}

fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Build { data, output, smoothed_idf, sublinear_tf, min_df, stem, stopwords } => {
            let opts = FitOptions {
                tokenizer: TokenizerOptions { remove_stopwords: stopwords, stem },
                smoothed_idf,
                sublinear_tf,
                min_df,
            };
            build_model(&data, &output, &opts)
        }
    }
}

fn build_model(data: &str, output: &str, opts: &FitOptions) -> Result<()> {
    let listings = load_listings(data)?;
    let descriptions: Vec<&str> = listings.iter().map(|l| l.description.as_str()).collect();

    let (model, matrix) = TfidfModel::fit_transform(&descriptions, opts);
    let empty_rows = matrix.rows.iter().filter(|r| r.entries.is_empty()).count();
    tracing::info!(num_listings = matrix.len(), num_terms = model.dim(), empty_rows, "fitted model");
    if empty_rows > 0 {
        tracing::warn!(empty_rows, "some listings have no terms in the vocabulary and will always score 0");
    }

    let out_paths = ModelPaths::new(output);
    save_model(&out_paths, &model)?;
    save_matrix(&out_paths, &matrix)?;
    let meta = MetaFile {
        num_listings: matrix.len(),
        num_terms: model.dim(),
        created_at: time::OffsetDateTime::now_utc().format(&time::format_description::well_known::Rfc3339).unwrap_or_else(|_| "".into()),
        version: FORMAT_VERSION,
    };
    save_meta(&out_paths, &meta)?;

    tracing::info!(output, "model build complete");
    Ok(())
}
