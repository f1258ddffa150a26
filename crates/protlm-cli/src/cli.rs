use super::commands;
use clap::{Parser, Subcommand, ValueEnum};
use protlm_core::ScoringSource;
use std::path::PathBuf;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, Debug, Default, ValueEnum)]
pub enum MatrixFormat {
    #[default]
    Json,
    Table,
}

#[derive(Subcommand)]
enum Commands {
    /// Classify a sequence and print the JSON response.
    Predict {
        #[arg(short, long)]
        sequence: String,

        /// Directory holding `checkpoints/` and `data/processed/`.
        #[arg(long, default_value = ".")]
        root: PathBuf,

        // Overrides for the paths derived from --root
        #[arg(long)]
        organism_checkpoint: Option<PathBuf>,

        #[arg(long)]
        type_checkpoint: Option<PathBuf>,

        #[arg(long)]
        type_label_map: Option<PathBuf>,

        /// `blosum62`, `identity`, or a path to an NCBI-format matrix.
        #[arg(long, default_value = "blosum62")]
        scoring: ScoringSource,

        #[arg(long)]
        cpu: bool,

        #[arg(long)]
        pretty: bool,
    },
    /// Print the substitution matrix for a sequence.
    Matrix {
        #[arg(short, long)]
        sequence: String,

        #[arg(long, default_value = "blosum62")]
        scoring: ScoringSource,

        #[arg(long, value_enum, default_value_t = MatrixFormat::Json)]
        format: MatrixFormat,
    },
}

impl Cli {
    pub fn execute(self) -> anyhow::Result<()> {
        match self.command {
            Commands::Predict {
                sequence,
                root,
                organism_checkpoint,
                type_checkpoint,
                type_label_map,
                scoring,
                cpu,
                pretty,
            } => {
                let mut config = protlm_plms::BundleConfig::from_root(root);
                if let Some(path) = organism_checkpoint {
                    config.organism_checkpoint = path;
                }
                if type_checkpoint.is_some() {
                    config.type_checkpoint = type_checkpoint;
                }
                if type_label_map.is_some() {
                    config.type_label_map = type_label_map;
                }
                config.scoring = scoring;
                commands::predict::execute(&config, &sequence, cpu, pretty)
            }
            Commands::Matrix {
                sequence,
                scoring,
                format,
            } => commands::matrix::execute(&sequence, &scoring, format),
        }
    }
}
