//! sparsegrind - sparse matrix storage analysis CLI
//!
//! Command-line interface for storage-cost estimation and matrix profiling.

use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::Serialize;
use sparsegrind::data::{MatrixTimeline, SparseMatrix, DEFAULT_MATRIX_SIZE};
use sparsegrind::error::{Result, SparseGrindError};
use sparsegrind::profile::{detect_changes, profile_range, profile_sparsity, ChangeProfile};
use sparsegrind::reorder::reorder_analysis;
use sparsegrind::storage::{max_mantissa_within, StorageConfig, StorageReport};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Input file layouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum InputFormat {
    /// Matrix Market coordinate file
    Mm,
    /// Matlab timeline CSV of complex matrices
    Matlabtl,
}

/// Report encodings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
    Yaml,
}

/// Sparse matrix storage analysis
#[derive(Parser)]
#[command(name = "sparsegrind")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Log filter, e.g. "info" or "sparsegrind=debug"
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

/// Options shared by every command that reads a matrix.
#[derive(Args)]
struct InputArgs {
    /// Path to the input file
    file: PathBuf,

    /// Input file format
    #[arg(short, long, value_enum, default_value = "mm")]
    format: InputFormat,

    /// Timestep to analyze in a Matlab timeline
    #[arg(short, long, default_value = "0")]
    timestep: usize,

    /// Order of each matrix in a Matlab timeline
    #[arg(long, default_value_t = DEFAULT_MATRIX_SIZE)]
    matrix_size: usize,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    output_format: OutputFormat,
}

#[derive(Subcommand)]
enum Commands {
    /// Profile the sparsity pattern
    Sparsity {
        #[command(flatten)]
        input: InputArgs,
    },

    /// Profile the range of stored values
    Range {
        #[command(flatten)]
        input: InputArgs,
    },

    /// Estimate storage cost under every modeled format
    Storage {
        #[command(flatten)]
        input: InputArgs,

        /// Storage configuration YAML
        #[arg(long)]
        config: Option<PathBuf>,

        /// Mantissa bits for the CSR estimate
        #[arg(long)]
        mantissa_bitwidth: Option<u32>,

        /// Index bits for CSR and bucketed CSR
        #[arg(long)]
        index_bitwidth: Option<u32>,

        /// Number of base values for bucketed CSR
        #[arg(long)]
        num_buckets: Option<usize>,

        /// Correction-term bits for bucketed CSR
        #[arg(long)]
        fixed_point_bitwidth: Option<u32>,

        /// Decoding-table bits for CSR with dictionary compression
        #[arg(long)]
        dictionary_bitwidth: Option<u32>,

        /// Report the widest mantissa whose CSR size fits in this many bytes
        #[arg(long)]
        budget: Option<f64>,
    },

    /// Find the timesteps at which a Matlab timeline changes
    Changes {
        #[command(flatten)]
        input: InputArgs,
    },

    /// Compare Cuthill-McKee orderings
    Reordering {
        #[command(flatten)]
        input: InputArgs,
    },

    /// Write an example storage configuration
    ExampleConfig {
        /// Output path; prints to stdout when omitted
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() {
    let cli = Cli::parse();
    init_logging(&cli.log_level);

    let result = match cli.command {
        Commands::Sparsity { input } => cmd_sparsity(&input),
        Commands::Range { input } => cmd_range(&input),
        Commands::Storage {
            input,
            config,
            mantissa_bitwidth,
            index_bitwidth,
            num_buckets,
            fixed_point_bitwidth,
            dictionary_bitwidth,
            budget,
        } => load_config(config.as_ref()).and_then(|mut storage_config| {
            if let Some(bits) = mantissa_bitwidth {
                storage_config.mantissa_bitwidth = bits;
            }
            if let Some(bits) = index_bitwidth {
                storage_config.index_bitwidth = bits;
            }
            if let Some(n) = num_buckets {
                storage_config.num_buckets = n;
            }
            if let Some(bits) = fixed_point_bitwidth {
                storage_config.fixed_point_bitwidth = bits;
            }
            if let Some(bits) = dictionary_bitwidth {
                storage_config.dictionary_bitwidth = bits;
            }
            cmd_storage(&input, &storage_config, budget)
        }),
        Commands::Changes { input } => cmd_changes(&input),
        Commands::Reordering { input } => cmd_reordering(&input),
        Commands::ExampleConfig { output } => cmd_example_config(output.as_ref()),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn init_logging(level: &str) {
    let filter = EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(path: Option<&PathBuf>) -> Result<StorageConfig> {
    match path {
        Some(path) => {
            info!(path = %path.display(), "Loading storage configuration");
            let yaml = std::fs::read_to_string(path)?;
            StorageConfig::from_yaml(&yaml)
        }
        None => Ok(StorageConfig::default()),
    }
}

fn load_timeline(input: &InputArgs) -> Result<MatrixTimeline> {
    info!(path = %input.file.display(), "Loading Matlab timeline");
    let timeline = MatrixTimeline::from_matlab_csv(&input.file, input.matrix_size, None)?;
    info!(timepoints = timeline.len(), "Loaded timeline");
    Ok(timeline)
}

/// The matrix selected by the input options.
fn load_matrix(input: &InputArgs) -> Result<SparseMatrix> {
    let matrix = match input.format {
        InputFormat::Mm => {
            info!(path = %input.file.display(), "Loading Matrix Market file");
            SparseMatrix::from_matrix_market(&input.file)?
        }
        InputFormat::Matlabtl => load_timeline(input)?.sparse_real(input.timestep)?,
    };
    info!(
        rows = matrix.rows(),
        cols = matrix.cols(),
        nnz = matrix.nnz(),
        "Loaded matrix"
    );
    Ok(matrix)
}

fn emit<T: Serialize + std::fmt::Display>(value: &T, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Text => print!("{}", value),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(value)?),
        OutputFormat::Yaml => print!("{}", serde_yaml::to_string(value)?),
    }
    Ok(())
}

fn cmd_sparsity(input: &InputArgs) -> Result<()> {
    let matrix = load_matrix(input)?;
    emit(&profile_sparsity(&matrix)?, input.output_format)
}

fn cmd_range(input: &InputArgs) -> Result<()> {
    let matrix = load_matrix(input)?;
    emit(&profile_range(matrix.values())?, input.output_format)
}

fn cmd_storage(input: &InputArgs, config: &StorageConfig, budget: Option<f64>) -> Result<()> {
    let matrix = load_matrix(input)?;
    let report = StorageReport::build(&matrix, config)?;
    emit(&report, input.output_format)?;

    if let Some(budget) = budget {
        match max_mantissa_within(&matrix, config.index_bitwidth, budget)? {
            Some(bits) => eprintln!(
                "Widest mantissa within {} bytes: {} bits",
                budget, bits
            ),
            None => eprintln!("No CSR encoding fits within {} bytes", budget),
        }
    }
    Ok(())
}

/// Change profiles of both parts of a complex timeline.
#[derive(Serialize)]
struct TimelineChanges {
    real: ChangeProfile,
    imag: ChangeProfile,
}

impl std::fmt::Display for TimelineChanges {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Real part")?;
        write!(f, "{}", self.real)?;
        writeln!(f, "Imaginary part")?;
        write!(f, "{}", self.imag)
    }
}

fn cmd_changes(input: &InputArgs) -> Result<()> {
    if input.format != InputFormat::Matlabtl {
        return Err(SparseGrindError::UnsupportedAnalysis(
            "Change detection needs a Matlab timeline (--format matlabtl)".to_string(),
        ));
    }
    let timeline = load_timeline(input)?;
    let changes = TimelineChanges {
        real: detect_changes(timeline.real())?,
        imag: detect_changes(timeline.imag())?,
    };
    emit(&changes, input.output_format)
}

/// All orderings computed for one matrix.
#[derive(Serialize)]
struct ReorderingSummary {
    reorderings: Vec<sparsegrind::reorder::Reordering>,
}

impl std::fmt::Display for ReorderingSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Reorderings")?;
        for reordering in &self.reorderings {
            writeln!(f, "  {}", reordering)?;
        }
        Ok(())
    }
}

fn cmd_reordering(input: &InputArgs) -> Result<()> {
    let matrix = load_matrix(input)?;
    let summary = ReorderingSummary {
        reorderings: reorder_analysis(&matrix)?,
    };
    emit(&summary, input.output_format)
}

fn cmd_example_config(output_path: Option<&PathBuf>) -> Result<()> {
    let yaml = StorageConfig::default().to_yaml()?;
    match output_path {
        Some(path) => {
            std::fs::write(path, &yaml)?;
            eprintln!("Wrote example storage configuration to {:?}", path);
        }
        None => print!("{}", yaml),
    }
    Ok(())
}
