//! Gaussian kernel command line interface
//!
//! Computes Gaussian kernel values between feature vectors stored in LibSVM
//! or CSV files, and manages saved kernel parameters.

use clap::{Args, Parser, Subcommand, ValueEnum};
use env_logger::Env;
use gaussian_kernel::core::{DotFeatures, KernelError, Result, DEFAULT_CACHE_SIZE_MB};
use gaussian_kernel::kernel::{
    GaussianKernel, IdentityNormalizer, Kernel, KernelNormalizer, SqrtDiagNormalizer,
};
use gaussian_kernel::persistence::SavedKernel;
use gaussian_kernel::{CSVDataset, LibSVMDataset};
use log::{error, info, warn};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::process;

#[derive(Parser)]
#[command(name = "gaussian-kernel")]
#[command(about = "Gaussian kernel evaluation over LibSVM and CSV feature files")]
#[command(version = env!("CARGO_PKG_VERSION"))]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Enable debug output
    #[arg(short, long, global = true)]
    debug: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute the kernel matrix
    Matrix(MatrixArgs),
    /// Compute a single kernel value
    Score(ScoreArgs),
    /// Save kernel parameters to a file
    SaveParams(SaveParamsArgs),
    /// Display saved kernel parameters
    Info(InfoArgs),
}

#[derive(Args)]
struct KernelArgs {
    /// Left feature file (LibSVM or CSV format)
    #[arg(long)]
    data: PathBuf,

    /// Right feature file; defaults to the left file
    #[arg(long)]
    right: Option<PathBuf>,

    /// Data format: auto, libsvm, or csv
    #[arg(short, long, default_value = "auto")]
    format: String,

    /// Kernel width
    #[arg(short, long, default_value = "1.0")]
    width: f64,

    /// Saved kernel parameters; overrides --width
    #[arg(long)]
    params: Option<PathBuf>,

    /// Use the compact-support policy (dense CSV input only)
    #[arg(long)]
    compact: bool,

    /// Kernel normalizer
    #[arg(long, default_value = "identity")]
    normalizer: CliNormalizer,

    /// Kernel cache size in MB
    #[arg(long, default_value_t = DEFAULT_CACHE_SIZE_MB)]
    cache_size: usize,
}

#[derive(ValueEnum, Clone, Debug)]
enum CliNormalizer {
    /// Leave kernel values untouched
    #[value(name = "identity")]
    Identity,
    /// Divide by sqrt(K(x,x) * K(y,y))
    #[value(name = "sqrt-diag")]
    SqrtDiag,
}

impl From<CliNormalizer> for Box<dyn KernelNormalizer> {
    fn from(cli_normalizer: CliNormalizer) -> Self {
        match cli_normalizer {
            CliNormalizer::Identity => Box::new(IdentityNormalizer),
            CliNormalizer::SqrtDiag => Box::new(SqrtDiagNormalizer::new()),
        }
    }
}

#[derive(Args)]
struct MatrixArgs {
    #[command(flatten)]
    kernel: KernelArgs,

    /// Output file (optional, prints to stdout if not specified)
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[derive(Args)]
struct ScoreArgs {
    #[command(flatten)]
    kernel: KernelArgs,

    /// Index into the left collection (0-based)
    #[arg(short, long)]
    i: usize,

    /// Index into the right collection (0-based)
    #[arg(short, long)]
    j: usize,
}

#[derive(Args)]
struct SaveParamsArgs {
    /// Kernel width
    #[arg(short, long)]
    width: f64,

    /// Output parameter file
    #[arg(short, long)]
    output: PathBuf,
}

#[derive(Args)]
struct InfoArgs {
    /// Parameter file
    params: PathBuf,
}

fn main() {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.debug {
        "debug"
    } else if cli.verbose {
        "info"
    } else {
        "warn"
    };

    env_logger::Builder::from_env(Env::default().default_filter_or(log_level)).init();

    let result = match cli.command {
        Commands::Matrix(args) => matrix_command(args),
        Commands::Score(args) => score_command(args),
        Commands::SaveParams(args) => save_params_command(args),
        Commands::Info(args) => info_command(args),
    };

    if let Err(e) = result {
        error!("Error: {e}");
        process::exit(1);
    }
}

fn matrix_command(args: MatrixArgs) -> Result<()> {
    let left = load_features(&args.kernel.data, &args.kernel.format)?;
    let right = load_right(&args.kernel)?;
    let rhs = right.as_deref().unwrap_or(left.as_ref());
    let kernel = build_kernel(&args.kernel, left.as_ref(), rhs)?;

    info!(
        "Computing {} x {} kernel matrix",
        kernel.num_lhs(),
        kernel.num_rhs()
    );
    check_compact(&kernel)?;

    let matrix = kernel.kernel_matrix();
    match &args.output {
        Some(path) => {
            let file = File::create(path).map_err(KernelError::IoError)?;
            write_matrix(BufWriter::new(file), &matrix)?;
            info!("Kernel matrix saved to: {path:?}");
        }
        None => write_matrix(io::stdout().lock(), &matrix)?,
    }
    Ok(())
}

fn score_command(args: ScoreArgs) -> Result<()> {
    let left = load_features(&args.kernel.data, &args.kernel.format)?;
    let right = load_right(&args.kernel)?;
    let rhs = right.as_deref().unwrap_or(left.as_ref());
    let kernel = build_kernel(&args.kernel, left.as_ref(), rhs)?;

    if args.i >= kernel.num_lhs() || args.j >= kernel.num_rhs() {
        return Err(KernelError::InvalidParameter(format!(
            "index pair ({}, {}) outside {} x {} kernel",
            args.i,
            args.j,
            kernel.num_lhs(),
            kernel.num_rhs()
        )));
    }
    check_compact(&kernel)?;

    println!("{:.6}", kernel.kernel(args.i, args.j));
    Ok(())
}

fn save_params_command(args: SaveParamsArgs) -> Result<()> {
    let saved = SavedKernel::with_width(args.width);
    saved.validate()?;
    saved.save_to_file(&args.output)?;
    info!("Kernel parameters saved to: {:?}", args.output);
    Ok(())
}

fn info_command(args: InfoArgs) -> Result<()> {
    info!("Loading kernel parameters from: {:?}", args.params);
    let saved = SavedKernel::load_from_file(&args.params)?;
    saved.print_summary();
    Ok(())
}

fn build_kernel<'a>(
    args: &KernelArgs,
    lhs: &'a dyn DotFeatures,
    rhs: &'a dyn DotFeatures,
) -> Result<GaussianKernel<'a>> {
    let mut kernel = GaussianKernel::with_cache_size(args.cache_size, args.width)?;
    kernel.set_compact_enabled(args.compact);
    kernel.set_normalizer(args.normalizer.clone().into())?;
    kernel.bind(lhs, rhs)?;

    if let Some(path) = &args.params {
        info!("Loading kernel parameters from: {path:?}");
        let saved = SavedKernel::load_from_file(path)?;
        kernel.reload(&saved)?;
    }

    info!(
        "Gaussian kernel: width={}, compact={}, normalizer={}",
        kernel.width(),
        kernel.compact_enabled(),
        kernel.normalizer().name()
    );
    Ok(kernel)
}

// Surface compact-mode misuse as an error instead of a panic mid-matrix.
fn check_compact(kernel: &GaussianKernel<'_>) -> Result<()> {
    if kernel.compact_enabled() {
        kernel.compact_power()?;
    }
    Ok(())
}

fn load_right(args: &KernelArgs) -> Result<Option<Box<dyn DotFeatures>>> {
    args.right
        .as_ref()
        .map(|path| load_features(path, &args.format))
        .transpose()
}

fn load_features(path: &Path, format: &str) -> Result<Box<dyn DotFeatures>> {
    let format = if format == "auto" {
        detect_format(path)
    } else {
        format.to_string()
    };

    info!("Loading {path:?} as {format} format");

    let features: Box<dyn DotFeatures> = match format.as_str() {
        "libsvm" => Box::new(LibSVMDataset::from_file(path)?.into_parts().0),
        "csv" => Box::new(CSVDataset::from_file(path)?.into_parts().0),
        _ => {
            return Err(KernelError::InvalidParameter(format!(
                "Unsupported format: {format}. Use 'libsvm' or 'csv'"
            )))
        }
    };

    info!("Loaded {} vectors", features.num_vectors());
    Ok(features)
}

fn write_matrix<W: Write>(mut writer: W, matrix: &[Vec<f64>]) -> Result<()> {
    for row in matrix {
        let line: Vec<String> = row.iter().map(|value| format!("{value:.6}")).collect();
        writeln!(writer, "{}", line.join(" ")).map_err(KernelError::IoError)?;
    }
    writer.flush().map_err(KernelError::IoError)?;
    Ok(())
}

fn detect_format(path: &Path) -> String {
    if let Some(extension) = path.extension() {
        match extension.to_str() {
            Some("csv") => "csv".to_string(),
            Some("libsvm") | Some("svm") | Some("txt") => "libsvm".to_string(),
            _ => {
                warn!("Unknown file extension, assuming LibSVM format");
                "libsvm".to_string()
            }
        }
    } else {
        warn!("No file extension, assuming LibSVM format");
        "libsvm".to_string()
    }
}
