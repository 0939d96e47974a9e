use clap::{ArgGroup, Args, Parser, Subcommand};
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    author = "Isoscope Contributors",
    version,
    about = "Isoscope - search a gene, list its protein isoforms, and inspect predicted 3D structures with pLDDT confidence.",
    help_template = HELP_TEMPLATE,
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output; command errors are still reported
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to a specified file in addition to the console output
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Set the number of threads used when analysing several local files.
    /// Defaults to the number of available logical cores.
    #[arg(short = 'j', long, global = true, value_name = "NUM")]
    pub threads: Option<usize>,

    /// Path to a configuration file in TOML format.
    /// Defaults to `config.toml` in the user configuration directory, if present.
    #[arg(short, long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Set a specific configuration value, overriding the config file.
    /// Can be used multiple times. Example: -S http.timeout-secs=60
    #[arg(short = 'S', long = "set", value_name = "KEY=VALUE", global = true)]
    pub set_values: Vec<String>,

    /// Show descriptions in their original language instead of translating them.
    #[arg(long, global = true)]
    pub no_translate: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Suggest gene symbols matching a prefix (UniProt, reviewed human entries).
    Search(SearchArgs),
    /// List the protein isoforms of a gene that have an AlphaFold model.
    Gene(GeneArgs),
    /// Show UniProt annotations and AlphaFold confidence for one protein.
    Protein(ProteinArgs),
    /// Predict a structure from an amino-acid sequence with ESMFold.
    Predict(PredictArgs),
    /// Compute pLDDT confidence statistics for local PDB files.
    Confidence(ConfidenceArgs),
    /// List the built-in showcase genes.
    Catalog,
}

/// Arguments for the `search` subcommand.
#[derive(Args, Debug)]
pub struct SearchArgs {
    /// Gene symbol prefix (at least two characters).
    #[arg(required = true, value_name = "QUERY")]
    pub query: String,

    /// Maximum number of suggestions to show.
    #[arg(short, long, value_name = "INT")]
    pub limit: Option<usize>,
}

/// Arguments for the `gene` subcommand.
#[derive(Args, Debug)]
pub struct GeneArgs {
    /// Gene symbol or common alias (e.g., BRCA1, HER2).
    #[arg(required = true, value_name = "NAME")]
    pub name: String,

    /// Print the result as JSON instead of a table.
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `protein` subcommand.
#[derive(Args, Debug)]
pub struct ProteinArgs {
    /// UniProt accession, optionally with an isoform suffix (e.g., P38398-2).
    #[arg(required = true, value_name = "ACCESSION")]
    pub accession: String,

    /// Download the predicted structure and compute its confidence locally.
    #[arg(long)]
    pub structure: bool,

    /// Write an interactive 3D view of the structure to this HTML file.
    #[arg(long, value_name = "PATH")]
    pub view: Option<PathBuf>,

    /// Save the downloaded structure file.
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Print the result as JSON instead of text.
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `predict` subcommand.
#[derive(Args, Debug)]
#[command(group(ArgGroup::new("input").required(true).args(["sequence", "fasta"])))]
pub struct PredictArgs {
    /// Amino-acid sequence in one-letter code.
    #[arg(short, long, value_name = "SEQ")]
    pub sequence: Option<String>,

    /// Read the sequence from a FASTA file.
    #[arg(short, long, value_name = "PATH")]
    pub fasta: Option<PathBuf>,

    /// Save the predicted structure as a PDB file.
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Write an interactive 3D view coloured by confidence to this HTML file.
    #[arg(long, value_name = "PATH")]
    pub view: Option<PathBuf>,

    /// Print the confidence summary as JSON.
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `confidence` subcommand.
#[derive(Args, Debug)]
pub struct ConfidenceArgs {
    /// One or more PDB files with pLDDT in the B-factor column.
    #[arg(required = true, value_name = "PDB", num_args(1..))]
    pub inputs: Vec<PathBuf>,

    /// Write a per-residue confidence table (CSV) for the first input.
    #[arg(long, value_name = "PATH")]
    pub per_residue: Option<PathBuf>,

    /// Print the summaries as JSON.
    #[arg(long)]
    pub json: bool,
}
