use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use retriever_core::{CharacterClasses, HashMode, ProbeSelection, SelectionState};

use crate::platform::LogDestination;

#[derive(Debug, Parser)]
#[command(
    name = "retriever-frontend",
    version,
    about = "Terminal front end for the PDF password retriever and its benchmark probe"
)]
pub struct Cli {
    /// Settings file (RON). Defaults to ./retriever_frontend.ron when present
    #[arg(long, global = true)]
    pub settings: Option<PathBuf>,

    /// Where log records go (overrides the settings file)
    #[arg(long, value_enum, global = true)]
    pub log: Option<LogDestination>,

    /// Log at debug level
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub action: Action,
}

#[derive(Debug, Subcommand)]
pub enum Action {
    /// Print what the retriever knows about a PDF's encryption
    Info(RetrieverArgs),
    /// Attempt to recover the PDF password
    Crack(RetrieverArgs),
    /// Run the benchmark probe
    Probe(ProbeArgs),
}

#[derive(Debug, Args)]
pub struct RetrieverArgs {
    /// PDF file to operate on
    pub target: Option<PathBuf>,

    /// Retriever executable (defaults to the settings file, then next to this program)
    #[arg(long)]
    pub binary: Option<PathBuf>,

    /// Wordlist file to try before brute force
    #[arg(long)]
    pub wordlist: Option<PathBuf>,

    #[arg(long)]
    pub min_length: Option<u32>,

    #[arg(long)]
    pub max_length: Option<u32>,

    /// Worker threads for the retriever (defaults to the settings file)
    #[arg(long)]
    pub threads: Option<u32>,

    /// Extra characters to include in the search space
    #[arg(long, default_value = "", allow_hyphen_values = true)]
    pub custom_chars: String,

    /// Search only the custom characters
    #[arg(long)]
    pub use_custom_only: bool,

    #[arg(long)]
    pub exclude_uppercase: bool,

    #[arg(long)]
    pub exclude_lowercase: bool,

    #[arg(long)]
    pub exclude_digits: bool,

    #[arg(long)]
    pub exclude_special: bool,
}

impl RetrieverArgs {
    pub fn selection(&self, binary_path: PathBuf, default_threads: Option<u32>) -> SelectionState {
        SelectionState {
            binary_path,
            target_file: self.target.clone(),
            wordlist: self.wordlist.clone(),
            min_length: self.min_length,
            max_length: self.max_length,
            threads: self.threads.or(default_threads),
            custom_characters: self.custom_chars.clone(),
            use_custom_only: self.use_custom_only,
            classes: CharacterClasses {
                uppercase: !self.exclude_uppercase,
                lowercase: !self.exclude_lowercase,
                digits: !self.exclude_digits,
                special: !self.exclude_special,
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum HashArg {
    None,
    Sha256,
}

impl From<HashArg> for HashMode {
    fn from(value: HashArg) -> Self {
        match value {
            HashArg::None => HashMode::None,
            HashArg::Sha256 => HashMode::Sha256,
        }
    }
}

#[derive(Debug, Args)]
pub struct ProbeArgs {
    /// Probe executable (defaults to the settings file, then next to this program)
    #[arg(long)]
    pub binary: Option<PathBuf>,

    /// Password lengths to benchmark, comma separated
    #[arg(long, value_delimiter = ',')]
    pub lengths: Vec<u32>,

    /// Attempts per length
    #[arg(long)]
    pub attempts: Option<u32>,

    #[arg(long, value_enum, default_value_t = HashArg::None)]
    pub hash: HashArg,

    #[arg(long)]
    pub include_special: bool,

    /// Custom character set
    #[arg(long, default_value = "", allow_hyphen_values = true)]
    pub custom: String,

    /// Free-form options passed through to the probe
    #[arg(long, default_value = "", allow_hyphen_values = true)]
    pub options: String,
}

impl ProbeArgs {
    pub fn selection(&self, binary_path: PathBuf) -> ProbeSelection {
        ProbeSelection {
            binary_path,
            lengths: self.lengths.clone(),
            attempts: self.attempts,
            hash: self.hash.into(),
            include_special: self.include_special,
            custom: self.custom.clone(),
            extra_options: self.options.clone(),
        }
    }
}
