use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// gamearchive — archive stale game installs, restore them on demand
#[derive(Parser, Debug)]
#[command(
    name = "gamearchive",
    version,
    about = "Archive stale game installs to another drive and restore them on demand",
    long_about = "gamearchive moves game directories that have not been modified for a\n\
                   configured number of days from your games folder to an archive folder.\n\
                   Pass an archived directory to move it back.",
    after_help = "EXAMPLES:\n  \
        gamearchive                            Archive every stale game\n  \
        gamearchive --dry-run                  Show what would be archived\n  \
        gamearchive /mnt/archive/Portal        Restore one game\n  \
        gamearchive --format json              Machine-readable report\n  \
        gamearchive config init                Write a starter config file\n  \
        gamearchive config show                Print the effective config"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Archived directory to restore (exactly one); omit to archive
    #[arg(value_name = "PATH")]
    pub paths: Vec<String>,

    /// Config file to use
    #[arg(long, short, global = true, env = "GAMEARCHIVE_CONFIG", value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Report what would move without moving anything
    #[arg(long, global = true)]
    pub dry_run: bool,

    /// Output format
    #[arg(long, global = true, default_value = "human")]
    pub format: OutputFormat,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Verbose output
    #[arg(long, short, global = true)]
    pub verbose: bool,

    /// Quiet mode — minimal output
    #[arg(long, short, global = true)]
    pub quiet: bool,
}

/// Which top-level operation the positional arguments select
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    Archive,
    Restore(String),
}

impl Cli {
    /// Exactly one positional argument means restore; anything else archives
    pub fn mode(&self) -> Mode {
        match self.paths.as_slice() {
            [path] => Mode::Restore(path.clone()),
            _ => Mode::Archive,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: CompletionShell,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Print the config file location
    Path,

    /// Write a default config file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Human,
    Json,
    Quiet,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum CompletionShell {
    Bash,
    Zsh,
    Fish,
}
