use anyhow::Result;
use clap::Parser;
use colored::Colorize;

use gamearchive::archiver::{self, RunOptions, StdFs};
use gamearchive::cli::args::{Cli, Commands, CompletionShell, ConfigAction, Mode, OutputFormat};
use gamearchive::cli::output;
use gamearchive::common::config::Config;
use gamearchive::common::logging;

fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.no_color {
        colored::control::set_override(false);
    }

    match cli.command {
        Some(Commands::Config { ref action }) => cmd_config(&cli, action),

        Some(Commands::Completions { ref shell }) => {
            use clap::CommandFactory;
            let mut cmd = Cli::command();
            let shell = match shell {
                CompletionShell::Bash => clap_complete::Shell::Bash,
                CompletionShell::Zsh => clap_complete::Shell::Zsh,
                CompletionShell::Fish => clap_complete::Shell::Fish,
            };
            clap_complete::generate(shell, &mut cmd, "gamearchive", &mut std::io::stdout());
            Ok(())
        }

        None => {
            let config = Config::load_from(&Config::resolve_path(cli.config.as_deref()))?;
            let _guard = logging::init(cli.verbose, cli.quiet, config.log_dir.as_deref());

            let options = RunOptions {
                dry_run: cli.dry_run,
                show_progress: !cli.quiet && matches!(cli.format, OutputFormat::Human),
            };

            match cli.mode() {
                Mode::Archive => cmd_archive(&cli, &config, &options),
                Mode::Restore(ref path) => cmd_restore(&cli, path, &config, &options),
            }
        }
    }
}

// ─── Archive ──────────────────────────────────────────────────────────────────

fn cmd_archive(cli: &Cli, config: &Config, options: &RunOptions) -> Result<()> {
    match archiver::archive_all(&StdFs, config, options) {
        Ok(report) => match cli.format {
            OutputFormat::Human => output::print_archive_report(&report),
            OutputFormat::Json => output::print_json(&report),
            OutputFormat::Quiet => output::print_archive_quiet(&report),
        },
        // Already logged with its cause; the run ends normally.
        Err(failure) => match cli.format {
            OutputFormat::Human => output::print_run_failure(&failure),
            OutputFormat::Json => output::print_json(&serde_json::json!({
                "error": failure.error.to_string(),
                "report": failure.report,
            })),
            OutputFormat::Quiet => output::print_archive_quiet(&failure.report),
        },
    }
    Ok(())
}

// ─── Restore ──────────────────────────────────────────────────────────────────

fn cmd_restore(cli: &Cli, path: &str, config: &Config, options: &RunOptions) -> Result<()> {
    match archiver::restore(&StdFs, path, config, options) {
        Ok(outcome) => match cli.format {
            OutputFormat::Human => output::print_restore_outcome(&outcome),
            OutputFormat::Json => output::print_json(&outcome),
            OutputFormat::Quiet => output::print_restore_quiet(&outcome),
        },
        Err(e) if e.is_rejection() => return Err(e.into()),
        Err(e) => {
            if !cli.quiet {
                eprintln!("  {} Restore failed: {}", "⚠".yellow(), e);
            }
        }
    }
    Ok(())
}

// ─── Config ───────────────────────────────────────────────────────────────────

fn cmd_config(cli: &Cli, action: &ConfigAction) -> Result<()> {
    let path = Config::resolve_path(cli.config.as_deref());
    match action {
        ConfigAction::Show => {
            let config = Config::load_from(&path)?;
            match cli.format {
                OutputFormat::Json => output::print_json(&config),
                _ => println!("{}", toml::to_string_pretty(&config)?),
            }
            Ok(())
        }
        ConfigAction::Path => {
            println!("{}", path.display());
            Ok(())
        }
        ConfigAction::Init { force } => {
            if path.exists() && !force {
                anyhow::bail!(
                    "Config already exists at {} (use --force to overwrite)",
                    path.display()
                );
            }
            Config::default().save_to(&path)?;
            println!("  {} Wrote default config to {}", "✓".green(), path.display());
            println!("  Edit source_folder and destination_folder before the first run.");
            Ok(())
        }
    }
}
