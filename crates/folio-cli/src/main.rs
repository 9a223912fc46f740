use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use folio_config::Config;
use folio_engine::{
    DiffKind, VersionDiff, convert_mdx_to_portable_text, diff_versions, extract_excerpt,
    extract_plain_text_from_json,
};
use std::path::{Path, PathBuf};
use std::{fs, process};

#[derive(Debug, Parser)]
#[command(name = "folio", version, about = "Portable Text tools for the folio blog")]
struct Cli {
    /// Config file to use instead of ~/.config/folio/config.toml
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Never colourise output
    #[arg(long, global = true)]
    no_color: bool,
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Convert an MDX post into Portable Text JSON.
    Convert {
        /// MDX source path
        file: PathBuf,
        /// Output minified JSON
        #[arg(long)]
        min: bool,
    },
    /// Print the excerpt above the post's truncate marker.
    Excerpt {
        /// MDX source path
        file: PathBuf,
    },
    /// Render stored Portable Text JSON as plain text.
    PlainText {
        /// Portable Text JSON path
        file: PathBuf,
    },
    /// Line diff between two stored Portable Text versions.
    Diff {
        /// Older Portable Text JSON path
        old: PathBuf,
        /// Newer Portable Text JSON path
        new: PathBuf,
    },
}

fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;
    let color = config.color && !cli.no_color;

    match cli.cmd {
        Command::Convert { file, min } => {
            let source = read_content(&config, &file)?;
            let value = convert_mdx_to_portable_text(&source);
            log::debug!("converted {} into {} blocks", file.display(), value.len());

            let out = if min {
                value.to_json()?
            } else {
                value.to_json_pretty()?
            };
            println!("{out}");
        }
        Command::Excerpt { file } => {
            let source = read_content(&config, &file)?;
            match extract_excerpt(&source) {
                Some(excerpt) => println!("{excerpt}"),
                None => {
                    eprintln!("No excerpt: {} has no truncate marker", file.display());
                    process::exit(1);
                }
            }
        }
        Command::PlainText { file } => {
            let json = read_content(&config, &file)?;
            let text = extract_plain_text_from_json(&json)
                .with_context(|| format!("Invalid Portable Text in {}", file.display()))?;
            println!("{text}");
        }
        Command::Diff { old, new } => {
            let old_json = read_content(&config, &old)?;
            let new_json = read_content(&config, &new)?;
            let diff = diff_versions(&old_json, &new_json).context("Invalid Portable Text")?;
            print_diff(&diff, color);
        }
    }

    Ok(())
}

fn load_config(path: Option<&Path>) -> Result<Config> {
    let loaded = match path {
        Some(path) => Config::load_from_path(path),
        None => Config::load(),
    };
    match loaded {
        Ok(Some(config)) => Ok(config),
        Ok(None) => {
            log::debug!("no config file found, using defaults");
            Ok(Config::default())
        }
        Err(e) => Err(e).context("Failed to load config file"),
    }
}

fn read_content(config: &Config, path: &Path) -> Result<String> {
    let resolved = config.resolve(path);
    fs::read_to_string(&resolved).with_context(|| format!("Failed to read {}", resolved.display()))
}

fn print_diff(diff: &VersionDiff, color: bool) {
    for line in &diff.lines {
        let rendered = line.to_string();
        if !color {
            println!("{rendered}");
            continue;
        }
        match line.kind {
            DiffKind::Added => println!("{}", rendered.green()),
            DiffKind::Removed => println!("{}", rendered.red()),
            DiffKind::Unchanged => println!("{}", rendered.dimmed()),
        }
    }

    if diff.is_unchanged() {
        println!("No changes");
    } else {
        println!(
            "additions: {}, deletions: {}",
            diff.additions(),
            diff.deletions()
        );
    }
}
