//! CLI commands implementation.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use console::style;

use pagesift::config::ExtractionConfig;
use pagesift::extract::{extract_document, ParserChain, ProviderRegistry};

#[derive(Parser)]
#[command(name = "pagesift")]
#[command(about = "Document text extraction and geometric normalization pipeline")]
#[command(version)]
pub struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Check if verbose mode is enabled (for early logging setup).
pub fn is_verbose() -> bool {
    std::env::args().any(|arg| arg == "-v" || arg == "--verbose")
}

#[derive(Subcommand)]
enum Commands {
    /// Extract normalized text from a document
    Extract {
        /// Path to the PDF or image file
        file: PathBuf,
        /// OCR provider to use when the file has no text layer
        #[arg(long, env = "OCR_PROVIDER")]
        provider: Option<String>,
        /// OCR language
        #[arg(short, long, env = "OCR_LANGUAGE")]
        language: Option<String>,
        /// Rasterization resolution for the OCR path
        #[arg(long)]
        dpi: Option<u32>,
        /// Emit the full document as JSON records instead of plain text
        #[arg(long)]
        json: bool,
        /// Print each page's text separately
        #[arg(short, long)]
        pages: bool,
    },

    /// Check availability of the external extraction tools
    Check,
}

pub fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Extract {
            file,
            provider,
            language,
            dpi,
            json,
            pages,
        } => {
            let mut config = ExtractionConfig::from_env();
            if let Some(provider) = provider {
                config.ocr_provider = provider;
            }
            if let Some(language) = language {
                config.language = language;
            }
            if let Some(dpi) = dpi {
                config.dpi = dpi;
            }
            cmd_extract(&file, &config, json, pages)
        }
        Commands::Check => cmd_check(),
    }
}

fn cmd_extract(
    file: &PathBuf,
    config: &ExtractionConfig,
    json: bool,
    pages: bool,
) -> anyhow::Result<()> {
    let document = extract_document(file, config)?;

    if document.is_empty() {
        eprintln!(
            "  {} No extractable content in {}",
            style("!").yellow(),
            file.display()
        );
    }

    if json {
        serde_json::to_writer_pretty(std::io::stdout().lock(), &document)?;
        println!();
    } else if pages {
        for (i, page) in document.iter().enumerate() {
            println!("--- Page {} ---", i + 1);
            println!("{}", page.text());
        }
    } else {
        println!("{}", document.text());
    }

    Ok(())
}

fn cmd_check() -> anyhow::Result<()> {
    let config = ExtractionConfig::from_env();
    let registry = ProviderRegistry::builtin();
    println!("Registered OCR providers: {}", registry.names().join(", "));

    let chain = ParserChain::with_registry(&registry, &config)?;
    for backend in chain.backends() {
        let mark = if backend.is_available() {
            style("✓").green()
        } else {
            style("✗").red()
        };
        println!("  {} {}: {}", mark, backend.name(), backend.availability_hint());
    }

    Ok(())
}
