//! Figure Template CLI
//!
//! Usage:
//!   figure-template render <DOC> -o <BASE> [-f <FORMAT>]... [OPTIONS]
//!   figure-template profiles [--style-dir <DIR>]
//!
//! Logging goes to stderr and is controlled by `RUST_LOG` (default `info`).

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use figure_template::{
    AxisSelector, Error, FigureDocument, SaveOptions, StyleContext, StyleLibrary, StyleProfile,
};

#[derive(Parser)]
#[command(name = "figure-template")]
#[command(about = "Render figures with named style profiles and declassified variants")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Render a TOML figure document
    Render {
        /// Figure document (TOML)
        input: PathBuf,

        /// Output path without extension
        #[arg(short, long)]
        output: PathBuf,

        /// Output format: png, svg, pdf or emf (repeatable)
        #[arg(short = 'f', long = "format", default_value = "png")]
        formats: Vec<String>,

        /// Style profile: notebook, slides or paper
        #[arg(short, long)]
        profile: Option<String>,

        /// Override the profile's save dpi
        #[arg(long)]
        dpi: Option<f64>,

        /// Leave figure and panel backgrounds out
        #[arg(long)]
        transparent: bool,

        /// Also write a declassified variant: x, y or both
        #[arg(long)]
        declassify: Option<String>,

        /// Directory holding <profile>.figstyle files
        #[arg(long)]
        style_dir: Option<PathBuf>,
    },

    /// List style profiles and where they are loaded from
    Profiles {
        /// Directory holding <profile>.figstyle files
        #[arg(long)]
        style_dir: Option<PathBuf>,
    },
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match run(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(Error::Style(e)) => {
            eprintln!("{}", e.report());
            ExitCode::FAILURE
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn library(style_dir: Option<PathBuf>) -> StyleLibrary {
    style_dir.map(StyleLibrary::new).unwrap_or_default()
}

fn run(command: Command) -> Result<(), Error> {
    match command {
        Command::Render {
            input,
            output,
            formats,
            profile,
            dpi,
            transparent,
            declassify,
            style_dir,
        } => {
            let profile = profile
                .map(|p| p.parse::<StyleProfile>())
                .transpose()?;
            let declassify = declassify
                .map(|s| s.parse::<AxisSelector>())
                .transpose()?;

            let mut ctx = StyleContext::new(library(style_dir));
            let document = FigureDocument::from_file(&input)?;
            let mut figure = document.build(&mut ctx, profile)?;

            let options = SaveOptions {
                formats,
                dpi,
                transparent: transparent.then_some(true),
                declassify,
            };
            for path in figure_template::save_figure(&mut figure, &output, &options)? {
                println!("{}", path.display());
            }
            Ok(())
        }
        Command::Profiles { style_dir } => {
            let library = library(style_dir);
            for profile in StyleProfile::ALL {
                match library.resolve(profile.tag()) {
                    Ok(path) => println!("{:<10} {}", profile.tag(), path.display()),
                    Err(e) => println!("{:<10} missing ({})", profile.tag(), e),
                }
            }
            Ok(())
        }
    }
}
