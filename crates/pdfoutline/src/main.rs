#![allow(unused)]

use crate::prelude::*;
use clap::Parser;

mod batch;
mod prelude;
mod show;

#[derive(Debug, clap::Parser)]
#[command(
    author,
    version,
    about,
    long_about = "Extract structural outlines (title and H1/H2/H3 headings) from PDF documents"
)]
pub struct App {
    #[command(subcommand)]
    pub command: SubCommands,

    #[clap(flatten)]
    global: Global,
}

#[derive(Debug, Clone, clap::Args)]
pub struct Global {
    /// Whether to display additional information.
    #[clap(long, env = "PDFOUTLINE_VERBOSE", global = true, default_value = "false")]
    verbose: bool,
}

#[derive(Debug, clap::Parser)]
pub enum SubCommands {
    /// Process every PDF in a directory into JSON outline files
    Batch(crate::batch::App),

    /// Print one document's outline as JSON
    Outline {
        /// Path to the PDF file
        path: std::path::PathBuf,
    },

    /// Print one document's outline as a readable table
    Toc {
        /// Path to the PDF file
        path: std::path::PathBuf,
    },
}

fn main() -> Result<()> {
    let app = App::parse();

    let mut builder = env_logger::Builder::from_default_env();
    if app.global.verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.init();

    color_eyre::install()?;

    match app.command {
        SubCommands::Batch(sub_app) => crate::batch::run(sub_app),
        SubCommands::Outline { path } => crate::show::outline(&path),
        SubCommands::Toc { path } => crate::show::toc(&path),
    }
}
