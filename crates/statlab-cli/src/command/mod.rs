use std::path::PathBuf;

use clap::{Parser, Subcommand};
use statlab_games::{Catalog, GameSeed};

use self::{export_catalog::ExportCatalogArg, play::PlayArg, report::ReportArg};
use crate::util;

mod export_catalog;
mod play;
mod report;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    /// What mode to run the program in
    #[command(subcommand)]
    mode: Option<Mode>,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Play the games in the terminal
    Play(#[clap(flatten)] PlayArg),
    /// Write the initial readout of every level as JSON
    Report(#[clap(flatten)] ReportArg),
    /// Write the built-in level catalog as JSON
    ExportCatalog(#[clap(flatten)] ExportCatalogArg),
}

/// Options selecting the data the games are played with.
#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct GameDataArg {
    /// Seed for the generated data (32 hex digits); random when omitted
    #[clap(long)]
    seed: Option<GameSeed>,
    /// Level catalog JSON file; the built-in levels are used when omitted
    #[clap(long)]
    catalog: Option<PathBuf>,
}

impl GameDataArg {
    pub(crate) fn load(&self) -> anyhow::Result<(Catalog, GameSeed)> {
        let catalog = match &self.catalog {
            Some(path) => util::read_catalog_file(path)?,
            None => Catalog::builtin(),
        };
        let seed = self.seed.unwrap_or_else(GameSeed::random);
        Ok((catalog, seed))
    }
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    match args.mode.unwrap_or(Mode::Play(PlayArg::default())) {
        Mode::Play(arg) => play::run(&arg)?,
        Mode::Report(arg) => report::run(&arg)?,
        Mode::ExportCatalog(arg) => export_catalog::run(&arg)?,
    }
    Ok(())
}
