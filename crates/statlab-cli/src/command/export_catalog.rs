use std::path::PathBuf;

use statlab_games::{Catalog, GameKind};

use crate::{logging, util};

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct ExportCatalogArg {
    /// Output file path; stdout when omitted
    #[clap(long)]
    output: Option<PathBuf>,
}

pub(crate) fn run(arg: &ExportCatalogArg) -> anyhow::Result<()> {
    let ExportCatalogArg { output } = arg;
    logging::init_stderr();

    let catalog = Catalog::builtin();
    for game in GameKind::ALL {
        log::debug!("{game}: {} levels", catalog.level_count(game));
    }
    util::write_json(&catalog, output.as_deref())?;
    if let Some(path) = output {
        eprintln!("Catalog written to {}", path.display());
    }
    Ok(())
}
