use std::{
    io::{self, Write},
    path::PathBuf,
};

use statlab_games::GameKind;
use statlab_tui::{Runtime, Screen, ScreenStack};

use self::screens::HubScreen;
use crate::{
    command::GameDataArg,
    logging::{self, HeldLog},
};

mod screens;

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct PlayArg {
    /// Game to start directly; the game menu is shown when omitted
    game: Option<GameKind>,
    #[clap(flatten)]
    data: GameDataArg,
    /// Append log records to this file instead of printing them on exit
    #[clap(long)]
    log_file: Option<PathBuf>,
}

pub(crate) fn run(arg: &PlayArg) -> anyhow::Result<()> {
    let PlayArg {
        game,
        data,
        log_file,
    } = arg;

    let held = match log_file {
        Some(path) => {
            logging::init_file(path)?;
            None
        }
        None => Some(logging::init_held()),
    };

    let result = play(*game, data);
    match held {
        Some(held) => release_after(&held, io::stderr().lock(), result),
        None => result,
    }
}

fn play(game: Option<GameKind>, data: &GameDataArg) -> anyhow::Result<()> {
    let (catalog, seed) = data.load()?;
    let initial: Box<dyn Screen> = match game {
        Some(game) => screens::game_screen(game, &catalog, seed)?,
        None => Box::new(HubScreen::new(catalog, seed)),
    };
    Runtime::new().run(&mut ScreenStack::new(initial))?;
    eprintln!("Played with seed {seed}");
    Ok(())
}

/// Flushes `held` into `sink` whatever `result` is, keeping the first error.
fn release_after<W>(held: &HeldLog, sink: W, result: anyhow::Result<()>) -> anyhow::Result<()>
where
    W: Write,
{
    let released = held.release_to(sink);
    result?;
    released?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use anyhow::anyhow;

    use super::*;

    #[test]
    fn test_held_log_released_on_failure() {
        let held = HeldLog::default();
        held.clone().write_all(b"[INFO] loading catalog\n").unwrap();
        let mut out = Vec::new();
        let result = release_after(&held, &mut out, Err(anyhow!("Invalid catalog file")));
        assert_eq!(result.unwrap_err().to_string(), "Invalid catalog file");
        assert_eq!(out, b"[INFO] loading catalog\n");
    }

    #[test]
    fn test_missing_catalog_fails_before_terminal() {
        let data = GameDataArg {
            seed: None,
            catalog: Some(PathBuf::from("/nonexistent/statlab-catalog.json")),
        };
        let err = play(None, &data).unwrap_err();
        assert!(err.to_string().starts_with("Failed to open catalog file"));
    }
}
