use statlab_games::{
    Catalog, GameKind, GameSeed, LevelError, chi_square::ChiSquareChallenge,
    cluster_commander::ClusterCommander, factorial_flux::FactorialFlux,
    group_guesser::GroupGuesser, mirror_match::MirrorMatch, variance_explorer::VarianceExplorer,
};
use statlab_tui::Screen;

pub(crate) use self::hub::HubScreen;
use self::game::GameScreen;

mod chi_square;
mod cluster_commander;
mod factorial_flux;
mod finished;
mod game;
mod group_guesser;
mod hub;
mod mirror_match;
mod variance_explorer;

/// Starts `game` on its first level.
pub(crate) fn game_screen(
    game: GameKind,
    catalog: &Catalog,
    seed: GameSeed,
) -> Result<Box<dyn Screen>, LevelError> {
    let screen: Box<dyn Screen> = match game {
        GameKind::VarianceExplorer => Box::new(GameScreen::new(VarianceExplorer::new(
            catalog.variance_explorer.clone(),
            seed,
        )?)),
        GameKind::ChiSquare => Box::new(GameScreen::new(ChiSquareChallenge::new(
            catalog.chi_square.clone(),
        )?)),
        GameKind::GroupGuesser => Box::new(GameScreen::new(GroupGuesser::new(
            catalog.group_guesser.clone(),
        )?)),
        GameKind::ClusterCommander => Box::new(GameScreen::new(ClusterCommander::new(
            catalog.cluster_commander.clone(),
        )?)),
        GameKind::FactorialFlux => Box::new(GameScreen::new(FactorialFlux::new(
            catalog.factorial_flux.clone(),
        )?)),
        GameKind::MirrorMatch => Box::new(GameScreen::new(MirrorMatch::new(
            catalog.mirror_match.clone(),
            seed,
        )?)),
    };
    log::info!("{game}: started with seed {seed}");
    Ok(screen)
}

#[cfg(test)]
mod tests {
    use ratatui::{Terminal, backend::TestBackend};

    use super::*;

    #[test]
    fn test_every_game_screen_draws() {
        let catalog = Catalog::builtin();
        let seed = GameSeed::from_bytes([2; 16]);
        for size in [(140, 45), (60, 20)] {
            let mut terminal = Terminal::new(TestBackend::new(size.0, size.1)).unwrap();
            for game in GameKind::ALL {
                let screen = game_screen(game, &catalog, seed).unwrap();
                terminal.draw(|frame| screen.draw(frame)).unwrap();
            }
        }
    }
}
