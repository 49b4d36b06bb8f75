use std::path::PathBuf;

use serde::Serialize;
use statlab_games::{
    Catalog, Game, GameKind, GameSeed,
    chi_square::{ChiSquareChallenge, ChiSquareReadout, Decision},
    cluster_commander::{ClusterCommander, ClusterReadout},
    factorial_flux::{FactorialFlux, FluxReadout},
    group_guesser::{GroupGuesser, GroupReadout},
    mirror_match::{MirrorMatch, MirrorReadout},
    variance_explorer::{VarianceExplorer, VarianceReadout},
};

use crate::{command::GameDataArg, logging, util};

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct ReportArg {
    /// Game to report on; all games when omitted
    game: Option<GameKind>,
    #[clap(flatten)]
    data: GameDataArg,
    /// Output file path; stdout when omitted
    #[clap(long)]
    output: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
struct Report {
    seed: GameSeed,
    games: Vec<GameReport>,
}

#[derive(Debug, Serialize)]
#[serde(tag = "game", content = "levels", rename_all = "kebab-case")]
enum GameReport {
    VarianceExplorer(Vec<LevelReport<VarianceReadout>>),
    ChiSquare(Vec<LevelReport<ChiSquareReport>>),
    GroupGuesser(Vec<LevelReport<GroupReadout>>),
    ClusterCommander(Vec<LevelReport<ClusterReadout>>),
    FactorialFlux(Vec<LevelReport<FluxReadout>>),
    MirrorMatch(Vec<LevelReport<MirrorReadout>>),
}

/// A level as it looks right after loading.
#[derive(Debug, Serialize)]
struct LevelReport<R> {
    /// 1-based.
    level: usize,
    title: String,
    objective: String,
    readout: R,
}

#[derive(Debug, Serialize)]
struct ChiSquareReport {
    #[serde(flatten)]
    readout: ChiSquareReadout,
    answer: Decision,
}

pub(crate) fn run(arg: &ReportArg) -> anyhow::Result<()> {
    let ReportArg { game, data, output } = arg;
    logging::init_stderr();

    let (catalog, seed) = data.load()?;
    let games = match game {
        Some(game) => vec![*game],
        None => GameKind::ALL.to_vec(),
    };

    eprintln!("Building report for {} games (seed {seed})...", games.len());
    let games = games
        .into_iter()
        .map(|game| build_game_report(game, &catalog, seed))
        .collect::<anyhow::Result<Vec<_>>>()?;

    util::write_json(&Report { seed, games }, output.as_deref())?;
    if let Some(path) = output {
        eprintln!("Report written to {}", path.display());
    }
    Ok(())
}

fn build_game_report(
    game: GameKind,
    catalog: &Catalog,
    seed: GameSeed,
) -> anyhow::Result<GameReport> {
    let report = match game {
        GameKind::VarianceExplorer => {
            let mut game = VarianceExplorer::new(catalog.variance_explorer.clone(), seed)?;
            GameReport::VarianceExplorer(report_levels(&mut game, VarianceExplorer::readout)?)
        }
        GameKind::ChiSquare => {
            let mut game = ChiSquareChallenge::new(catalog.chi_square.clone())?;
            GameReport::ChiSquare(report_levels(&mut game, |game| ChiSquareReport {
                readout: game.readout(),
                answer: game.level().answer(),
            })?)
        }
        GameKind::GroupGuesser => {
            let mut game = GroupGuesser::new(catalog.group_guesser.clone())?;
            GameReport::GroupGuesser(report_levels(&mut game, GroupGuesser::readout)?)
        }
        GameKind::ClusterCommander => {
            let mut game = ClusterCommander::new(catalog.cluster_commander.clone())?;
            GameReport::ClusterCommander(report_levels(&mut game, ClusterCommander::readout)?)
        }
        GameKind::FactorialFlux => {
            let mut game = FactorialFlux::new(catalog.factorial_flux.clone())?;
            GameReport::FactorialFlux(report_levels(&mut game, FactorialFlux::readout)?)
        }
        GameKind::MirrorMatch => {
            let mut game = MirrorMatch::new(catalog.mirror_match.clone(), seed)?;
            GameReport::MirrorMatch(report_levels(&mut game, MirrorMatch::readout)?)
        }
    };
    Ok(report)
}

fn report_levels<G, R, F>(game: &mut G, readout: F) -> anyhow::Result<Vec<LevelReport<R>>>
where
    G: Game,
    F: Fn(&G) -> R,
{
    let count = game.progress().level_count();
    let mut levels = Vec::with_capacity(count);
    for index in 0..count {
        game.load_level(index)?;
        levels.push(LevelReport {
            level: index + 1,
            title: game.level_title().to_owned(),
            objective: game.objective().to_owned(),
            readout: readout(game),
        });
    }
    eprintln!("  {}: {count} levels", game.kind());
    Ok(levels)
}
