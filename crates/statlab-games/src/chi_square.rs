//! Chi-Square Challenge: decide whether two categorical variables are related.
//!
//! Each level shows a fixed 2×2 contingency table from a made-up study. The
//! player reads the observed and expected counts and the chi-square statistic,
//! then decides whether the variables are independent or associated. Any
//! decision completes the level; the outcome records whether it was right.

use serde::{Deserialize, Serialize};
use statlab_stats::contingency::{ChiSquareAnalysis, ContingencyTable, PBand};

use crate::{Game, GameKind, LevelError, LevelInfo, LevelOutcome, Progress};

/// The player's verdict on a table.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    derive_more::Display,
    derive_more::IsVariant,
)]
#[serde(rename_all = "kebab-case")]
pub enum Decision {
    #[display("Independent")]
    Independent,
    #[display("Associated")]
    Associated,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChiSquareLevel {
    #[serde(flatten)]
    pub info: LevelInfo,
    pub row_labels: Vec<String>,
    pub col_labels: Vec<String>,
    pub observed: ContingencyTable,
    /// The correct answer.
    pub associated: bool,
}

impl ChiSquareLevel {
    #[must_use]
    pub fn answer(&self) -> Decision {
        if self.associated {
            Decision::Associated
        } else {
            Decision::Independent
        }
    }
}

/// The built-in five scenarios.
#[must_use]
pub fn builtin_levels() -> Vec<ChiSquareLevel> {
    fn level(
        info: LevelInfo,
        rows: [&str; 2],
        cols: [&str; 2],
        observed: [[u32; 2]; 2],
        associated: bool,
    ) -> ChiSquareLevel {
        ChiSquareLevel {
            info,
            row_labels: rows.map(str::to_owned).to_vec(),
            col_labels: cols.map(str::to_owned).to_vec(),
            observed: ContingencyTable::from_2x2(observed),
            associated,
        }
    }

    vec![
        level(
            LevelInfo::new(
                "Independence Test",
                "A study examines whether a new teaching method improves student pass rates.",
                "A large chi-square with p < 0.05 rejects independence: the new teaching \
                 method is clearly associated with higher pass rates.",
            ),
            ["Traditional", "New Method"],
            ["Pass", "Fail"],
            [[45, 15], [65, 5]],
            true,
        ),
        level(
            LevelInfo::new(
                "Treatment vs. Placebo",
                "A clinical trial tests if a new drug reduces side effects compared to a placebo.",
                "A non-significant result (p > 0.05) means we cannot conclude that the drug \
                 changes side effect rates. The differences could be due to chance.",
            ),
            ["Placebo", "Drug"],
            ["Side Effects", "No Side Effects"],
            [[30, 70], [35, 65]],
            false,
        ),
        level(
            LevelInfo::new(
                "Complex Pattern",
                "Researchers survey 200 people about exercise frequency and sleep quality.",
                "Exercise and sleep quality are significantly associated. Compare the \
                 expected counts with the observed ones to see where the difference comes from.",
            ),
            ["Low Exercise", "High Exercise"],
            ["Poor Sleep", "Good Sleep"],
            [[55, 45], [30, 70]],
            true,
        ),
        level(
            LevelInfo::new(
                "Gender and Preference",
                "A marketing study examines if product preference differs by gender.",
                "Preferences are nearly equal across groups, so the variables look \
                 independent. Chi-square is small because observed is close to expected.",
            ),
            ["Male", "Female"],
            ["Product A", "Product B"],
            [[48, 52], [52, 48]],
            false,
        ),
        level(
            LevelInfo::new(
                "Strong Association",
                "A study examines vaccination status and disease contraction.",
                "Very large chi-square values mean very strong associations: vaccination \
                 status is highly associated with the disease outcome.",
            ),
            ["Vaccinated", "Unvaccinated"],
            ["Contracted Disease", "Healthy"],
            [[5, 95], [45, 55]],
            true,
        ),
    ]
}

/// Display label of a p-value band.
///
/// ```
/// use statlab_games::chi_square::p_label;
/// use statlab_stats::contingency::PBand;
///
/// assert_eq!(p_label(PBand::BelowOne), "< 0.01");
/// assert_eq!(p_label(PBand::AboveFive), "> 0.05");
/// ```
#[must_use]
pub fn p_label(band: PBand) -> &'static str {
    match band {
        PBand::AboveFive => "> 0.05",
        PBand::BelowFive => "0.03",
        PBand::BelowOne => "< 0.01",
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChiSquareReadout {
    pub analysis: ChiSquareAnalysis,
    pub row_totals: Vec<u64>,
    pub col_totals: Vec<u64>,
    pub grand_total: u64,
    pub p_label: &'static str,
    pub significance: &'static str,
    pub decision: Option<Decision>,
    pub gate_open: bool,
}

/// State of a Chi-Square Challenge session.
#[derive(Debug, Clone)]
pub struct ChiSquareChallenge {
    levels: Vec<ChiSquareLevel>,
    progress: Progress,
    decision: Option<Decision>,
}

impl ChiSquareChallenge {
    /// Starts a session on the first scenario.
    pub fn new(levels: Vec<ChiSquareLevel>) -> Result<Self, LevelError> {
        let mut game = Self {
            progress: Progress::new(levels.len()),
            levels,
            decision: None,
        };
        game.load_level(0)?;
        Ok(game)
    }

    #[must_use]
    pub fn level(&self) -> &ChiSquareLevel {
        &self.levels[self.progress.level()]
    }

    #[must_use]
    pub fn decision(&self) -> Option<Decision> {
        self.decision
    }

    pub fn decide(&mut self, decision: Decision) -> Result<(), LevelError> {
        if !self.progress.phase().is_playing() {
            return Err(LevelError::NotPlaying);
        }
        self.decision = Some(decision);
        log::trace!("{}: decision = {decision}", self.kind());
        Ok(())
    }

    /// Number of scenarios answered correctly so far.
    #[must_use]
    pub fn correct_count(&self) -> usize {
        self.progress.correct_count()
    }

    #[must_use]
    pub fn readout(&self) -> ChiSquareReadout {
        let table = &self.level().observed;
        let analysis = ChiSquareAnalysis::new(table);
        let p_label = p_label(analysis.p_band);
        let significance = if analysis.is_significant() {
            "Significant"
        } else {
            "Not Significant"
        };
        ChiSquareReadout {
            row_totals: table.row_totals(),
            col_totals: table.col_totals(),
            grand_total: table.grand_total(),
            analysis,
            p_label,
            significance,
            decision: self.decision,
            gate_open: self.gate_open(),
        }
    }
}

impl Game for ChiSquareChallenge {
    fn kind(&self) -> GameKind {
        GameKind::ChiSquare
    }

    fn progress(&self) -> &Progress {
        &self.progress
    }

    fn progress_mut(&mut self) -> &mut Progress {
        &mut self.progress
    }

    fn level_title(&self) -> &str {
        &self.level().info.title
    }

    fn objective(&self) -> &str {
        &self.level().info.objective
    }

    fn gate_open(&self) -> bool {
        self.decision.is_some()
    }

    fn load_level(&mut self, index: usize) -> Result<(), LevelError> {
        self.progress.start_level(index)?;
        self.decision = None;
        let analysis = ChiSquareAnalysis::new(&self.levels[index].observed);
        log::debug!(
            "{}: level {} chi-square {:.2} (df {}, {:?})",
            self.kind(),
            index + 1,
            analysis.chi_square,
            analysis.degrees_of_freedom,
            analysis.p_band
        );
        Ok(())
    }

    fn settle_level(&mut self) -> LevelOutcome {
        let level = self.level();
        let correct = self.decision == Some(level.answer());
        level.info.outcome(self.progress.level(), None, Some(correct))
    }
}
