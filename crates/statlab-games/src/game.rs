use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{Advance, LevelError, LevelOutcome, ParamRange, Progress};

/// The games in the collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GameKind {
    VarianceExplorer,
    ChiSquare,
    GroupGuesser,
    ClusterCommander,
    FactorialFlux,
    MirrorMatch,
}

impl GameKind {
    pub const ALL: [Self; 6] = [
        Self::VarianceExplorer,
        Self::ChiSquare,
        Self::GroupGuesser,
        Self::ClusterCommander,
        Self::FactorialFlux,
        Self::MirrorMatch,
    ];

    /// Command-line name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::VarianceExplorer => "variance-explorer",
            Self::ChiSquare => "chi-square",
            Self::GroupGuesser => "group-guesser",
            Self::ClusterCommander => "cluster-commander",
            Self::FactorialFlux => "factorial-flux",
            Self::MirrorMatch => "mirror-match",
        }
    }

    /// Human-readable title.
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::VarianceExplorer => "Variance Explorer",
            Self::ChiSquare => "Chi-Square Challenge",
            Self::GroupGuesser => "Group Guesser",
            Self::ClusterCommander => "Cluster Commander",
            Self::FactorialFlux => "Factorial Flux",
            Self::MirrorMatch => "Mirror Match",
        }
    }

    /// The statistics concept the game teaches.
    #[must_use]
    pub const fn concept(self) -> &'static str {
        match self {
            Self::VarianceExplorer => "Principal components and variance maximization",
            Self::ChiSquare => "Chi-square test of independence",
            Self::GroupGuesser => "t-tests and statistical power",
            Self::ClusterCommander => "One-way ANOVA and the F-ratio",
            Self::FactorialFlux => "Main effects and interactions",
            Self::MirrorMatch => "Paired vs. independent comparisons",
        }
    }
}

impl fmt::Display for GameKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("unknown game '{name}'")]
pub struct UnknownGameError {
    name: String,
}

impl FromStr for GameKind {
    type Err = UnknownGameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.name() == s)
            .ok_or_else(|| UnknownGameError { name: s.to_owned() })
    }
}

/// Text shown for a level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelInfo {
    pub title: String,
    /// What the player has to achieve.
    pub objective: String,
    /// Lesson shown once the level is complete.
    pub insight: String,
}

impl LevelInfo {
    #[must_use]
    pub fn new(title: &str, objective: &str, insight: &str) -> Self {
        Self {
            title: title.to_owned(),
            objective: objective.to_owned(),
            insight: insight.to_owned(),
        }
    }

    #[must_use]
    pub fn outcome(&self, level: usize, score: Option<u32>, correct: Option<bool>) -> LevelOutcome {
        LevelOutcome {
            level,
            title: self.title.clone(),
            insight: self.insight.clone(),
            score,
            correct,
        }
    }
}

/// Behaviour shared by every game: level content, gating and progression.
///
/// Implementors provide the game-specific parts (gate evaluation, level
/// loading, outcome scoring); completing and advancing levels is common.
pub trait Game {
    fn kind(&self) -> GameKind;

    fn progress(&self) -> &Progress;

    fn progress_mut(&mut self) -> &mut Progress;

    /// Title of the current level.
    fn level_title(&self) -> &str;

    /// What the player is asked to do on the current level.
    fn objective(&self) -> &str;

    /// Whether the current parameters meet the level's target.
    fn gate_open(&self) -> bool;

    /// Resets state and (re)generates data for level `index`.
    fn load_level(&mut self, index: usize) -> Result<(), LevelError>;

    /// Builds the outcome of the current level from the current state.
    ///
    /// Called once, right before the level is marked complete.
    fn settle_level(&mut self) -> LevelOutcome;

    /// Completes the current level if its gate is open.
    fn complete_level(&mut self) -> Result<LevelOutcome, LevelError> {
        if !self.progress().phase().is_playing() {
            return Err(LevelError::NotPlaying);
        }
        let gate_open = self.gate_open();
        if !gate_open {
            return Err(LevelError::GateClosed);
        }
        let outcome = self.settle_level();
        self.progress_mut().complete(gate_open, outcome.clone())?;
        log::info!(
            "{}: completed level {} ({}) score={:?} correct={:?}",
            self.kind(),
            outcome.level + 1,
            outcome.title,
            outcome.score,
            outcome.correct
        );
        Ok(outcome)
    }

    /// Moves past a completed level, loading the next one if there is one.
    fn advance(&mut self) -> Result<Advance, LevelError> {
        let advance = self.progress_mut().advance()?;
        if let Advance::Next(index) = advance {
            self.load_level(index)?;
        }
        Ok(advance)
    }
}

/// Games driven by slider-like numeric parameters.
pub trait Tunable: Game {
    type Param: Copy + Eq + fmt::Debug + 'static;

    /// Every parameter of the game, in display order.
    fn params(&self) -> &'static [Self::Param];

    /// Display label of a parameter.
    fn label(&self, param: Self::Param) -> &'static str;

    fn range(&self, param: Self::Param) -> ParamRange;

    fn value(&self, param: Self::Param) -> f64;

    /// Whether the current level lets the player change `param`.
    fn is_unlocked(&self, param: Self::Param) -> bool;

    /// Stores an already validated and clamped value.
    fn store(&mut self, param: Self::Param, value: f64);

    /// Sets a parameter, clamped into its range.
    fn set(&mut self, param: Self::Param, value: f64) -> Result<(), LevelError> {
        if !self.progress().phase().is_playing() {
            return Err(LevelError::NotPlaying);
        }
        if !self.is_unlocked(param) {
            return Err(LevelError::ControlLocked {
                control: self.label(param),
            });
        }
        let value = self.range(param).clamp(value);
        self.store(param, value);
        log::trace!("{}: {} = {value}", self.kind(), self.label(param));
        Ok(())
    }

    /// Moves a parameter by whole steps.
    fn nudge(&mut self, param: Self::Param, steps: i32) -> Result<(), LevelError> {
        let value = self.range(param).step_by(self.value(param), steps);
        self.set(param, value)
    }

    /// Parameters the current level lets the player change.
    fn unlocked_params(&self) -> Vec<Self::Param> {
        self.params()
            .iter()
            .copied()
            .filter(|&p| self.is_unlocked(p))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_names_round_trip() {
        for kind in GameKind::ALL {
            assert_eq!(kind.name().parse::<GameKind>(), Ok(kind));
            let json = serde_json::to_string(&kind).unwrap();
            assert_eq!(json, format!("\"{}\"", kind.name()));
        }
        assert!("pca".parse::<GameKind>().is_err());
    }
}
