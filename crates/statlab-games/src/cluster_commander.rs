//! Cluster Commander: the F-ratio of a one-way ANOVA.
//!
//! Three groups of equal size sit at `-offset`, `0` and `+offset` and share a
//! standard deviation. The spread slider pushes the groups apart (signal); the
//! precision slider narrows them (noise). The level is complete once the F-ratio
//! exceeds the critical value.

use serde::{Deserialize, Serialize};
use statlab_stats::anova::{GroupSummary, OneWayAnova};

use crate::{Game, GameKind, LevelError, LevelInfo, LevelOutcome, ParamRange, Progress, Tunable};

pub const SPREAD_RANGE: ParamRange = ParamRange::new(0.0, 100.0, 1.0);
pub const PRECISION_RANGE: ParamRange = ParamRange::new(10.0, 100.0, 1.0);

/// Observations per group.
pub const GROUP_SIZE: u32 = 20;
/// Critical F for df (2, 57) at α = 0.05, rounded.
pub const CRITICAL_F: f64 = 3.2;
/// Group offset per unit of spread.
const OFFSET_PER_SPREAD: f64 = 0.8;
/// F at which the meter is full.
const METER_FULL_F: f64 = 10.0;

/// Standard deviation selected by a precision value.
///
/// Precision 10 gives sd 41, precision 100 gives sd 5.
#[must_use]
pub fn sd_for_precision(precision: f64) -> f64 {
    45.0 - 0.4 * precision
}

/// Precision slider position for a standard deviation, clamped into the slider's range.
#[must_use]
pub fn precision_for_sd(sd: f64) -> f64 {
    PRECISION_RANGE.clamp((45.0 - sd) / 0.4)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ClusterParam {
    /// Between-group spread.
    Spread,
    /// Within-group precision.
    Precision,
}

impl ClusterParam {
    pub const ALL: [Self; 2] = [Self::Spread, Self::Precision];

    #[must_use]
    pub const fn range(self) -> ParamRange {
        match self {
            Self::Spread => SPREAD_RANGE,
            Self::Precision => PRECISION_RANGE,
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Spread => "Spread (between)",
            Self::Precision => "Precision (within)",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ClusterSettings {
    pub spread: f64,
    /// Shared standard deviation. Levels may start outside the precision slider's reach.
    pub sd: f64,
}

impl ClusterSettings {
    #[must_use]
    pub fn offset(&self) -> f64 {
        self.spread * OFFSET_PER_SPREAD
    }

    #[must_use]
    pub fn groups(&self) -> [GroupSummary; 3] {
        let offset = self.offset();
        [-offset, 0.0, offset].map(|mean| GroupSummary::new(mean, self.sd, GROUP_SIZE))
    }

    #[must_use]
    pub fn anova(&self) -> OneWayAnova {
        OneWayAnova::from_summaries(&self.groups()).expect("three non-empty groups")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClusterLevel {
    #[serde(flatten)]
    pub info: LevelInfo,
    pub controls: Vec<ClusterParam>,
    pub init: ClusterSettings,
}

/// The built-in three levels.
#[must_use]
pub fn builtin_levels() -> Vec<ClusterLevel> {
    vec![
        ClusterLevel {
            info: LevelInfo::new(
                "The Spread",
                "Increase the between-group variability. Pull the groups apart until they are \
                 distinct.",
                "ANOVA compares the variance between groups with the variance within groups. \
                 Moving the means apart increased the signal.",
            ),
            controls: vec![ClusterParam::Spread],
            init: ClusterSettings {
                spread: 0.0,
                sd: 40.0,
            },
        },
        ClusterLevel {
            info: LevelInfo::new(
                "Precision Approach",
                "The groups are close together. Reduce the within-group noise to tell them apart.",
                "Less noise makes the denominator of the F-ratio smaller, which drives F up. \
                 Precision matters.",
            ),
            controls: vec![ClusterParam::Precision],
            init: ClusterSettings {
                spread: 20.0,
                sd: 80.0,
            },
        },
        ClusterLevel {
            info: LevelInfo::new(
                "Total Command",
                "Balance spread and precision to reach a convincing F-ratio.",
                "F is the between-group mean square over the within-group mean square. You \
                 have mastered the balance behind ANOVA.",
            ),
            controls: vec![ClusterParam::Spread, ClusterParam::Precision],
            init: ClusterSettings {
                spread: 10.0,
                sd: 60.0,
            },
        },
    ]
}

/// Display p-value: `< 0.05` when significant, otherwise a rough `4 / (F + 1)`.
///
/// ```
/// use statlab_games::cluster_commander::p_label;
///
/// assert_eq!(p_label(12.0), "< 0.05");
/// assert_eq!(p_label(1.0), "1.00");
/// assert_eq!(p_label(3.0), "1.00");
/// assert_eq!(p_label(0.0), "1.00");
/// ```
#[must_use]
pub fn p_label(f_ratio: f64) -> String {
    if f_ratio > CRITICAL_F {
        "< 0.05".to_owned()
    } else {
        format!("{:.2}", (4.0 / (f_ratio + 1.0)).min(1.0))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClusterReadout {
    pub settings: ClusterSettings,
    /// Precision slider position.
    pub precision: f64,
    pub offset: f64,
    pub groups: [GroupSummary; 3],
    pub anova: OneWayAnova,
    pub critical_f: f64,
    pub p_label: String,
    /// `F / 10` as a percentage, capped at 100.
    pub meter: f64,
    pub gate_open: bool,
}

/// State of a Cluster Commander session.
#[derive(Debug, Clone)]
pub struct ClusterCommander {
    levels: Vec<ClusterLevel>,
    progress: Progress,
    settings: ClusterSettings,
}

impl ClusterCommander {
    pub fn new(levels: Vec<ClusterLevel>) -> Result<Self, LevelError> {
        let mut game = Self {
            progress: Progress::new(levels.len()),
            levels,
            settings: ClusterSettings::default(),
        };
        game.load_level(0)?;
        Ok(game)
    }

    #[must_use]
    pub fn level(&self) -> &ClusterLevel {
        &self.levels[self.progress.level()]
    }

    #[must_use]
    pub fn settings(&self) -> ClusterSettings {
        self.settings
    }

    #[must_use]
    pub fn readout(&self) -> ClusterReadout {
        let anova = self.settings.anova();
        let f_ratio = anova.f_ratio;
        ClusterReadout {
            settings: self.settings,
            precision: precision_for_sd(self.settings.sd),
            offset: self.settings.offset(),
            groups: self.settings.groups(),
            p_label: p_label(f_ratio),
            meter: (f_ratio / METER_FULL_F * 100.0).min(100.0),
            gate_open: anova.exceeds(CRITICAL_F),
            critical_f: CRITICAL_F,
            anova,
        }
    }
}

impl Game for ClusterCommander {
    fn kind(&self) -> GameKind {
        GameKind::ClusterCommander
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
        self.settings.anova().exceeds(CRITICAL_F)
    }

    fn load_level(&mut self, index: usize) -> Result<(), LevelError> {
        self.progress.start_level(index)?;
        self.settings = self.levels[index].init;
        log::debug!(
            "{}: level {} starts at spread {} sd {} (F = {:.2})",
            self.kind(),
            index + 1,
            self.settings.spread,
            self.settings.sd,
            self.settings.anova().f_ratio
        );
        Ok(())
    }

    fn settle_level(&mut self) -> LevelOutcome {
        self.level().info.outcome(self.progress.level(), None, None)
    }
}

impl Tunable for ClusterCommander {
    type Param = ClusterParam;

    fn params(&self) -> &'static [ClusterParam] {
        &ClusterParam::ALL
    }

    fn label(&self, param: ClusterParam) -> &'static str {
        param.label()
    }

    fn range(&self, param: ClusterParam) -> ParamRange {
        param.range()
    }

    fn value(&self, param: ClusterParam) -> f64 {
        match param {
            ClusterParam::Spread => self.settings.spread,
            ClusterParam::Precision => precision_for_sd(self.settings.sd),
        }
    }

    fn is_unlocked(&self, param: ClusterParam) -> bool {
        self.level().controls.contains(&param)
    }

    fn store(&mut self, param: ClusterParam, value: f64) {
        match param {
            ClusterParam::Spread => self.settings.spread = value,
            ClusterParam::Precision => self.settings.sd = sd_for_precision(value),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::Advance;

    use super::*;

    fn game() -> ClusterCommander {
        ClusterCommander::new(builtin_levels()).unwrap()
    }

    #[test]
    fn test_precision_mapping() {
        assert!((sd_for_precision(100.0) - 5.0).abs() < 1e-12);
        assert!((sd_for_precision(10.0) - 41.0).abs() < 1e-12);
        assert!((precision_for_sd(25.0) - 50.0).abs() < 1e-12);
        assert_eq!(precision_for_sd(80.0), 10.0);
        assert_eq!(precision_for_sd(0.0), 100.0);
    }

    #[test]
    fn test_spread_level() {
        let mut game = game();
        let readout = game.readout();
        assert_eq!(readout.anova.f_ratio, 0.0);
        assert_eq!(readout.p_label, "1.00");
        assert!(!readout.gate_open);

        // F = 20 * (0.8 s)^2 / 40^2 passes 3.2 at s = 20
        game.set(ClusterParam::Spread, 19.0).unwrap();
        assert!(!game.gate_open());
        game.set(ClusterParam::Spread, 21.0).unwrap();
        assert!(game.gate_open());
        let readout = game.readout();
        assert_eq!(readout.p_label, "< 0.05");
        assert!((readout.anova.f_ratio - 20.0 * 16.8 * 16.8 / 1600.0).abs() < 1e-9);
        assert!((readout.meter - readout.anova.f_ratio * 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_level_sd_outside_slider_reach() {
        let mut game = game();
        game.load_level(1).unwrap();
        assert_eq!(game.settings().sd, 80.0);
        assert_eq!(game.value(ClusterParam::Precision), 10.0);
        assert!(game.set(ClusterParam::Spread, 50.0).is_err());

        game.nudge(ClusterParam::Precision, 1).unwrap();
        assert!((game.settings().sd - 40.6).abs() < 1e-9);
        game.set(ClusterParam::Precision, 100.0).unwrap();
        assert!(game.gate_open());
        assert_eq!(game.readout().meter, 100.0);
    }

    #[test]
    fn test_play_through() {
        let mut game = game();
        loop {
            for param in game.unlocked_params() {
                game.set(param, 100.0).unwrap();
            }
            game.complete_level().unwrap();
            if game.advance().unwrap() == Advance::Finished {
                break;
            }
        }
        assert_eq!(game.progress().outcomes().len(), 3);
    }
}
