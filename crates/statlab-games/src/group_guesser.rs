//! Group Guesser: statistical power of a two-sample t-test.
//!
//! Two normal curves share a standard deviation and differ in their means. The
//! player drives the summary values directly (mean difference, standard
//! deviation, group size) and watches the t-statistic and p-value respond. Each
//! level unlocks one lever of power: effect size, noise or sample size.

use serde::{Deserialize, Serialize};
use statlab_stats::{normal, t_test};

use crate::{Game, GameKind, LevelError, LevelInfo, LevelOutcome, ParamRange, Progress, Tunable};

pub const MEAN_DIFF_RANGE: ParamRange = ParamRange::new(0.0, 50.0, 1.0);
pub const SD_RANGE: ParamRange = ParamRange::new(1.0, 60.0, 1.0);
pub const N_RANGE: ParamRange = ParamRange::new(2.0, 150.0, 1.0);

/// |t| at which the meter is full.
const METER_FULL_T: f64 = 3.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GroupParam {
    MeanDiff,
    Sd,
    N,
}

impl GroupParam {
    pub const ALL: [Self; 3] = [Self::MeanDiff, Self::Sd, Self::N];

    #[must_use]
    pub const fn range(self) -> ParamRange {
        match self {
            Self::MeanDiff => MEAN_DIFF_RANGE,
            Self::Sd => SD_RANGE,
            Self::N => N_RANGE,
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::MeanDiff => "Mean difference",
            Self::Sd => "Standard deviation",
            Self::N => "Sample size (n)",
        }
    }
}

/// Summary values of the two groups.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct GroupSettings {
    pub mean_diff: f64,
    pub sd: f64,
    /// Observations per group.
    pub n: u32,
}

impl GroupSettings {
    #[must_use]
    pub fn get(&self, param: GroupParam) -> f64 {
        match param {
            GroupParam::MeanDiff => self.mean_diff,
            GroupParam::Sd => self.sd,
            GroupParam::N => f64::from(self.n),
        }
    }

    #[expect(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn set(&mut self, param: GroupParam, value: f64) {
        match param {
            GroupParam::MeanDiff => self.mean_diff = value,
            GroupParam::Sd => self.sd = value,
            GroupParam::N => self.n = value.round().max(0.0) as u32,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupLevel {
    #[serde(flatten)]
    pub info: LevelInfo,
    /// Parameters the player may change on this level.
    pub controls: Vec<GroupParam>,
    pub init: GroupSettings,
    /// The level is complete once p drops below this.
    pub target_p: f64,
}

/// The built-in three levels.
#[must_use]
pub fn builtin_levels() -> Vec<GroupLevel> {
    vec![
        GroupLevel {
            info: LevelInfo::new(
                "The Separation",
                "Increase the difference between the group means until the groups are clearly \
                 distinct.",
                "Increasing the effect size, the difference between groups, is the most direct \
                 way to a significant result. Very different treatments need no fancy statistics.",
            ),
            controls: vec![GroupParam::MeanDiff],
            init: GroupSettings {
                mean_diff: 0.0,
                sd: 20.0,
                n: 30,
            },
            target_p: 0.05,
        },
        GroupLevel {
            info: LevelInfo::new(
                "Noise Reduction",
                "The means are close and fixed. Reduce the noise (standard deviation) to reveal \
                 the signal.",
                "Reducing variability within groups, with more precise instruments or more \
                 homogeneous subjects, lets you detect even small differences.",
            ),
            controls: vec![GroupParam::Sd],
            init: GroupSettings {
                mean_diff: 15.0,
                sd: 40.0,
                n: 30,
            },
            target_p: 0.05,
        },
        GroupLevel {
            info: LevelInfo::new(
                "Power in Numbers",
                "Small difference, high noise. The only option left is to collect more data.",
                "This is statistical power: even a tiny difference in noisy data can be shown \
                 to be significant with a large enough sample.",
            ),
            controls: vec![GroupParam::N],
            init: GroupSettings {
                mean_diff: 5.0,
                sd: 15.0,
                n: 10,
            },
            target_p: 0.05,
        },
    ]
}

/// Formats a p-value the way the readout shows it.
///
/// ```
/// use statlab_games::group_guesser::p_label;
///
/// assert_eq!(p_label(0.0004), "< 0.001");
/// assert_eq!(p_label(0.0512), "0.051");
/// ```
#[must_use]
pub fn p_label(p: f64) -> String {
    if p < 0.001 {
        "< 0.001".to_owned()
    } else {
        format!("{p:.3}")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupReadout {
    pub settings: GroupSettings,
    pub t: f64,
    /// `2n - 2`, shown for reference; the p-value uses the normal approximation.
    pub df: u32,
    pub p: f64,
    pub p_label: String,
    /// Strength of the signal in `[0, 100]`.
    pub meter: f64,
    pub target_p: f64,
    pub gate_open: bool,
}

/// State of a Group Guesser session.
#[derive(Debug, Clone)]
pub struct GroupGuesser {
    levels: Vec<GroupLevel>,
    progress: Progress,
    settings: GroupSettings,
}

impl GroupGuesser {
    pub fn new(levels: Vec<GroupLevel>) -> Result<Self, LevelError> {
        let mut game = Self {
            progress: Progress::new(levels.len()),
            levels,
            settings: GroupSettings::default(),
        };
        game.load_level(0)?;
        Ok(game)
    }

    #[must_use]
    pub fn level(&self) -> &GroupLevel {
        &self.levels[self.progress.level()]
    }

    #[must_use]
    pub fn settings(&self) -> GroupSettings {
        self.settings
    }

    fn t(&self) -> f64 {
        t_test::pooled_t(self.settings.mean_diff, self.settings.sd, self.settings.n)
    }

    #[must_use]
    pub fn readout(&self) -> GroupReadout {
        let t = self.t();
        let p = normal::two_tailed_p(t);
        let target_p = self.level().target_p;
        GroupReadout {
            settings: self.settings,
            t,
            df: self.settings.n.saturating_mul(2).saturating_sub(2),
            p,
            p_label: p_label(p),
            meter: (t.abs() / METER_FULL_T * 100.0).min(100.0),
            target_p,
            gate_open: p < target_p,
        }
    }
}

impl Game for GroupGuesser {
    fn kind(&self) -> GameKind {
        GameKind::GroupGuesser
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
        normal::two_tailed_p(self.t()) < self.level().target_p
    }

    fn load_level(&mut self, index: usize) -> Result<(), LevelError> {
        self.progress.start_level(index)?;
        self.settings = self.levels[index].init;
        log::debug!(
            "{}: level {} starts at {:?}, controls {:?}",
            self.kind(),
            index + 1,
            self.settings,
            self.levels[index].controls
        );
        Ok(())
    }

    fn settle_level(&mut self) -> LevelOutcome {
        self.level().info.outcome(self.progress.level(), None, None)
    }
}

impl Tunable for GroupGuesser {
    type Param = GroupParam;

    fn params(&self) -> &'static [GroupParam] {
        &GroupParam::ALL
    }

    fn label(&self, param: GroupParam) -> &'static str {
        param.label()
    }

    fn range(&self, param: GroupParam) -> ParamRange {
        param.range()
    }

    fn value(&self, param: GroupParam) -> f64 {
        self.settings.get(param)
    }

    fn is_unlocked(&self, param: GroupParam) -> bool {
        self.level().controls.contains(&param)
    }

    fn store(&mut self, param: GroupParam, value: f64) {
        self.settings.set(param, value);
    }
}
