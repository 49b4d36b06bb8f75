//! Mirror Match: paired versus independent comparisons.
//!
//! Every subject is measured before and after a treatment with a small true
//! effect. Subjects vary a lot, so comparing the two groups as if they were
//! independent drowns the effect in noise. The correlation slider blends each
//! subject's after value from an unrelated draw (r = 0) to "before plus the
//! effect" (r = 1). The paired t-test, which looks at per-subject differences,
//! picks the effect up long before the independent test does.

use rand::Rng;
use rand_distr::StandardNormal;
use serde::{Deserialize, Serialize};
use statlab_stats::t_test::{self, TTest};

use crate::{
    Game, GameKind, GameSeed, LevelError, LevelInfo, LevelOutcome, ParamRange, Progress, Tunable,
};

pub const CORRELATION_RANGE: ParamRange = ParamRange::new(0.0, 100.0, 1.0);

/// Mean of the before measurements.
const BASELINE: f64 = 50.0;
/// Significance level of the paired test.
pub const ALPHA: f64 = 0.05;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MirrorParam {
    Correlation,
}

impl MirrorParam {
    pub const ALL: [Self; 1] = [Self::Correlation];
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MirrorLevel {
    #[serde(flatten)]
    pub info: LevelInfo,
    /// True treatment effect.
    pub diff: f64,
    /// Spread of the subjects.
    pub base_sd: f64,
    /// Number of subjects.
    pub n: usize,
}

/// The built-in two levels.
#[must_use]
pub fn builtin_levels() -> Vec<MirrorLevel> {
    vec![
        MirrorLevel {
            info: LevelInfo::new(
                "The Messy Data",
                "The effect is hidden by noise. Raise the correlation to see how consistent \
                 the change really is.",
                "A paired t-test does not compare group averages. It analyses each subject's \
                 difference score, so if every subject went up a little, it finds the effect \
                 even when the groups look messy.",
            ),
            diff: 5.0,
            base_sd: 20.0,
            n: 15,
        },
        MirrorLevel {
            info: LevelInfo::new(
                "High Variance",
                "Subjects are extremely different from each other. Can you still find the \
                 small treatment effect?",
                "Paired designs control for individual differences. Whether a subject starts \
                 at 100 or at 50 does not matter; if both go up by 5, the effect is clear.",
            ),
            diff: 4.0,
            base_sd: 40.0,
            n: 20,
        },
    ]
}

/// One subject's measurements.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Subject {
    pub before: f64,
    /// After value unrelated to `before`.
    pub independent: f64,
    /// After value that is exactly `before` plus the effect.
    pub perfect: f64,
}

impl Subject {
    fn draw<R>(level: &MirrorLevel, rng: &mut R) -> Self
    where
        R: Rng + ?Sized,
    {
        let z: f64 = rng.sample(StandardNormal);
        let z_after: f64 = rng.sample(StandardNormal);
        let before = BASELINE + z * level.base_sd;
        Self {
            before,
            independent: BASELINE + level.diff + z_after * level.base_sd,
            perfect: before + level.diff,
        }
    }

    /// After value at correlation `r` in `[0, 1]`.
    #[must_use]
    pub fn after(&self, r: f64) -> f64 {
        self.independent * (1.0 - r) + self.perfect * r
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MirrorReadout {
    /// Slider position, 0 to 100.
    pub correlation: f64,
    pub before: Vec<f64>,
    pub after: Vec<f64>,
    pub independent: TTest,
    pub paired: TTest,
    /// 100 once the paired test is significant, otherwise `80 (1 - p)`.
    pub meter: f64,
    pub gate_open: bool,
}

/// State of a Mirror Match session.
#[derive(Debug, Clone)]
pub struct MirrorMatch {
    levels: Vec<MirrorLevel>,
    seed: GameSeed,
    progress: Progress,
    subjects: Vec<Subject>,
    correlation: f64,
}

impl MirrorMatch {
    pub fn new(levels: Vec<MirrorLevel>, seed: GameSeed) -> Result<Self, LevelError> {
        let mut game = Self {
            progress: Progress::new(levels.len()),
            levels,
            seed,
            subjects: Vec::new(),
            correlation: 0.0,
        };
        game.load_level(0)?;
        Ok(game)
    }

    #[must_use]
    pub fn level(&self) -> &MirrorLevel {
        &self.levels[self.progress.level()]
    }

    #[must_use]
    pub fn subjects(&self) -> &[Subject] {
        &self.subjects
    }

    #[must_use]
    pub fn correlation(&self) -> f64 {
        self.correlation
    }

    fn tests(&self) -> (Vec<f64>, Vec<f64>, TTest, TTest) {
        let r = self.correlation / 100.0;
        let before = self.subjects.iter().map(|s| s.before).collect::<Vec<_>>();
        let after = self.subjects.iter().map(|s| s.after(r)).collect::<Vec<_>>();
        // load_level guarantees at least two subjects
        let independent = t_test::independent_t(&before, &after).expect("two or more subjects");
        let paired = t_test::paired_t(&before, &after).expect("two or more subjects");
        (before, after, independent, paired)
    }

    #[must_use]
    pub fn readout(&self) -> MirrorReadout {
        let (before, after, independent, paired) = self.tests();
        let gate_open = paired.is_significant(ALPHA);
        let meter = if gate_open {
            100.0
        } else {
            (1.0 - paired.p).max(0.0) * 80.0
        };
        MirrorReadout {
            correlation: self.correlation,
            before,
            after,
            independent,
            paired,
            meter,
            gate_open,
        }
    }
}

impl Game for MirrorMatch {
    fn kind(&self) -> GameKind {
        GameKind::MirrorMatch
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
        self.tests().3.is_significant(ALPHA)
    }

    fn load_level(&mut self, index: usize) -> Result<(), LevelError> {
        let Some(level) = self.levels.get(index) else {
            return Err(LevelError::OutOfRange {
                index,
                count: self.levels.len(),
            });
        };
        if level.n < 2 {
            return Err(LevelError::Invalid {
                index,
                reason: "needs at least two subjects",
            });
        }
        let mut rng = self.seed.level_rng(index);
        self.subjects = (0..level.n).map(|_| Subject::draw(level, &mut rng)).collect();
        self.correlation = 0.0;
        self.progress.start_level(index)?;
        let (_, _, independent, paired) = self.tests();
        log::debug!(
            "{}: level {} drew {} subjects, p independent {:.3}, p paired {:.3}",
            self.kind(),
            index + 1,
            self.subjects.len(),
            independent.p,
            paired.p
        );
        Ok(())
    }

    fn settle_level(&mut self) -> LevelOutcome {
        self.level().info.outcome(self.progress.level(), None, None)
    }
}

impl Tunable for MirrorMatch {
    type Param = MirrorParam;

    fn params(&self) -> &'static [MirrorParam] {
        &MirrorParam::ALL
    }

    fn label(&self, _param: MirrorParam) -> &'static str {
        "Correlation"
    }

    fn range(&self, _param: MirrorParam) -> ParamRange {
        CORRELATION_RANGE
    }

    fn value(&self, _param: MirrorParam) -> f64 {
        self.correlation
    }

    fn is_unlocked(&self, _param: MirrorParam) -> bool {
        true
    }

    fn store(&mut self, _param: MirrorParam, value: f64) {
        self.correlation = value;
    }
}
