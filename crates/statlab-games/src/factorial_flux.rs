//! Factorial Flux: main effects and interactions in a 2×2 design.
//!
//! The player sets the main effect of factor A, the main effect of factor B and
//! their interaction. The four cell means follow from those three numbers and
//! are drawn as an interaction plot (one line per level of B). Each level asks
//! for a particular shape of plot.

use serde::{Deserialize, Serialize};

use crate::{Game, GameKind, LevelError, LevelInfo, LevelOutcome, ParamRange, Progress, Tunable};

pub const EFFECT_RANGE: ParamRange = ParamRange::new(-50.0, 50.0, 1.0);

/// Effects every level starts from.
pub const RESET_EFFECTS: Effects = Effects {
    a: 0.0,
    b: 20.0,
    interaction: 0.0,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FluxParam {
    A,
    B,
    Interaction,
}

impl FluxParam {
    pub const ALL: [Self; 3] = [Self::A, Self::B, Self::Interaction];

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::A => "Effect A",
            Self::B => "Effect B",
            Self::Interaction => "Interaction",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Effects {
    pub a: f64,
    pub b: f64,
    pub interaction: f64,
}

impl Effects {
    #[must_use]
    pub fn get(&self, param: FluxParam) -> f64 {
        match param {
            FluxParam::A => self.a,
            FluxParam::B => self.b,
            FluxParam::Interaction => self.interaction,
        }
    }

    fn set(&mut self, param: FluxParam, value: f64) {
        match param {
            FluxParam::A => self.a = value,
            FluxParam::B => self.b = value,
            FluxParam::Interaction => self.interaction = value,
        }
    }

    /// Cell means of the design.
    ///
    /// ```
    /// use statlab_games::factorial_flux::Effects;
    ///
    /// let cells = Effects { a: 10.0, b: 20.0, interaction: 5.0 }.cell_means();
    /// assert_eq!(cells.b1, [-25.0, -15.0]);
    /// assert_eq!(cells.b2, [5.0, 35.0]);
    /// ```
    #[must_use]
    pub fn cell_means(&self) -> CellMeans {
        let Self { a, b, interaction: i } = *self;
        CellMeans {
            b1: [-a - b + i, a - b - i],
            b2: [-a + b - i, a + b + i],
        }
    }
}

/// Cell means of a 2×2 design, one line per level of factor B.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CellMeans {
    /// Means at A1 and A2 for B1.
    pub b1: [f64; 2],
    /// Means at A1 and A2 for B2.
    pub b2: [f64; 2],
}

impl CellMeans {
    /// Recovers the effects from the cell means.
    #[must_use]
    pub fn effects(&self) -> Effects {
        let [b1a1, b1a2] = self.b1;
        let [b2a1, b2a2] = self.b2;
        Effects {
            a: (b1a2 + b2a2 - b1a1 - b2a1) / 4.0,
            b: (b2a1 + b2a2 - b1a1 - b1a2) / 4.0,
            interaction: (b1a1 - b1a2 - b2a1 + b2a2) / 4.0,
        }
    }

    #[must_use]
    pub fn min(&self) -> f64 {
        self.b1.iter().chain(&self.b2).copied().fold(f64::INFINITY, f64::min)
    }

    #[must_use]
    pub fn max(&self) -> f64 {
        self.b1
            .iter()
            .chain(&self.b2)
            .copied()
            .fold(f64::NEG_INFINITY, f64::max)
    }
}

/// Plot shape a level asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Pattern {
    /// Two main effects, no interaction: sloped, separated, parallel lines.
    Parallel,
    /// Pure interaction: the lines cross.
    Crossover,
    /// The lines start together at A1 and fan out at A2.
    Fan,
}

/// One requirement of a pattern and whether it currently holds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Condition {
    pub label: &'static str,
    pub met: bool,
}

impl Pattern {
    #[must_use]
    pub fn conditions(self, effects: &Effects) -> Vec<Condition> {
        let Effects { a, b, interaction: i } = *effects;
        let condition = |label, met| Condition { label, met };
        match self {
            Self::Parallel => vec![
                condition("|A| > 20", a.abs() > 20.0),
                condition("|B| > 20", b.abs() > 20.0),
                condition("|Interaction| < 10", i.abs() < 10.0),
            ],
            Self::Crossover => vec![
                condition("|A| < 10", a.abs() < 10.0),
                condition("|B| < 10", b.abs() < 10.0),
                condition("|Interaction| > 30", i.abs() > 30.0),
            ],
            Self::Fan => vec![
                condition("|B - Interaction| < 10", (b - i).abs() < 10.0),
                condition("B > 20", b > 20.0),
            ],
        }
    }

    #[must_use]
    pub fn holds(self, effects: &Effects) -> bool {
        self.conditions(effects).iter().all(|c| c.met)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FluxLevel {
    #[serde(flatten)]
    pub info: LevelInfo,
    pub pattern: Pattern,
}

/// The built-in three levels.
#[must_use]
pub fn builtin_levels() -> Vec<FluxLevel> {
    vec![
        FluxLevel {
            info: LevelInfo::new(
                "Parallel Worlds",
                "Create two main effects with no interaction. The lines should be sloped \
                 (effect A) and separated (effect B), but parallel.",
                "Parallel lines mean additivity: the effect of factor A is the same at every \
                 level of factor B. There is no interaction.",
            ),
            pattern: Pattern::Parallel,
        },
        FluxLevel {
            info: LevelInfo::new(
                "The Crossover",
                "Create a pure interaction with no main effects. The lines should form an X.",
                "This is a disordinal interaction: the effect of A flips depending on B. Main \
                 effects alone would be misleading here.",
            ),
            pattern: Pattern::Crossover,
        },
        FluxLevel {
            info: LevelInfo::new(
                "Synergy",
                "Create a fanned interaction. Both lines start at the same point on the left \
                 and spread apart on the right.",
                "This is a fan effect, or synergistic interaction: the factors amplify each \
                 other.",
            ),
            pattern: Pattern::Fan,
        },
    ]
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FluxReadout {
    pub effects: Effects,
    pub cells: CellMeans,
    pub conditions: Vec<Condition>,
    pub gate_open: bool,
}

/// State of a Factorial Flux session.
#[derive(Debug, Clone)]
pub struct FactorialFlux {
    levels: Vec<FluxLevel>,
    progress: Progress,
    effects: Effects,
}

impl FactorialFlux {
    pub fn new(levels: Vec<FluxLevel>) -> Result<Self, LevelError> {
        let mut game = Self {
            progress: Progress::new(levels.len()),
            levels,
            effects: RESET_EFFECTS,
        };
        game.load_level(0)?;
        Ok(game)
    }

    #[must_use]
    pub fn level(&self) -> &FluxLevel {
        &self.levels[self.progress.level()]
    }

    #[must_use]
    pub fn effects(&self) -> Effects {
        self.effects
    }

    #[must_use]
    pub fn readout(&self) -> FluxReadout {
        let conditions = self.level().pattern.conditions(&self.effects);
        FluxReadout {
            effects: self.effects,
            cells: self.effects.cell_means(),
            gate_open: conditions.iter().all(|c| c.met),
            conditions,
        }
    }
}

impl Game for FactorialFlux {
    fn kind(&self) -> GameKind {
        GameKind::FactorialFlux
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
        self.level().pattern.holds(&self.effects)
    }

    fn load_level(&mut self, index: usize) -> Result<(), LevelError> {
        self.progress.start_level(index)?;
        self.effects = RESET_EFFECTS;
        log::debug!(
            "{}: level {} asks for {:?}",
            self.kind(),
            index + 1,
            self.levels[index].pattern
        );
        Ok(())
    }

    fn settle_level(&mut self) -> LevelOutcome {
        self.level().info.outcome(self.progress.level(), None, None)
    }
}

impl Tunable for FactorialFlux {
    type Param = FluxParam;

    fn params(&self) -> &'static [FluxParam] {
        &FluxParam::ALL
    }

    fn label(&self, param: FluxParam) -> &'static str {
        param.label()
    }

    fn range(&self, _param: FluxParam) -> ParamRange {
        EFFECT_RANGE
    }

    fn value(&self, param: FluxParam) -> f64 {
        self.effects.get(param)
    }

    fn is_unlocked(&self, _param: FluxParam) -> bool {
        true
    }

    fn store(&mut self, param: FluxParam, value: f64) {
        self.effects.set(param, value);
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use crate::Advance;

    use super::*;

    fn game() -> FactorialFlux {
        FactorialFlux::new(builtin_levels()).unwrap()
    }

    fn set_all(game: &mut FactorialFlux, a: f64, b: f64, i: f64) {
        game.set(FluxParam::A, a).unwrap();
        game.set(FluxParam::B, b).unwrap();
        game.set(FluxParam::Interaction, i).unwrap();
    }

    #[test]
    fn test_reset_state() {
        let game = game();
        assert_eq!(game.effects(), RESET_EFFECTS);
        let readout = game.readout();
        assert_eq!(readout.cells.b1, [-20.0, -20.0]);
        assert_eq!(readout.cells.b2, [20.0, 20.0]);
        assert_eq!(
            readout.conditions.iter().filter(|c| c.met).count(),
            1,
            "only |Interaction| < 10 holds"
        );
        assert!(!readout.gate_open);
    }

    #[test]
    fn test_parallel_lines() {
        let mut game = game();
        set_all(&mut game, 30.0, 25.0, 5.0);
        assert!(game.gate_open());
        let cells = game.readout().cells;
        let slope_b1 = cells.b1[1] - cells.b1[0];
        let slope_b2 = cells.b2[1] - cells.b2[0];
        assert!((slope_b1 - slope_b2).abs() <= 4.0 * 5.0);
    }

    #[test]
    fn test_crossover_lines_cross() {
        let mut game = game();
        game.load_level(1).unwrap();
        set_all(&mut game, 0.0, 0.0, 40.0);
        assert!(game.gate_open());
        let cells = game.readout().cells;
        assert!(cells.b1[0] > cells.b2[0]);
        assert!(cells.b1[1] < cells.b2[1]);
    }

    #[test]
    fn test_fan_starts_together() {
        let mut game = game();
        game.load_level(2).unwrap();
        assert!(!game.gate_open());
        set_all(&mut game, 10.0, 30.0, 30.0);
        assert!(game.gate_open());
        let cells = game.readout().cells;
        assert_eq!(cells.b1[0], cells.b2[0]);
        assert!(cells.b2[1] - cells.b1[1] > 100.0);
    }

    #[test]
    fn test_levels_reset_effects() {
        let mut game = game();
        set_all(&mut game, -40.0, -40.0, 0.0);
        game.complete_level().unwrap();
        assert_eq!(game.advance(), Ok(Advance::Next(1)));
        assert_eq!(game.effects(), RESET_EFFECTS);
    }

    #[test]
    fn test_effects_are_clamped() {
        let mut game = game();
        game.set(FluxParam::Interaction, 75.0).unwrap();
        assert_eq!(game.effects().interaction, 50.0);
        game.nudge(FluxParam::A, -3).unwrap();
        assert_eq!(game.effects().a, -3.0);
    }

    proptest! {
        #[test]
        fn prop_effects_recoverable_from_cells(
            a in -50i32..=50,
            b in -50i32..=50,
            i in -50i32..=50,
        ) {
            let effects = Effects {
                a: f64::from(a),
                b: f64::from(b),
                interaction: f64::from(i),
            };
            prop_assert_eq!(effects.cell_means().effects(), effects);
        }
    }
}
