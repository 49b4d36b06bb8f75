use serde::{Deserialize, Serialize};

/// Domain of a slider: inclusive bounds and a step size.
///
/// All values the user can reach are clamped into `[min, max]`. Stepping moves
/// by whole steps from the current value; the value is not snapped to the step
/// grid, so a parameter initialized off-grid stays off-grid until clamped.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ParamRange {
    pub min: f64,
    pub max: f64,
    pub step: f64,
}

impl ParamRange {
    #[must_use]
    pub const fn new(min: f64, max: f64, step: f64) -> Self {
        Self { min, max, step }
    }

    #[must_use]
    pub fn contains(&self, value: f64) -> bool {
        (self.min..=self.max).contains(&value)
    }

    #[must_use]
    pub fn clamp(&self, value: f64) -> f64 {
        value.clamp(self.min, self.max)
    }

    /// Moves `value` by `steps` steps (negative to decrease) and clamps the result.
    ///
    /// ```
    /// use statlab_games::ParamRange;
    ///
    /// let range = ParamRange::new(0.0, 10.0, 2.0);
    /// assert_eq!(range.step_by(4.0, 1), 6.0);
    /// assert_eq!(range.step_by(4.0, -5), 0.0);
    /// assert_eq!(range.step_by(9.0, 1), 10.0);
    /// ```
    #[must_use]
    pub fn step_by(&self, value: f64, steps: i32) -> f64 {
        self.clamp(value + f64::from(steps) * self.step)
    }

    #[must_use]
    pub fn step_up(&self, value: f64) -> f64 {
        self.step_by(value, 1)
    }

    #[must_use]
    pub fn step_down(&self, value: f64) -> f64 {
        self.step_by(value, -1)
    }

    /// Position of `value` within the range, in `[0, 1]`.
    #[must_use]
    pub fn fraction(&self, value: f64) -> f64 {
        let span = self.max - self.min;
        if span <= 0.0 {
            return 0.0;
        }
        ((value - self.min) / span).clamp(0.0, 1.0)
    }
}
