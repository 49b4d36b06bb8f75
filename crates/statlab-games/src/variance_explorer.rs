//! Variance Explorer: find the principal components of a point cloud.
//!
//! The player rotates an axis through the centre of a generated point cloud.
//! The share of the total variance captured along that axis is PC1; on later
//! levels the perpendicular axis (PC2) is shown as well, and the two always add
//! up to 100%. A level is complete once PC1 comes within two percentage points
//! of the best achievable value.

use std::f64::consts::TAU;

use rand::Rng;
use serde::{Deserialize, Serialize};
use statlab_stats::projection::{self, Point2};

use crate::{Game, GameKind, GameSeed, LevelError, LevelInfo, LevelOutcome, Progress};

/// Half-width of the uniform jitter added to elongated clusters.
const JITTER: f64 = 10.0;
/// Half-extent of an elongated cluster along its long side.
const SPREAD: f64 = 120.0;
/// How far below the optimum the target sits, in percentage points.
const TARGET_SLACK: f64 = 2.0;
/// The target never drops below this share.
const MIN_TARGET: f64 = 50.0;

/// Recipe for a level's point cloud.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum PointCloud {
    /// A single rectangular cluster, randomly rotated.
    ///
    /// `elongation` in `[0, 1)`: 0 is square, close to 1 is a thin line.
    Elongated { elongation: f64, points: usize },
    /// Several round clusters whose centres are rotated together.
    Clusters { clusters: Vec<ClusterSpec> },
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClusterSpec {
    pub center: Point2,
    /// Maximum distance of a point from the centre.
    pub spread: f64,
    pub count: usize,
}

impl PointCloud {
    #[must_use]
    pub fn point_count(&self) -> usize {
        match self {
            Self::Elongated { points, .. } => *points,
            Self::Clusters { clusters } => clusters.iter().map(|c| c.count).sum(),
        }
    }

    /// Draws the points.
    pub fn generate<R>(&self, rng: &mut R) -> Vec<Point2>
    where
        R: Rng + ?Sized,
    {
        match self {
            Self::Elongated { elongation, points } => elongated(*elongation, *points, rng),
            Self::Clusters { clusters } => clustered(clusters, rng),
        }
    }
}

fn elongated<R>(elongation: f64, count: usize, rng: &mut R) -> Vec<Point2>
where
    R: Rng + ?Sized,
{
    let spread_x = SPREAD;
    let spread_y = SPREAD * (1.0 - elongation);
    let rotation = rng.random_range(0.0..180.0_f64).to_radians();
    (0..count)
        .map(|_| {
            let x = rng.random_range(-1.0..1.0_f64) * spread_x + rng.random_range(-JITTER..JITTER);
            let y = rng.random_range(-1.0..1.0_f64) * spread_y + rng.random_range(-JITTER..JITTER);
            Point2::new(x, y).rotated(rotation)
        })
        .collect()
}

fn clustered<R>(clusters: &[ClusterSpec], rng: &mut R) -> Vec<Point2>
where
    R: Rng + ?Sized,
{
    let rotation = rng.random_range(0.0..TAU);
    let mut points = Vec::with_capacity(clusters.iter().map(|c| c.count).sum());
    for cluster in clusters {
        let center = cluster.center.rotated(rotation);
        for _ in 0..cluster.count {
            let (sin, cos) = rng.random_range(0.0..TAU).sin_cos();
            let radius = rng.random::<f64>() * cluster.spread;
            points.push(Point2::new(center.x + cos * radius, center.y + sin * radius));
        }
    }
    points
}

/// Display hue of the `index`-th of `total` points, in degrees (cyan to blue).
///
/// ```
/// use statlab_games::variance_explorer::point_hue;
///
/// assert_eq!(point_hue(0, 120), 180.0);
/// assert_eq!(point_hue(60, 120), 210.0);
/// ```
#[expect(clippy::cast_precision_loss)]
#[must_use]
pub fn point_hue(index: usize, total: usize) -> f64 {
    if total == 0 {
        return 180.0;
    }
    180.0 + index as f64 / total as f64 * 60.0
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VarianceLevel {
    #[serde(flatten)]
    pub info: LevelInfo,
    pub data: PointCloud,
    /// Whether PC2 is shown alongside PC1.
    #[serde(default)]
    pub requires_pc2: bool,
}

/// The built-in five levels.
#[must_use]
pub fn builtin_levels() -> Vec<VarianceLevel> {
    let elongated = |elongation, points| PointCloud::Elongated { elongation, points };
    vec![
        VarianceLevel {
            info: LevelInfo::new(
                "The Basics",
                "Find the axis that captures the maximum variance in the data.",
                "The first principal component (PC1) points in the direction where the data \
                 varies the most. Finding it captures the main story of the data.",
            ),
            data: elongated(0.8, 120),
            requires_pc2: false,
        },
        VarianceLevel {
            info: LevelInfo::new(
                "Tilted Data",
                "The data is rotated. Find the new axis of maximum variance.",
                "PCA does not care how the data is oriented. The principal components follow \
                 the natural axes of variation of each dataset.",
            ),
            data: elongated(0.75, 100),
            requires_pc2: false,
        },
        VarianceLevel {
            info: LevelInfo::new(
                "Hidden Structure",
                "Find the best axis, but notice that round data has less structure to exploit.",
                "When data is nearly circular there is no dominant direction, so PC1 captures \
                 less variance. PCA pays off most on elongated, correlated data.",
            ),
            data: elongated(0.35, 150),
            requires_pc2: false,
        },
        VarianceLevel {
            info: LevelInfo::new(
                "Two Components",
                "Rotate to maximize PC1. PC2 follows along, always perpendicular.",
                "In 2D, PC1 and PC2 together always capture 100% of the variance. Components \
                 are orthogonal, so turning PC1 turns PC2 with it.",
            ),
            data: elongated(0.6, 130),
            requires_pc2: true,
        },
        VarianceLevel {
            info: LevelInfo::new(
                "Mastery",
                "Find the rotation that best separates the clusters using both components.",
                "You found maximum-variance directions, kept components orthogonal and saw \
                 two components explain all of the variance of 2D data.",
            ),
            data: PointCloud::Clusters {
                clusters: vec![
                    ClusterSpec {
                        center: Point2::new(-60.0, -40.0),
                        spread: 35.0,
                        count: 40,
                    },
                    ClusterSpec {
                        center: Point2::new(50.0, 50.0),
                        spread: 30.0,
                        count: 35,
                    },
                    ClusterSpec {
                        center: Point2::new(80.0, -30.0),
                        spread: 25.0,
                        count: 30,
                    },
                ],
            },
            requires_pc2: true,
        },
    ]
}

/// Current variance figures.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct VarianceReadout {
    /// Axis angle in degrees, in `[0, 180)`.
    pub angle: f64,
    pub pc1_percent: f64,
    /// Present on levels that show PC2.
    pub pc2_percent: Option<f64>,
    /// PC1 + PC2, present on levels that show PC2.
    pub combined_percent: Option<f64>,
    pub optimal_angle: f64,
    pub optimal_percent: f64,
    pub target_percent: f64,
    /// How close PC1 is to the optimum, in `[0, 100]`.
    pub fill: f64,
    pub gate_open: bool,
}

/// Points awarded for completing a level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LevelScore {
    pub base: u32,
    pub bonus: u32,
}

impl LevelScore {
    /// Scores a PC1 share against the level's optimum and target.
    ///
    /// The base is the accuracy `pc1 / optimal` in tenths of a percent; the bonus
    /// pays 25 points per percentage point above the target.
    #[expect(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    #[must_use]
    pub fn new(pc1: f64, optimal: f64, target: f64) -> Self {
        let accuracy = if optimal > 0.0 {
            pc1 / optimal * 100.0
        } else {
            0.0
        };
        let bonus = if pc1 >= target {
            ((pc1 - target) * 25.0).round()
        } else {
            0.0
        };
        Self {
            base: (accuracy * 10.0).round().max(0.0) as u32,
            bonus: bonus.max(0.0) as u32,
        }
    }

    #[must_use]
    pub fn total(self) -> u32 {
        self.base + self.bonus
    }
}

/// State of a Variance Explorer session.
#[derive(Debug, Clone)]
pub struct VarianceExplorer {
    levels: Vec<VarianceLevel>,
    seed: GameSeed,
    progress: Progress,
    points: Vec<Point2>,
    angle: f64,
    optimal_angle: f64,
    optimal_percent: f64,
    target: f64,
    last_score: Option<LevelScore>,
}

impl VarianceExplorer {
    /// Starts a session on the first level.
    pub fn new(levels: Vec<VarianceLevel>, seed: GameSeed) -> Result<Self, LevelError> {
        let mut game = Self {
            progress: Progress::new(levels.len()),
            levels,
            seed,
            points: Vec::new(),
            angle: 0.0,
            optimal_angle: 0.0,
            optimal_percent: 0.0,
            target: MIN_TARGET,
            last_score: None,
        };
        game.load_level(0)?;
        Ok(game)
    }

    #[must_use]
    pub fn level(&self) -> &VarianceLevel {
        &self.levels[self.progress.level()]
    }

    #[must_use]
    pub fn points(&self) -> &[Point2] {
        &self.points
    }

    #[must_use]
    pub fn angle(&self) -> f64 {
        self.angle
    }

    #[must_use]
    pub fn shows_pc2(&self) -> bool {
        self.level().requires_pc2
    }

    /// Score of the most recently completed level.
    #[must_use]
    pub fn last_score(&self) -> Option<LevelScore> {
        self.last_score
    }

    #[must_use]
    pub fn total_score(&self) -> u32 {
        self.progress.total_score()
    }

    /// Points the axis at `angle_deg`.
    pub fn set_angle(&mut self, angle_deg: f64) -> Result<(), LevelError> {
        if !self.progress.phase().is_playing() {
            return Err(LevelError::NotPlaying);
        }
        self.angle = projection::normalize_axis_angle(angle_deg);
        log::trace!("{}: angle = {:.1}", self.kind(), self.angle);
        Ok(())
    }

    /// Rotates the axis counter-clockwise by `delta_deg`.
    pub fn rotate_by(&mut self, delta_deg: f64) -> Result<(), LevelError> {
        self.set_angle(self.angle + delta_deg)
    }

    /// Points the axis at a pointer offset from the plot centre.
    ///
    /// `dy` grows upwards. A pointer exactly on the centre leaves the axis as is.
    pub fn set_angle_from_pointer(&mut self, dx: f64, dy: f64) -> Result<(), LevelError> {
        if dx == 0.0 && dy == 0.0 {
            return Ok(());
        }
        self.set_angle(dy.atan2(dx).to_degrees())
    }

    #[must_use]
    pub fn readout(&self) -> VarianceReadout {
        let pc1_percent = projection::explained_percent(&self.points, self.angle);
        let (pc2_percent, combined_percent) = if self.shows_pc2() {
            let pc2 = projection::explained_percent(
                &self.points,
                projection::perpendicular(self.angle),
            );
            (Some(pc2), Some(pc1_percent + pc2))
        } else {
            (None, None)
        };
        let fill = if self.optimal_percent > 0.0 {
            (pc1_percent / self.optimal_percent * 100.0).min(100.0)
        } else {
            0.0
        };
        VarianceReadout {
            angle: self.angle,
            pc1_percent,
            pc2_percent,
            combined_percent,
            optimal_angle: self.optimal_angle,
            optimal_percent: self.optimal_percent,
            target_percent: self.target,
            fill,
            gate_open: pc1_percent >= self.target,
        }
    }
}

impl Game for VarianceExplorer {
    fn kind(&self) -> GameKind {
        GameKind::VarianceExplorer
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
        projection::explained_percent(&self.points, self.angle) >= self.target
    }

    fn load_level(&mut self, index: usize) -> Result<(), LevelError> {
        self.progress.start_level(index)?;
        let mut rng = self.seed.level_rng(index);
        self.points = self.levels[index].data.generate(&mut rng);
        self.angle = 0.0;
        self.optimal_angle = projection::optimal_angle(&self.points);
        self.optimal_percent = projection::explained_percent(&self.points, self.optimal_angle);
        self.target = (self.optimal_percent - TARGET_SLACK).max(MIN_TARGET);
        log::debug!(
            "{}: level {} has {} points, optimal axis {:.1} deg ({:.1}%), target {:.1}%",
            self.kind(),
            index + 1,
            self.points.len(),
            self.optimal_angle,
            self.optimal_percent,
            self.target
        );
        Ok(())
    }

    fn settle_level(&mut self) -> LevelOutcome {
        let pc1 = projection::explained_percent(&self.points, self.angle);
        let score = LevelScore::new(pc1, self.optimal_percent, self.target);
        self.last_score = Some(score);
        self.level()
            .info
            .outcome(self.progress.level(), Some(score.total()), None)
    }
}
