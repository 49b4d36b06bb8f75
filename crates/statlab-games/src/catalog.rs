use std::io::Read;

use serde::{Deserialize, Serialize};
use statlab_stats::contingency;

use crate::{
    GameKind,
    chi_square::{self, ChiSquareLevel},
    cluster_commander::{self, ClusterLevel, SPREAD_RANGE},
    factorial_flux::{self, FluxLevel},
    group_guesser::{self, GroupLevel, GroupParam},
    mirror_match::{self, MirrorLevel},
    variance_explorer::{self, PointCloud, VarianceLevel},
};

#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum CatalogError {
    #[display("failed to parse catalog")]
    Parse { source: serde_json::Error },
    #[display("{game} has no levels")]
    NoLevels { game: GameKind },
    /// `level` is 1-based.
    #[display("{game} level {level}: {reason}")]
    InvalidLevel {
        game: GameKind,
        level: usize,
        reason: String,
    },
}

/// Level definitions of every game.
///
/// The built-in catalog can be exported to JSON, edited, and loaded back with
/// [`Catalog::from_json_reader`], which validates every level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Catalog {
    pub variance_explorer: Vec<VarianceLevel>,
    pub chi_square: Vec<ChiSquareLevel>,
    pub group_guesser: Vec<GroupLevel>,
    pub cluster_commander: Vec<ClusterLevel>,
    pub factorial_flux: Vec<FluxLevel>,
    pub mirror_match: Vec<MirrorLevel>,
}

impl Default for Catalog {
    fn default() -> Self {
        Self::builtin()
    }
}

impl Catalog {
    #[must_use]
    pub fn builtin() -> Self {
        Self {
            variance_explorer: variance_explorer::builtin_levels(),
            chi_square: chi_square::builtin_levels(),
            group_guesser: group_guesser::builtin_levels(),
            cluster_commander: cluster_commander::builtin_levels(),
            factorial_flux: factorial_flux::builtin_levels(),
            mirror_match: mirror_match::builtin_levels(),
        }
    }

    /// Parses and validates a catalog.
    pub fn from_json_reader<R>(reader: R) -> Result<Self, CatalogError>
    where
        R: Read,
    {
        let catalog: Self =
            serde_json::from_reader(reader).map_err(|source| CatalogError::Parse { source })?;
        catalog.validate()?;
        Ok(catalog)
    }

    #[must_use]
    pub fn level_count(&self, game: GameKind) -> usize {
        match game {
            GameKind::VarianceExplorer => self.variance_explorer.len(),
            GameKind::ChiSquare => self.chi_square.len(),
            GameKind::GroupGuesser => self.group_guesser.len(),
            GameKind::ClusterCommander => self.cluster_commander.len(),
            GameKind::FactorialFlux => self.factorial_flux.len(),
            GameKind::MirrorMatch => self.mirror_match.len(),
        }
    }

    /// Checks that every game has levels and that every level can be played.
    pub fn validate(&self) -> Result<(), CatalogError> {
        for game in GameKind::ALL {
            if self.level_count(game) == 0 {
                return Err(CatalogError::NoLevels { game });
            }
        }
        check_levels(GameKind::VarianceExplorer, &self.variance_explorer, check_variance)?;
        check_levels(GameKind::ChiSquare, &self.chi_square, check_chi_square)?;
        check_levels(GameKind::GroupGuesser, &self.group_guesser, check_group)?;
        check_levels(GameKind::ClusterCommander, &self.cluster_commander, check_cluster)?;
        check_levels(GameKind::FactorialFlux, &self.factorial_flux, |_| Ok(()))?;
        check_levels(GameKind::MirrorMatch, &self.mirror_match, check_mirror)?;
        Ok(())
    }
}

fn check_levels<L, F>(game: GameKind, levels: &[L], check: F) -> Result<(), CatalogError>
where
    F: Fn(&L) -> Result<(), String>,
{
    for (index, level) in levels.iter().enumerate() {
        check(level).map_err(|reason| CatalogError::InvalidLevel {
            game,
            level: index + 1,
            reason,
        })?;
    }
    Ok(())
}

fn check_variance(level: &VarianceLevel) -> Result<(), String> {
    match &level.data {
        PointCloud::Elongated { elongation, .. } => {
            if !(0.0..1.0).contains(elongation) {
                return Err(format!("elongation {elongation} is outside [0, 1)"));
            }
        }
        PointCloud::Clusters { clusters } => {
            if let Some(cluster) = clusters
                .iter()
                .find(|c| !c.spread.is_finite() || c.spread < 0.0)
            {
                return Err(format!("cluster spread {} is invalid", cluster.spread));
            }
            let mut occupied = clusters.iter().filter(|c| c.count > 0);
            let first = occupied.next().map(|c| c.center);
            let spread_out = clusters.iter().any(|c| c.count > 0 && c.spread > 0.0)
                || occupied.any(|c| Some(c.center) != first);
            if !spread_out {
                return Err("every point sits on the same spot".to_owned());
            }
        }
    }
    let count = level.data.point_count();
    if count < 2 {
        return Err(format!("needs at least two points, got {count}"));
    }
    Ok(())
}

fn check_chi_square(level: &ChiSquareLevel) -> Result<(), String> {
    let table = &level.observed;
    if level.row_labels.len() != table.rows() || level.col_labels.len() != table.cols() {
        return Err(format!(
            "labels are {}x{} but the table is {}x{}",
            level.row_labels.len(),
            level.col_labels.len(),
            table.rows(),
            table.cols()
        ));
    }
    if table.grand_total() == 0 {
        return Err("table has no observations".to_owned());
    }
    let df = table.degrees_of_freedom();
    if !contingency::is_tabulated(df) {
        return Err(format!(
            "table is {}x{} with {df} degrees of freedom, no critical values are known",
            table.rows(),
            table.cols()
        ));
    }
    Ok(())
}

fn check_group(level: &GroupLevel) -> Result<(), String> {
    if level.controls.is_empty() {
        return Err("no controls are unlocked".to_owned());
    }
    for param in GroupParam::ALL {
        let value = level.init.get(param);
        if !param.range().contains(value) {
            return Err(format!(
                "initial {} {value} is outside the slider range",
                param.label()
            ));
        }
    }
    if !(level.target_p > 0.0 && level.target_p < 1.0) {
        return Err(format!("target p {} is outside (0, 1)", level.target_p));
    }
    Ok(())
}

fn check_cluster(level: &ClusterLevel) -> Result<(), String> {
    if level.controls.is_empty() {
        return Err("no controls are unlocked".to_owned());
    }
    if !SPREAD_RANGE.contains(level.init.spread) {
        return Err(format!(
            "initial spread {} is outside the slider range",
            level.init.spread
        ));
    }
    if !(level.init.sd.is_finite() && level.init.sd >= 0.0) {
        return Err(format!("initial sd {} is invalid", level.init.sd));
    }
    Ok(())
}

fn check_mirror(level: &MirrorLevel) -> Result<(), String> {
    if level.n < 2 {
        return Err(format!("needs at least two subjects, got {}", level.n));
    }
    if !(level.base_sd.is_finite() && level.base_sd >= 0.0) {
        return Err(format!("base sd {} is invalid", level.base_sd));
    }
    if !level.diff.is_finite() {
        return Err(format!("effect {} is invalid", level.diff));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use statlab_stats::{contingency::ContingencyTable, projection::Point2};

    use crate::variance_explorer::ClusterSpec;

    use super::*;

    #[test]
    fn test_builtin_is_valid() {
        let catalog = Catalog::builtin();
        catalog.validate().unwrap();
        let counts = GameKind::ALL.map(|game| catalog.level_count(game));
        assert_eq!(counts, [5, 5, 3, 3, 3, 2]);
    }

    #[test]
    fn test_json_round_trip() {
        let catalog = Catalog::builtin();
        let json = serde_json::to_string_pretty(&catalog).unwrap();
        assert!(json.contains("\"variance-explorer\""));
        assert!(json.contains("\"kind\": \"elongated\""));
        let loaded = Catalog::from_json_reader(json.as_bytes()).unwrap();
        assert_eq!(loaded, catalog);
    }

    #[test]
    fn test_rejects_ragged_table() {
        let mut value = serde_json::to_value(Catalog::builtin()).unwrap();
        value["chi-square"][0]["observed"] = serde_json::json!([[1, 2], [3]]);
        let err = Catalog::from_json_reader(value.to_string().as_bytes()).unwrap_err();
        assert!(matches!(err, CatalogError::Parse { .. }));
    }

    #[test]
    fn test_rejects_mismatched_labels() {
        let mut catalog = Catalog::builtin();
        catalog.chi_square[2].row_labels.pop();
        let err = catalog.validate().unwrap_err();
        assert_eq!(
            err.to_string(),
            "chi-square level 3: labels are 1x2 but the table is 2x2"
        );
    }

    #[test]
    fn test_rejects_table_without_critical_values() {
        let mut value = serde_json::to_value(Catalog::builtin()).unwrap();
        value["chi-square"][0]["row_labels"] = serde_json::json!(["r1", "r2", "r3", "r4"]);
        value["chi-square"][0]["col_labels"] = serde_json::json!(["c1", "c2", "c3", "c4"]);
        value["chi-square"][0]["observed"] = serde_json::json!([
            [30, 25, 25, 20],
            [25, 25, 25, 25],
            [25, 25, 25, 25],
            [20, 25, 25, 30]
        ]);
        let err = Catalog::from_json_reader(value.to_string().as_bytes()).unwrap_err();
        assert_eq!(
            err.to_string(),
            concat!(
                "chi-square level 1: table is 4x4 with 9 degrees of freedom, ",
                "no critical values are known"
            )
        );
    }

    #[test]
    fn test_accepts_three_by_three_table() {
        let mut catalog = Catalog::builtin();
        let level = &mut catalog.chi_square[0];
        level.row_labels = vec!["r1".into(), "r2".into(), "r3".into()];
        level.col_labels = vec!["c1".into(), "c2".into(), "c3".into()];
        level.observed =
            ContingencyTable::new(vec![vec![10, 20, 30], vec![20, 20, 20], vec![30, 20, 10]])
                .unwrap();
        catalog.validate().unwrap();
    }

    #[test]
    fn test_rejects_collapsed_clusters() {
        let mut catalog = Catalog::builtin();
        let center = Point2::new(10.0, -5.0);
        let collapsed = |count| ClusterSpec {
            center,
            spread: 0.0,
            count,
        };
        catalog.variance_explorer[4].data = PointCloud::Clusters {
            clusters: vec![collapsed(5), collapsed(3)],
        };
        let err = catalog.validate().unwrap_err();
        assert_eq!(
            err.to_string(),
            "variance-explorer level 5: every point sits on the same spot"
        );

        // Separate centres are enough, even without spread
        catalog.variance_explorer[4].data = PointCloud::Clusters {
            clusters: vec![
                collapsed(5),
                ClusterSpec {
                    center: Point2::new(-10.0, 5.0),
                    spread: 0.0,
                    count: 5,
                },
            ],
        };
        catalog.validate().unwrap();
    }

    #[test]
    fn test_rejects_out_of_range_init() {
        let mut catalog = Catalog::builtin();
        catalog.group_guesser[0].init.n = 500;
        assert!(matches!(
            catalog.validate(),
            Err(CatalogError::InvalidLevel {
                game: GameKind::GroupGuesser,
                level: 1,
                ..
            })
        ));
    }

    #[test]
    fn test_cluster_sd_may_exceed_slider() {
        let mut catalog = Catalog::builtin();
        catalog.cluster_commander[0].init.sd = 200.0;
        catalog.validate().unwrap();
        catalog.cluster_commander[0].init.sd = f64::NAN;
        assert!(catalog.validate().is_err());
    }

    #[test]
    fn test_rejects_empty_game() {
        let mut catalog = Catalog::builtin();
        catalog.mirror_match.clear();
        let err = catalog.validate().unwrap_err();
        assert_eq!(err.to_string(), "mirror-match has no levels");
    }

    #[test]
    fn test_rejects_degenerate_elongation() {
        let mut catalog = Catalog::builtin();
        catalog.variance_explorer[1].data = PointCloud::Elongated {
            elongation: 1.0,
            points: 100,
        };
        assert!(catalog.validate().is_err());
    }
}
