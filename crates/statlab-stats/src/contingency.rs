//! Contingency tables and Pearson's chi-square test of independence.
//!
//! The p-value is not computed from the chi-square distribution. Instead the
//! statistic is compared against tabulated critical values for α = 0.05 and
//! α = 0.01, which places it into one of three [`PBand`]s. This is all the
//! Chi-Square Challenge needs to classify a table as significant or not.

use serde::{Deserialize, Serialize};

/// Errors produced when building a [`ContingencyTable`].
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum TableError {
    #[display("contingency table must be at least 2x2, got {rows}x{cols}")]
    TooSmall { rows: usize, cols: usize },
    #[display("row {row} has {len} cells, expected {expected}")]
    Ragged {
        row: usize,
        len: usize,
        expected: usize,
    },
}

/// A rectangular table of observed counts, at least 2×2.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Vec<u32>>", into = "Vec<Vec<u32>>")]
pub struct ContingencyTable {
    observed: Vec<Vec<u32>>,
}

impl TryFrom<Vec<Vec<u32>>> for ContingencyTable {
    type Error = TableError;

    fn try_from(observed: Vec<Vec<u32>>) -> Result<Self, Self::Error> {
        Self::new(observed)
    }
}

impl From<ContingencyTable> for Vec<Vec<u32>> {
    fn from(table: ContingencyTable) -> Self {
        table.observed
    }
}

impl ContingencyTable {
    /// Creates a table from rows of observed counts.
    ///
    /// # Examples
    ///
    /// ```
    /// use statlab_stats::contingency::{ContingencyTable, TableError};
    ///
    /// let table = ContingencyTable::new(vec![vec![45, 15], vec![65, 5]]).unwrap();
    /// assert_eq!(table.grand_total(), 130);
    ///
    /// let err = ContingencyTable::new(vec![vec![1, 2], vec![3]]).unwrap_err();
    /// assert!(matches!(err, TableError::Ragged { row: 1, .. }));
    /// ```
    pub fn new(observed: Vec<Vec<u32>>) -> Result<Self, TableError> {
        let rows = observed.len();
        let cols = observed.first().map_or(0, Vec::len);
        if rows < 2 || cols < 2 {
            return Err(TableError::TooSmall { rows, cols });
        }
        if let Some((row, cells)) = observed
            .iter()
            .enumerate()
            .find(|(_, cells)| cells.len() != cols)
        {
            return Err(TableError::Ragged {
                row,
                len: cells.len(),
                expected: cols,
            });
        }
        Ok(Self { observed })
    }

    /// Creates a 2×2 table, which is always valid.
    #[must_use]
    pub fn from_2x2(observed: [[u32; 2]; 2]) -> Self {
        Self {
            observed: observed.map(Vec::from).to_vec(),
        }
    }

    #[must_use]
    pub fn rows(&self) -> usize {
        self.observed.len()
    }

    #[must_use]
    pub fn cols(&self) -> usize {
        self.observed[0].len()
    }

    #[must_use]
    pub fn observed(&self, row: usize, col: usize) -> u32 {
        self.observed[row][col]
    }

    #[must_use]
    pub fn as_rows(&self) -> &[Vec<u32>] {
        &self.observed
    }

    #[must_use]
    pub fn row_totals(&self) -> Vec<u64> {
        self.observed
            .iter()
            .map(|row| row.iter().copied().map(u64::from).sum())
            .collect()
    }

    #[must_use]
    pub fn col_totals(&self) -> Vec<u64> {
        (0..self.cols())
            .map(|col| self.observed.iter().map(|row| u64::from(row[col])).sum())
            .collect()
    }

    #[must_use]
    pub fn grand_total(&self) -> u64 {
        self.row_totals().iter().sum()
    }

    /// Returns `(rows - 1) * (cols - 1)`.
    #[must_use]
    pub fn degrees_of_freedom(&self) -> usize {
        (self.rows() - 1) * (self.cols() - 1)
    }

    /// Returns the expected counts under independence, `row_i * col_j / grand`.
    ///
    /// An all-zero table has all-zero expected counts.
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn expected(&self) -> Vec<Vec<f64>> {
        let row_totals = self.row_totals();
        let col_totals = self.col_totals();
        let grand = self.grand_total();
        row_totals
            .iter()
            .map(|&row| {
                col_totals
                    .iter()
                    .map(|&col| {
                        if grand == 0 {
                            0.0
                        } else {
                            (row * col) as f64 / grand as f64
                        }
                    })
                    .collect()
            })
            .collect()
    }
}

/// Tabulated critical values of the chi-square distribution.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CriticalValues {
    /// Critical value for α = 0.05.
    pub p05: f64,
    /// Critical value for α = 0.01.
    pub p01: f64,
}

const CRITICAL_VALUES: [CriticalValues; 4] = [
    CriticalValues { p05: 3.84, p01: 6.63 },
    CriticalValues { p05: 5.99, p01: 9.21 },
    CriticalValues { p05: 7.81, p01: 11.34 },
    CriticalValues { p05: 9.49, p01: 13.28 },
];

/// Whether [`critical_values`] has an entry for `df`.
///
/// ```
/// use statlab_stats::contingency::is_tabulated;
///
/// assert!(is_tabulated(1));
/// assert!(is_tabulated(4));
/// assert!(!is_tabulated(0));
/// assert!(!is_tabulated(9));
/// ```
#[must_use]
pub fn is_tabulated(df: usize) -> bool {
    (1..=CRITICAL_VALUES.len()).contains(&df)
}

/// Returns the critical values for `df` degrees of freedom.
///
/// Only df 1 through 4 are tabulated; any other df falls back to df 1.
/// Callers that accept arbitrary tables check [`is_tabulated`] first.
#[must_use]
pub fn critical_values(df: usize) -> CriticalValues {
    df.checked_sub(1)
        .and_then(|i| CRITICAL_VALUES.get(i))
        .copied()
        .unwrap_or(CRITICAL_VALUES[0])
}

/// Coarse p-value band derived from the critical value table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PBand {
    /// `p > 0.05`: below the α = 0.05 critical value.
    AboveFive,
    /// `0.01 < p < 0.05`.
    BelowFive,
    /// `p < 0.01`.
    BelowOne,
}

impl PBand {
    #[must_use]
    pub fn classify(chi_square: f64, df: usize) -> Self {
        let cv = critical_values(df);
        if chi_square < cv.p05 {
            Self::AboveFive
        } else if chi_square < cv.p01 {
            Self::BelowFive
        } else {
            Self::BelowOne
        }
    }

    /// A representative p-value inside the band, for display.
    #[must_use]
    pub fn approximate_p(self) -> f64 {
        match self {
            Self::AboveFive => 0.10,
            Self::BelowFive => 0.03,
            Self::BelowOne => 0.005,
        }
    }

    #[must_use]
    pub fn is_significant(self) -> bool {
        self.approximate_p() < 0.05
    }
}

/// Chi-square test of independence computed from a [`ContingencyTable`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChiSquareAnalysis {
    pub expected: Vec<Vec<f64>>,
    /// Per-cell `(observed - expected)^2 / expected`.
    pub contributions: Vec<Vec<f64>>,
    pub chi_square: f64,
    pub max_contribution: f64,
    pub degrees_of_freedom: usize,
    pub p_band: PBand,
}

impl ChiSquareAnalysis {
    /// Runs the test.
    ///
    /// Cells with an expected count of zero contribute nothing.
    ///
    /// # Examples
    ///
    /// ```
    /// use statlab_stats::contingency::{ChiSquareAnalysis, ContingencyTable, PBand};
    ///
    /// let table = ContingencyTable::new(vec![vec![48, 52], vec![52, 48]]).unwrap();
    /// let analysis = ChiSquareAnalysis::new(&table);
    /// assert!((analysis.chi_square - 0.32).abs() < 1e-9);
    /// assert_eq!(analysis.p_band, PBand::AboveFive);
    /// ```
    #[must_use]
    pub fn new(table: &ContingencyTable) -> Self {
        let expected = table.expected();
        let contributions = table
            .as_rows()
            .iter()
            .zip(&expected)
            .map(|(observed_row, expected_row)| {
                observed_row
                    .iter()
                    .zip(expected_row)
                    .map(|(&observed, &expected)| contribution(observed, expected))
                    .collect::<Vec<_>>()
            })
            .collect::<Vec<_>>();
        let chi_square = contributions.iter().flatten().sum();
        let max_contribution = contributions
            .iter()
            .flatten()
            .copied()
            .fold(0.0, f64::max);
        let degrees_of_freedom = table.degrees_of_freedom();

        Self {
            expected,
            contributions,
            chi_square,
            max_contribution,
            degrees_of_freedom,
            p_band: PBand::classify(chi_square, degrees_of_freedom),
        }
    }

    /// Relative contribution of a cell in `[0, 1]`, used to shade the table.
    #[must_use]
    pub fn intensity(&self, row: usize, col: usize) -> f64 {
        if self.max_contribution <= 0.0 {
            return 0.0;
        }
        self.contributions[row][col] / self.max_contribution
    }

    #[must_use]
    pub fn is_significant(&self) -> bool {
        self.p_band.is_significant()
    }
}

fn contribution(observed: u32, expected: f64) -> f64 {
    if expected <= 0.0 {
        return 0.0;
    }
    let diff = f64::from(observed) - expected;
    diff * diff / expected
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    fn table(rows: &[&[u32]]) -> ContingencyTable {
        ContingencyTable::new(rows.iter().map(|r| r.to_vec()).collect()).unwrap()
    }

    #[test]
    fn test_teaching_method_example() {
        let table = table(&[&[45, 15], &[65, 5]]);
        assert_eq!(table.row_totals(), vec![60, 70]);
        assert_eq!(table.col_totals(), vec![110, 20]);

        let analysis = ChiSquareAnalysis::new(&table);
        assert!((analysis.expected[0][0] - 50.769_230_769).abs() < 1e-6);
        assert!(analysis.chi_square > critical_values(1).p05);
        assert_eq!(analysis.degrees_of_freedom, 1);
        assert_eq!(analysis.p_band, PBand::BelowOne);
        assert!(analysis.is_significant());
    }

    #[test]
    fn test_scenario_classification() {
        let cases: [(&[&[u32]], bool); 5] = [
            (&[&[45, 15], &[65, 5]], true),
            (&[&[30, 70], &[35, 65]], false),
            (&[&[55, 45], &[30, 70]], true),
            (&[&[48, 52], &[52, 48]], false),
            (&[&[5, 95], &[45, 55]], true),
        ];
        for (rows, significant) in cases {
            let analysis = ChiSquareAnalysis::new(&table(rows));
            assert_eq!(analysis.is_significant(), significant, "{rows:?}");
        }
    }

    #[test]
    fn test_independent_table_has_zero_chi_square() {
        let analysis = ChiSquareAnalysis::new(&table(&[&[10, 20], &[20, 40]]));
        assert!(analysis.chi_square.abs() < 1e-12);
        assert_eq!(analysis.intensity(0, 0), 0.0);
    }

    #[test]
    fn test_all_zero_table() {
        let analysis = ChiSquareAnalysis::new(&table(&[&[0, 0], &[0, 0]]));
        assert_eq!(analysis.chi_square, 0.0);
        assert_eq!(analysis.p_band, PBand::AboveFive);
    }

    #[test]
    fn test_band_boundaries() {
        assert_eq!(PBand::classify(3.83, 1), PBand::AboveFive);
        assert_eq!(PBand::classify(3.84, 1), PBand::BelowFive);
        assert_eq!(PBand::classify(6.63, 1), PBand::BelowOne);
        assert_eq!(PBand::classify(6.0, 2), PBand::BelowFive);
    }

    #[test]
    fn test_untabulated_df_falls_back() {
        assert_eq!(critical_values(0), critical_values(1));
        assert_eq!(critical_values(9), critical_values(1));
        assert_eq!(critical_values(4).p05, 9.49);
    }

    #[test]
    fn test_larger_table_df() {
        let table = table(&[&[1, 2, 3], &[4, 5, 6], &[7, 8, 10]]);
        assert_eq!(table.degrees_of_freedom(), 4);
    }

    #[test]
    fn test_too_small() {
        assert_eq!(
            ContingencyTable::new(vec![vec![1, 2]]),
            Err(TableError::TooSmall { rows: 1, cols: 2 })
        );
        assert_eq!(
            ContingencyTable::new(vec![]),
            Err(TableError::TooSmall { rows: 0, cols: 0 })
        );
    }

    #[test]
    fn test_serde_validates() {
        let table: ContingencyTable = serde_json::from_str("[[1,2],[3,4]]").unwrap();
        assert_eq!(table.grand_total(), 10);
        assert!(serde_json::from_str::<ContingencyTable>("[[1,2],[3]]").is_err());
    }

    proptest! {
        #[test]
        fn prop_contributions_non_negative_and_sum(
            rows in 2usize..5,
            cols in 2usize..5,
            cells in prop::collection::vec(0u32..500, 16),
        ) {
            let observed = (0..rows)
                .map(|r| (0..cols).map(|c| cells[r * 4 + c]).collect())
                .collect();
            let table = ContingencyTable::new(observed).unwrap();
            let analysis = ChiSquareAnalysis::new(&table);
            let sum = analysis.contributions.iter().flatten().sum::<f64>();
            prop_assert!(analysis.contributions.iter().flatten().all(|&c| c >= 0.0));
            prop_assert!((sum - analysis.chi_square).abs() <= 1e-9 * (1.0 + sum));
            for r in 0..rows {
                for c in 0..cols {
                    let intensity = analysis.intensity(r, c);
                    prop_assert!((0.0..=1.0).contains(&intensity));
                }
            }
        }
    }
}
