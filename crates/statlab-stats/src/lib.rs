//! Closed-form statistics used by the statlab games.
//!
//! This crate provides the formulas the games evaluate on every input change:
//!
//! - **Descriptive statistics**: mean, population and sample variance
//! - **Projection variance**: variance of 2D points along an axis, used for PCA
//! - **Contingency tables**: expected counts and the chi-square test of independence
//! - **One-way ANOVA**: F-ratio from group summaries
//! - **Normal distribution**: error function approximation, density and two-tailed p-values
//! - **t-tests**: pooled, Welch-style independent and paired t-statistics
//!
//! All functions are pure and allocation-light. Numeric guards (clamped standard
//! deviations, zero standard errors, zero expected counts) are applied inside the
//! formulas so that callers always get finite or well-defined results.
//!
//! # Modules
//!
//! - [`descriptive`]: Descriptive statistics for summarizing datasets
//! - [`projection`]: Variance along an axis and principal axis search
//! - [`contingency`]: Contingency tables and the chi-square statistic
//! - [`anova`]: One-way analysis of variance
//! - [`normal`]: Error function and normal p-values
//! - [`t_test`]: t-statistics for two-group comparisons
//!
//! # Examples
//!
//! ## Finding the first principal axis
//!
//! ```
//! use statlab_stats::projection::{self, Point2};
//!
//! let points = [
//!     Point2::new(-2.0, -2.0),
//!     Point2::new(-1.0, -1.0),
//!     Point2::new(1.0, 1.0),
//!     Point2::new(2.0, 2.0),
//! ];
//! assert_eq!(projection::optimal_angle(&points), 45.0);
//! ```
//!
//! ## Testing independence
//!
//! ```
//! use statlab_stats::contingency::{ChiSquareAnalysis, ContingencyTable};
//!
//! let table = ContingencyTable::new(vec![vec![45, 15], vec![65, 5]]).unwrap();
//! let analysis = ChiSquareAnalysis::new(&table);
//! assert!(analysis.is_significant());
//! ```
//!
//! ## Comparing two groups
//!
//! ```
//! use statlab_stats::t_test;
//!
//! let t = t_test::pooled_t(10.0, 20.0, 30);
//! assert!(t > 1.9 && t < 2.0);
//! ```

pub mod anova;
pub mod contingency;
pub mod descriptive;
pub mod normal;
pub mod projection;
pub mod t_test;
