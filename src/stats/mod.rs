//! Statistics module - descriptive summaries and hypothesis tests

mod describe;
mod inference;
mod regression;

pub use describe::{box_stats, histogram, kde_curve, percentile, summarize};
pub use describe::{BoxStats, ColumnSummary, HistBin};
pub use inference::{cohens_kappa, welch_t_test, TTest, SIGNIFICANCE_THRESHOLD};
pub use regression::{fit_line, LinearFit};
