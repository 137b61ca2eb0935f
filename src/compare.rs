//! Report Comparison Module
//! Compares AI-generated report scores against human-written ones:
//! per-metric t-tests, classification agreement, and a summary figure.

use crate::charts::{
    BarPanel, BoxPanel, CategoryCount, Figure, FigureKind, LabeledBox, Panel,
};
use crate::data::{self, LoaderError};
use crate::stats::{self, TTest};
use polars::prelude::DataFrame;
use serde::Serialize;
use std::collections::BTreeMap;
use thiserror::Error;

/// Score columns compared between the two tables.
pub const METRIC_COLUMNS: [&str; 3] = ["accuracy", "quality", "consistency"];

/// Label column measured for rater agreement.
pub const CLASS_COLUMN: &str = "classification";

const AI_LABEL: &str = "AI";
const HUMAN_LABEL: &str = "Human";

#[derive(Error, Debug)]
pub enum CompareError {
    #[error("Data error: {0}")]
    Data(#[from] LoaderError),
    #[error(
        "Shape mismatch: AI table is {ai_rows}x{ai_cols} but human table is \
         {human_rows}x{human_cols}. Both tables must have the same rows and columns."
    )]
    ShapeMismatch {
        ai_rows: usize,
        ai_cols: usize,
        human_rows: usize,
        human_cols: usize,
    },
    #[error("Column '{column}' not found in the {table} table")]
    MissingColumn { column: String, table: &'static str },
}

/// One metric column compared across the two tables.
#[derive(Debug, Clone)]
pub struct MetricComparison {
    pub metric: String,
    pub ai: Vec<f64>,
    pub human: Vec<f64>,
    pub test: TTest,
}

/// Per-class label counts on each side.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassCount {
    pub label: String,
    pub ai: usize,
    pub human: usize,
}

/// One row of the exported results table.
#[derive(Debug, Clone, Serialize)]
pub struct ResultRecord {
    pub measure: String,
    pub value: f64,
}

/// Full output of a comparison run.
#[derive(Debug, Clone)]
pub struct ComparisonReport {
    pub rows: usize,
    pub cols: usize,
    pub metrics: Vec<MetricComparison>,
    pub kappa: f64,
    /// Row pairs where both sides assigned the same label.
    pub agreement: usize,
    /// Row pairs labelled on both sides.
    pub label_pairs: usize,
    pub class_counts: Vec<ClassCount>,
}

impl ComparisonReport {
    /// Run the full comparison over two already-loaded tables.
    pub fn run(ai: &DataFrame, human: &DataFrame) -> Result<Self, CompareError> {
        let (ai_rows, ai_cols) = ai.shape();
        let (human_rows, human_cols) = human.shape();
        if (ai_rows, ai_cols) != (human_rows, human_cols) {
            return Err(CompareError::ShapeMismatch {
                ai_rows,
                ai_cols,
                human_rows,
                human_cols,
            });
        }

        for column in METRIC_COLUMNS.iter().chain([CLASS_COLUMN].iter()) {
            require_column(ai, "AI", column)?;
            require_column(human, "human", column)?;
        }

        let metrics = METRIC_COLUMNS
            .iter()
            .map(|metric| {
                let ai_values = data::column_f64(ai, metric)?;
                let human_values = data::column_f64(human, metric)?;
                let test = stats::welch_t_test(&ai_values, &human_values);
                Ok(MetricComparison {
                    metric: metric.to_string(),
                    ai: ai_values,
                    human: human_values,
                    test,
                })
            })
            .collect::<Result<Vec<_>, CompareError>>()?;

        let ai_labels = data::column_labels(ai, CLASS_COLUMN)?;
        let human_labels = data::column_labels(human, CLASS_COLUMN)?;

        // Keep only row pairs labelled on both sides.
        let (ai_labels, human_labels): (Vec<String>, Vec<String>) = ai_labels
            .into_iter()
            .zip(human_labels)
            .filter(|(a, h)| !a.is_empty() && !h.is_empty())
            .unzip();

        let kappa = stats::cohens_kappa(&ai_labels, &human_labels);
        let agreement = ai_labels
            .iter()
            .zip(&human_labels)
            .filter(|(a, h)| a == h)
            .count();
        let class_counts = count_classes(&ai_labels, &human_labels);

        Ok(ComparisonReport {
            rows: ai_rows,
            cols: ai_cols,
            metrics,
            kappa,
            agreement,
            label_pairs: ai_labels.len(),
            class_counts,
        })
    }

    /// Flat `measure,value` rows: t statistic and p-value per metric,
    /// then the classification kappa.
    pub fn result_records(&self) -> Vec<ResultRecord> {
        let mut records = Vec::with_capacity(self.metrics.len() * 2 + 1);
        for metric in &self.metrics {
            records.push(ResultRecord {
                measure: format!("{}_t_stat", metric.metric),
                value: metric.test.t_stat,
            });
            records.push(ResultRecord {
                measure: format!("{}_p_value", metric.metric),
                value: metric.test.p_value,
            });
        }
        records.push(ResultRecord {
            measure: format!("{CLASS_COLUMN}_kappa"),
            value: self.kappa,
        });
        records
    }

    /// The two-by-two summary figure: one AI-vs-human box panel per
    /// metric, then the classification count bars.
    pub fn figure(&self) -> Figure {
        let mut panels: Vec<Panel> = self
            .metrics
            .iter()
            .map(|metric| {
                let flag = if metric.test.significant { " *" } else { "" };
                Panel::Box(BoxPanel {
                    title: metric.metric.clone(),
                    boxes: vec![
                        LabeledBox {
                            label: AI_LABEL.to_string(),
                            stats: stats::box_stats(&metric.ai),
                        },
                        LabeledBox {
                            label: HUMAN_LABEL.to_string(),
                            stats: stats::box_stats(&metric.human),
                        },
                    ],
                    annotation: Some(format!(
                        "t = {:.3}, p = {:.4}{}",
                        metric.test.t_stat, metric.test.p_value, flag
                    )),
                })
            })
            .collect();

        panels.push(Panel::Bars(BarPanel {
            title: CLASS_COLUMN.to_string(),
            series: vec![AI_LABEL.to_string(), HUMAN_LABEL.to_string()],
            categories: self
                .class_counts
                .iter()
                .map(|count| CategoryCount {
                    label: count.label.clone(),
                    counts: vec![count.ai as f64, count.human as f64],
                })
                .collect(),
            annotation: Some(format!(
                "Cohen's Kappa = {:.3} (agreement {}/{})",
                self.kappa, self.agreement, self.label_pairs
            )),
        }));

        Figure {
            kind: FigureKind::Comparison,
            title: FigureKind::Comparison.label().to_string(),
            grid_columns: 2,
            panels,
        }
    }
}

fn require_column(df: &DataFrame, table: &'static str, name: &str) -> Result<(), CompareError> {
    if df.column(name).is_err() {
        return Err(CompareError::MissingColumn {
            column: name.to_string(),
            table,
        });
    }
    Ok(())
}

fn count_classes(ai: &[String], human: &[String]) -> Vec<ClassCount> {
    let mut counts: BTreeMap<&str, (usize, usize)> = BTreeMap::new();
    for label in ai {
        counts.entry(label).or_default().0 += 1;
    }
    for label in human {
        counts.entry(label).or_default().1 += 1;
    }
    counts
        .into_iter()
        .map(|(label, (ai, human))| ClassCount {
            label: label.to_string(),
            ai,
            human,
        })
        .collect()
}
