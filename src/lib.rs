//! ChartLab - CSV visual analysis studio
//!
//! Loads CSV tables, builds distribution, scatter, box, pairwise, and
//! regression figures, and exports them as PDF or Word reports. A second
//! binary compares AI generated report metrics against human written ones
//! with per metric t-tests and Cohen's Kappa.

pub mod charts;
pub mod compare;
pub mod data;
pub mod export;
pub mod gui;
pub mod stats;
