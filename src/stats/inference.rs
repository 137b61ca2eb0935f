//! Inference Module
//! Welch's t-test and Cohen's Kappa for the report comparison pipeline.

use statrs::distribution::{ContinuousCDF, StudentsT};
use std::collections::BTreeMap;

/// Significance threshold for t-tests.
pub const SIGNIFICANCE_THRESHOLD: f64 = 0.05;

/// Result of a two-sample t-test.
#[derive(Debug, Clone, Copy)]
pub struct TTest {
    pub t_stat: f64,
    pub df: f64,
    pub p_value: f64,
    pub significant: bool,
}

impl TTest {
    fn undefined() -> Self {
        Self {
            t_stat: f64::NAN,
            df: f64::NAN,
            p_value: f64::NAN,
            significant: false,
        }
    }
}

/// Perform Welch's t-test (independent samples, unequal variance).
///
/// Returns a NaN-filled result when either sample has fewer than two values.
pub fn welch_t_test(sample_a: &[f64], sample_b: &[f64]) -> TTest {
    let n1 = sample_a.len() as f64;
    let n2 = sample_b.len() as f64;

    if n1 < 2.0 || n2 < 2.0 {
        return TTest::undefined();
    }

    let mean1 = sample_a.iter().sum::<f64>() / n1;
    let mean2 = sample_b.iter().sum::<f64>() / n2;

    let var1 = sample_a.iter().map(|x| (x - mean1).powi(2)).sum::<f64>() / (n1 - 1.0);
    let var2 = sample_b.iter().map(|x| (x - mean2).powi(2)).sum::<f64>() / (n2 - 1.0);

    let se = (var1 / n1 + var2 / n2).sqrt();
    if se == 0.0 {
        // Identical constant samples: no detectable difference.
        return TTest {
            t_stat: 0.0,
            df: n1 + n2 - 2.0,
            p_value: 1.0,
            significant: false,
        };
    }

    let t = (mean1 - mean2) / se;

    // Welch-Satterthwaite degrees of freedom
    let df_num = (var1 / n1 + var2 / n2).powi(2);
    let df_denom = (var1 / n1).powi(2) / (n1 - 1.0) + (var2 / n2).powi(2) / (n2 - 1.0);
    let df = df_num / df_denom;

    // Two-tailed p-value using the t-distribution
    match StudentsT::new(0.0, 1.0, df) {
        Ok(dist) => {
            let p_value = 2.0 * (1.0 - dist.cdf(t.abs()));
            TTest {
                t_stat: t,
                df,
                p_value,
                significant: p_value <= SIGNIFICANCE_THRESHOLD,
            }
        }
        Err(_) => TTest::undefined(),
    }
}

/// Cohen's Kappa for two raters over the same items.
///
/// Kappa = (p_o - p_e) / (1 - p_e) with p_o the observed agreement rate and
/// p_e the agreement expected by chance from the marginal label frequencies.
/// When chance agreement is already 1 (both raters constant with the same
/// label), the ratio degenerates; perfect observed agreement then counts as
/// 1.0 and anything else as 0.0.
pub fn cohens_kappa(rater_a: &[String], rater_b: &[String]) -> f64 {
    let n = rater_a.len().min(rater_b.len());
    if n == 0 {
        return f64::NAN;
    }

    let mut counts_a: BTreeMap<&str, usize> = BTreeMap::new();
    let mut counts_b: BTreeMap<&str, usize> = BTreeMap::new();
    let mut agree = 0usize;

    for (a, b) in rater_a.iter().zip(rater_b.iter()) {
        *counts_a.entry(a.as_str()).or_default() += 1;
        *counts_b.entry(b.as_str()).or_default() += 1;
        if a == b {
            agree += 1;
        }
    }

    let total = n as f64;
    let observed = agree as f64 / total;
    let expected: f64 = counts_a
        .iter()
        .map(|(label, &ca)| {
            let cb = counts_b.get(label).copied().unwrap_or(0);
            (ca as f64 / total) * (cb as f64 / total)
        })
        .sum();

    if (1.0 - expected).abs() < f64::EPSILON {
        return if (1.0 - observed).abs() < f64::EPSILON {
            1.0
        } else {
            0.0
        };
    }

    (observed - expected) / (1.0 - expected)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn identical_samples_have_no_significance() {
        let a = [1.0, 2.0, 3.0, 4.0, 5.0];
        let r = welch_t_test(&a, &a);
        assert!(r.t_stat.abs() < 1e-12);
        assert!((r.p_value - 1.0).abs() < 1e-9);
        assert!(!r.significant);
    }

    #[test]
    fn separated_samples_are_significant() {
        let a = [1.0, 1.1, 0.9, 1.05, 0.95, 1.02];
        let b = [5.0, 5.1, 4.9, 5.05, 4.95, 5.02];
        let r = welch_t_test(&a, &b);
        assert!(r.t_stat < 0.0, "a below b gives negative t, got {}", r.t_stat);
        assert!(r.p_value < 1e-6);
        assert!(r.significant);
    }

    #[test]
    fn welch_matches_reference_value() {
        // Equal sizes and variances, so Welch reduces to the pooled test:
        // scipy.stats.ttest_ind(a, b, equal_var=False)
        // -> statistic = -2.0, df = 8, pvalue = 0.080516
        let a = [1.0, 2.0, 3.0, 4.0, 5.0];
        let b = [3.0, 4.0, 5.0, 6.0, 7.0];
        let r = welch_t_test(&a, &b);
        assert!((r.t_stat - (-2.0)).abs() < 1e-12, "t was {}", r.t_stat);
        assert!((r.df - 8.0).abs() < 1e-9, "df was {}", r.df);
        assert!((r.p_value - 0.080516).abs() < 5e-4, "p was {}", r.p_value);
        assert!(!r.significant);
    }

    #[test]
    fn tiny_samples_are_undefined() {
        let r = welch_t_test(&[1.0], &[2.0, 3.0]);
        assert!(r.t_stat.is_nan());
        assert!(r.p_value.is_nan());
        assert!(!r.significant);
    }

    #[test]
    fn kappa_perfect_agreement_is_one() {
        let a = labels(&["good", "bad", "good", "fair", "bad"]);
        assert!((cohens_kappa(&a, &a) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn kappa_matches_reference_contingency() {
        // Classic 2x2 example: 20 A-A, 15 B-B, 5 A-B, 10 B-A.
        // p_o = 0.7, p_e = 0.5, kappa = 0.4
        let mut a = Vec::new();
        let mut b = Vec::new();
        for _ in 0..20 {
            a.push("A".to_string());
            b.push("A".to_string());
        }
        for _ in 0..15 {
            a.push("B".to_string());
            b.push("B".to_string());
        }
        for _ in 0..5 {
            a.push("A".to_string());
            b.push("B".to_string());
        }
        for _ in 0..10 {
            a.push("B".to_string());
            b.push("A".to_string());
        }
        assert!((cohens_kappa(&a, &b) - 0.4).abs() < 1e-12);
    }

    #[test]
    fn kappa_total_disagreement_is_not_positive() {
        let a = labels(&["yes", "yes", "no", "no"]);
        let b = labels(&["no", "no", "yes", "yes"]);
        assert!(cohens_kappa(&a, &b) <= 0.0);
    }

    #[test]
    fn kappa_single_label_convention() {
        let same = labels(&["ok", "ok", "ok"]);
        assert!((cohens_kappa(&same, &same) - 1.0).abs() < 1e-12);
    }
}
