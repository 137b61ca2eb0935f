//! Least-squares line fitting for the regression grid.

/// A fitted line `y = slope * x + intercept` with Pearson correlation `r`.
#[derive(Debug, Clone, Copy)]
pub struct LinearFit {
    pub slope: f64,
    pub intercept: f64,
    pub r: f64,
}

/// Ordinary least squares over paired points.
///
/// Returns `None` with fewer than two points or when x carries no variance
/// (a vertical line has no finite slope).
pub fn fit_line(points: &[[f64; 2]]) -> Option<LinearFit> {
    let n = points.len();
    if n < 2 {
        return None;
    }

    let nf = n as f64;
    let mean_x = points.iter().map(|p| p[0]).sum::<f64>() / nf;
    let mean_y = points.iter().map(|p| p[1]).sum::<f64>() / nf;

    let mut ss_xx = 0.0;
    let mut ss_yy = 0.0;
    let mut ss_xy = 0.0;
    for p in points {
        let dx = p[0] - mean_x;
        let dy = p[1] - mean_y;
        ss_xx += dx * dx;
        ss_yy += dy * dy;
        ss_xy += dx * dy;
    }

    if ss_xx == 0.0 {
        return None;
    }

    let slope = ss_xy / ss_xx;
    let intercept = mean_y - slope * mean_x;
    let r = if ss_yy == 0.0 {
        0.0
    } else {
        ss_xy / (ss_xx * ss_yy).sqrt()
    };

    Some(LinearFit {
        slope,
        intercept,
        r,
    })
}
