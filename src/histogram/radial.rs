//! Lower bin edges for radial distributions.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// How radial bins are spaced between `0` and `rmax`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RadialBinPolicy {
    /// Every bin has the same radial width.
    EqualWidth,
    /// Every annulus has the same area, `pi * rmax^2 / n`.
    #[default]
    EqualArea,
}

impl RadialBinPolicy {
    pub fn from_equal_area(equal_area: bool) -> Self {
        if equal_area {
            RadialBinPolicy::EqualArea
        } else {
            RadialBinPolicy::EqualWidth
        }
    }

    /// Lower edges of `n` bins under this policy.
    pub fn edges(self, rmax: f64, n: usize) -> Result<Vec<f64>> {
        match self {
            RadialBinPolicy::EqualWidth => equal_width_edges(rmax, n),
            RadialBinPolicy::EqualArea => equal_area_edges(rmax, n),
        }
    }
}

fn check(rmax: f64, n: usize) -> Result<()> {
    if !(rmax > 0.0) {
        return Err(Error::invalid(format!("rmax must be positive: {}", rmax)));
    }
    if n < 1 {
        return Err(Error::invalid(format!("bins < 1: {}", n)));
    }
    Ok(())
}

/// `edges[i] = i * rmax / n`.
pub fn equal_width_edges(rmax: f64, n: usize) -> Result<Vec<f64>> {
    check(rmax, n)?;
    let width = rmax / n as f64;
    Ok((0..n).map(|i| i as f64 * width).collect())
}

/// `edges[i] = sqrt(i * rmax^2 / n)`.
pub fn equal_area_edges(rmax: f64, n: usize) -> Result<Vec<f64>> {
    check(rmax, n)?;
    let area = rmax * rmax / n as f64;
    Ok((0..n).map(|i| (i as f64 * area).sqrt()).collect())
}

/// Lower edges of a radial histogram, equal-area or equal-width.
pub fn calculate_bin_mins(rmax: f64, n: usize, equal_area: bool) -> Result<Vec<f64>> {
    RadialBinPolicy::from_equal_area(equal_area).edges(rmax, n)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn equal_width() {
        let edges = calculate_bin_mins(100.0, 10, false).unwrap();
        let expected: Vec<f64> = (0..10).map(|i| i as f64 * 10.0).collect();
        assert_eq!(edges, expected);
    }

    #[test]
    fn equal_area_annuli_match() {
        let rmax = 100.0;
        let mut edges = equal_area_edges(rmax, 10).unwrap();
        assert_relative_eq!(edges[1], 31.622_776_6, epsilon = 1e-4);
        edges.push(rmax);
        for w in edges.windows(2) {
            assert_relative_eq!(w[1] * w[1] - w[0] * w[0], rmax * rmax / 10.0, epsilon = 1e-6);
        }
    }

    #[test]
    fn rejects_bad_arguments() {
        assert!(equal_width_edges(0.0, 3).is_err());
        assert!(equal_area_edges(-1.0, 3).is_err());
        assert!(equal_area_edges(1.0, 0).is_err());
        assert!(equal_width_edges(f64::NAN, 3).is_err());
    }
}
