use crate::data::model::{CountryYear, Indicator};

// ---------------------------------------------------------------------------
// Min-max scaling
// ---------------------------------------------------------------------------

/// Observed range of a column, used to map values onto `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MinMax {
    pub min: f64,
    pub max: f64,
}

impl MinMax {
    /// Range of the finite values, or `None` when there are none.
    pub fn from_values(values: impl IntoIterator<Item = f64>) -> Option<Self> {
        let mut iter = values.into_iter().filter(|v| v.is_finite());
        let first = iter.next()?;
        let (min, max) = iter.fold((first, first), |(lo, hi), v| (lo.min(v), hi.max(v)));
        Some(MinMax { min, max })
    }

    /// `(v - min) / (max - min)`; `None` for a constant column.
    pub fn normalize(&self, v: f64) -> Option<f64> {
        let range = self.max - self.min;
        if range.abs() < f64::EPSILON {
            None
        } else {
            Some((v - self.min) / range)
        }
    }
}

// ---------------------------------------------------------------------------
// Correlation and regression
// ---------------------------------------------------------------------------

fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Pearson correlation coefficient of two equally long samples.
pub fn pearson(xs: &[f64], ys: &[f64]) -> Option<f64> {
    if xs.len() != ys.len() || xs.len() < 2 {
        return None;
    }
    let x_mean = mean(xs)?;
    let y_mean = mean(ys)?;
    let numerator = xs
        .iter()
        .zip(ys)
        .map(|(&xi, &yi)| (xi - x_mean) * (yi - y_mean))
        .sum::<f64>();
    let denominator_x = xs.iter().map(|&xi| (xi - x_mean).powi(2)).sum::<f64>().sqrt();
    let denominator_y = ys.iter().map(|&yi| (yi - y_mean).powi(2)).sum::<f64>().sqrt();
    if denominator_x > 0.0 && denominator_y > 0.0 {
        Some((numerator / (denominator_x * denominator_y)).clamp(-1.0, 1.0))
    } else {
        None
    }
}

/// Values of two indicators over the rows where both are present.
pub fn paired_values<'a>(
    rows: impl IntoIterator<Item = &'a CountryYear>,
    a: Indicator,
    b: Indicator,
) -> (Vec<f64>, Vec<f64>) {
    rows.into_iter()
        .filter_map(|r| Some((r.value(a)?, r.value(b)?)))
        .unzip()
}

/// Pearson correlation over pairwise-complete rows.
pub fn pairwise_pearson<'a>(
    rows: impl IntoIterator<Item = &'a CountryYear>,
    a: Indicator,
    b: Indicator,
) -> Option<f64> {
    let (xs, ys) = paired_values(rows, a, b);
    pearson(&xs, &ys)
}

/// Ordinary least-squares line `y = slope * x + intercept`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearFit {
    pub slope: f64,
    pub intercept: f64,
}

impl LinearFit {
    pub fn predict(&self, x: f64) -> f64 {
        self.slope * x + self.intercept
    }
}

pub fn ols(xs: &[f64], ys: &[f64]) -> Option<LinearFit> {
    if xs.len() != ys.len() || xs.len() < 2 {
        return None;
    }
    let x_mean = mean(xs)?;
    let y_mean = mean(ys)?;
    let sxx = xs.iter().map(|&x| (x - x_mean).powi(2)).sum::<f64>();
    if sxx <= f64::EPSILON {
        return None;
    }
    let sxy = xs
        .iter()
        .zip(ys)
        .map(|(&x, &y)| (x - x_mean) * (y - y_mean))
        .sum::<f64>();
    let slope = sxy / sxx;
    Some(LinearFit {
        slope,
        intercept: y_mean - slope * x_mean,
    })
}

/// Square matrix of pairwise Pearson coefficients; `None` where undefined.
pub fn correlation_matrix(rows: &[&CountryYear], indicators: &[Indicator]) -> Vec<Vec<Option<f64>>> {
    indicators
        .iter()
        .map(|&a| {
            indicators
                .iter()
                .map(|&b| pairwise_pearson(rows.iter().copied(), a, b))
                .collect()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pearson_of_linear_data_is_one() {
        let xs = [1.0, 2.0, 3.0, 4.0];
        let ys = [2.0, 4.0, 6.0, 8.0];
        assert!((pearson(&xs, &ys).unwrap() - 1.0).abs() < 1e-12);
        let neg: Vec<f64> = ys.iter().map(|y| -y).collect();
        assert!((pearson(&xs, &neg).unwrap() + 1.0).abs() < 1e-12);
    }

    #[test]
    fn pearson_is_undefined_for_constant_or_short_samples() {
        assert_eq!(pearson(&[1.0, 2.0, 3.0], &[5.0, 5.0, 5.0]), None);
        assert_eq!(pearson(&[1.0], &[1.0]), None);
        assert_eq!(pearson(&[1.0, 2.0], &[1.0]), None);
    }

    #[test]
    fn ols_recovers_line() {
        let xs = [0.0, 1.0, 2.0, 3.0];
        let ys = [1.0, 3.0, 5.0, 7.0];
        let fit = ols(&xs, &ys).unwrap();
        assert!((fit.slope - 2.0).abs() < 1e-12);
        assert!((fit.intercept - 1.0).abs() < 1e-12);
        assert!((fit.predict(10.0) - 21.0).abs() < 1e-12);
        assert_eq!(ols(&[2.0, 2.0], &[1.0, 3.0]), None);
    }

    #[test]
    fn min_max_skips_non_finite_values() {
        let mm = MinMax::from_values([3.0, f64::NAN, 1.0, 5.0]).unwrap();
        assert_eq!(mm, MinMax { min: 1.0, max: 5.0 });
        assert_eq!(mm.normalize(3.0), Some(0.5));
        assert_eq!(MinMax::from_values(Vec::<f64>::new()), None);
        assert_eq!(MinMax { min: 2.0, max: 2.0 }.normalize(2.0), None);
    }

    #[test]
    fn pairwise_pearson_uses_complete_pairs_only() {
        let rows: Vec<CountryYear> = [
            (Some(1.0), Some(10.0)),
            (Some(2.0), Some(20.0)),
            (Some(3.0), None),
            (None, Some(5.0)),
            (Some(4.0), Some(40.0)),
        ]
        .into_iter()
        .map(|(u, h)| CountryYear {
            unemployment_rate: u,
            hf_score: h,
            ..Default::default()
        })
        .collect();
        let r = pairwise_pearson(&rows, Indicator::Unemployment, Indicator::Freedom).unwrap();
        assert!((r - 1.0).abs() < 1e-12);

        let refs: Vec<&CountryYear> = rows.iter().collect();
        let m = correlation_matrix(&refs, &[Indicator::Unemployment, Indicator::Freedom, Indicator::Alcohol]);
        assert_eq!(m.len(), 3);
        assert!((m[0][0].unwrap() - 1.0).abs() < 1e-12);
        assert_eq!(m[0][2], None);
    }
}
