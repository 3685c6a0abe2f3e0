use std::fmt;
use std::str::FromStr;

use super::error::DataError;
use super::model::{CountryYear, Indicator};
use crate::stats::MinMax;

// ---------------------------------------------------------------------------
// Composite "global mental disorders" index
// ---------------------------------------------------------------------------

/// How the five disorder rates are folded into one score.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CompositeMode {
    /// Min-max normalize each rate over the whole table, then sum.
    #[default]
    MinMax,
    /// Plain sum of the raw rates.
    Sum,
}

impl CompositeMode {
    pub fn unit(self) -> &'static str {
        match self {
            CompositeMode::MinMax => "global score [0,1]",
            CompositeMode::Sum => "sum of rates (% of Population)",
        }
    }
}

impl fmt::Display for CompositeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompositeMode::MinMax => f.write_str("min-max"),
            CompositeMode::Sum => f.write_str("sum"),
        }
    }
}

impl FromStr for CompositeMode {
    type Err = DataError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "min-max" | "minmax" | "min_max" | "normalized" => Ok(CompositeMode::MinMax),
            "sum" | "raw" => Ok(CompositeMode::Sum),
            other => Err(DataError::InvalidValue {
                field: "composite mode".to_string(),
                value: other.to_string(),
            }),
        }
    }
}

/// Fill `global_mental_disorders` on every row.
///
/// Rows with all five rates missing get `None`. In min-max mode a column
/// whose values are all equal contributes nothing.
pub fn apply_composite(rows: &mut [CountryYear], mode: CompositeMode) {
    let scales: Vec<(Indicator, Option<MinMax>)> = Indicator::DISORDERS
        .iter()
        .map(|&ind| {
            let scale = match mode {
                CompositeMode::MinMax => MinMax::from_values(rows.iter().filter_map(|r| r.value(ind))),
                CompositeMode::Sum => None,
            };
            (ind, scale)
        })
        .collect();

    for row in rows.iter_mut() {
        let mut present = 0usize;
        let mut total = 0.0;
        for (ind, scale) in &scales {
            let Some(v) = row.value(*ind) else {
                continue;
            };
            present += 1;
            match mode {
                CompositeMode::Sum => total += v,
                CompositeMode::MinMax => {
                    if let Some(norm) = scale.as_ref().and_then(|s| s.normalize(v)) {
                        total += norm;
                    }
                }
            }
        }
        row.global_mental_disorders = (present > 0).then_some(total);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rates(values: [Option<f64>; 5]) -> CountryYear {
        CountryYear {
            country: "X".to_string(),
            year: 2000,
            depression_disorders: values[0],
            anxiety_disorders: values[1],
            bipolar_disorders: values[2],
            eating_disorders: values[3],
            schizo_disorders: values[4],
            ..Default::default()
        }
    }

    #[test]
    fn sum_mode_adds_raw_rates() {
        let mut rows = vec![rates([Some(1.0), Some(2.0), Some(0.5), None, Some(0.25)])];
        apply_composite(&mut rows, CompositeMode::Sum);
        assert_eq!(rows[0].global_mental_disorders, Some(3.75));
    }

    #[test]
    fn min_max_mode_normalizes_each_column() {
        let mut rows = vec![
            rates([Some(2.0), Some(4.0), Some(1.0), Some(0.1), Some(0.2)]),
            rates([Some(4.0), Some(8.0), Some(3.0), Some(0.3), Some(0.4)]),
            rates([Some(3.0), Some(6.0), Some(2.0), Some(0.2), Some(0.3)]),
        ];
        apply_composite(&mut rows, CompositeMode::MinMax);
        let scores: Vec<f64> = rows.iter().map(|r| r.global_mental_disorders.unwrap()).collect();
        assert!((scores[0] - 0.0).abs() < 1e-9);
        assert!((scores[1] - 5.0).abs() < 1e-9);
        assert!((scores[2] - 2.5).abs() < 1e-9);
    }

    #[test]
    fn constant_column_contributes_nothing() {
        let mut rows = vec![
            rates([Some(1.0), Some(5.0), None, None, None]),
            rates([Some(3.0), Some(5.0), None, None, None]),
        ];
        apply_composite(&mut rows, CompositeMode::MinMax);
        assert_eq!(rows[0].global_mental_disorders, Some(0.0));
        assert_eq!(rows[1].global_mental_disorders, Some(1.0));
    }

    #[test]
    fn all_missing_rates_give_no_score() {
        let mut rows = vec![rates([None; 5]), rates([Some(1.0), None, None, None, None])];
        apply_composite(&mut rows, CompositeMode::MinMax);
        assert_eq!(rows[0].global_mental_disorders, None);
        apply_composite(&mut rows, CompositeMode::Sum);
        assert_eq!(rows[0].global_mental_disorders, None);
        assert_eq!(rows[1].global_mental_disorders, Some(1.0));
    }

    #[test]
    fn parses_mode_names() {
        assert_eq!("sum".parse::<CompositeMode>().unwrap(), CompositeMode::Sum);
        assert_eq!("Min-Max".parse::<CompositeMode>().unwrap(), CompositeMode::MinMax);
        assert!("median".parse::<CompositeMode>().is_err());
    }
}
