use super::{HeatmapChart, Marker, ScatterChart, ScatterPoint, Series, TimeSeriesChart};
use crate::data::filter::complete_rows;
use crate::data::model::{CountryYear, Indicator, MentalHealthTable};
use crate::stats::{self, ols, pairwise_pearson};

/// Years the correlation section may select.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct YearWindow {
    pub min: i32,
    pub max: i32,
}

impl Default for YearWindow {
    fn default() -> Self {
        Self {
            min: 2000,
            max: 2019,
        }
    }
}

impl YearWindow {
    /// Swaps inverted bounds.
    pub fn new(a: i32, b: i32) -> Self {
        Self {
            min: a.min(b),
            max: a.max(b),
        }
    }

    pub fn clamp(&self, year: i32) -> i32 {
        year.clamp(self.min, self.max)
    }

    pub fn years(&self) -> impl Iterator<Item = i32> {
        self.min..=self.max
    }
}

/// Socioeconomic indicators plotted against the composite, with their
/// scatter titles and over-time series names.
const PAIRS: [(Indicator, &str, &str); 4] = [
    (Indicator::Unemployment, "Unemployment", "Mental vs Unemployment"),
    (Indicator::Freedom, "Freedom", "Mental vs Freedom"),
    (Indicator::Alcohol, "Alcohol consumption", "Mental vs Alc. consumption"),
    (
        Indicator::GenderInequality,
        "Gender Inequality Index",
        "Mental vs Gender Inequality Index",
    ),
];

/// Rows of the (clamped) year with composite, unemployment and freedom present.
fn year_rows(table: &MentalHealthTable, year: i32) -> Vec<&CountryYear> {
    complete_rows(
        table.rows_for_year(year),
        &[
            Indicator::GlobalMentalDisorders,
            Indicator::Unemployment,
            Indicator::Freedom,
        ],
    )
}

/// Composite score against each socioeconomic indicator, with OLS trendlines.
pub fn scatter_plots(table: &MentalHealthTable, year: i32, window: YearWindow) -> Vec<ScatterChart> {
    let year = window.clamp(year);
    let rows = year_rows(table, year);
    let x_ind = Indicator::GlobalMentalDisorders;

    PAIRS
        .iter()
        .map(|&(y_ind, name, _)| {
            let points: Vec<ScatterPoint> = rows
                .iter()
                .filter_map(|r| {
                    Some(ScatterPoint {
                        country: r.country.clone(),
                        x: r.value(x_ind)?,
                        y: r.value(y_ind)?,
                    })
                })
                .collect();
            let xs: Vec<f64> = points.iter().map(|p| p.x).collect();
            let ys: Vec<f64> = points.iter().map(|p| p.y).collect();

            ScatterChart {
                title: format!("Mental Disorders vs {name} ({year})"),
                x_label: x_ind.axis_label().to_string(),
                y_label: y_ind.axis_label().to_string(),
                trend: ols(&xs, &ys),
                points,
            }
        })
        .collect()
}

/// Pearson coefficient of each pair for every year of the window.
///
/// A year contributes only when more than two rows have all five values.
pub fn correlation_over_time(table: &MentalHealthTable, year: i32, window: YearWindow) -> TimeSeriesChart {
    let year = window.clamp(year);
    let mut required = vec![Indicator::GlobalMentalDisorders];
    required.extend(PAIRS.iter().map(|(ind, _, _)| *ind));

    let mut series: Vec<Series> = PAIRS
        .iter()
        .map(|(_, _, name)| Series {
            name: name.to_string(),
            points: Vec::new(),
            marker: Marker::Circle,
            color: None,
        })
        .collect();

    for y in window.years() {
        let rows = complete_rows(table.rows_for_year(y), &required);
        if rows.len() <= 2 {
            continue;
        }
        for (s, (ind, _, _)) in series.iter_mut().zip(PAIRS.iter()) {
            if let Some(r) = pairwise_pearson(rows.iter().copied(), Indicator::GlobalMentalDisorders, *ind) {
                s.points.push([y as f64, r]);
            }
        }
    }

    TimeSeriesChart {
        title: "Correlation Coefficients Over Time".to_string(),
        x_label: "Year".to_string(),
        y_label: "Correlation Coefficient".to_string(),
        series,
        y_range: Some((-1.0, 1.0)),
        marker_x: Some(year as f64),
    }
}

/// Pairwise correlation of every numeric column for the year.
pub fn correlation_matrix(table: &MentalHealthTable, year: i32, window: YearWindow) -> HeatmapChart {
    let year = window.clamp(year);
    let rows = year_rows(table, year);
    HeatmapChart {
        title: format!("Correlation Matrix ({year})"),
        labels: Indicator::ALL.iter().map(|i| i.short_name()).collect(),
        cells: stats::correlation_matrix(&rows, &Indicator::ALL),
        range: (-1.0, 1.0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::composite::CompositeMode;

    /// Four countries per year whose indicators are exact linear functions
    /// of the composite score.
    fn table() -> MentalHealthTable {
        let mut rows = Vec::new();
        for year in [2005, 2006] {
            for i in 0..4 {
                let x = i as f64;
                rows.push(CountryYear {
                    country: format!("C{i}"),
                    code: Some(format!("C{i}")),
                    year,
                    global_mental_disorders: Some(x),
                    unemployment_rate: Some(2.0 * x + 1.0),
                    hf_score: Some(10.0 - x),
                    alcohol_consumption: Some(x * 0.5),
                    gii: (i != 3).then_some(0.1 * x),
                    ..Default::default()
                });
            }
        }
        rows.push(CountryYear {
            country: "Nowhere".into(),
            year: 2005,
            global_mental_disorders: Some(1.0),
            ..Default::default()
        });
        MentalHealthTable::new(rows, CompositeMode::MinMax)
    }

    #[test]
    fn window_clamps_and_orders_bounds() {
        let w = YearWindow::new(2019, 2000);
        assert_eq!(w, YearWindow::default());
        assert_eq!(w.clamp(1990), 2000);
        assert_eq!(w.clamp(2030), 2019);
        assert_eq!(w.years().count(), 20);
    }

    #[test]
    fn scatter_plots_fit_trendlines() {
        let charts = scatter_plots(&table(), 2005, YearWindow::default());
        assert_eq!(charts.len(), 4);
        assert_eq!(charts[0].title, "Mental Disorders vs Unemployment (2005)");
        assert_eq!(charts[0].points.len(), 4);
        let fit = charts[0].trend.unwrap();
        assert!((fit.slope - 2.0).abs() < 1e-9);
        assert!((fit.intercept - 1.0).abs() < 1e-9);

        assert_eq!(charts[3].title, "Mental Disorders vs Gender Inequality Index (2005)");
        assert_eq!(charts[3].points.len(), 3);
        assert_eq!(charts[3].y_label, "Gender Inequality Index [0,1]");
    }

    #[test]
    fn correlation_over_time_skips_sparse_years() {
        let chart = correlation_over_time(&table(), 1995, YearWindow::default());
        assert_eq!(chart.marker_x, Some(2000.0));
        assert_eq!(chart.series.len(), 4);
        let unemployment = &chart.series[0];
        assert_eq!(unemployment.name, "Mental vs Unemployment");
        assert_eq!(unemployment.points.len(), 2);
        assert!((unemployment.points[0][1] - 1.0).abs() < 1e-9);
        assert!((chart.series[1].points[0][1] + 1.0).abs() < 1e-9);
    }

    #[test]
    fn matrix_covers_every_indicator() {
        let chart = correlation_matrix(&table(), 2005, YearWindow::default());
        assert_eq!(chart.title, "Correlation Matrix (2005)");
        assert_eq!(chart.labels.len(), Indicator::ALL.len());
        assert_eq!(chart.cells.len(), Indicator::ALL.len());
        let global = Indicator::ALL.len() - 1;
        let unemployment = 5;
        assert!((chart.cells[global][unemployment].unwrap() - 1.0).abs() < 1e-9);
        assert_eq!(chart.cells[0][0], None);
    }

    #[test]
    fn empty_year_yields_empty_views() {
        let charts = scatter_plots(&table(), 2010, YearWindow::default());
        assert!(charts.iter().all(|c| c.points.is_empty() && c.trend.is_none()));
        let chart = correlation_matrix(&table(), 2010, YearWindow::default());
        assert!(chart.cells.iter().flatten().all(Option::is_none));
    }
}
