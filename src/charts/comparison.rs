use super::{COMPARE_COLOR, Marker, PRIMARY_COLOR, RadarChart, RadarTrace, Series, TimeSeriesChart};
use crate::data::model::{CountryYear, Indicator, MentalHealthTable};
use crate::stats::MinMax;

// ---------------------------------------------------------------------------
// Country dropdowns
// ---------------------------------------------------------------------------

/// Options and enabled state of the "compare with" dropdown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompareControl {
    /// `(code, country)` pairs, sorted by country.
    pub options: Vec<(String, String)>,
    pub disabled: bool,
}

/// Every country except the primary one; disabled until a primary is picked.
pub fn compare_options(table: &MentalHealthTable, primary: Option<&str>) -> CompareControl {
    match primary {
        None => CompareControl {
            options: Vec::new(),
            disabled: true,
        },
        Some(primary) => CompareControl {
            options: table
                .country_options()
                .into_iter()
                .filter(|(code, _)| code != primary)
                .collect(),
            disabled: false,
        },
    }
}

/// The compare selection after the primary changed.
pub fn reconcile_compare(primary: Option<&str>, compare: Option<String>) -> Option<String> {
    let primary = primary?;
    compare.filter(|c| c != primary)
}

pub fn analysis_visible(primary: Option<&str>) -> bool {
    primary.is_some()
}

// ---------------------------------------------------------------------------
// Time series
// ---------------------------------------------------------------------------

/// One chart per selected indicator, one series per selected country.
pub fn time_series(
    table: &MentalHealthTable,
    primary: Option<&str>,
    compare: Option<&str>,
    indicators: &[Indicator],
) -> Vec<TimeSeriesChart> {
    let Some(primary) = primary else {
        return Vec::new();
    };
    let countries: Vec<(&str, Vec<&CountryYear>)> = [Some(primary), compare]
        .into_iter()
        .flatten()
        .map(|code| (code, table.rows_for_code(code)))
        .filter(|(_, rows)| !rows.is_empty())
        .collect();

    indicators
        .iter()
        .map(|&indicator| {
            let series: Vec<Series> = countries
                .iter()
                .enumerate()
                .map(|(i, (code, rows))| Series {
                    name: table.code_to_name(code),
                    points: rows
                        .iter()
                        .filter_map(|r| Some([r.year as f64, r.value(indicator)?]))
                        .collect(),
                    marker: Marker::nth(i),
                    color: None,
                })
                .collect();

            let ymax = series
                .iter()
                .flat_map(|s| s.points.iter().map(|p| p[1]))
                .fold(None, |acc: Option<f64>, v| Some(acc.map_or(v, |a| a.max(v))))
                .unwrap_or(1.0);

            TimeSeriesChart {
                title: indicator.label().to_string(),
                x_label: "Year".to_string(),
                y_label: table.unit(indicator).to_string(),
                series,
                y_range: Some((0.0, ymax * 1.05)),
                marker_x: None,
            }
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Radar
// ---------------------------------------------------------------------------

/// Socioeconomic profile of the selected countries for one year.
///
/// Each axis is min-max normalized over every row of that year. A country
/// without a row for the year gets no trace; a missing value sits at 0.
pub fn radar(
    table: &MentalHealthTable,
    primary: Option<&str>,
    compare: Option<&str>,
    year: i32,
) -> Option<RadarChart> {
    let primary = primary?;
    let year_rows: Vec<&CountryYear> = table.rows_for_year(year).collect();
    let scales: Vec<(Indicator, Option<MinMax>)> = Indicator::SOCIOECONOMIC
        .iter()
        .map(|&ind| (ind, MinMax::from_values(year_rows.iter().filter_map(|r| r.value(ind)))))
        .collect();

    let trace = |code: &str, color, marker| {
        let row = year_rows.iter().find(|r| r.has_code(code))?;
        let values = scales
            .iter()
            .map(|(ind, scale)| {
                row.value(*ind)
                    .zip(scale.as_ref())
                    .and_then(|(v, s)| s.normalize(v))
                    .unwrap_or(0.0)
            })
            .collect();
        Some(RadarTrace {
            name: table.code_to_name(code),
            values,
            color,
            marker,
        })
    };

    let mut traces = Vec::new();
    traces.extend(trace(primary, PRIMARY_COLOR, Marker::Circle));
    if let Some(compare) = compare {
        traces.extend(trace(compare, COMPARE_COLOR, Marker::Square));
    }

    Some(RadarChart {
        title: format!("Country Comparison Radar - {year}"),
        axes: Indicator::SOCIOECONOMIC.iter().map(|i| i.label()).collect(),
        traces,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::composite::CompositeMode;

    fn row(country: &str, code: &str, year: i32) -> CountryYear {
        CountryYear {
            country: country.to_string(),
            code: Some(code.to_string()),
            year,
            ..Default::default()
        }
    }

    fn table() -> MentalHealthTable {
        let mut fra_2018 = row("France", "FRA", 2018);
        fra_2018.anxiety_disorders = Some(6.0);
        let mut fra_2019 = row("France", "FRA", 2019);
        fra_2019.anxiety_disorders = Some(6.5);
        fra_2019.unemployment_rate = Some(8.0);
        fra_2019.gii = Some(0.1);
        fra_2019.hf_score = Some(8.0);
        fra_2019.alcohol_consumption = Some(11.0);
        let mut esp_2019 = row("Spain", "ESP", 2019);
        esp_2019.anxiety_disorders = Some(5.0);
        esp_2019.unemployment_rate = Some(14.0);
        esp_2019.gii = Some(0.2);
        esp_2019.hf_score = Some(7.0);
        let mut chad_2019 = row("Chad", "TCD", 2019);
        chad_2019.unemployment_rate = Some(2.0);
        chad_2019.gii = Some(0.6);
        chad_2019.hf_score = Some(5.0);
        chad_2019.alcohol_consumption = Some(1.0);
        MentalHealthTable::new(vec![fra_2019, fra_2018, esp_2019, chad_2019], CompositeMode::MinMax)
    }

    #[test]
    fn compare_dropdown_excludes_primary_and_disables_without_one() {
        let t = table();
        let none = compare_options(&t, None);
        assert!(none.disabled);
        assert!(none.options.is_empty());

        let ctl = compare_options(&t, Some("FRA"));
        assert!(!ctl.disabled);
        let codes: Vec<&str> = ctl.options.iter().map(|(c, _)| c.as_str()).collect();
        assert_eq!(codes, vec!["TCD", "ESP"]);
    }

    #[test]
    fn compare_selection_resets_on_conflict() {
        assert_eq!(reconcile_compare(None, Some("ESP".into())), None);
        assert_eq!(reconcile_compare(Some("ESP"), Some("ESP".into())), None);
        assert_eq!(reconcile_compare(Some("FRA"), Some("ESP".into())), Some("ESP".into()));
        assert!(!analysis_visible(None));
        assert!(analysis_visible(Some("FRA")));
    }

    #[test]
    fn time_series_per_indicator_and_country() {
        let t = table();
        let charts = time_series(&t, Some("FRA"), Some("ESP"), &[Indicator::Anxiety, Indicator::Freedom]);
        assert_eq!(charts.len(), 2);

        let anxiety = &charts[0];
        assert_eq!(anxiety.title, "Anxiety disorders");
        assert_eq!(anxiety.y_label, "% of Population");
        assert_eq!(anxiety.series[0].name, "France");
        assert_eq!(anxiety.series[0].points, vec![[2018.0, 6.0], [2019.0, 6.5]]);
        assert_eq!(anxiety.series[0].marker, Marker::Circle);
        assert_eq!(anxiety.series[1].marker, Marker::Square);
        let (lo, hi) = anxiety.y_range.unwrap();
        assert_eq!(lo, 0.0);
        assert!((hi - 6.5 * 1.05).abs() < 1e-9);
    }

    #[test]
    fn time_series_needs_primary() {
        assert!(time_series(&table(), None, Some("ESP"), &[Indicator::Anxiety]).is_empty());
        assert!(time_series(&table(), Some("FRA"), None, &[]).is_empty());
    }

    #[test]
    fn radar_normalizes_within_year() {
        let chart = radar(&table(), Some("FRA"), Some("ESP"), 2019).unwrap();
        assert_eq!(chart.title, "Country Comparison Radar - 2019");
        assert_eq!(
            chart.axes,
            vec!["Unemployment (%)", "Gender Inequality Index", "Human Freedom Index", "Alcohol Consumption"]
        );
        assert_eq!(chart.traces.len(), 2);

        let fra = &chart.traces[0];
        assert_eq!(fra.color, PRIMARY_COLOR);
        assert!((fra.values[0] - 0.5).abs() < 1e-9);
        assert!((fra.values[2] - 1.0).abs() < 1e-9);
        assert!((fra.values[3] - 1.0).abs() < 1e-9);

        let esp = &chart.traces[1];
        assert_eq!(esp.name, "Spain");
        assert!((esp.values[0] - 1.0).abs() < 1e-9);
        assert_eq!(esp.values[3], 0.0);
    }

    #[test]
    fn radar_without_row_for_year_has_no_trace() {
        let chart = radar(&table(), Some("ESP"), Some("FRA"), 2018).unwrap();
        let names: Vec<&str> = chart.traces.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["France"]);
        assert!(radar(&table(), None, Some("FRA"), 2019).is_none());
    }
}
