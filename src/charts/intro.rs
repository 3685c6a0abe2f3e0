use std::collections::BTreeMap;

use super::{BarChart, BarItem, ChoroplethChart, RankedCountry, RankingChart, Region};
use crate::data::filter::{CONTINENTS, INCOME_GROUPS, income_label, named_values, sort_descending};
use crate::data::model::{Indicator, MentalHealthTable};
use crate::stats::MinMax;

/// Number of countries on each side of the ranking chart.
pub const RANKING_SIZE: usize = 10;

/// Map of one indicator for one year, one region per coded country.
pub fn choropleth(table: &MentalHealthTable, indicator: Indicator, year: i32) -> ChoroplethChart {
    let regions: Vec<Region> = table
        .rows_for_year(year)
        .filter_map(|r| {
            Some(Region {
                code: r.code.clone().filter(|c| !c.is_empty())?,
                country: r.country.clone(),
                value: r.value(indicator)?,
            })
        })
        .collect();
    let range = MinMax::from_values(regions.iter().map(|r| r.value));

    ChoroplethChart {
        title: format!("{} - {year}", indicator.label()),
        unit: table.unit(indicator).to_string(),
        regions,
        range,
    }
}

pub fn continent_bars(table: &MentalHealthTable, indicator: Indicator, year: i32) -> BarChart {
    let bars = named_values(table.rows_for_year(year), &CONTINENTS, indicator)
        .into_iter()
        .map(|(r, value)| BarItem {
            label: r.country.clone(),
            value,
        })
        .collect();
    BarChart {
        title: "Average by continent".to_string(),
        y_label: table.unit(indicator).to_string(),
        bars,
    }
}

pub fn income_bars(table: &MentalHealthTable, indicator: Indicator, year: i32) -> BarChart {
    let bars = named_values(table.rows_for_year(year), &INCOME_GROUPS, indicator)
        .into_iter()
        .map(|(r, value)| BarItem {
            label: income_label(&r.country),
            value,
        })
        .collect();
    BarChart {
        title: "Average by countries income group".to_string(),
        y_label: table.unit(indicator).to_string(),
        bars,
    }
}

/// Top and bottom countries for the year, using the first value recorded
/// per `(code, country)`.
pub fn global_evolution(table: &MentalHealthTable, indicator: Indicator, year: i32) -> RankingChart {
    let mut first: BTreeMap<(String, String), f64> = BTreeMap::new();
    for row in table.rows_for_year(year) {
        let Some(code) = row.code.as_ref().filter(|c| !c.is_empty()) else {
            continue;
        };
        let Some(value) = row.value(indicator) else {
            continue;
        };
        first
            .entry((code.clone(), row.country.clone()))
            .or_insert(value);
    }

    let mut ranked: Vec<((String, String), f64)> = first.into_iter().collect();
    sort_descending(&mut ranked);
    let to_country = |((code, country), value): &((String, String), f64)| RankedCountry {
        code: code.clone(),
        country: country.clone(),
        value: *value,
    };

    let top = ranked.iter().take(RANKING_SIZE).map(to_country).collect();
    let bottom = ranked
        .iter()
        .skip(ranked.len().saturating_sub(RANKING_SIZE))
        .map(to_country)
        .collect();

    RankingChart {
        title: format!(
            "{} - Overall trend and representation of the most/least affected countries",
            indicator.label()
        ),
        y_label: table.unit(indicator).to_string(),
        top,
        bottom,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::composite::CompositeMode;
    use crate::data::model::CountryYear;

    fn row(country: &str, code: Option<&str>, year: i32, depression: Option<f64>) -> CountryYear {
        CountryYear {
            country: country.to_string(),
            code: code.map(str::to_string),
            year,
            depression_disorders: depression,
            ..Default::default()
        }
    }

    fn table() -> MentalHealthTable {
        let mut rows = vec![
            row("France", Some("FRA"), 2019, Some(4.5)),
            row("France", Some("FRA"), 2018, Some(9.0)),
            row("Chad", Some("TCD"), 2019, Some(3.0)),
            row("Peru", Some("PER"), 2019, None),
            row("Europe", None, 2019, Some(4.2)),
            row("Asia", None, 2019, Some(3.9)),
            row("High-income countries", None, 2019, Some(4.8)),
            row("Low-income countries", None, 2019, Some(3.1)),
        ];
        for i in 0..15 {
            let code = format!("C{i:02}");
            rows.push(row(&code, Some(code.as_str()), 2000, Some(i as f64)));
        }
        MentalHealthTable::new(rows, CompositeMode::MinMax)
    }

    #[test]
    fn choropleth_keeps_coded_rows_with_values() {
        let chart = choropleth(&table(), Indicator::Depression, 2019);
        let codes: Vec<&str> = chart.regions.iter().map(|r| r.code.as_str()).collect();
        assert_eq!(codes, vec!["FRA", "TCD"]);
        assert_eq!(chart.title, "Depressive disorders - 2019");
        assert_eq!(chart.unit, "% of Population");
        assert_eq!(chart.range, Some(MinMax { min: 3.0, max: 4.5 }));
    }

    #[test]
    fn empty_year_gives_empty_map() {
        let chart = choropleth(&table(), Indicator::Depression, 1800);
        assert!(chart.regions.is_empty());
        assert_eq!(chart.range, None);
    }

    #[test]
    fn continent_and_income_bars() {
        let t = table();
        let continents = continent_bars(&t, Indicator::Depression, 2019);
        let labels: Vec<&str> = continents.bars.iter().map(|b| b.label.as_str()).collect();
        assert_eq!(labels, vec!["Europe", "Asia"]);

        let income = income_bars(&t, Indicator::Depression, 2019);
        let labels: Vec<&str> = income.bars.iter().map(|b| b.label.as_str()).collect();
        assert_eq!(labels, vec!["High", "Low"]);
        assert_eq!(income.title, "Average by countries income group");
    }

    #[test]
    fn ranking_takes_top_and_bottom_ten() {
        let chart = global_evolution(&table(), Indicator::Depression, 2000);
        assert_eq!(chart.top.len(), 10);
        assert_eq!(chart.bottom.len(), 10);
        assert_eq!(chart.top[0].code, "C14");
        assert_eq!(chart.top[9].code, "C05");
        assert_eq!(chart.bottom[0].code, "C09");
        assert_eq!(chart.bottom[9].code, "C00");
    }

    #[test]
    fn ranking_skips_uncoded_and_missing_rows() {
        let chart = global_evolution(&table(), Indicator::Depression, 2019);
        let codes: Vec<&str> = chart.top.iter().map(|c| c.code.as_str()).collect();
        assert_eq!(codes, vec!["FRA", "TCD"]);
        assert_eq!(chart.bottom.len(), 2);
    }
}
