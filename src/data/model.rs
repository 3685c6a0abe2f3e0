use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::composite::CompositeMode;

// ---------------------------------------------------------------------------
// Indicator – a numeric column of the merged table
// ---------------------------------------------------------------------------

/// Every numeric column carried by a [`CountryYear`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Indicator {
    Depression,
    Anxiety,
    Bipolar,
    Eating,
    Schizophrenia,
    GlobalMentalDisorders,
    Unemployment,
    Freedom,
    Alcohol,
    GenderInequality,
}

impl Indicator {
    /// The five raw disorder prevalence rates.
    pub const DISORDERS: [Indicator; 5] = [
        Indicator::Depression,
        Indicator::Anxiety,
        Indicator::Bipolar,
        Indicator::Eating,
        Indicator::Schizophrenia,
    ];

    /// Options of the disorder dropdowns. The first entry is the default.
    pub const ILLNESSES: [Indicator; 6] = [
        Indicator::Depression,
        Indicator::Anxiety,
        Indicator::Bipolar,
        Indicator::Eating,
        Indicator::Schizophrenia,
        Indicator::GlobalMentalDisorders,
    ];

    /// Radar chart axes, in drawing order.
    pub const SOCIOECONOMIC: [Indicator; 4] = [
        Indicator::Unemployment,
        Indicator::GenderInequality,
        Indicator::Freedom,
        Indicator::Alcohol,
    ];

    /// Every numeric column, in correlation-matrix order.
    pub const ALL: [Indicator; 10] = [
        Indicator::Schizophrenia,
        Indicator::Depression,
        Indicator::Anxiety,
        Indicator::Bipolar,
        Indicator::Eating,
        Indicator::Unemployment,
        Indicator::Freedom,
        Indicator::Alcohol,
        Indicator::GenderInequality,
        Indicator::GlobalMentalDisorders,
    ];

    /// Column name in the merged table / snapshot files.
    pub fn column(self) -> &'static str {
        match self {
            Indicator::Depression => "depression_disorders",
            Indicator::Anxiety => "anxiety_disorders",
            Indicator::Bipolar => "bipolar_disorders",
            Indicator::Eating => "eating_disorders",
            Indicator::Schizophrenia => "schizo_disorders",
            Indicator::GlobalMentalDisorders => "global_mental_disorders",
            Indicator::Unemployment => "unemployment_rate",
            Indicator::Freedom => "hf_score",
            Indicator::Alcohol => "alcohol_consumption",
            Indicator::GenderInequality => "gii",
        }
    }

    /// Human-readable label used in dropdowns, titles and radar axes.
    pub fn label(self) -> &'static str {
        match self {
            Indicator::Depression => "Depressive disorders",
            Indicator::Anxiety => "Anxiety disorders",
            Indicator::Bipolar => "Bipolar disorders",
            Indicator::Eating => "Eating disorders",
            Indicator::Schizophrenia => "Schizophrenia",
            Indicator::GlobalMentalDisorders => "Global mental disorders",
            Indicator::Unemployment => "Unemployment (%)",
            Indicator::Freedom => "Human Freedom Index",
            Indicator::Alcohol => "Alcohol Consumption",
            Indicator::GenderInequality => "Gender Inequality Index",
        }
    }

    /// Compact name used on correlation-matrix axes.
    pub fn short_name(self) -> &'static str {
        match self {
            Indicator::Depression => "Depression",
            Indicator::Anxiety => "Anxiety",
            Indicator::Bipolar => "Bipolar Disorder",
            Indicator::Eating => "Eating Disorders",
            Indicator::Schizophrenia => "Schizophrenia",
            Indicator::GlobalMentalDisorders => "Global Mental Disorders",
            Indicator::Unemployment => "Unemployment Rate (%)",
            Indicator::Freedom => "Human Freedom Index",
            Indicator::Alcohol => "Alcohol Consumption (liters)",
            Indicator::GenderInequality => "Gender Inequality Index",
        }
    }

    /// Axis label for the socioeconomic side of the scatter plots.
    pub fn axis_label(self) -> &'static str {
        match self {
            Indicator::Unemployment => "Unemployment Rate (%)",
            Indicator::Freedom => "Human Freedom Index",
            Indicator::Alcohol => "Alcohol consumption (liters)",
            Indicator::GenderInequality => "Gender Inequality Index [0,1]",
            Indicator::GlobalMentalDisorders => "Mental Disorders (% Pop.)",
            _ => "% of Population",
        }
    }

    pub fn is_illness(self) -> bool {
        Self::ILLNESSES.contains(&self)
    }
}

impl fmt::Display for Indicator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// CountryYear – one row of the merged table
// ---------------------------------------------------------------------------

/// One denormalized country-year record.
///
/// Field names double as the snapshot column names, so a merged table
/// round-trips through CSV via serde.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CountryYear {
    pub country: String,
    pub code: Option<String>,
    pub year: i32,
    pub depression_disorders: Option<f64>,
    pub anxiety_disorders: Option<f64>,
    pub bipolar_disorders: Option<f64>,
    pub eating_disorders: Option<f64>,
    pub schizo_disorders: Option<f64>,
    pub unemployment_rate: Option<f64>,
    pub hf_score: Option<f64>,
    pub alcohol_consumption: Option<f64>,
    pub gii: Option<f64>,
    pub global_mental_disorders: Option<f64>,
}

impl CountryYear {
    pub fn value(&self, indicator: Indicator) -> Option<f64> {
        match indicator {
            Indicator::Depression => self.depression_disorders,
            Indicator::Anxiety => self.anxiety_disorders,
            Indicator::Bipolar => self.bipolar_disorders,
            Indicator::Eating => self.eating_disorders,
            Indicator::Schizophrenia => self.schizo_disorders,
            Indicator::GlobalMentalDisorders => self.global_mental_disorders,
            Indicator::Unemployment => self.unemployment_rate,
            Indicator::Freedom => self.hf_score,
            Indicator::Alcohol => self.alcohol_consumption,
            Indicator::GenderInequality => self.gii,
        }
        .filter(|v| v.is_finite())
    }

    pub fn has_code(&self, code: &str) -> bool {
        self.code.as_deref() == Some(code)
    }
}

// ---------------------------------------------------------------------------
// MentalHealthTable – the complete merged dataset
// ---------------------------------------------------------------------------

/// The merged table, built once and read by every chart.
#[derive(Debug, Clone, Default)]
pub struct MentalHealthTable {
    pub rows: Vec<CountryYear>,
    /// How `global_mental_disorders` was derived.
    pub composite_mode: CompositeMode,
}

impl MentalHealthTable {
    pub fn new(rows: Vec<CountryYear>, composite_mode: CompositeMode) -> Self {
        Self {
            rows,
            composite_mode,
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Minimum and maximum year present.
    pub fn year_range(&self) -> Option<(i32, i32)> {
        let min = self.rows.iter().map(|r| r.year).min()?;
        let max = self.rows.iter().map(|r| r.year).max()?;
        Some((min, max))
    }

    pub fn rows_for_year(&self, year: i32) -> impl Iterator<Item = &CountryYear> {
        self.rows.iter().filter(move |r| r.year == year)
    }

    /// Rows of one country, sorted by year.
    pub fn rows_for_code(&self, code: &str) -> Vec<&CountryYear> {
        let mut rows: Vec<&CountryYear> = self.rows.iter().filter(|r| r.has_code(code)).collect();
        rows.sort_by_key(|r| r.year);
        rows
    }

    /// Distinct `(code, country)` pairs, sorted by country name.
    pub fn country_options(&self) -> Vec<(String, String)> {
        let pairs: BTreeSet<(String, String)> = self
            .rows
            .iter()
            .filter_map(|r| {
                let code = r.code.as_ref()?;
                if code.is_empty() || r.country.is_empty() {
                    return None;
                }
                Some((r.country.clone(), code.clone()))
            })
            .collect();
        pairs
            .into_iter()
            .map(|(country, code)| (code, country))
            .collect()
    }

    /// First country name carrying `code`, or the code itself.
    pub fn code_to_name(&self, code: &str) -> String {
        self.rows
            .iter()
            .find(|r| r.has_code(code))
            .map(|r| r.country.clone())
            .unwrap_or_else(|| code.to_string())
    }

    /// Unit of measurement shown next to an indicator's values.
    pub fn unit(&self, indicator: Indicator) -> &'static str {
        match indicator {
            Indicator::GlobalMentalDisorders => self.composite_mode.unit(),
            i if i.is_illness() => "% of Population",
            i => i.axis_label(),
        }
    }
}
