use super::model::{CountryYear, Indicator};

// ---------------------------------------------------------------------------
// Aggregate rows carried by the prevalence table
// ---------------------------------------------------------------------------

/// Region rows (after renaming) shown in the continent bar chart.
pub const CONTINENTS: [&str; 4] = ["Africa", "Asia", "Europe", "America"];

/// Income-group rows shown in the income bar chart.
pub const INCOME_GROUPS: [&str; 4] = [
    "Low-income countries",
    "Lower-middle-income countries",
    "Upper-middle-income countries",
    "High-income countries",
];

/// `"Lower-middle-income countries"` → `"Lower-Middle"`.
pub fn income_label(name: &str) -> String {
    let stripped = name.replace(" countries", "").replace("-income", "");
    title_case(&stripped)
}

/// Upper-case the first letter of every word, lower-case the rest.
/// Any non-alphabetic character starts a new word.
fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut word_start = true;
    for ch in s.chars() {
        if ch.is_alphabetic() {
            if word_start {
                out.extend(ch.to_uppercase());
            } else {
                out.extend(ch.to_lowercase());
            }
            word_start = false;
        } else {
            out.push(ch);
            word_start = true;
        }
    }
    out
}

// ---------------------------------------------------------------------------
// Row predicates
// ---------------------------------------------------------------------------

/// Rows whose country name is one of `names`, paired with their value.
/// Rows without a value are dropped. Sorted by value, descending.
pub fn named_values<'a>(
    rows: impl IntoIterator<Item = &'a CountryYear>,
    names: &[&str],
    indicator: Indicator,
) -> Vec<(&'a CountryYear, f64)> {
    let mut out: Vec<(&CountryYear, f64)> = rows
        .into_iter()
        .filter(|r| names.contains(&r.country.as_str()))
        .filter_map(|r| Some((r, r.value(indicator)?)))
        .collect();
    sort_descending(&mut out);
    out
}

/// Stable sort on the value, largest first.
pub fn sort_descending<T>(items: &mut [(T, f64)]) {
    items.sort_by(|a, b| b.1.total_cmp(&a.1));
}

/// Rows where every listed indicator is present.
pub fn complete_rows<'a>(
    rows: impl IntoIterator<Item = &'a CountryYear>,
    indicators: &[Indicator],
) -> Vec<&'a CountryYear> {
    rows.into_iter()
        .filter(|r| indicators.iter().all(|&ind| r.value(ind).is_some()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cleans_income_group_labels() {
        let labels: Vec<String> = INCOME_GROUPS.iter().map(|g| income_label(g)).collect();
        assert_eq!(labels, vec!["Low", "Lower-Middle", "Upper-Middle", "High"]);
    }

    #[test]
    fn named_values_drop_missing_and_sort() {
        let rows: Vec<CountryYear> = [("Asia", Some(2.0)), ("Europe", Some(5.0)), ("Africa", None), ("Chad", Some(9.0))]
            .into_iter()
            .map(|(name, v)| CountryYear {
                country: name.to_string(),
                anxiety_disorders: v,
                ..Default::default()
            })
            .collect();
        let picked: Vec<(&str, f64)> = named_values(&rows, &CONTINENTS, Indicator::Anxiety)
            .into_iter()
            .map(|(r, v)| (r.country.as_str(), v))
            .collect();
        assert_eq!(picked, vec![("Europe", 5.0), ("Asia", 2.0)]);
    }

    #[test]
    fn complete_rows_require_every_indicator() {
        let rows = vec![
            CountryYear {
                hf_score: Some(1.0),
                gii: Some(0.5),
                ..Default::default()
            },
            CountryYear {
                hf_score: Some(1.0),
                ..Default::default()
            },
        ];
        let kept = complete_rows(&rows, &[Indicator::Freedom, Indicator::GenderInequality]);
        assert_eq!(kept.len(), 1);
    }
}
