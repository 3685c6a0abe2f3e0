use std::collections::HashMap;
use std::hash::Hash;

use super::model::CountryYear;
use super::sources::Observation;

// ---------------------------------------------------------------------------
// Generic left join
// ---------------------------------------------------------------------------

/// Dataframe-style left join.
///
/// Every left row is kept. A left row matching `k` right rows is emitted
/// `k` times (in right order); an unmatched left row is emitted once with
/// `None`.
pub fn left_join<'r, L, R, K, FL, FR>(
    left: Vec<L>,
    right: &'r [R],
    left_key: FL,
    right_key: FR,
) -> Vec<(L, Option<&'r R>)>
where
    L: Clone,
    K: Eq + Hash,
    FL: Fn(&L) -> K,
    FR: Fn(&R) -> K,
{
    let mut index: HashMap<K, Vec<&R>> = HashMap::new();
    for r in right {
        index.entry(right_key(r)).or_default().push(r);
    }

    let mut out = Vec::with_capacity(left.len());
    for l in left {
        match index.get(&left_key(&l)) {
            Some(matches) => {
                for r in matches {
                    out.push((l.clone(), Some(*r)));
                }
            }
            None => out.push((l, None)),
        }
    }
    out
}

// ---------------------------------------------------------------------------
// Table assembly
// ---------------------------------------------------------------------------

/// Aggregate regions renamed so the continent bar chart can find them.
pub const REGION_RENAMES: [(&str, &str); 4] = [
    ("Europe (IHME GBD)", "Europe"),
    ("Africa (IHME GBD)", "Africa"),
    ("America (IHME GBD)", "America"),
    ("Asia (IHME GBD)", "Asia"),
];

pub fn rename_regions(rows: &mut [CountryYear]) {
    for row in rows.iter_mut() {
        if let Some((_, short)) = REGION_RENAMES.iter().find(|(long, _)| *long == row.country) {
            row.country = short.to_string();
        }
    }
}

/// Left-join one secondary source on `(country, year)` and store its value
/// through `assign`.
pub fn join_observations(
    rows: Vec<CountryYear>,
    observations: &[Observation],
    source: &str,
    assign: impl Fn(&mut CountryYear, Option<f64>),
) -> Vec<CountryYear> {
    let before = rows.len();
    let joined = left_join(
        rows,
        observations,
        |r: &CountryYear| (r.country.clone(), r.year),
        |o: &Observation| (o.country.clone(), o.year),
    );

    let matched = joined.iter().filter(|(_, o)| o.is_some()).count();
    log::debug!(
        "joined {source}: {matched} of {} rows matched ({} duplicated by repeated keys)",
        joined.len(),
        joined.len() - before
    );

    joined
        .into_iter()
        .map(|(mut row, obs)| {
            assign(&mut row, obs.and_then(|o| o.value));
            row
        })
        .collect()
}

/// The four secondary sources, already read into long form.
#[derive(Debug, Clone, Default)]
pub struct Secondary {
    pub unemployment: Vec<Observation>,
    pub freedom: Vec<Observation>,
    pub alcohol: Vec<Observation>,
    pub gender_inequality: Vec<Observation>,
}

/// Build the merged table from the prevalence rows and the secondary sources.
pub fn merge_sources(mut mental: Vec<CountryYear>, secondary: &Secondary) -> Vec<CountryYear> {
    rename_regions(&mut mental);
    let rows = join_observations(mental, &secondary.unemployment, "unemployment", |r, v| {
        r.unemployment_rate = v
    });
    let rows = join_observations(rows, &secondary.freedom, "human freedom index", |r, v| {
        r.hf_score = v
    });
    let rows = join_observations(rows, &secondary.alcohol, "alcohol consumption", |r, v| {
        r.alcohol_consumption = v
    });
    join_observations(rows, &secondary.gender_inequality, "gender inequality", |r, v| {
        r.gii = v
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn country(name: &str, year: i32) -> CountryYear {
        CountryYear {
            country: name.to_string(),
            year,
            ..Default::default()
        }
    }

    fn obs(name: &str, year: i32, value: f64) -> Observation {
        Observation {
            country: name.to_string(),
            year,
            value: Some(value),
        }
    }

    #[test]
    fn left_join_keeps_unmatched_and_duplicates_on_repeated_keys() {
        let left = vec![1, 2, 3];
        let right = vec![(2, "a"), (2, "b"), (9, "z")];
        let joined = left_join(left, &right, |l| *l, |r| r.0);
        let flat: Vec<(i32, Option<&str>)> = joined.iter().map(|(l, r)| (*l, r.map(|r| r.1))).collect();
        assert_eq!(
            flat,
            vec![(1, None), (2, Some("a")), (2, Some("b")), (3, None)]
        );
    }

    #[test]
    fn merges_on_country_and_year() {
        let mental = vec![country("Chad", 2000), country("Chad", 2001), country("Peru", 2000)];
        let secondary = Secondary {
            unemployment: vec![obs("Chad", 2000, 1.5), obs("Peru", 2001, 4.0)],
            freedom: vec![obs("Peru", 2000, 7.2)],
            alcohol: vec![obs("Chad", 2001, 0.8)],
            gender_inequality: vec![obs("Chad", 2000, 0.6)],
        };
        let rows = merge_sources(mental, &secondary);
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].unemployment_rate, Some(1.5));
        assert_eq!(rows[0].gii, Some(0.6));
        assert_eq!(rows[0].hf_score, None);
        assert_eq!(rows[1].alcohol_consumption, Some(0.8));
        assert_eq!(rows[1].unemployment_rate, None);
        assert_eq!(rows[2].hf_score, Some(7.2));
        assert_eq!(rows[2].unemployment_rate, None);
    }

    #[test]
    fn duplicate_secondary_keys_duplicate_rows() {
        let mental = vec![country("Chad", 2000)];
        let secondary = Secondary {
            freedom: vec![obs("Chad", 2000, 5.0), obs("Chad", 2000, 6.0)],
            ..Default::default()
        };
        let rows = merge_sources(mental, &secondary);
        let scores: Vec<Option<f64>> = rows.iter().map(|r| r.hf_score).collect();
        assert_eq!(scores, vec![Some(5.0), Some(6.0)]);
    }

    #[test]
    fn regions_are_renamed_before_joining() {
        let mental = vec![country("Europe (IHME GBD)", 2010)];
        let secondary = Secondary {
            unemployment: vec![obs("Europe", 2010, 8.0)],
            ..Default::default()
        };
        let rows = merge_sources(mental, &secondary);
        assert_eq!(rows[0].country, "Europe");
        assert_eq!(rows[0].unemployment_rate, Some(8.0));
    }
}
