use std::io::{BufRead, BufReader, Read};
use std::sync::LazyLock;

use anyhow::{Context, Result};
use csv::StringRecord;
use regex::Regex;

use super::error::DataError;
use super::model::CountryYear;

// ---------------------------------------------------------------------------
// Source file names and headers
// ---------------------------------------------------------------------------

pub const MENTAL_ILLNESS_FILE: &str = "mental-illness.csv";
pub const UNEMPLOYMENT_FILE: &str = "unemployment.csv";
pub const FREEDOM_INDEX_FILE: &str = "human-freedom-index.csv";
pub const ALCOHOL_FILE: &str = "alcohol-consumption.csv";
pub const GENDER_INEQUALITY_FILE: &str = "gender-inequality-index.csv";

pub const DEPRESSION_HEADER: &str =
    "Depressive disorders (share of population) - Sex: Both - Age: Age-standardized";
pub const ANXIETY_HEADER: &str =
    "Anxiety disorders (share of population) - Sex: Both - Age: Age-standardized";
pub const BIPOLAR_HEADER: &str =
    "Bipolar disorders (share of population) - Sex: Both - Age: Age-standardized";
pub const EATING_HEADER: &str =
    "Eating disorders (share of population) - Sex: Both - Age: Age-standardized";
pub const SCHIZOPHRENIA_HEADER: &str =
    "Schizophrenia disorders (share of population) - Sex: Both - Age: Age-standardized";
pub const ALCOHOL_HEADER: &str = "Total alcohol consumption per capita (liters of pure alcohol, projected estimates, 15+ years of age)";
pub const GII_HEADER: &str = "Gender Inequality Index";

/// World Bank exports carry four metadata lines before the header.
pub const UNEMPLOYMENT_PREAMBLE_LINES: usize = 4;

static YEAR_IN_HEADER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d{4})").expect("static year pattern"));

// ---------------------------------------------------------------------------
// Observation – one (country, year, value) triple from a secondary source
// ---------------------------------------------------------------------------

/// A single value of a secondary indicator, keyed by country name and year.
#[derive(Debug, Clone, PartialEq)]
pub struct Observation {
    pub country: String,
    pub year: i32,
    pub value: Option<f64>,
}

// ---------------------------------------------------------------------------
// Header lookup helpers
// ---------------------------------------------------------------------------

struct Columns<'a> {
    file: &'a str,
    headers: StringRecord,
}

impl<'a> Columns<'a> {
    fn new(file: &'a str, headers: StringRecord) -> Self {
        Self { file, headers }
    }

    fn index(&self, column: &str) -> Result<usize, DataError> {
        self.headers
            .iter()
            .position(|h| h.trim() == column)
            .ok_or_else(|| DataError::MissingColumn {
                file: self.file.to_string(),
                column: column.to_string(),
            })
    }
}

/// Empty or non-numeric cells are missing values.
pub fn parse_number(cell: &str) -> Option<f64> {
    let cell = cell.trim();
    if cell.is_empty() {
        return None;
    }
    cell.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Accepts `2019` as well as `2019.0`.
pub fn parse_year(cell: &str) -> Option<i32> {
    let cell = cell.trim();
    if let Ok(y) = cell.parse::<i32>() {
        return Some(y);
    }
    let f = cell.parse::<f64>().ok()?;
    (f.fract() == 0.0 && f.abs() < i32::MAX as f64).then_some(f as i32)
}

/// First four-digit run in a column header, e.g. `"2019 [YR2019]"` → 2019.
pub fn year_from_header(header: &str) -> Option<i32> {
    YEAR_IN_HEADER
        .captures(header)
        .and_then(|c| c.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

fn cell<'r>(record: &'r StringRecord, idx: usize) -> &'r str {
    record.get(idx).unwrap_or("")
}

// ---------------------------------------------------------------------------
// Mental illness prevalence (primary table)
// ---------------------------------------------------------------------------

/// Read the prevalence table and rename its columns onto [`CountryYear`].
pub fn read_mental_illness<R: Read>(reader: R) -> Result<Vec<CountryYear>> {
    let mut rdr = csv::ReaderBuilder::new().flexible(true).from_reader(reader);
    let cols = Columns::new(
        MENTAL_ILLNESS_FILE,
        rdr.headers().context("reading mental illness headers")?.clone(),
    );

    let entity = cols.index("Entity")?;
    let code = cols.index("Code")?;
    let year = cols.index("Year")?;
    let depression = cols.index(DEPRESSION_HEADER)?;
    let anxiety = cols.index(ANXIETY_HEADER)?;
    let bipolar = cols.index(BIPOLAR_HEADER)?;
    let eating = cols.index(EATING_HEADER)?;
    let schizo = cols.index(SCHIZOPHRENIA_HEADER)?;

    let mut rows = Vec::new();
    for (row_no, result) in rdr.records().enumerate() {
        let record = result.with_context(|| format!("{MENTAL_ILLNESS_FILE} row {row_no}"))?;
        let year_cell = cell(&record, year);
        let year = parse_year(year_cell).ok_or_else(|| DataError::InvalidYear {
            file: MENTAL_ILLNESS_FILE.to_string(),
            row: row_no,
            value: year_cell.to_string(),
        })?;
        let code = cell(&record, code).trim();

        rows.push(CountryYear {
            country: cell(&record, entity).trim().to_string(),
            code: (!code.is_empty()).then(|| code.to_string()),
            year,
            depression_disorders: parse_number(cell(&record, depression)),
            anxiety_disorders: parse_number(cell(&record, anxiety)),
            bipolar_disorders: parse_number(cell(&record, bipolar)),
            eating_disorders: parse_number(cell(&record, eating)),
            schizo_disorders: parse_number(cell(&record, schizo)),
            ..Default::default()
        });
    }
    Ok(rows)
}

// ---------------------------------------------------------------------------
// Unemployment (wide → long)
// ---------------------------------------------------------------------------

/// Read the World Bank unemployment table and melt it to long form.
///
/// Every column other than `Country Name` / `Country Code` whose header
/// contains a four-digit year becomes one observation per country. Empty
/// cells are dropped; non-numeric cells are kept as missing.
pub fn read_unemployment<R: Read>(reader: R) -> Result<Vec<Observation>> {
    let mut buffered = BufReader::new(reader);
    let mut line = String::new();
    for _ in 0..UNEMPLOYMENT_PREAMBLE_LINES {
        line.clear();
        if buffered.read_line(&mut line).context("skipping unemployment preamble")? == 0 {
            break;
        }
    }

    let mut rdr = csv::ReaderBuilder::new().flexible(true).from_reader(buffered);
    let cols = Columns::new(
        UNEMPLOYMENT_FILE,
        rdr.headers().context("reading unemployment headers")?.clone(),
    );
    let name_idx = cols.index("Country Name")?;
    let code_idx = cols.index("Country Code")?;

    let year_columns: Vec<(usize, i32)> = cols
        .headers
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != name_idx && *i != code_idx)
        .filter_map(|(i, h)| Some((i, year_from_header(h)?)))
        .collect();

    let mut out = Vec::new();
    for (row_no, result) in rdr.records().enumerate() {
        let record = result.with_context(|| format!("{UNEMPLOYMENT_FILE} row {row_no}"))?;
        let country = cell(&record, name_idx).trim();
        for &(idx, year) in &year_columns {
            let raw = cell(&record, idx);
            if raw.trim().is_empty() {
                continue;
            }
            out.push(Observation {
                country: country.to_string(),
                year,
                value: parse_number(raw),
            });
        }
    }
    Ok(out)
}

// ---------------------------------------------------------------------------
// Long-format secondary sources
// ---------------------------------------------------------------------------

fn read_long<R: Read>(
    reader: R,
    file: &str,
    country_col: &str,
    year_col: &str,
    value_col: &str,
) -> Result<Vec<Observation>> {
    let mut rdr = csv::ReaderBuilder::new().flexible(true).from_reader(reader);
    let cols = Columns::new(
        file,
        rdr.headers().with_context(|| format!("reading {file} headers"))?.clone(),
    );
    let country_idx = cols.index(country_col)?;
    let year_idx = cols.index(year_col)?;
    let value_idx = cols.index(value_col)?;

    let mut out = Vec::new();
    let mut skipped = 0usize;
    for (row_no, result) in rdr.records().enumerate() {
        let record = result.with_context(|| format!("{file} row {row_no}"))?;
        let Some(year) = parse_year(cell(&record, year_idx)) else {
            skipped += 1;
            continue;
        };
        out.push(Observation {
            country: cell(&record, country_idx).trim().to_string(),
            year,
            value: parse_number(cell(&record, value_idx)),
        });
    }
    if skipped > 0 {
        log::warn!("{file}: skipped {skipped} rows without a valid year");
    }
    Ok(out)
}

pub fn read_freedom_index<R: Read>(reader: R) -> Result<Vec<Observation>> {
    read_long(reader, FREEDOM_INDEX_FILE, "countries", "year", "hf_score")
}

pub fn read_alcohol<R: Read>(reader: R) -> Result<Vec<Observation>> {
    read_long(reader, ALCOHOL_FILE, "Entity", "Year", ALCOHOL_HEADER)
}

pub fn read_gender_inequality<R: Read>(reader: R) -> Result<Vec<Observation>> {
    read_long(reader, GENDER_INEQUALITY_FILE, "Entity", "Year", GII_HEADER)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mental_csv() -> String {
        format!(
            "Entity,Code,Year,\"{SCHIZOPHRENIA_HEADER}\",\"{DEPRESSION_HEADER}\",\"{ANXIETY_HEADER}\",\"{BIPOLAR_HEADER}\",\"{EATING_HEADER}\"\n\
             Afghanistan,AFG,1990,0.22,4.99,4.71,0.70,0.12\n\
             Africa (IHME GBD),,1990,0.20,4.50,,0.60,0.10\n"
        )
    }

    #[test]
    fn renames_mental_illness_columns() {
        let rows = read_mental_illness(mental_csv().as_bytes()).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].country, "Afghanistan");
        assert_eq!(rows[0].code.as_deref(), Some("AFG"));
        assert_eq!(rows[0].year, 1990);
        assert_eq!(rows[0].schizo_disorders, Some(0.22));
        assert_eq!(rows[0].depression_disorders, Some(4.99));
        assert_eq!(rows[1].code, None);
        assert_eq!(rows[1].anxiety_disorders, None);
    }

    #[test]
    fn missing_header_is_reported_by_name() {
        let err = read_mental_illness("Entity,Code,Year\nX,XXX,2000\n".as_bytes()).unwrap_err();
        let msg = format!("{err:#}");
        assert!(msg.contains("mental-illness.csv"));
        assert!(msg.contains("Depressive disorders"));
    }

    #[test]
    fn bad_primary_year_is_an_error() {
        let csv = mental_csv().replace("1990,0.22", "n/a,0.22");
        assert!(read_mental_illness(csv.as_bytes()).is_err());
    }

    #[test]
    fn melts_unemployment_wide_table() {
        let csv = "\"Data Source\",\"World Development Indicators\",\n\
                   \n\
                   \"Last Updated Date\",\"2024-06-28\",\n\
                   \n\
                   \"Country Name\",\"Country Code\",\"Indicator Name\",\"Indicator Code\",\"1991\",\"1992\",\"1993\",\n\
                   \"Aruba\",\"ABW\",\"Unemployment\",\"SL.UEM\",\"\",\"5.1\",\"n/a\",\n\
                   \"Chad\",\"TCD\",\"Unemployment\",\"SL.UEM\",\"1.5\",\"\",\"2.0\",\n";
        let obs = read_unemployment(csv.as_bytes()).unwrap();
        assert_eq!(
            obs,
            vec![
                Observation { country: "Aruba".into(), year: 1992, value: Some(5.1) },
                Observation { country: "Aruba".into(), year: 1993, value: None },
                Observation { country: "Chad".into(), year: 1991, value: Some(1.5) },
                Observation { country: "Chad".into(), year: 1993, value: Some(2.0) },
            ]
        );
    }

    #[test]
    fn extracts_year_from_decorated_headers() {
        assert_eq!(year_from_header("2019 [YR2019]"), Some(2019));
        assert_eq!(year_from_header("1960"), Some(1960));
        assert_eq!(year_from_header("Indicator Name"), None);
        assert_eq!(year_from_header(""), None);
    }

    #[test]
    fn reads_long_sources_and_skips_bad_years() {
        let hfi = "year,ISO,countries,region,hf_score\n2019,ALB,Albania,Eastern Europe,7.8\n,XXX,Nowhere,,1.0\n2018,ALB,Albania,Eastern Europe,\n";
        let obs = read_freedom_index(hfi.as_bytes()).unwrap();
        assert_eq!(obs.len(), 2);
        assert_eq!(obs[0].value, Some(7.8));
        assert_eq!(obs[1].value, None);

        let gii = format!("Entity,Code,Year,{GII_HEADER}\nNorway,NOR,2015,0.045\n");
        let obs = read_gender_inequality(gii.as_bytes()).unwrap();
        assert_eq!(obs[0], Observation { country: "Norway".into(), year: 2015, value: Some(0.045) });
    }

    #[test]
    fn parses_numbers_and_years_leniently() {
        assert_eq!(parse_number(" 4.5 "), Some(4.5));
        assert_eq!(parse_number(".."), None);
        assert_eq!(parse_number(""), None);
        assert_eq!(parse_year("2019.0"), Some(2019));
        assert_eq!(parse_year("2019.5"), None);
    }
}
