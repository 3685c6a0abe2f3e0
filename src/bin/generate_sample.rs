//! Writes a small synthetic copy of the five raw source files.
//!
//! Usage: `generate-sample [output-dir]` (defaults to `data`).

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

const DISORDER_HEADERS: [&str; 5] = [
    "Schizophrenia disorders (share of population) - Sex: Both - Age: Age-standardized",
    "Depressive disorders (share of population) - Sex: Both - Age: Age-standardized",
    "Anxiety disorders (share of population) - Sex: Both - Age: Age-standardized",
    "Bipolar disorders (share of population) - Sex: Both - Age: Age-standardized",
    "Eating disorders (share of population) - Sex: Both - Age: Age-standardized",
];
const ALCOHOL_HEADER: &str = "Total alcohol consumption per capita (liters of pure alcohol, projected estimates, 15+ years of age)";
const GII_HEADER: &str = "Gender Inequality Index";

/// (name, ISO code, baseline prevalence scale, freedom, alcohol, gii)
const COUNTRIES: [(&str, &str, f64, f64, f64, f64); 12] = [
    ("France", "FRA", 1.10, 8.2, 11.5, 0.08),
    ("Spain", "ESP", 1.05, 8.1, 10.5, 0.07),
    ("Germany", "DEU", 1.00, 8.5, 12.2, 0.07),
    ("United States", "USA", 1.15, 8.3, 9.8, 0.18),
    ("Brazil", "BRA", 1.20, 6.9, 7.4, 0.39),
    ("India", "IND", 0.85, 6.3, 5.5, 0.49),
    ("China", "CHN", 0.75, 5.1, 6.0, 0.17),
    ("Nigeria", "NGA", 0.80, 6.2, 4.6, 0.60),
    ("Japan", "JPN", 0.90, 8.2, 8.0, 0.08),
    ("Australia", "AUS", 1.12, 8.6, 10.4, 0.07),
    ("Egypt", "EGY", 0.95, 5.2, 0.3, 0.44),
    ("Afghanistan", "AFG", 1.25, 4.0, 0.2, 0.66),
];

/// Aggregate rows of the prevalence table, without a code.
const AGGREGATES: [(&str, f64); 8] = [
    ("Africa (IHME GBD)", 0.85),
    ("America (IHME GBD)", 1.12),
    ("Asia (IHME GBD)", 0.82),
    ("Europe (IHME GBD)", 1.05),
    ("Low-income countries", 0.88),
    ("Lower-middle-income countries", 0.90),
    ("Upper-middle-income countries", 0.97),
    ("High-income countries", 1.08),
];

/// Base prevalence (% of population) in the same order as `DISORDER_HEADERS`.
const BASE_RATES: [f64; 5] = [0.25, 3.8, 4.2, 0.65, 0.18];

const FIRST_YEAR: i32 = 1990;
const LAST_YEAR: i32 = 2019;

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }
}

fn fmt(v: f64) -> String {
    format!("{v:.4}")
}

/// Slow drift over the years plus a little noise.
fn trend(base: f64, year: i32, rng: &mut SimpleRng) -> f64 {
    let t = (year - FIRST_YEAR) as f64;
    (base * (1.0 + 0.004 * t) + rng.gauss(0.0, base * 0.02)).max(0.0)
}

fn write_mental_illness(dir: &Path, rng: &mut SimpleRng) -> Result<()> {
    let path = dir.join("mental-illness.csv");
    let mut wtr = csv::Writer::from_path(&path).with_context(|| format!("creating {}", path.display()))?;

    let mut header = vec!["Entity", "Code", "Year"];
    header.extend(DISORDER_HEADERS);
    wtr.write_record(&header)?;

    let entities = COUNTRIES
        .iter()
        .map(|&(name, code, scale, ..)| (name, code, scale))
        .chain(AGGREGATES.iter().map(|&(name, scale)| (name, "", scale)));

    for (name, code, scale) in entities {
        for year in FIRST_YEAR..=LAST_YEAR {
            let mut record = vec![name.to_string(), code.to_string(), year.to_string()];
            record.extend(BASE_RATES.iter().map(|&base| fmt(trend(base * scale, year, rng))));
            wtr.write_record(&record)?;
        }
    }
    wtr.flush()?;
    Ok(())
}

fn write_unemployment(dir: &Path, rng: &mut SimpleRng) -> Result<()> {
    let path = dir.join("unemployment.csv");
    let mut file = File::create(&path).with_context(|| format!("creating {}", path.display()))?;
    writeln!(file, "\"Data Source\",\"World Development Indicators\",")?;
    writeln!(file)?;
    writeln!(file, "\"Last Updated Date\",\"2023-12-18\",")?;
    writeln!(file)?;

    let mut wtr = csv::Writer::from_writer(file);
    let mut header = vec![
        "Country Name".to_string(),
        "Country Code".to_string(),
        "Indicator Name".to_string(),
        "Indicator Code".to_string(),
    ];
    header.extend((FIRST_YEAR..=LAST_YEAR).map(|y| y.to_string()));
    wtr.write_record(&header)?;

    for (i, &(name, code, ..)) in COUNTRIES.iter().enumerate() {
        let base = 3.0 + (i % 5) as f64 * 2.0;
        let mut record = vec![
            name.to_string(),
            code.to_string(),
            "Unemployment, total (% of total labor force) (modeled ILO estimate)".to_string(),
            "SL.UEM.TOTL.ZS".to_string(),
        ];
        for year in FIRST_YEAR..=LAST_YEAR {
            // Older years are sparse in the real export.
            if year < 1991 {
                record.push(String::new());
            } else {
                record.push(fmt(trend(base, year, rng)));
            }
        }
        wtr.write_record(&record)?;
    }
    wtr.flush()?;
    Ok(())
}

fn write_long(
    path: PathBuf,
    header: [&str; 3],
    first_year: i32,
    value: impl Fn(usize, i32, &mut SimpleRng) -> f64,
    rng: &mut SimpleRng,
) -> Result<()> {
    let mut wtr = csv::Writer::from_path(&path).with_context(|| format!("creating {}", path.display()))?;
    wtr.write_record(header)?;
    for (i, &(name, ..)) in COUNTRIES.iter().enumerate() {
        for year in first_year..=LAST_YEAR {
            wtr.write_record([name.to_string(), year.to_string(), fmt(value(i, year, rng))])?;
        }
    }
    wtr.flush()?;
    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();

    let dir = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("data"));
    fs::create_dir_all(&dir).with_context(|| format!("creating {}", dir.display()))?;

    let mut rng = SimpleRng::new(42);

    write_mental_illness(&dir, &mut rng)?;
    write_unemployment(&dir, &mut rng)?;
    write_long(
        dir.join("human-freedom-index.csv"),
        ["countries", "year", "hf_score"],
        2000,
        |i, year, rng| trend(COUNTRIES[i].3, year, rng).min(10.0),
        &mut rng,
    )?;
    write_long(
        dir.join("alcohol-consumption.csv"),
        ["Entity", "Year", ALCOHOL_HEADER],
        2000,
        |i, year, rng| trend(COUNTRIES[i].4, year, rng),
        &mut rng,
    )?;
    write_long(
        dir.join("gender-inequality-index.csv"),
        ["Entity", "Year", GII_HEADER],
        1995,
        |i, year, rng| trend(COUNTRIES[i].5, year, rng).min(1.0),
        &mut rng,
    )?;

    log::info!("Wrote sample sources to {}", dir.display());
    println!(
        "Wrote {} countries and {} aggregates ({FIRST_YEAR}-{LAST_YEAR}) to {}",
        COUNTRIES.len(),
        AGGREGATES.len(),
        dir.display()
    );
    Ok(())
}
