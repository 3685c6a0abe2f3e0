use std::fs::File;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use arrow::array::{Array, ArrayRef, AsArray, Float32Array, Float64Array, Int32Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use arrow::util::pretty::pretty_format_batches;
use parquet::arrow::ArrowWriter;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;

use super::composite::{CompositeMode, apply_composite};
use super::error::DataError;
use super::merge::{Secondary, merge_sources};
use super::model::{CountryYear, Indicator, MentalHealthTable};
use super::sources::{
    self, ALCOHOL_FILE, FREEDOM_INDEX_FILE, GENDER_INEQUALITY_FILE, MENTAL_ILLNESS_FILE,
    UNEMPLOYMENT_FILE,
};

/// Default file name when exporting the merged table.
pub const DEFAULT_EXPORT_FILE: &str = "mental_health_merged.csv";

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load the merged table.  Dispatch by path.
///
/// Supported inputs:
/// * a directory holding the five raw source CSVs
/// * `.csv`     – a merged snapshot written by [`export`]
/// * `.parquet` – the same snapshot in Parquet form
///
/// The composite index is (re)computed with `mode` in every case.
pub fn load_file(path: &Path, mode: CompositeMode) -> Result<MentalHealthTable> {
    if path.is_dir() {
        return load_sources(path, mode);
    }
    if !path.exists() {
        return Err(DataError::NotFound(path.display().to_string()).into());
    }

    let mut rows = match extension(path).as_str() {
        "parquet" | "pq" => read_parquet_snapshot(path)?,
        "csv" => read_csv_snapshot(path)?,
        other => return Err(DataError::UnsupportedExtension(other.to_string()).into()),
    };
    apply_composite(&mut rows, mode);
    Ok(MentalHealthTable::new(rows, mode))
}

/// Read the five raw sources from `dir` and merge them.
pub fn load_sources(dir: &Path, mode: CompositeMode) -> Result<MentalHealthTable> {
    let open = |name: &str| {
        let path = dir.join(name);
        File::open(&path).with_context(|| format!("opening {}", path.display()))
    };

    let mental = sources::read_mental_illness(open(MENTAL_ILLNESS_FILE)?)?;
    let secondary = Secondary {
        unemployment: sources::read_unemployment(open(UNEMPLOYMENT_FILE)?)?,
        freedom: sources::read_freedom_index(open(FREEDOM_INDEX_FILE)?)?,
        alcohol: sources::read_alcohol(open(ALCOHOL_FILE)?)?,
        gender_inequality: sources::read_gender_inequality(open(GENDER_INEQUALITY_FILE)?)?,
    };
    log::debug!(
        "read {} prevalence rows, {} unemployment, {} freedom, {} alcohol, {} gender inequality observations",
        mental.len(),
        secondary.unemployment.len(),
        secondary.freedom.len(),
        secondary.alcohol.len(),
        secondary.gender_inequality.len()
    );

    let mut rows = merge_sources(mental, &secondary);
    apply_composite(&mut rows, mode);
    Ok(MentalHealthTable::new(rows, mode))
}

fn extension(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase()
}

// ---------------------------------------------------------------------------
// Export
// ---------------------------------------------------------------------------

/// Write the merged table to `.csv` or `.parquet`.
pub fn export(table: &MentalHealthTable, path: &Path) -> Result<()> {
    match extension(path).as_str() {
        "parquet" | "pq" => write_parquet_snapshot(&table.rows, path),
        "csv" => write_csv_snapshot(&table.rows, path),
        other => bail!(DataError::UnsupportedExtension(other.to_string())),
    }
}

fn write_csv_snapshot(rows: &[CountryYear], path: &Path) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).context("creating CSV snapshot")?;
    for row in rows {
        writer.serialize(row).context("writing CSV snapshot row")?;
    }
    writer.flush().context("flushing CSV snapshot")?;
    Ok(())
}

fn read_csv_snapshot(path: &Path) -> Result<Vec<CountryYear>> {
    let mut reader = csv::Reader::from_path(path).context("opening CSV snapshot")?;
    reader
        .deserialize()
        .enumerate()
        .map(|(row_no, result)| result.with_context(|| format!("CSV snapshot row {row_no}")))
        .collect()
}

// ---------------------------------------------------------------------------
// Parquet snapshot
// ---------------------------------------------------------------------------

fn snapshot_schema() -> Schema {
    let mut fields = vec![
        Field::new("country", DataType::Utf8, false),
        Field::new("code", DataType::Utf8, true),
        Field::new("year", DataType::Int32, false),
    ];
    fields.extend(
        Indicator::ALL
            .iter()
            .map(|ind| Field::new(ind.column(), DataType::Float64, true)),
    );
    Schema::new(fields)
}

fn write_parquet_snapshot(rows: &[CountryYear], path: &Path) -> Result<()> {
    let schema = Arc::new(snapshot_schema());

    let mut columns: Vec<ArrayRef> = vec![
        Arc::new(StringArray::from(
            rows.iter().map(|r| r.country.as_str()).collect::<Vec<_>>(),
        )),
        Arc::new(StringArray::from(
            rows.iter().map(|r| r.code.as_deref()).collect::<Vec<_>>(),
        )),
        Arc::new(Int32Array::from(rows.iter().map(|r| r.year).collect::<Vec<_>>())),
    ];
    for ind in Indicator::ALL {
        columns.push(Arc::new(Float64Array::from(
            rows.iter().map(|r| r.value(ind)).collect::<Vec<_>>(),
        )));
    }

    let batch = RecordBatch::try_new(schema.clone(), columns).context("building record batch")?;
    let file = File::create(path).context("creating parquet snapshot")?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating parquet writer")?;
    writer.write(&batch).context("writing parquet batch")?;
    writer.close().context("closing parquet writer")?;
    Ok(())
}

/// Works with files written by [`export`] as well as Pandas / Polars
/// `to_parquet` output of the same merged table.
fn read_parquet_snapshot(path: &Path) -> Result<Vec<CountryYear>> {
    let file = File::open(path).context("opening parquet file")?;
    let builder =
        ParquetRecordBatchReaderBuilder::try_new(file).context("reading parquet metadata")?;
    let reader = builder.build().context("building parquet reader")?;

    let mut rows = Vec::new();
    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        if rows.is_empty() && log::log_enabled!(log::Level::Debug) {
            let head = batch.slice(0, batch.num_rows().min(5));
            log::debug!("{} preview:\n{}", path.display(), pretty_format_batches(&[head])?);
        }
        let country = column(&batch, "country", path)?;
        let code = column(&batch, "code", path)?;
        let year = column(&batch, "year", path)?;
        let indicators: Vec<(Indicator, Option<&ArrayRef>)> = Indicator::ALL
            .iter()
            .map(|&ind| (ind, column(&batch, ind.column(), path).ok()))
            .collect();

        for row in 0..batch.num_rows() {
            let mut record = CountryYear {
                country: string_at(country, row).unwrap_or_default(),
                code: string_at(code, row),
                year: int_at(year, row)
                    .with_context(|| format!("Row {row}: missing or invalid 'year'"))?,
                ..Default::default()
            };
            for (ind, col) in &indicators {
                let value = col.and_then(|c| float_at(c, row));
                set_value(&mut record, *ind, value);
            }
            rows.push(record);
        }
    }
    Ok(rows)
}

fn column<'b>(batch: &'b RecordBatch, name: &str, path: &Path) -> Result<&'b ArrayRef, DataError> {
    let idx = batch
        .schema()
        .index_of(name)
        .map_err(|_| DataError::MissingColumn {
            file: path.display().to_string(),
            column: name.to_string(),
        })?;
    Ok(batch.column(idx))
}

fn set_value(record: &mut CountryYear, indicator: Indicator, value: Option<f64>) {
    let slot = match indicator {
        Indicator::Depression => &mut record.depression_disorders,
        Indicator::Anxiety => &mut record.anxiety_disorders,
        Indicator::Bipolar => &mut record.bipolar_disorders,
        Indicator::Eating => &mut record.eating_disorders,
        Indicator::Schizophrenia => &mut record.schizo_disorders,
        Indicator::GlobalMentalDisorders => &mut record.global_mental_disorders,
        Indicator::Unemployment => &mut record.unemployment_rate,
        Indicator::Freedom => &mut record.hf_score,
        Indicator::Alcohol => &mut record.alcohol_consumption,
        Indicator::GenderInequality => &mut record.gii,
    };
    *slot = value;
}

// -- Arrow helpers --

fn string_at(col: &ArrayRef, row: usize) -> Option<String> {
    if col.is_null(row) {
        return None;
    }
    match col.data_type() {
        DataType::Utf8 => Some(col.as_string::<i32>().value(row).to_string()),
        DataType::LargeUtf8 => Some(col.as_string::<i64>().value(row).to_string()),
        _ => None,
    }
}

fn int_at(col: &ArrayRef, row: usize) -> Option<i32> {
    if col.is_null(row) {
        return None;
    }
    if let Some(arr) = col.as_any().downcast_ref::<Int32Array>() {
        Some(arr.value(row))
    } else if let Some(arr) = col.as_any().downcast_ref::<Int64Array>() {
        i32::try_from(arr.value(row)).ok()
    } else {
        None
    }
}

fn float_at(col: &ArrayRef, row: usize) -> Option<f64> {
    if col.is_null(row) {
        return None;
    }
    let any = col.as_any();
    let value = if let Some(arr) = any.downcast_ref::<Float64Array>() {
        arr.value(row)
    } else if let Some(arr) = any.downcast_ref::<Float32Array>() {
        arr.value(row) as f64
    } else if let Some(arr) = any.downcast_ref::<Int64Array>() {
        arr.value(row) as f64
    } else {
        return None;
    };
    value.is_finite().then_some(value)
}
