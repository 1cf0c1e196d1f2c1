use std::path::Path;

use anyhow::{bail, Context, Result};
use arrow::array::{Array, ArrayRef, AsArray, Float64Array, Int64Array, StringArray};
use arrow::compute::cast;
use arrow::datatypes::{DataType, Float64Type, Int64Type};
use arrow::record_batch::RecordBatch;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde::Deserialize;

use super::model::{CustomerDataset, CustomerRecord, DashboardData, Gender, ProvinceCoordinate};
use crate::error::DataLoadError;

/// Column headers of the customer table, as exported by the upstream cleaning step.
pub const PROFESSION: &str = "Profession";
pub const PROVINCE: &str = "province";
pub const GENDER: &str = "gender";
pub const AGE: &str = "age";
pub const GENERATION: &str = "generation";
pub const ANNUAL_INCOME: &str = "Annual_Income";
pub const SPENDING_SCORE: &str = "Spending_Score";

const CUSTOMER_COLUMNS: [&str; 7] = [
    PROFESSION,
    PROVINCE,
    GENDER,
    AGE,
    GENERATION,
    ANNUAL_INCOME,
    SPENDING_SCORE,
];
const COORDINATE_COLUMNS: [&str; 3] = ["province", "latitude", "longitude"];

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load the customer table and the province coordinate table.
///
/// Either file missing, an unsupported format, a missing column, a bad cell
/// or an empty table is a [`DataLoadError`].
pub fn load(customers: &Path, coordinates: &Path) -> Result<DashboardData, DataLoadError> {
    let records = load_customers(customers)
        .with_context(|| format!("customer table {}", customers.display()))?;
    let coordinates = load_coordinates(coordinates)
        .with_context(|| format!("coordinate table {}", coordinates.display()))?;

    let customers = CustomerDataset::from_records(records);
    log::info!(
        "Loaded {} customers ({} professions) and {} province coordinates",
        customers.len(),
        customers.professions().len(),
        coordinates.len()
    );
    Ok(DashboardData {
        customers,
        coordinates,
    })
}

/// Load customer records from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.parquet` – one column per field (recommended)
/// * `.json`    – `[{ "Profession": "...", "age": 31, ... }, ...]`
/// * `.csv`     – header row with the customer column names
pub fn load_customers(path: &Path) -> Result<Vec<CustomerRecord>> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let records = match ext.as_str() {
        "parquet" | "pq" => load_parquet(path)?,
        "json" => load_json(path)?,
        "csv" => load_csv(path)?,
        other => bail!("Unsupported file extension: .{other}"),
    };

    if records.is_empty() {
        bail!("customer table has no rows");
    }
    Ok(records)
}

/// Load `province,latitude,longitude` rows from a CSV file.
pub fn load_coordinates(path: &Path) -> Result<Vec<ProvinceCoordinate>> {
    let mut reader = csv::Reader::from_path(path).context("opening CSV")?;
    require_csv_columns(&mut reader, &COORDINATE_COLUMNS)?;

    let coordinates = reader
        .deserialize::<ProvinceCoordinate>()
        .enumerate()
        .map(|(row_no, row)| row.with_context(|| format!("CSV row {row_no}")))
        .collect::<Result<Vec<ProvinceCoordinate>>>()?;

    if coordinates.is_empty() {
        bail!("coordinate table has no rows");
    }
    Ok(coordinates)
}

// ---------------------------------------------------------------------------
// Row shape shared by the CSV and JSON loaders
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct RawCustomer {
    #[serde(rename = "Profession")]
    profession: String,
    province: String,
    gender: String,
    age: i64,
    generation: String,
    #[serde(rename = "Annual_Income")]
    annual_income: f64,
    #[serde(rename = "Spending_Score")]
    spending_score: f64,
}

impl RawCustomer {
    fn into_record(self) -> Result<CustomerRecord> {
        let gender = parse_gender(&self.gender)?;
        Ok(CustomerRecord {
            profession: self.profession,
            province: self.province,
            gender,
            age: self.age,
            generation: self.generation,
            annual_income: self.annual_income,
            spending_score: self.spending_score,
        })
    }
}

fn parse_gender(label: &str) -> Result<Gender> {
    Gender::parse(label).with_context(|| format!("unknown gender '{label}'"))
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented, the default `df.to_json(orient='records')`):
///
/// ```json
/// [
///   {
///     "Profession": "Artist",
///     "province": "Bali",
///     "gender": "Female",
///     "age": 31,
///     "generation": "Millennial",
///     "Annual_Income": 72000.0,
///     "Spending_Score": 64.0
///   },
///   ...
/// ]
/// ```
fn load_json(path: &Path) -> Result<Vec<CustomerRecord>> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    let rows: Vec<RawCustomer> = serde_json::from_str(&text).context("parsing JSON")?;

    rows.into_iter()
        .enumerate()
        .map(|(i, raw)| raw.into_record().with_context(|| format!("JSON row {i}")))
        .collect()
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// CSV layout: header row with the customer column names. Extra columns
/// (an exported index, for instance) are ignored.
fn load_csv(path: &Path) -> Result<Vec<CustomerRecord>> {
    let mut reader = csv::Reader::from_path(path).context("opening CSV")?;
    require_csv_columns(&mut reader, &CUSTOMER_COLUMNS)?;

    let mut records = Vec::new();
    for (row_no, result) in reader.deserialize::<RawCustomer>().enumerate() {
        let raw = result.with_context(|| format!("CSV row {row_no}"))?;
        records.push(raw.into_record().with_context(|| format!("CSV row {row_no}"))?);
    }
    Ok(records)
}

fn require_csv_columns<R: std::io::Read>(
    reader: &mut csv::Reader<R>,
    required: &[&str],
) -> Result<()> {
    let headers = reader.headers().context("reading CSV headers")?;
    for column in required {
        if !headers.iter().any(|h| h == *column) {
            bail!("CSV missing '{column}' column");
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file containing the customer table.
///
/// Text columns may be plain, large or dictionary-encoded strings (Pandas
/// categoricals land as dictionaries); numeric columns may be any integer or
/// float width. A float `age` must hold whole numbers. Nulls are rejected.
fn load_parquet(path: &Path) -> Result<Vec<CustomerRecord>> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder =
        ParquetRecordBatchReaderBuilder::try_new(file).context("reading parquet metadata")?;
    let reader = builder.build().context("building parquet reader")?;

    let mut records = Vec::new();

    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        let first_row = records.len();
        let columns = CustomerColumns::from_batch(&batch, first_row)?;

        for row in 0..batch.num_rows() {
            let record = columns
                .record(row)
                .with_context(|| format!("Row {}", first_row + row))?;
            records.push(record);
        }
    }

    Ok(records)
}

/// One record batch, each column cast to the type its field needs.
struct CustomerColumns {
    profession: StringArray,
    province: StringArray,
    gender: StringArray,
    age: Int64Array,
    generation: StringArray,
    income: Float64Array,
    spending: Float64Array,
}

impl CustomerColumns {
    fn from_batch(batch: &RecordBatch, first_row: usize) -> Result<Self> {
        Ok(CustomerColumns {
            profession: string_column(batch, PROFESSION)?,
            province: string_column(batch, PROVINCE)?,
            gender: string_column(batch, GENDER)?,
            age: whole_number_column(batch, AGE, first_row)?,
            generation: string_column(batch, GENERATION)?,
            income: float_column(batch, ANNUAL_INCOME)?,
            spending: float_column(batch, SPENDING_SCORE)?,
        })
    }

    fn record(&self, row: usize) -> Result<CustomerRecord> {
        Ok(CustomerRecord {
            profession: string_value(&self.profession, row, PROFESSION)?,
            province: string_value(&self.province, row, PROVINCE)?,
            gender: parse_gender(&string_value(&self.gender, row, GENDER)?)?,
            age: int_value(&self.age, row, AGE)?,
            generation: string_value(&self.generation, row, GENERATION)?,
            annual_income: float_value(&self.income, row, ANNUAL_INCOME)?,
            spending_score: float_value(&self.spending, row, SPENDING_SCORE)?,
        })
    }
}

// -- Parquet / Arrow helpers --

fn column<'b>(batch: &'b RecordBatch, name: &str) -> Result<&'b ArrayRef> {
    let idx = batch
        .schema()
        .index_of(name)
        .map_err(|_| anyhow::anyhow!("Parquet file missing '{name}' column"))?;
    Ok(batch.column(idx))
}

fn column_as(batch: &RecordBatch, name: &str, to: &DataType) -> Result<ArrayRef> {
    let col = column(batch, name)?;
    cast(col, to).with_context(|| {
        format!("column '{name}' has type {:?}, expected {to:?}", col.data_type())
    })
}

fn string_column(batch: &RecordBatch, name: &str) -> Result<StringArray> {
    Ok(column_as(batch, name, &DataType::Utf8)?.as_string::<i32>().clone())
}

/// Integer column. Float sources are accepted only when every value is whole,
/// since casting would otherwise truncate.
fn whole_number_column(batch: &RecordBatch, name: &str, first_row: usize) -> Result<Int64Array> {
    if column(batch, name)?.data_type().is_floating() {
        let floats = float_column(batch, name)?;
        for (row, value) in floats.iter().enumerate() {
            if let Some(v) = value.filter(|v| v.fract() != 0.0) {
                bail!("Row {}: '{name}' value {v} is not a whole number", first_row + row);
            }
        }
    }
    Ok(column_as(batch, name, &DataType::Int64)?.as_primitive::<Int64Type>().clone())
}

fn float_column(batch: &RecordBatch, name: &str) -> Result<Float64Array> {
    Ok(column_as(batch, name, &DataType::Float64)?.as_primitive::<Float64Type>().clone())
}

fn non_null(col: &dyn Array, row: usize, name: &str) -> Result<()> {
    if col.is_null(row) {
        bail!("null value in '{name}'");
    }
    Ok(())
}

fn string_value(col: &StringArray, row: usize, name: &str) -> Result<String> {
    non_null(col, row, name)?;
    Ok(col.value(row).to_string())
}

fn int_value(col: &Int64Array, row: usize, name: &str) -> Result<i64> {
    non_null(col, row, name)?;
    Ok(col.value(row))
}

fn float_value(col: &Float64Array, row: usize, name: &str) -> Result<f64> {
    non_null(col, row, name)?;
    Ok(col.value(row))
}
