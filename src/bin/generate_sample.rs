//! Writes a deterministic sample customer table (`data/customer_merge.parquet`)
//! and province coordinate table (`data/coordinate.csv`) for local runs.

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use serde::Serialize;

const CUSTOMERS: usize = 2_000;
const SURVEY_YEAR: i64 = 2023;

/// (profession, mean annual income)
const PROFESSIONS: [(&str, f64); 9] = [
    ("Artist", 95_000.0),
    ("Doctor", 140_000.0),
    ("Engineer", 120_000.0),
    ("Entertainment", 90_000.0),
    ("Executive", 160_000.0),
    ("Healthcare", 100_000.0),
    ("Homemaker", 60_000.0),
    ("Lawyer", 150_000.0),
    ("Marketing", 105_000.0),
];

/// (province, latitude, longitude)
const PROVINCES: [(&str, f64, f64); 10] = [
    ("DKI Jakarta", -6.2088, 106.8456),
    ("Jawa Barat", -6.9175, 107.6191),
    ("Jawa Tengah", -7.1510, 110.1403),
    ("Jawa Timur", -7.5361, 112.2384),
    ("Bali", -8.3405, 115.0920),
    ("Sumatera Utara", 2.1154, 99.5451),
    ("Sumatera Barat", -0.7399, 100.8000),
    ("Kalimantan Timur", 0.5387, 116.4194),
    ("Sulawesi Selatan", -3.6688, 119.9741),
    ("Papua", -4.2699, 138.0804),
];

/// Customers here have no coordinate row, so they stay off the map.
const UNMAPPED_PROVINCE: &str = "Maluku";

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

    /// Uniform integer in `[lo, hi]`.
    fn range(&mut self, lo: i64, hi: i64) -> i64 {
        lo + (self.next_u64() % (hi - lo + 1) as u64) as i64
    }

    fn pick<'a, T>(&mut self, items: &'a [T]) -> &'a T {
        &items[(self.next_u64() % items.len() as u64) as usize]
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }
}

fn generation(age: i64) -> &'static str {
    match SURVEY_YEAR - age {
        1997..=i64::MAX => "Gen Z",
        1981..=1996 => "Millennial",
        1965..=1980 => "Gen X",
        1946..=1964 => "Boomer",
        _ => "Silent",
    }
}

#[derive(Serialize)]
struct CoordinateRow<'a> {
    province: &'a str,
    latitude: f64,
    longitude: f64,
}

fn write_customers(path: &Path, rng: &mut SimpleRng) -> Result<()> {
    let mut profession = Vec::with_capacity(CUSTOMERS);
    let mut province = Vec::with_capacity(CUSTOMERS);
    let mut gender = Vec::with_capacity(CUSTOMERS);
    let mut age = Vec::with_capacity(CUSTOMERS);
    let mut generations = Vec::with_capacity(CUSTOMERS);
    let mut income = Vec::with_capacity(CUSTOMERS);
    let mut spending = Vec::with_capacity(CUSTOMERS);

    let mut province_names: Vec<&str> = PROVINCES.iter().map(|(name, _, _)| *name).collect();
    province_names.push(UNMAPPED_PROVINCE);

    for _ in 0..CUSTOMERS {
        let (job, mean_income) = *rng.pick(&PROFESSIONS);
        let years = rng.range(18, 79);

        profession.push(job);
        province.push(*rng.pick(&province_names));
        gender.push(*rng.pick(&["Female", "Male"]));
        age.push(years);
        generations.push(generation(years));
        income.push(rng.gauss(mean_income, mean_income * 0.25).max(1_000.0).round());
        spending.push(rng.range(1, 100) as f64);
    }

    let schema = Arc::new(Schema::new(vec![
        Field::new("Profession", DataType::Utf8, false),
        Field::new("province", DataType::Utf8, false),
        Field::new("gender", DataType::Utf8, false),
        Field::new("age", DataType::Int64, false),
        Field::new("generation", DataType::Utf8, false),
        Field::new("Annual_Income", DataType::Float64, false),
        Field::new("Spending_Score", DataType::Float64, false),
    ]));

    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(StringArray::from(profession)),
            Arc::new(StringArray::from(province)),
            Arc::new(StringArray::from(gender)),
            Arc::new(Int64Array::from(age)),
            Arc::new(StringArray::from(generations)),
            Arc::new(Float64Array::from(income)),
            Arc::new(Float64Array::from(spending)),
        ],
    )
    .context("building record batch")?;

    let file = std::fs::File::create(path).context("creating parquet file")?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating writer")?;
    writer.write(&batch).context("writing batch")?;
    writer.close().context("closing writer")?;
    Ok(())
}

fn write_coordinates(path: &Path) -> Result<()> {
    let mut wtr = csv::Writer::from_path(path).context("creating coordinate CSV")?;
    for (province, latitude, longitude) in PROVINCES {
        wtr.serialize(CoordinateRow {
            province,
            latitude,
            longitude,
        })?;
    }
    wtr.flush()?;
    Ok(())
}

fn main() -> Result<()> {
    let out_dir = Path::new("data");
    std::fs::create_dir_all(out_dir).context("creating data directory")?;

    let customers = out_dir.join("customer_merge.parquet");
    let coordinates = out_dir.join("coordinate.csv");

    let mut rng = SimpleRng::new(42);
    write_customers(&customers, &mut rng)?;
    write_coordinates(&coordinates)?;

    println!(
        "Wrote {CUSTOMERS} customers to {} and {} provinces to {}",
        customers.display(),
        PROVINCES.len(),
        coordinates.display()
    );
    Ok(())
}
