//! Writes a synthetic `ambiente_calidad_aire.csv` (and, with `--parquet`,
//! `ambiente_calidad_aire.parquet`) for trying the dashboard.
//!
//! Usage: `generate_sample [ROWS] [--parquet]`

use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{Float64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;

/// Department name and approximate capital coordinates.
const DEPARTMENTS: [(&str, f64, f64); 12] = [
    ("Antioquia", 6.2442, -75.5812),
    ("Atlántico", 10.9685, -74.7813),
    ("Bogotá D.C.", 4.7110, -74.0721),
    ("Bolívar", 10.3910, -75.4794),
    ("Boyacá", 5.5353, -73.3678),
    ("Caldas", 5.0703, -75.5138),
    ("Cundinamarca", 4.8143, -74.3546),
    ("Huila", 2.9273, -75.2819),
    ("Meta", 4.1420, -73.6266),
    ("Nariño", 1.2136, -77.2811),
    ("Santander", 7.1193, -73.1227),
    ("Valle del Cauca", 3.4516, -76.5320),
];

/// Category label and the mean value measured under it.
const CATEGORIES: [(&str, f64); 3] = [("A", 0.012), ("B", 0.035), ("C", 0.080)];

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

    fn below(&mut self, n: usize) -> usize {
        (self.next_f64() * n as f64) as usize % n
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }
}

struct Row {
    department: &'static str,
    category: &'static str,
    value: f64,
    latitude: f64,
    longitude: f64,
}

fn generate(rows: usize, rng: &mut SimpleRng) -> Vec<Row> {
    (0..rows)
        .map(|_| {
            let (department, lat, lon) = DEPARTMENTS[rng.below(DEPARTMENTS.len())];
            let (category, mean) = CATEGORIES[rng.below(CATEGORIES.len())];
            // Log-normal around the category mean keeps values positive.
            let value = mean * rng.gauss(0.0, 0.35).exp();
            Row {
                department,
                category,
                value: (value * 1e4).round() / 1e4,
                latitude: lat + rng.gauss(0.0, 0.25),
                longitude: lon + rng.gauss(0.0, 0.25),
            }
        })
        .collect()
}

fn write_csv(path: &str, rows: &[Row]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).with_context(|| format!("creating {path}"))?;
    writer.write_record(["Departamento", "Categoría", "Valor", "Latitud", "Longitud"])?;
    for r in rows {
        writer.write_record([
            r.department.to_string(),
            r.category.to_string(),
            format!("{:.4}", r.value),
            format!("{:.6}", r.latitude),
            format!("{:.6}", r.longitude),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

fn write_parquet(path: &str, rows: &[Row]) -> Result<()> {
    let schema = Arc::new(Schema::new(vec![
        Field::new("Departamento", DataType::Utf8, false),
        Field::new("Categoría", DataType::Utf8, false),
        Field::new("Valor", DataType::Float64, false),
        Field::new("Latitud", DataType::Float64, false),
        Field::new("Longitud", DataType::Float64, false),
    ]));

    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(StringArray::from_iter_values(rows.iter().map(|r| r.department))),
            Arc::new(StringArray::from_iter_values(rows.iter().map(|r| r.category))),
            Arc::new(Float64Array::from_iter_values(rows.iter().map(|r| r.value))),
            Arc::new(Float64Array::from_iter_values(rows.iter().map(|r| r.latitude))),
            Arc::new(Float64Array::from_iter_values(rows.iter().map(|r| r.longitude))),
        ],
    )
    .context("building record batch")?;

    let file = std::fs::File::create(path).with_context(|| format!("creating {path}"))?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating parquet writer")?;
    writer.write(&batch).context("writing parquet batch")?;
    writer.close().context("closing parquet writer")?;
    Ok(())
}

fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let parquet = args.iter().any(|a| a == "--parquet");
    let rows = match args.iter().find(|a| !a.starts_with("--")) {
        Some(n) => n.parse::<usize>().with_context(|| format!("invalid row count '{n}'"))?,
        None => 500,
    };

    let mut rng = SimpleRng::new(42);
    let data = generate(rows, &mut rng);

    let csv_path = "ambiente_calidad_aire.csv";
    write_csv(csv_path, &data)?;
    println!("Wrote {} measurements to {csv_path}", data.len());

    if parquet {
        let pq_path = "ambiente_calidad_aire.parquet";
        write_parquet(pq_path, &data)?;
        println!("Wrote {} measurements to {pq_path}", data.len());
    }
    Ok(())
}
