use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{Date32Array, Int64Array};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use chrono::{Datelike, Duration, NaiveDate, Weekday};
use parquet::arrow::ArrowWriter;

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

/// Expected views on `day`: growth over the whole range, a yearly cycle
/// peaking in early spring, and quieter weekends.
fn expected_views(day: NaiveDate, progress: f64) -> f64 {
    let trend = 8_000.0 + 140_000.0 * progress.powf(1.3);
    let phase = (day.ordinal() as f64 - 60.0) / 365.25 * 2.0 * std::f64::consts::PI;
    let season = 1.0 + 0.15 * phase.cos();
    let weekday = match day.weekday() {
        Weekday::Sat | Weekday::Sun => 0.8,
        _ => 1.0,
    };
    trend * season * weekday
}

fn main() -> Result<()> {
    let output_path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("fcc-forum-pageviews.csv"));

    let mut rng = SimpleRng::new(42);

    let start = NaiveDate::from_ymd_opt(2016, 5, 9).context("start date")?;
    let end = NaiveDate::from_ymd_opt(2019, 12, 3).context("end date")?;
    let n_days = (end - start).num_days() + 1;

    let mut dates = Vec::with_capacity(n_days as usize);
    let mut values = Vec::with_capacity(n_days as usize);

    for i in 0..n_days {
        let day = start + Duration::days(i);
        let progress = i as f64 / (n_days - 1) as f64;
        let mut views = expected_views(day, progress) * rng.gauss(1.0, 0.08);

        // Rare traffic spikes and outages: what the percentile clipping removes.
        let roll = rng.next_f64();
        if roll < 0.01 {
            views *= 4.0 + rng.next_f64() * 4.0;
        } else if roll < 0.015 {
            views *= 0.1;
        }

        dates.push(day);
        values.push(views.max(0.0).round() as i64);
    }

    let is_parquet = output_path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("parquet"));

    if is_parquet {
        let epoch = NaiveDate::from_ymd_opt(1970, 1, 1).context("epoch")?;
        let schema = Arc::new(Schema::new(vec![
            Field::new("date", DataType::Date32, false),
            Field::new("value", DataType::Int64, false),
        ]));
        let batch = RecordBatch::try_new(
            schema.clone(),
            vec![
                Arc::new(Date32Array::from(
                    dates
                        .iter()
                        .map(|d| (*d - epoch).num_days() as i32)
                        .collect::<Vec<_>>(),
                )),
                Arc::new(Int64Array::from(values.clone())),
            ],
        )
        .context("building record batch")?;

        let file = std::fs::File::create(&output_path).context("creating output file")?;
        let mut writer = ArrowWriter::try_new(file, schema, None).context("creating writer")?;
        writer.write(&batch).context("writing batch")?;
        writer.close().context("closing writer")?;
    } else {
        let mut writer = csv::Writer::from_path(&output_path).context("creating output file")?;
        writer.write_record(["date", "value"])?;
        for (day, views) in dates.iter().zip(&values) {
            writer.write_record([day.format("%Y-%m-%d").to_string(), views.to_string()])?;
        }
        writer.flush()?;
    }

    println!(
        "Wrote {} daily page views ({start} .. {end}) to {}",
        values.len(),
        output_path.display()
    );
    Ok(())
}
