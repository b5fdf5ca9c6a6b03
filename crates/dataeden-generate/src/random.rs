use chrono::{Duration, Local, NaiveDate};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use dataeden_core::{ColumnDescriptor, TypeCategory, ValueGrid};

use crate::model::GenerationOutcome;

const INT_MAX_EXCLUSIVE: i64 = 10_000;
const FLOAT_MAX_EXCLUSIVE: f64 = 1_000.0;
const DATE_SPAN_DAYS: i64 = 365;
const DEFAULT_TEXT_LEN: usize = 20;
const MAX_TEXT_LEN: u32 = 1_000;
const DEFAULT_NUMERIC_DIGITS: u32 = 6;
/// Significant digits an exact decimal bind can carry.
const MAX_NUMERIC_DIGITS: u32 = 28;
const CHARSET: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Per-cell random values driven only by each column's category and size.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomEngine {
    seed: Option<u64>,
}

impl RandomEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Deterministic engine for reproducible grids.
    pub fn seeded(seed: u64) -> Self {
        Self { seed: Some(seed) }
    }

    pub fn generate(&self, rows: usize, columns: &[ColumnDescriptor]) -> GenerationOutcome {
        let mut rng = match self.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_rng(&mut rand::rng()),
        };
        let today = Local::now().date_naive();
        GenerationOutcome::new(generate_grid(&mut rng, today, rows, columns), Vec::new())
    }
}

/// Build `rows` rows for `columns` starting dates at `today`.
pub fn generate_grid<R: Rng + ?Sized>(
    rng: &mut R,
    today: NaiveDate,
    rows: usize,
    columns: &[ColumnDescriptor],
) -> ValueGrid {
    let rows = (0..rows)
        .map(|_| {
            columns
                .iter()
                .map(|column| random_value(rng, today, column))
                .collect()
        })
        .collect();
    ValueGrid::new(rows)
}

pub fn random_value<R: Rng + ?Sized>(
    rng: &mut R,
    today: NaiveDate,
    column: &ColumnDescriptor,
) -> String {
    match column.category() {
        TypeCategory::Integer => rng.random_range(0..INT_MAX_EXCLUSIVE).to_string(),
        TypeCategory::Float if column.is_exact_numeric() => {
            exact_numeric(rng, column.size(), column.scale())
        }
        TypeCategory::Float => rng.random_range(0.0..FLOAT_MAX_EXCLUSIVE).to_string(),
        TypeCategory::Date => {
            let offset = rng.random_range(0..DATE_SPAN_DAYS);
            (today + Duration::days(offset)).format("%Y-%m-%d").to_string()
        }
        TypeCategory::Boolean => rng.random_bool(0.5).to_string(),
        TypeCategory::String | TypeCategory::Binary | TypeCategory::Unknown => {
            let len = match column.size() {
                size if size > 0 && size < MAX_TEXT_LEN => size as usize,
                _ => DEFAULT_TEXT_LEN,
            };
            alphanumeric(rng, len)
        }
    }
}

/// A value that fits `NUMERIC(size, scale)`: the integer part keeps at least
/// one digit even when `scale >= size`.
fn exact_numeric<R: Rng + ?Sized>(rng: &mut R, size: u32, scale: u32) -> String {
    let scale = scale.min(MAX_NUMERIC_DIGITS - 1);
    let digits = if size == 0 {
        DEFAULT_NUMERIC_DIGITS
    } else {
        size.saturating_sub(scale).max(1)
    }
    .min(MAX_NUMERIC_DIGITS - scale);

    let integer = rng.random_range(0..10u128.pow(digits) - 1);
    if scale == 0 {
        return integer.to_string();
    }
    let fraction = rng.random_range(0..10u128.pow(scale));
    format!("{integer}.{fraction:0width$}", width = scale as usize)
}

fn alphanumeric<R: Rng + ?Sized>(rng: &mut R, len: usize) -> String {
    (0..len)
        .map(|_| char::from(CHARSET[rng.random_range(0..CHARSET.len())]))
        .collect()
}
