//! Modelo de estimación de precio de alquiler
//!
//! Regresión lineal (mínimos cuadrados) sobre (marca, kilometraje, antigüedad),
//! entrenada una sola vez con datos sintéticos y guardada en JSON.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;
use tracing::{info, warn};

/// Marcas conocidas por el modelo, en orden de índice
pub const SUPPORTED_BRANDS: [&str; 10] = [
    "Toyota",
    "Honda",
    "Ford",
    "Peugeot",
    "Renault",
    "BMW",
    "Mercedes",
    "Audi",
    "Volkswagen",
    "Nissan",
];

/// Año respecto al que se calcula la antigüedad
pub const REFERENCE_YEAR: i32 = 2026;
pub const MAX_MILEAGE: i64 = 300_000;
pub const MAX_AGE: i32 = 50;
pub const MIN_PRICE: f64 = 20.0;

/// El kilometraje entra al modelo en decenas de miles de km
const MILEAGE_SCALE: f64 = 10_000.0;

pub const FEATURES: [&str; 3] = ["brand_index", "mileage", "vehicle_age"];

#[derive(Debug, Error)]
pub enum PriceModelError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid model file: {0}")]
    Format(#[from] serde_json::Error),

    #[error("Training data does not determine a unique solution")]
    Singular,
}

/// Resultado de una predicción, con las entradas ya acotadas
#[derive(Debug, Clone, PartialEq)]
pub struct PriceEstimate {
    pub price: f64,
    pub brand_index: usize,
    pub mileage: i64,
    pub age: i32,
}

/// Coeficientes: [intercept, brand_index, mileage / 10 000, age]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceModel {
    coefficients: [f64; 4],
    trained_samples: usize,
}

/// Índice de la marca (sin distinguir mayúsculas); desconocida → 0
pub fn encode_brand(brand: &str) -> usize {
    let brand = brand.trim();
    SUPPORTED_BRANDS
        .iter()
        .position(|known| known.eq_ignore_ascii_case(brand))
        .unwrap_or(0)
}

/// Precio sintético usado para entrenar
fn synthetic_price(brand_index: usize, mileage: i64, age: i32) -> f64 {
    let price = 50.0 - mileage as f64 * 0.0001 - f64::from(age) * 2.0 + brand_index as f64 * 3.0;
    price.max(MIN_PRICE)
}

fn feature_row(brand_index: usize, mileage: i64, age: i32) -> [f64; 4] {
    [1.0, brand_index as f64, mileage as f64 / MILEAGE_SCALE, f64::from(age)]
}

impl PriceModel {
    /// Entrenar con la rejilla sintética: marcas × kilometraje × año
    pub fn train() -> Result<Self, PriceModelError> {
        let mut samples = Vec::new();
        for brand_index in 0..SUPPORTED_BRANDS.len() {
            for mileage in (10_000..200_000).step_by(20_000) {
                for year in 2015..2024 {
                    let age = REFERENCE_YEAR - year;
                    samples.push((
                        feature_row(brand_index, mileage, age),
                        synthetic_price(brand_index, mileage, age),
                    ));
                }
            }
        }

        // Ecuaciones normales: (XᵀX) β = Xᵀy
        let mut xtx = [[0.0_f64; 4]; 4];
        let mut xty = [0.0_f64; 4];
        for (row, target) in &samples {
            for i in 0..4 {
                xty[i] += row[i] * target;
                for j in 0..4 {
                    xtx[i][j] += row[i] * row[j];
                }
            }
        }

        let coefficients = solve(xtx, xty).ok_or(PriceModelError::Singular)?;
        info!(samples = samples.len(), ?coefficients, "📈 Modelo de precios entrenado");

        Ok(Self {
            coefficients,
            trained_samples: samples.len(),
        })
    }

    pub fn load(path: &Path) -> Result<Self, PriceModelError> {
        let raw = std::fs::read(path)?;
        Ok(serde_json::from_slice(&raw)?)
    }

    pub fn save(&self, path: &Path) -> Result<(), PriceModelError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, serde_json::to_vec_pretty(self)?)?;
        Ok(())
    }

    /// Cargar el modelo guardado o, si no existe, entrenarlo y guardarlo
    pub fn load_or_train(path: &Path) -> Result<Self, PriceModelError> {
        if path.exists() {
            match Self::load(path) {
                Ok(model) => {
                    info!("📦 Modelo de precios cargado desde {}", path.display());
                    return Ok(model);
                }
                Err(e) => warn!("Modelo ilegible en {} ({}), se vuelve a entrenar", path.display(), e),
            }
        }

        info!("Modelo no encontrado en {}, entrenando uno nuevo...", path.display());
        let model = Self::train()?;
        model.save(path)?;
        Ok(model)
    }

    pub fn predict(&self, brand: &str, mileage: i64, year: i32) -> PriceEstimate {
        let brand_index = encode_brand(brand);
        let mileage = mileage.clamp(0, MAX_MILEAGE);
        let age = REFERENCE_YEAR.saturating_sub(year).clamp(0, MAX_AGE);

        let row = feature_row(brand_index, mileage, age);
        let raw: f64 = row
            .iter()
            .zip(self.coefficients.iter())
            .map(|(x, beta)| x * beta)
            .sum();
        let price = (raw.max(MIN_PRICE) * 100.0).round() / 100.0;

        PriceEstimate {
            price,
            brand_index,
            mileage,
            age,
        }
    }

    pub fn coefficients(&self) -> &[f64; 4] {
        &self.coefficients
    }

    pub fn trained_samples(&self) -> usize {
        self.trained_samples
    }
}

/// Eliminación gaussiana con pivoteo parcial
fn solve(mut a: [[f64; 4]; 4], mut b: [f64; 4]) -> Option<[f64; 4]> {
    const N: usize = 4;

    for col in 0..N {
        let pivot = (col..N).max_by(|&i, &j| a[i][col].abs().total_cmp(&a[j][col].abs()))?;
        if a[pivot][col].abs() < 1e-12 {
            return None;
        }
        a.swap(col, pivot);
        b.swap(col, pivot);

        for row in (col + 1)..N {
            let factor = a[row][col] / a[col][col];
            for k in col..N {
                a[row][k] -= factor * a[col][k];
            }
            b[row] -= factor * b[col];
        }
    }

    let mut x = [0.0_f64; N];
    for row in (0..N).rev() {
        let tail: f64 = ((row + 1)..N).map(|k| a[row][k] * x[k]).sum();
        x[row] = (b[row] - tail) / a[row][row];
    }
    Some(x)
}
