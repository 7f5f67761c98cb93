//! Car domain model.
//!
//! # Responsibility
//! - Define the persisted `Car` record and its not-yet-persisted `NewCar` form.
//! - Own the field constraints every stored car must satisfy.
//!
//! # Invariants
//! - `id` is assigned by storage and never reused within one database.
//! - Validation checks run in a fixed order so multi-violation input always
//!   reports the same field: make, model, year, price, color.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Storage-assigned identifier of a persisted car.
pub type CarId = i64;

pub const MAKE_MAX_CHARS: usize = 50;
pub const MODEL_MAX_CHARS: usize = 50;
pub const COLOR_MAX_CHARS: usize = 30;
pub const YEAR_MIN: i32 = 1900;
pub const YEAR_MAX: i32 = 2030;

/// Persisted car record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Car {
    /// Assigned on insert; immutable afterwards.
    pub id: CarId,
    pub make: String,
    pub model: String,
    pub year: i32,
    /// May be empty.
    pub color: String,
    pub price: f64,
}

/// Car input that has not been stored yet and therefore has no `id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewCar {
    pub make: String,
    pub model: String,
    pub year: i32,
    #[serde(default)]
    pub color: String,
    pub price: f64,
}

impl NewCar {
    pub fn new(
        make: impl Into<String>,
        model: impl Into<String>,
        year: i32,
        color: impl Into<String>,
        price: f64,
    ) -> Self {
        Self {
            make: make.into(),
            model: model.into(),
            year,
            color: color.into(),
            price,
        }
    }

    /// Validates all field constraints in deterministic check order.
    pub fn validate(&self) -> Result<(), CarValidationError> {
        validate_car_fields(&self.make, &self.model, self.year, &self.color, self.price)
    }

    /// Attaches a storage-assigned id.
    pub(crate) fn into_car(self, id: CarId) -> Car {
        Car {
            id,
            make: self.make,
            model: self.model,
            year: self.year,
            color: self.color,
            price: self.price,
        }
    }
}

impl Car {
    /// Validates all field constraints in deterministic check order.
    pub fn validate(&self) -> Result<(), CarValidationError> {
        validate_car_fields(&self.make, &self.model, self.year, &self.color, self.price)
    }
}

/// Field constraint violation. Each variant names exactly one field.
#[derive(Debug, Clone, PartialEq)]
pub enum CarValidationError {
    /// Text field contains a NUL character, which SQLite text functions
    /// treat as end of string.
    NulCharacter { field: &'static str },
    EmptyMake,
    MakeTooLong { len: usize },
    EmptyModel,
    ModelTooLong { len: usize },
    YearOutOfRange { year: i32 },
    NonFinitePrice,
    NegativePrice { price: f64 },
    ColorTooLong { len: usize },
}

impl CarValidationError {
    /// Name of the violated field (`make|model|year|price|color`).
    pub fn field(&self) -> &'static str {
        match self {
            Self::NulCharacter { field } => *field,
            Self::EmptyMake | Self::MakeTooLong { .. } => "make",
            Self::EmptyModel | Self::ModelTooLong { .. } => "model",
            Self::YearOutOfRange { .. } => "year",
            Self::NonFinitePrice | Self::NegativePrice { .. } => "price",
            Self::ColorTooLong { .. } => "color",
        }
    }
}

impl Display for CarValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NulCharacter { field } => write!(f, "{field} must not contain NUL characters"),
            Self::EmptyMake => write!(f, "make is required"),
            Self::MakeTooLong { len } => {
                write!(f, "make must be at most {MAKE_MAX_CHARS} characters, got {len}")
            }
            Self::EmptyModel => write!(f, "model is required"),
            Self::ModelTooLong { len } => {
                write!(f, "model must be at most {MODEL_MAX_CHARS} characters, got {len}")
            }
            Self::YearOutOfRange { year } => {
                write!(f, "year must be between {YEAR_MIN} and {YEAR_MAX}, got {year}")
            }
            Self::NonFinitePrice => write!(f, "price must be a finite number"),
            Self::NegativePrice { price } => write!(f, "price cannot be negative, got {price}"),
            Self::ColorTooLong { len } => {
                write!(f, "color must be at most {COLOR_MAX_CHARS} characters, got {len}")
            }
        }
    }
}

impl Error for CarValidationError {}

/// Checks every car field constraint and returns the first violation.
///
/// # Invariants
/// - Order: make -> model -> year -> price -> color.
/// - Whitespace-only `make`/`model` count as empty.
/// - Text containing `\0` is rejected so the schema CHECK constraints,
///   which stop reading at NUL, can never disagree with this function.
/// - Lengths are measured in characters, not bytes.
pub fn validate_car_fields(
    make: &str,
    model: &str,
    year: i32,
    color: &str,
    price: f64,
) -> Result<(), CarValidationError> {
    reject_nul("make", make)?;
    if make.trim().is_empty() {
        return Err(CarValidationError::EmptyMake);
    }
    let make_len = make.chars().count();
    if make_len > MAKE_MAX_CHARS {
        return Err(CarValidationError::MakeTooLong { len: make_len });
    }

    reject_nul("model", model)?;
    if model.trim().is_empty() {
        return Err(CarValidationError::EmptyModel);
    }
    let model_len = model.chars().count();
    if model_len > MODEL_MAX_CHARS {
        return Err(CarValidationError::ModelTooLong { len: model_len });
    }

    if !(YEAR_MIN..=YEAR_MAX).contains(&year) {
        return Err(CarValidationError::YearOutOfRange { year });
    }

    if !price.is_finite() {
        return Err(CarValidationError::NonFinitePrice);
    }
    if price < 0.0 {
        return Err(CarValidationError::NegativePrice { price });
    }

    reject_nul("color", color)?;
    let color_len = color.chars().count();
    if color_len > COLOR_MAX_CHARS {
        return Err(CarValidationError::ColorTooLong { len: color_len });
    }

    Ok(())
}

fn reject_nul(field: &'static str, value: &str) -> Result<(), CarValidationError> {
    if value.contains('\0') {
        return Err(CarValidationError::NulCharacter { field });
    }
    Ok(())
}
