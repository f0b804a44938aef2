//! Detail records and their validated input

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Field validation errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Name cannot be empty")]
    EmptyName,

    #[error("Area is required")]
    EmptyArea,

    #[error("Area is not a number: {0}")]
    InvalidArea(String),

    #[error("Area must be between {min:.2} and {max:.2}, got {value}")]
    AreaOutOfRange { value: f64, min: f64, max: f64 },

    #[error("Area allows at most two decimal places: {0}")]
    AreaTooPrecise(String),

    #[error("Image path cannot be empty")]
    EmptyImagePath,

    #[error("Image path is not inside the data directory: {0}")]
    UnsafeImagePath(String),

    #[error("Unsupported image type: {0} (expected png, jpg or jpeg)")]
    UnsupportedImage(String),
}

/// Surface area of a part in square decimetres
///
/// Always finite with at most two decimal places. Areas built from input are
/// within [`Area::MIN`]..=[`Area::MAX`]; areas read back from older database
/// files may lie outside it.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Area(f64);

impl Area {
    /// Smallest accepted area
    pub const MIN: f64 = 0.0;
    /// Largest accepted area
    pub const MAX: f64 = 9999.0;

    /// Validate a numeric area
    ///
    /// # Errors
    /// Returns an error if the value is not finite, out of range, or has more
    /// than two decimal places
    pub fn new(value: f64) -> Result<Self, ValidationError> {
        if !value.is_finite() {
            return Err(ValidationError::InvalidArea(value.to_string()));
        }
        if !(Self::MIN..=Self::MAX).contains(&value) {
            return Err(ValidationError::AreaOutOfRange {
                value,
                min: Self::MIN,
                max: Self::MAX,
            });
        }
        if ((value * 100.0).round() / 100.0 - value).abs() > 1e-9 {
            return Err(ValidationError::AreaTooPrecise(value.to_string()));
        }
        // folds -0.0 into 0.0
        Ok(Self(value + 0.0))
    }

    /// Area of a stored row, rounded to two decimals without a range check
    ///
    /// Returns `None` for non-finite values.
    pub(crate) fn from_stored(value: f64) -> Option<Self> {
        value
            .is_finite()
            .then(|| Self((value * 100.0).round() / 100.0 + 0.0))
    }

    /// The area as a plain number
    #[must_use]
    pub fn value(self) -> f64 {
        self.0
    }
}

impl FromStr for Area {
    type Err = ValidationError;

    /// Parse user-entered text. Accepts `,` as the decimal separator.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let text = s.trim().replace(',', ".");
        if text.is_empty() {
            return Err(ValidationError::EmptyArea);
        }

        let digits = text.strip_prefix(['+', '-']).unwrap_or(&text);
        let mut parts = digits.splitn(2, '.');
        let whole = parts.next().unwrap_or_default();
        let fraction = parts.next();

        let is_digits = |p: &str| p.chars().all(|c| c.is_ascii_digit());
        let well_formed = is_digits(whole)
            && fraction.map_or(true, is_digits)
            && !(whole.is_empty() && fraction.map_or(true, str::is_empty));
        if !well_formed {
            return Err(ValidationError::InvalidArea(s.trim().to_string()));
        }
        if fraction.is_some_and(|f| f.len() > 2) {
            return Err(ValidationError::AreaTooPrecise(s.trim().to_string()));
        }

        let value: f64 = text
            .parse()
            .map_err(|_| ValidationError::InvalidArea(s.trim().to_string()))?;
        Self::new(value)
    }
}

impl TryFrom<f64> for Area {
    type Error = ValidationError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Area> for f64 {
    fn from(area: Area) -> Self {
        area.0
    }
}

impl fmt::Display for Area {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

/// A stored part
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Detail {
    /// Store-assigned identifier
    pub id: i64,
    /// Part name
    pub name: String,
    /// Free-form notes
    pub description: Option<String>,
    /// Surface area in dm²
    pub area: Area,
    /// Photo path relative to the data directory
    pub image_path: String,
}

/// Validated field values for creating or replacing a detail
#[derive(Debug, Clone, PartialEq)]
pub struct DetailInput {
    name: String,
    description: Option<String>,
    area: Area,
    image_path: String,
}

impl DetailInput {
    /// Validate raw field values
    ///
    /// Name and description are trimmed; an empty description becomes `None`.
    /// Backslashes in the image path are normalized to `/`.
    ///
    /// # Errors
    /// Returns an error if the name or image path is empty
    pub fn new(
        name: &str,
        description: Option<&str>,
        area: Area,
        image_path: &str,
    ) -> Result<Self, ValidationError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ValidationError::EmptyName);
        }

        let image_path = image_path.trim().replace('\\', "/");
        if image_path.is_empty() {
            return Err(ValidationError::EmptyImagePath);
        }

        let description = description
            .map(str::trim)
            .filter(|d| !d.is_empty())
            .map(String::from);

        Ok(Self {
            name: name.to_string(),
            description,
            area,
            image_path,
        })
    }

    /// Part name (trimmed, non-empty)
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Notes, if any
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Surface area
    #[must_use]
    pub fn area(&self) -> Area {
        self.area
    }

    /// Photo path relative to the data directory
    #[must_use]
    pub fn image_path(&self) -> &str {
        &self.image_path
    }

    /// Attach a store id
    #[must_use]
    pub fn into_detail(self, id: i64) -> Detail {
        Detail {
            id,
            name: self.name,
            description: self.description,
            area: self.area,
            image_path: self.image_path,
        }
    }
}
