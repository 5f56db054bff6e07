//! Geographic bounding primitives
//!
//! Provides the bounding box type used to request coverage rasters,
//! including conversions to and from the comma-separated wire form the
//! WCS protocol expects (`"minX,minY,maxX,maxY"`).

use std::fmt;
use std::str::FromStr;

/// Errors that can occur when constructing or parsing a bounding box.
#[derive(Debug, Clone, PartialEq)]
pub enum CoordError {
    /// A bound was NaN or infinite.
    NonFiniteBound { name: &'static str, value: f64 },
    /// The wire form did not contain exactly four comma-separated numbers.
    MalformedBounds(String),
}

impl fmt::Display for CoordError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CoordError::NonFiniteBound { name, value } => {
                write!(f, "bound {} is not a finite number: {}", name, value)
            }
            CoordError::MalformedBounds(input) => {
                write!(
                    f,
                    "expected four comma-separated numbers, got '{}'",
                    input
                )
            }
        }
    }
}

impl std::error::Error for CoordError {}

/// An axis-aligned bounding box in the coverage service's coordinate
/// reference system.
///
/// Immutable once constructed; all four bounds are guaranteed finite.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    min_x: f64,
    min_y: f64,
    max_x: f64,
    max_y: f64,
}

impl BoundingBox {
    /// Creates a bounding box from its four bounds.
    ///
    /// # Errors
    ///
    /// Returns `CoordError::NonFiniteBound` if any bound is NaN or infinite.
    pub fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Result<Self, CoordError> {
        for (name, value) in [
            ("minX", min_x),
            ("minY", min_y),
            ("maxX", max_x),
            ("maxY", max_y),
        ] {
            if !value.is_finite() {
                return Err(CoordError::NonFiniteBound { name, value });
            }
        }

        Ok(Self {
            min_x,
            min_y,
            max_x,
            max_y,
        })
    }

    pub fn min_x(&self) -> f64 {
        self.min_x
    }

    pub fn min_y(&self) -> f64 {
        self.min_y
    }

    pub fn max_x(&self) -> f64 {
        self.max_x
    }

    pub fn max_y(&self) -> f64 {
        self.max_y
    }
}

impl fmt::Display for BoundingBox {
    /// Formats the box in the WCS wire form `minX,minY,maxX,maxY`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{},{},{},{}",
            self.min_x, self.min_y, self.max_x, self.max_y
        )
    }
}

impl FromStr for BoundingBox {
    type Err = CoordError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split(',').map(str::trim).collect();
        if parts.len() != 4 {
            return Err(CoordError::MalformedBounds(s.to_string()));
        }

        let mut bounds = [0.0f64; 4];
        for (i, part) in parts.iter().enumerate() {
            bounds[i] = part
                .parse::<f64>()
                .map_err(|_| CoordError::MalformedBounds(s.to_string()))?;
        }

        Self::new(bounds[0], bounds[1], bounds[2], bounds[3])
    }
}
