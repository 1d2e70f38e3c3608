use crate::{ModelError, WhiteboardElement};

use common::ErrorLocation;

use std::panic::Location;

/// Builder for creating validated WhiteboardElement instances.
///
/// Canvas producers hand over loosely-typed data; the builder is the one place
/// that rejects elements the worker could not place.
#[derive(Debug, Default)]
pub struct WhiteboardElementBuilder {
    id: Option<String>,
    kind: Option<String>,
    x: Option<f64>,
    y: Option<f64>,
    width: Option<f64>,
    height: Option<f64>,
    text: Option<String>,
    points: Option<Vec<[f64; 2]>>,
}

impl WhiteboardElementBuilder {
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = Some(kind.into());
        self
    }

    pub fn with_position(mut self, x: f64, y: f64) -> Self {
        self.x = Some(x);
        self.y = Some(y);
        self
    }

    pub fn with_size(mut self, width: f64, height: f64) -> Self {
        self.width = Some(width);
        self.height = Some(height);
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn with_points(mut self, points: Vec<[f64; 2]>) -> Self {
        self.points = Some(points);
        self
    }

    /// Build the WhiteboardElement with validation.
    #[track_caller]
    pub fn build(self) -> Result<WhiteboardElement, ModelError> {
        let id = self.id.ok_or_else(|| ModelError::Validation {
            message: String::from("Element id is required"),
            location: ErrorLocation::from(Location::caller()),
        })?;

        if id.is_empty() {
            return Err(ModelError::Validation {
                message: String::from("Element id cannot be empty"),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        let kind = self.kind.ok_or_else(|| ModelError::Validation {
            message: String::from("Element type is required"),
            location: ErrorLocation::from(Location::caller()),
        })?;

        if kind.is_empty() {
            return Err(ModelError::Validation {
                message: String::from("Element type cannot be empty"),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        let (x, y) = match (self.x, self.y) {
            (Some(x), Some(y)) => (x, y),
            _ => {
                return Err(ModelError::Validation {
                    message: String::from("Element position is required"),
                    location: ErrorLocation::from(Location::caller()),
                });
            }
        };

        if !x.is_finite() || !y.is_finite() {
            return Err(ModelError::Validation {
                message: format!("Element position must be finite, got ({x}, {y})"),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        if let (Some(width), Some(height)) = (self.width, self.height) {
            if width < 0.0 || height < 0.0 {
                return Err(ModelError::Validation {
                    message: format!("Element size cannot be negative, got {width}x{height}"),
                    location: ErrorLocation::from(Location::caller()),
                });
            }
        }

        Ok(WhiteboardElement {
            id,
            kind,
            x,
            y,
            width: self.width,
            height: self.height,
            text: self.text,
            points: self.points,
        })
    }
}
