use serde::{Deserialize, Serialize};

/// Axis-aligned object box in image pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl BoundingBox {
    /// Create a new bounding box.
    pub fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    /// An all-zero box is the detector's occlusion marker.
    pub fn is_occluded(&self) -> bool {
        self.min_x == 0.0 && self.min_y == 0.0 && self.max_x == 0.0 && self.max_y == 0.0
    }

    /// Convert to center/extent form.
    pub fn to_center_extent(&self) -> CenterExtent {
        let width = self.max_x - self.min_x;
        let length = self.max_y - self.min_y;
        CenterExtent {
            x: self.min_x + width / 2.0,
            y: self.min_y + length / 2.0,
            width,
            length,
        }
    }
}

/// Box center with width (x extent) and length (y extent).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CenterExtent {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub length: f64,
}
