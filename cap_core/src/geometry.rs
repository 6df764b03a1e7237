//! # Geometry
//!
//! Mapping between model space (feet, Y pointing north) and device space
//! (pixels, Y pointing down). Everything here is a pure function of its
//! arguments.
//!
//! ```rust
//! use cap_core::geometry::{to_device, to_model, CanvasSize, ModelPoint};
//! use cap_core::viewport::Viewport;
//!
//! let canvas = CanvasSize::new(600.0, 500.0);
//! let viewport = Viewport::with_base_scale(10.0);
//!
//! let p = ModelPoint::new(2.0, 3.0);
//! let d = to_device(p, &viewport, canvas.center());
//! assert_eq!((d.x, d.y), (320.0, 220.0));
//! assert_eq!(to_model(d, &viewport, canvas.center()), Some(p));
//! ```

use crate::pile::PileCoordinate;
use crate::viewport::Viewport;

/// Margin added around the outermost pile when framing the drawing (ft)
pub const EXTENT_MARGIN_FT: f64 = 5.0;
/// Smallest half-extent the drawing is framed to (ft)
pub const MIN_EXTENT_FT: f64 = 10.0;

/// A point in plan, in feet.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ModelPoint {
    pub x: f64,
    pub y: f64,
}

impl ModelPoint {
    pub fn new(x: f64, y: f64) -> Self {
        ModelPoint { x, y }
    }
}

impl From<&PileCoordinate> for ModelPoint {
    fn from(pile: &PileCoordinate) -> Self {
        ModelPoint::new(pile.x, pile.y)
    }
}

/// A point on the drawing surface, in pixels from the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DevicePoint {
    pub x: f64,
    pub y: f64,
}

impl DevicePoint {
    pub fn new(x: f64, y: f64) -> Self {
        DevicePoint { x, y }
    }

    pub fn distance_to(&self, other: DevicePoint) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// Fixed pixel size of the drawing surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CanvasSize {
    pub width: f64,
    pub height: f64,
}

impl CanvasSize {
    pub fn new(width: f64, height: f64) -> Self {
        CanvasSize { width, height }
    }

    pub fn center(&self) -> DevicePoint {
        DevicePoint::new(self.width / 2.0, self.height / 2.0)
    }

    pub fn contains(&self, p: DevicePoint) -> bool {
        p.x >= 0.0 && p.y >= 0.0 && p.x <= self.width && p.y <= self.height
    }
}

impl Default for CanvasSize {
    fn default() -> Self {
        CanvasSize::new(600.0, 500.0)
    }
}

/// Half-size of the model area to frame: largest absolute pile coordinate
/// plus the margin, never below [`MIN_EXTENT_FT`].
pub fn max_extent(piles: &[PileCoordinate]) -> f64 {
    let largest = piles
        .iter()
        .map(|p| p.x.abs().max(p.y.abs()))
        .fold(0.0, f64::max);
    if piles.is_empty() {
        MIN_EXTENT_FT
    } else {
        (largest + EXTENT_MARGIN_FT).max(MIN_EXTENT_FT)
    }
}

/// Pixels per foot at zoom 1. Zero when there is nothing to frame.
pub fn base_scale(canvas: CanvasSize, piles: &[PileCoordinate]) -> f64 {
    if piles.is_empty() {
        return 0.0;
    }
    canvas.width.min(canvas.height) / (2.0 * max_extent(piles))
}

/// Model → device.
pub fn to_device(p: ModelPoint, viewport: &Viewport, center: DevicePoint) -> DevicePoint {
    let scale = viewport.effective_scale();
    DevicePoint::new(
        center.x + viewport.offset.x + p.x * scale,
        center.y + viewport.offset.y - p.y * scale,
    )
}

/// Device → model. `None` while the viewport has no scale yet.
pub fn to_model(d: DevicePoint, viewport: &Viewport, center: DevicePoint) -> Option<ModelPoint> {
    let scale = viewport.effective_scale();
    if scale <= 0.0 || !scale.is_finite() {
        return None;
    }
    Some(ModelPoint::new(
        (d.x - center.x - viewport.offset.x) / scale,
        -(d.y - center.y - viewport.offset.y) / scale,
    ))
}

/// Length in model feet → length in device pixels.
pub fn scale_length(feet: f64, viewport: &Viewport) -> f64 {
    feet * viewport.effective_scale()
}
