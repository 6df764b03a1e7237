//! # Viewport
//!
//! Pan and zoom state of the pile drawing. Every transition is a pure
//! function `(event, viewport) -> viewport`, so the drawing surface only has
//! to translate its native input into a [`PointerEvent`].
//!
//! ```rust
//! use cap_core::viewport::{PointerEvent, Viewport, MAX_ZOOM};
//!
//! let mut vp = Viewport::with_base_scale(10.0);
//! for _ in 0..50 {
//!     vp = vp.apply(PointerEvent::ZoomIn);
//! }
//! assert_eq!(vp.zoom, MAX_ZOOM);
//! assert_eq!(vp.apply(PointerEvent::Reset).zoom, 1.0);
//! ```

use crate::geometry::{base_scale, CanvasSize, DevicePoint};
use crate::pile::PileCoordinate;

pub const MIN_ZOOM: f64 = 0.5;
pub const MAX_ZOOM: f64 = 5.0;
/// Wheel rotated away from the user
pub const WHEEL_ZOOM_OUT: f64 = 0.9;
/// Wheel rotated toward the user
pub const WHEEL_ZOOM_IN: f64 = 1.1;
/// Zoom In / Zoom Out buttons
pub const BUTTON_ZOOM_STEP: f64 = 1.2;

/// Pan translation added to the canvas center (px).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Offset {
    pub x: f64,
    pub y: f64,
}

/// Input understood by the viewport, independent of any UI toolkit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    /// Button pressed over the surface
    Pressed(DevicePoint),
    /// Pointer moved over the surface
    Moved(DevicePoint),
    /// Button released
    Released,
    /// Pointer left the surface
    Left,
    /// Wheel scrolled; positive `delta_y` zooms out
    Wheel { delta_y: f64, at: Option<DevicePoint> },
    ZoomIn,
    ZoomOut,
    Reset,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    /// Size of the surface this viewport draws into
    pub canvas: CanvasSize,
    pub offset: Offset,
    /// User zoom, always within `[MIN_ZOOM, MAX_ZOOM]`
    pub zoom: f64,
    /// Pixels per foot at zoom 1, derived from the layout extent
    pub base_scale: f64,
    drag_anchor: Option<DevicePoint>,
}

impl Default for Viewport {
    fn default() -> Self {
        Viewport::new(CanvasSize::default())
    }
}

impl Viewport {
    pub fn new(canvas: CanvasSize) -> Self {
        Viewport {
            canvas,
            offset: Offset::default(),
            zoom: 1.0,
            base_scale: 0.0,
            drag_anchor: None,
        }
    }

    pub fn with_base_scale(base_scale: f64) -> Self {
        let mut vp = Viewport::default();
        vp.set_base_scale(base_scale);
        vp
    }

    /// Pixels per foot at the current zoom.
    pub fn effective_scale(&self) -> f64 {
        self.base_scale * self.zoom
    }

    pub fn is_dragging(&self) -> bool {
        self.drag_anchor.is_some()
    }

    pub fn set_base_scale(&mut self, scale: f64) {
        self.base_scale = if scale.is_finite() && scale > 0.0 { scale } else { 0.0 };
    }

    /// Re-derive `base_scale` from the layout extent. Zoom and pan are kept.
    pub fn frame(&mut self, piles: &[PileCoordinate]) {
        self.set_base_scale(base_scale(self.canvas, piles));
    }

    pub fn apply(&self, event: PointerEvent) -> Viewport {
        match event {
            PointerEvent::Pressed(p) => self.begin_drag(p),
            PointerEvent::Moved(p) => self.continue_drag(p),
            PointerEvent::Released | PointerEvent::Left => self.end_drag(),
            PointerEvent::Wheel { delta_y, at } => {
                let factor = if delta_y > 0.0 { WHEEL_ZOOM_OUT } else { WHEEL_ZOOM_IN };
                self.zoom_by(factor, at)
            }
            PointerEvent::ZoomIn => self.zoom_by(BUTTON_ZOOM_STEP, None),
            PointerEvent::ZoomOut => self.zoom_by(1.0 / BUTTON_ZOOM_STEP, None),
            PointerEvent::Reset => self.reset(),
        }
    }

    pub fn begin_drag(&self, p: DevicePoint) -> Viewport {
        Viewport {
            drag_anchor: Some(p),
            ..*self
        }
    }

    /// Pan by the pointer delta divided by the effective scale.
    pub fn continue_drag(&self, p: DevicePoint) -> Viewport {
        let Some(anchor) = self.drag_anchor else {
            return *self;
        };
        let mut next = Viewport {
            drag_anchor: Some(p),
            ..*self
        };
        let scale = self.effective_scale();
        if scale > 0.0 {
            next.offset.x += (p.x - anchor.x) / scale;
            next.offset.y += (p.y - anchor.y) / scale;
        }
        next
    }

    pub fn end_drag(&self) -> Viewport {
        Viewport {
            drag_anchor: None,
            ..*self
        }
    }

    /// Multiply zoom by `factor`, clamped. With a pivot, the model point under
    /// the pivot stays under it.
    pub fn zoom_by(&self, factor: f64, pivot: Option<DevicePoint>) -> Viewport {
        if !factor.is_finite() || factor <= 0.0 {
            return *self;
        }
        let zoom = (self.zoom * factor).clamp(MIN_ZOOM, MAX_ZOOM);
        let mut next = Viewport { zoom, ..*self };
        if let Some(p) = pivot {
            if self.base_scale > 0.0 {
                let ratio = zoom / self.zoom;
                let c = self.canvas.center();
                next.offset.x = (p.x - c.x) - (p.x - c.x - self.offset.x) * ratio;
                next.offset.y = (p.y - c.y) - (p.y - c.y - self.offset.y) * ratio;
            }
        }
        next
    }

    pub fn reset(&self) -> Viewport {
        Viewport {
            zoom: 1.0,
            offset: Offset::default(),
            ..*self
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{to_device, to_model};

    #[test]
    fn test_zoom_clamp_for_any_sequence() {
        let factors = [1.1, 0.9, 1.2, 1.0 / 1.2, 7.0, 0.01, 1.1, 1.1, 0.3, 25.0];
        let mut vp = Viewport::with_base_scale(5.0);
        for round in 0..20 {
            for (i, f) in factors.iter().enumerate() {
                let pivot = if (round + i) % 2 == 0 { Some(DevicePoint::new(120.0, 80.0)) } else { None };
                vp = vp.zoom_by(*f, pivot);
                assert!(vp.zoom >= MIN_ZOOM && vp.zoom <= MAX_ZOOM);
                assert!(vp.offset.x.is_finite() && vp.offset.y.is_finite());
            }
        }
    }

    #[test]
    fn test_wheel_direction() {
        let vp = Viewport::with_base_scale(5.0);
        let out = vp.apply(PointerEvent::Wheel { delta_y: 120.0, at: None });
        assert!((out.zoom - 0.9).abs() < 1e-12);
        let zin = vp.apply(PointerEvent::Wheel { delta_y: -120.0, at: None });
        assert!((zin.zoom - 1.1).abs() < 1e-12);
    }

    #[test]
    fn test_drag_pans_by_scaled_delta() {
        let vp = Viewport::with_base_scale(10.0).zoom_by(2.0, None);
        let vp = vp.apply(PointerEvent::Pressed(DevicePoint::new(100.0, 100.0)));
        assert!(vp.is_dragging());
        assert_eq!(vp.offset, Offset::default());

        let vp = vp.apply(PointerEvent::Moved(DevicePoint::new(140.0, 80.0)));
        assert!((vp.offset.x - 2.0).abs() < 1e-12);
        assert!((vp.offset.y + 1.0).abs() < 1e-12);

        let vp = vp.apply(PointerEvent::Released);
        assert!(!vp.is_dragging());
        let still = vp.apply(PointerEvent::Moved(DevicePoint::new(500.0, 500.0)));
        assert_eq!(still.offset, vp.offset);
    }

    #[test]
    fn test_drag_without_scale_keeps_offset() {
        let vp = Viewport::default()
            .apply(PointerEvent::Pressed(DevicePoint::new(0.0, 0.0)))
            .apply(PointerEvent::Moved(DevicePoint::new(50.0, 50.0)));
        assert_eq!(vp.offset, Offset::default());
        assert!(vp.offset.x.is_finite());
    }

    #[test]
    fn test_leave_ends_drag() {
        let vp = Viewport::with_base_scale(3.0)
            .apply(PointerEvent::Pressed(DevicePoint::new(10.0, 10.0)))
            .apply(PointerEvent::Left);
        assert!(!vp.is_dragging());
    }

    #[test]
    fn test_pivot_zoom_keeps_point_fixed() {
        let vp = Viewport::with_base_scale(12.0);
        let center = vp.canvas.center();
        let pivot = DevicePoint::new(420.0, 130.0);
        let before = to_model(pivot, &vp, center).unwrap();
        let zoomed = vp.zoom_by(WHEEL_ZOOM_IN, Some(pivot));
        let after = to_device(before, &zoomed, center);
        assert!((after.x - pivot.x).abs() < 1e-9);
        assert!((after.y - pivot.y).abs() < 1e-9);
        assert!(zoomed.offset != Offset::default());
    }

    #[test]
    fn test_reset_and_reframe_keep_user_state_separate() {
        let piles = vec![PileCoordinate::new(1, -5.0, 0.0), PileCoordinate::new(2, 5.0, 0.0)];
        let mut vp = Viewport::default();
        vp.frame(&piles);
        assert!((vp.base_scale - 25.0).abs() < 1e-12);

        let mut vp = vp.zoom_by(2.0, None);
        vp.frame(&[PileCoordinate::new(1, 40.0, 0.0)]);
        assert_eq!(vp.zoom, 2.0);
        assert!((vp.base_scale - 500.0 / 90.0).abs() < 1e-12);

        let reset = vp.apply(PointerEvent::Reset);
        assert_eq!(reset.zoom, 1.0);
        assert_eq!(reset.offset, Offset::default());
        assert_eq!(reset.base_scale, vp.base_scale);
    }
}
