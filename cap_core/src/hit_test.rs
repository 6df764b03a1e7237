//! Pointer hit-testing against the pile layout, and the small interaction
//! state (viewport + hovered pile) that pointer input drives.

use crate::geometry::{to_device, DevicePoint, ModelPoint};
use crate::pile::PileCoordinate;
use crate::viewport::{PointerEvent, Viewport};

/// Hit radius at zoom 1 (px)
pub const HIT_RADIUS_PX: f64 = 10.0;

pub fn hit_radius(viewport: &Viewport) -> f64 {
    HIT_RADIUS_PX * viewport.zoom
}

/// First pile, in list order, whose device position lies within the hit
/// radius of `pointer`. Pointers outside the canvas never hit.
pub fn find_hover<'a>(
    pointer: DevicePoint,
    piles: &'a [PileCoordinate],
    viewport: &Viewport,
) -> Option<&'a PileCoordinate> {
    if !viewport.canvas.contains(pointer) {
        return None;
    }
    let center = viewport.canvas.center();
    let radius = hit_radius(viewport);
    piles
        .iter()
        .find(|pile| to_device(ModelPoint::from(*pile), viewport, center).distance_to(pointer) <= radius)
}

/// Viewport plus the transient hover target, owned by the drawing surface.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Interaction {
    pub viewport: Viewport,
    /// Number of the hovered pile
    pub hovered: Option<u32>,
}

impl Interaction {
    pub fn new(viewport: Viewport) -> Self {
        Interaction { viewport, hovered: None }
    }

    /// Reframe after the pile list changed. A hover on a pile that no longer
    /// exists is dropped.
    pub fn sync_layout(&mut self, piles: &[PileCoordinate]) {
        self.viewport.frame(piles);
        if let Some(id) = self.hovered {
            if !piles.iter().any(|p| p.id == id) {
                self.hovered = None;
            }
        }
    }

    /// Apply one pointer event. Returns `true` when anything that affects the
    /// drawing changed.
    pub fn handle(&mut self, event: PointerEvent, piles: &[PileCoordinate]) -> bool {
        let before = *self;
        match event {
            PointerEvent::Moved(p) if !self.viewport.is_dragging() => {
                self.hovered = find_hover(p, piles, &self.viewport).map(|pile| pile.id);
            }
            PointerEvent::Left => {
                self.viewport = self.viewport.apply(event);
                self.hovered = None;
            }
            _ => self.viewport = self.viewport.apply(event),
        }
        *self != before
    }

    pub fn hovered_pile<'a>(&self, piles: &'a [PileCoordinate]) -> Option<&'a PileCoordinate> {
        let id = self.hovered?;
        piles.iter().find(|p| p.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::CanvasSize;

    fn viewport() -> Viewport {
        let mut vp = Viewport::new(CanvasSize::new(600.0, 500.0));
        vp.set_base_scale(10.0);
        vp
    }

    fn device_of(pile: &PileCoordinate, vp: &Viewport) -> DevicePoint {
        to_device(ModelPoint::from(pile), vp, vp.canvas.center())
    }

    #[test]
    fn test_pointer_on_pile_hits_it() {
        let vp = viewport().zoom_by(1.7, None);
        let piles = vec![
            PileCoordinate::new(1, -6.0, 2.0),
            PileCoordinate::new(2, 6.0, 2.0),
            PileCoordinate::new(3, 0.0, -8.0),
        ];
        for pile in &piles {
            let hit = find_hover(device_of(pile, &vp), &piles, &vp).unwrap();
            assert_eq!(hit.id, pile.id);
        }
    }

    #[test]
    fn test_far_pointer_misses() {
        let vp = viewport();
        let piles = vec![PileCoordinate::new(1, -6.0, 0.0), PileCoordinate::new(2, 6.0, 0.0)];
        // 60 px from either pile, radius is 10 px
        assert!(find_hover(DevicePoint::new(300.0, 250.0), &piles, &vp).is_none());
        assert!(find_hover(DevicePoint::new(300.0, 250.0), &[], &vp).is_none());
    }

    #[test]
    fn test_radius_scales_with_zoom() {
        let piles = vec![PileCoordinate::new(1, 0.0, 0.0)];
        let vp = viewport();
        let near = DevicePoint::new(315.0, 250.0);
        assert!(find_hover(near, &piles, &vp).is_none());
        let zoomed = vp.zoom_by(2.0, None);
        // pile stays at the canvas center; radius is now 20 px
        assert_eq!(find_hover(near, &piles, &zoomed).map(|p| p.id), Some(1));
    }

    #[test]
    fn test_first_pile_wins_on_overlap() {
        let vp = viewport();
        let piles = vec![PileCoordinate::new(7, 1.0, 1.0), PileCoordinate::new(8, 1.0, 1.0)];
        let p = device_of(&piles[0], &vp);
        assert_eq!(find_hover(p, &piles, &vp).unwrap().id, 7);
    }

    #[test]
    fn test_outside_canvas_never_hits() {
        let vp = viewport();
        // pile drawn just past the left edge
        let piles = vec![PileCoordinate::new(1, -30.5, 0.0)];
        let p = device_of(&piles[0], &vp);
        assert!(p.x < 0.0);
        assert!(find_hover(p, &piles, &vp).is_none());
    }

    #[test]
    fn test_interaction_hover_and_leave() {
        let piles = vec![PileCoordinate::new(1, 0.0, 0.0)];
        let mut ui = Interaction::new(viewport());
        assert!(ui.handle(PointerEvent::Moved(DevicePoint::new(302.0, 251.0)), &piles));
        assert_eq!(ui.hovered, Some(1));
        assert_eq!(ui.hovered_pile(&piles).unwrap().id, 1);
        assert!(!ui.handle(PointerEvent::Moved(DevicePoint::new(303.0, 251.0)), &piles));
        assert!(ui.handle(PointerEvent::Left, &piles));
        assert_eq!(ui.hovered, None);
    }

    #[test]
    fn test_interaction_drag_does_not_hit_test() {
        let piles = vec![PileCoordinate::new(1, 0.0, 0.0)];
        let mut ui = Interaction::new(viewport());
        ui.handle(PointerEvent::Pressed(DevicePoint::new(100.0, 100.0)), &piles);
        ui.handle(PointerEvent::Moved(DevicePoint::new(300.0, 250.0)), &piles);
        assert_eq!(ui.hovered, None);
        assert!((ui.viewport.offset.x - 20.0).abs() < 1e-12);
        ui.handle(PointerEvent::Released, &piles);
        assert!(!ui.viewport.is_dragging());
    }

    #[test]
    fn test_sync_layout_drops_missing_hover() {
        let mut ui = Interaction::new(viewport());
        ui.hovered = Some(5);
        ui.sync_layout(&[PileCoordinate::new(1, 0.0, 0.0)]);
        assert_eq!(ui.hovered, None);
        assert!((ui.viewport.base_scale - 25.0).abs() < 1e-12);
    }
}
