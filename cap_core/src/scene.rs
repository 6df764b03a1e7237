//! # Scene Description
//!
//! Builds a flat, ordered list of drawing primitives for the pile plan from
//! the pile list, column, overhang, hover target and viewport. The result is
//! a pure value: the same input always yields the same [`Scene`], and the
//! renderer only has to paint items in order.
//!
//! Layers, back to front: background, grid, axes, footing, column with
//! cross-hatch, piles (shadow, body, number, force badge), hover info panel,
//! instructions.
//!
//! ```rust
//! use cap_core::layout::ColumnGeometry;
//! use cap_core::pile::PileCoordinate;
//! use cap_core::scene::{build_scene, SceneInput, SceneItem};
//! use cap_core::viewport::Viewport;
//!
//! let piles = vec![PileCoordinate::new(1, -3.0, 0.0), PileCoordinate::new(2, 3.0, 0.0)];
//! let mut viewport = Viewport::default();
//! viewport.frame(&piles);
//!
//! let scene = build_scene(&SceneInput {
//!     piles: &piles,
//!     column: ColumnGeometry { width: 2.0, depth: 2.0 },
//!     overhang: 1.5,
//!     hovered: None,
//!     viewport: &viewport,
//!     show_forces: false,
//! });
//! let circles = scene.items.iter().filter(|i| matches!(i, SceneItem::Circle { .. })).count();
//! assert_eq!(circles, 2);
//! ```

use crate::geometry::{max_extent, to_device, CanvasSize, DevicePoint, ModelPoint};
use crate::layout::ColumnGeometry;
use crate::pile::{footing_extent, ForceComponents, PileCoordinate};
use crate::viewport::Viewport;

/// Grid pitch in model feet
pub const GRID_STEP_FT: f64 = 5.0;
/// Pile circle radius at zoom 1 (px)
pub const PILE_RADIUS_PX: f64 = 12.0;
/// Column hatch pitch at zoom 1 (px)
pub const HATCH_PITCH_PX: f64 = 8.0;
/// Overdraw kept around the canvas when clipping shapes (px)
pub const CLIP_MARGIN_PX: f64 = 4.0;
/// Piles above this Pmax (kips) are drawn as highly loaded
pub const HIGH_COMPRESSION_KIPS: f64 = 100.0;

pub const INFO_PANEL_WIDTH: f64 = 280.0;
pub const INFO_LINE_HEIGHT: f64 = 18.0;
pub const INSTRUCTIONS: &str = "Scroll to zoom, drag to pan";

/// RGBA color, channels in `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const WHITE: Color = Color::rgb8(0xff, 0xff, 0xff);

    pub const fn rgb8(r: u8, g: u8, b: u8) -> Self {
        Color::rgba8(r, g, b, 1.0)
    }

    pub const fn rgba8(r: u8, g: u8, b: u8, a: f32) -> Self {
        Color {
            r: r as f32 / 255.0,
            g: g as f32 / 255.0,
            b: b as f32 / 255.0,
            a,
        }
    }
}

pub mod palette {
    use super::Color;

    pub const BACKGROUND: Color = Color::rgb8(0xf9, 0xf9, 0xf9);
    pub const GRID: Color = Color::rgb8(0xdd, 0xdd, 0xdd);
    pub const AXIS: Color = Color::rgb8(0xaa, 0xaa, 0xaa);
    pub const FOOTING_FROM: Color = Color::rgb8(0xe0, 0xe0, 0xe0);
    pub const FOOTING_TO: Color = Color::rgb8(0xf8, 0xf8, 0xf8);
    pub const FOOTING_EDGE: Color = Color::rgb8(0x66, 0x66, 0x66);
    pub const COLUMN_FILL: Color = Color::rgb8(0xb3, 0xb3, 0xb3);
    pub const COLUMN_EDGE: Color = Color::rgb8(0x33, 0x33, 0x33);
    pub const HATCH: Color = Color::rgb8(0x77, 0x77, 0x77);
    pub const PILE_EDGE: Color = Color::rgb8(0x33, 0x33, 0x33);
    pub const SHADOW: Color = Color::rgba8(0, 0, 0, 0.3);
    pub const BADGE: Color = Color::rgba8(0, 0, 0, 0.7);
    pub const PANEL: Color = Color::rgba8(0, 0, 0, 0.8);
    pub const PANEL_EDGE: Color = Color::rgb8(0x55, 0x55, 0x55);
    pub const LABEL: Color = Color::rgb8(0x33, 0x33, 0x33);
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Paint {
    Solid(Color),
    /// Two-stop gradient between device points
    LinearGradient {
        start: DevicePoint,
        end: DevicePoint,
        from: Color,
        to: Color,
    },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrokeStyle {
    pub color: Color,
    pub width: f64,
}

impl StrokeStyle {
    pub const fn new(color: Color, width: f64) -> Self {
        StrokeStyle { color, width }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HAlign {
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VAlign {
    Top,
    Center,
}

/// One drawing primitive, in device pixels.
#[derive(Debug, Clone, PartialEq)]
pub enum SceneItem {
    Line {
        from: DevicePoint,
        to: DevicePoint,
        stroke: StrokeStyle,
    },
    Rect {
        /// Top-left corner
        origin: DevicePoint,
        width: f64,
        height: f64,
        fill: Option<Paint>,
        stroke: Option<StrokeStyle>,
    },
    Circle {
        center: DevicePoint,
        radius: f64,
        fill: Option<Paint>,
        stroke: Option<StrokeStyle>,
    },
    Text {
        content: String,
        position: DevicePoint,
        size: f64,
        color: Color,
        bold: bool,
        align_x: HAlign,
        align_y: VAlign,
    },
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Scene {
    pub items: Vec<SceneItem>,
}

impl Scene {
    fn push(&mut self, item: SceneItem) {
        self.items.push(item);
    }

    fn text(&mut self, content: impl Into<String>, position: DevicePoint, size: f64, color: Color, bold: bool, align_x: HAlign, align_y: VAlign) {
        self.push(SceneItem::Text {
            content: content.into(),
            position,
            size,
            color,
            bold,
            align_x,
            align_y,
        });
    }

    /// Text content of every text item, in paint order.
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.items.iter().filter_map(|item| match item {
            SceneItem::Text { content, .. } => Some(content.as_str()),
            _ => None,
        })
    }
}

/// Everything the scene depends on.
#[derive(Debug, Clone, Copy)]
pub struct SceneInput<'a> {
    pub piles: &'a [PileCoordinate],
    pub column: ColumnGeometry,
    pub overhang: f64,
    /// Number of the hovered pile
    pub hovered: Option<u32>,
    pub viewport: &'a Viewport,
    pub show_forces: bool,
}

/// Fill category of a pile circle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PileStyle {
    Default,
    HighCompression,
    Tension,
    Hovered,
}

impl PileStyle {
    /// Gradient stops `(from, to)`.
    pub fn colors(self) -> (Color, Color) {
        match self {
            PileStyle::Default => (Color::rgb8(0x3a, 0x71, 0xa9), Color::rgb8(0x26, 0x54, 0x78)),
            PileStyle::HighCompression => (Color::rgb8(0xd9, 0x55, 0x55), Color::rgb8(0xaa, 0x39, 0x39)),
            PileStyle::Tension => (Color::rgb8(0x55, 0x55, 0xd9), Color::rgb8(0x39, 0x39, 0xaa)),
            PileStyle::Hovered => (Color::rgb8(0x5a, 0x9b, 0xd5), Color::rgb8(0x3a, 0x71, 0xa9)),
        }
    }
}

/// Hover wins, then high compression, then tension.
pub fn pile_style(pile: &PileCoordinate, hovered: bool, show_forces: bool) -> PileStyle {
    if hovered {
        return PileStyle::Hovered;
    }
    match (&pile.forces, show_forces) {
        (Some(f), true) if f.pmax > HIGH_COMPRESSION_KIPS => PileStyle::HighCompression,
        (Some(f), true) if f.pmin < 0.0 => PileStyle::Tension,
        _ => PileStyle::Default,
    }
}

/// Entry of the static drawing legend.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LegendEntry {
    pub label: &'static str,
    pub swatch: Color,
    pub border: Color,
}

pub const LEGEND: [LegendEntry; 5] = [
    LegendEntry {
        label: "Column (with hatching)",
        swatch: palette::COLUMN_FILL,
        border: palette::COLUMN_EDGE,
    },
    LegendEntry {
        label: "Pile (normal load)",
        swatch: Color::rgb8(0x3a, 0x71, 0xa9),
        border: palette::PILE_EDGE,
    },
    LegendEntry {
        label: "Pile (Pmax > 100 kips)",
        swatch: Color::rgb8(0xd9, 0x55, 0x55),
        border: palette::PILE_EDGE,
    },
    LegendEntry {
        label: "Pile (Pmin < 0 kips)",
        swatch: Color::rgb8(0x55, 0x55, 0xd9),
        border: palette::PILE_EDGE,
    },
    LegendEntry {
        label: "Pile Cap boundary",
        swatch: palette::FOOTING_FROM,
        border: palette::FOOTING_EDGE,
    },
];

/// `"Pmax = 80.00 - 15.00 + 30.00 = 95.00 k"`
pub fn force_breakdown(label: &str, c: &ForceComponents) -> String {
    let sign = |v: f64| if v >= 0.0 { '+' } else { '-' };
    format!(
        "{} = {:.2} {} {:.2} {} {:.2} = {:.2} k",
        label,
        c.axial,
        sign(c.moment_x),
        c.moment_x.abs(),
        sign(c.moment_y),
        c.moment_y.abs(),
        c.total()
    )
}

/// Lines of the hover info panel.
pub fn info_lines(pile: &PileCoordinate) -> Vec<String> {
    let mut lines = vec![
        format!("Pile #{} Details", pile.id),
        format!("X: {}' Y: {}'", pile.x, pile.y),
    ];
    if let Some(forces) = &pile.forces {
        if let Some(c) = &forces.pmax_components {
            lines.push(force_breakdown("Pmax", c));
        }
        if let Some(c) = &forces.pmin_components {
            lines.push(force_breakdown("Pmin", c));
        }
    }
    lines
}

pub fn build_scene(input: &SceneInput<'_>) -> Scene {
    let vp = input.viewport;
    let canvas = vp.canvas;
    let mut scene = Scene::default();

    scene.push(SceneItem::Rect {
        origin: DevicePoint::new(0.0, 0.0),
        width: canvas.width,
        height: canvas.height,
        fill: Some(Paint::Solid(palette::BACKGROUND)),
        stroke: None,
    });

    if !input.piles.is_empty() && vp.effective_scale() > 0.0 {
        draw_grid(&mut scene, input);
        draw_footing(&mut scene, input);
        draw_column(&mut scene, input);
        draw_piles(&mut scene, input);

        let hovered = input.hovered.and_then(|id| input.piles.iter().find(|p| p.id == id));
        if let Some(pile) = hovered {
            draw_info_panel(&mut scene, input, pile);
        }
    }

    scene.text(
        INSTRUCTIONS,
        DevicePoint::new(canvas.width - 10.0, 10.0),
        14.0,
        palette::LABEL,
        false,
        HAlign::Right,
        VAlign::Top,
    );

    scene
}

fn draw_grid(scene: &mut Scene, input: &SceneInput<'_>) {
    let vp = input.viewport;
    let canvas = vp.canvas;
    let center = canvas.center();
    let extent = max_extent(input.piles);
    let grid = StrokeStyle::new(palette::GRID, 0.5);

    let first = (-extent / GRID_STEP_FT).ceil() as i64;
    let last = (extent / GRID_STEP_FT).floor() as i64;
    for k in first..=last {
        let v = k as f64 * GRID_STEP_FT;
        let d = to_device(ModelPoint::new(v, v), vp, center);
        scene.push(SceneItem::Line {
            from: DevicePoint::new(0.0, d.y),
            to: DevicePoint::new(canvas.width, d.y),
            stroke: grid,
        });
        scene.push(SceneItem::Line {
            from: DevicePoint::new(d.x, 0.0),
            to: DevicePoint::new(d.x, canvas.height),
            stroke: grid,
        });
    }

    let origin = to_device(ModelPoint::default(), vp, center);
    let axis = StrokeStyle::new(palette::AXIS, 1.0);
    scene.push(SceneItem::Line {
        from: DevicePoint::new(0.0, origin.y),
        to: DevicePoint::new(canvas.width, origin.y),
        stroke: axis,
    });
    scene.push(SceneItem::Line {
        from: DevicePoint::new(origin.x, 0.0),
        to: DevicePoint::new(origin.x, canvas.height),
        stroke: axis,
    });
}

fn draw_footing(scene: &mut Scene, input: &SceneInput<'_>) {
    let Some(extent) = footing_extent(input.piles, input.overhang) else {
        return;
    };
    let vp = input.viewport;
    let center = vp.canvas.center();
    let corner_a = to_device(ModelPoint::new(extent.min_x, extent.max_y), vp, center);
    let corner_b = to_device(ModelPoint::new(extent.max_x, extent.min_y), vp, center);
    let Some((top_left, bottom_right)) = visible_rect(corner_a, corner_b, vp.canvas) else {
        return;
    };

    scene.push(SceneItem::Rect {
        origin: top_left,
        width: bottom_right.x - top_left.x,
        height: bottom_right.y - top_left.y,
        fill: Some(Paint::LinearGradient {
            start: corner_a,
            end: corner_b,
            from: palette::FOOTING_FROM,
            to: palette::FOOTING_TO,
        }),
        stroke: Some(StrokeStyle::new(palette::FOOTING_EDGE, 2.0)),
    });
}

fn draw_column(scene: &mut Scene, input: &SceneInput<'_>) {
    let vp = input.viewport;
    let center = vp.canvas.center();
    let col = input.column;
    let corner_a = to_device(ModelPoint::new(-col.width / 2.0, col.depth / 2.0), vp, center);
    let corner_b = to_device(ModelPoint::new(col.width / 2.0, -col.depth / 2.0), vp, center);
    let Some((top_left, bottom_right)) = visible_rect(corner_a, corner_b, vp.canvas) else {
        return;
    };
    let (width, height) = (bottom_right.x - top_left.x, bottom_right.y - top_left.y);

    scene.push(SceneItem::Rect {
        origin: top_left,
        width,
        height,
        fill: Some(Paint::Solid(palette::COLUMN_FILL)),
        stroke: None,
    });

    let hatch = StrokeStyle::new(palette::HATCH, 0.5);
    for (from, to) in hatch_segments(corner_a, corner_b, HATCH_PITCH_PX * vp.zoom, vp.canvas) {
        scene.push(SceneItem::Line { from, to, stroke: hatch });
    }

    scene.push(SceneItem::Rect {
        origin: top_left,
        width,
        height,
        fill: None,
        stroke: Some(StrokeStyle::new(palette::COLUMN_EDGE, 2.0)),
    });
}

/// Part of a rectangle that can show on the canvas, widened by
/// [`CLIP_MARGIN_PX`] so edges just outside stay off screen. `None` when
/// nothing shows or a corner is not finite.
fn visible_rect(top_left: DevicePoint, bottom_right: DevicePoint, canvas: CanvasSize) -> Option<(DevicePoint, DevicePoint)> {
    let corners = [top_left.x, top_left.y, bottom_right.x, bottom_right.y];
    if !corners.iter().all(|v| v.is_finite()) {
        return None;
    }
    let left = top_left.x.max(-CLIP_MARGIN_PX);
    let top = top_left.y.max(-CLIP_MARGIN_PX);
    let right = bottom_right.x.min(canvas.width + CLIP_MARGIN_PX);
    let bottom = bottom_right.y.min(canvas.height + CLIP_MARGIN_PX);
    (right > left && bottom > top).then(|| (DevicePoint::new(left, top), DevicePoint::new(right, bottom)))
}

/// First hatch line at or after `from` on the lattice `anchor + n * pitch`.
fn first_line(anchor: f64, from: f64, pitch: f64) -> f64 {
    let phase = (from - anchor).rem_euclid(pitch);
    if phase == 0.0 {
        from
    } else {
        from + pitch - phase
    }
}

/// Both diagonal families of a cross-hatch over a rectangle, clipped to the
/// rectangle and to the canvas. The lattice stays anchored on the
/// rectangle's corner, so panning does not shift the pattern.
pub fn hatch_segments(
    top_left: DevicePoint,
    bottom_right: DevicePoint,
    pitch: f64,
    canvas: CanvasSize,
) -> Vec<(DevicePoint, DevicePoint)> {
    let mut segments = Vec::new();
    if !(pitch.is_finite() && pitch > 0.0) {
        return segments;
    }
    let Some((visible_tl, visible_br)) = visible_rect(top_left, bottom_right, canvas) else {
        return segments;
    };
    let (left, top, right, bottom) = (visible_tl.x, visible_tl.y, visible_br.x, visible_br.y);

    // x - y = k, running down and to the right
    let mut k = first_line(top_left.x - bottom_right.y, left - bottom, pitch);
    while k <= right - top {
        let lo = top.max(left - k);
        let hi = bottom.min(right - k);
        if hi > lo {
            segments.push((DevicePoint::new(lo + k, lo), DevicePoint::new(hi + k, hi)));
        }
        k += pitch;
    }

    // x + y = k, running down and to the left
    let mut k = first_line(top_left.x + top_left.y, left + top, pitch);
    while k <= right + bottom {
        let lo = top.max(k - right);
        let hi = bottom.min(k - left);
        if hi > lo {
            segments.push((DevicePoint::new(k - lo, lo), DevicePoint::new(k - hi, hi)));
        }
        k += pitch;
    }

    segments
}

fn draw_piles(scene: &mut Scene, input: &SceneInput<'_>) {
    let vp = input.viewport;
    let center = vp.canvas.center();
    let radius = PILE_RADIUS_PX * vp.zoom;

    for pile in input.piles {
        let at = to_device(ModelPoint::from(pile), vp, center);
        let hovered = input.hovered == Some(pile.id);

        if hovered {
            scene.push(SceneItem::Circle {
                center: DevicePoint::new(at.x + 2.0, at.y + 2.0),
                radius: radius + 2.0,
                fill: Some(Paint::Solid(palette::SHADOW)),
                stroke: None,
            });
        }

        let (from, to) = pile_style(pile, hovered, input.show_forces).colors();
        let outline = if hovered {
            StrokeStyle::new(Color::WHITE, 3.0)
        } else {
            StrokeStyle::new(palette::PILE_EDGE, 2.0)
        };
        scene.push(SceneItem::Circle {
            center: at,
            radius,
            fill: Some(Paint::LinearGradient {
                start: DevicePoint::new(at.x - radius, at.y - radius),
                end: DevicePoint::new(at.x + radius, at.y + radius),
                from,
                to,
            }),
            stroke: Some(outline),
        });

        scene.text(
            pile.id.to_string(),
            at,
            (12.0 * vp.zoom).max(10.0),
            Color::WHITE,
            hovered,
            HAlign::Center,
            VAlign::Center,
        );

        if let (true, Some(pmax)) = (input.show_forces, pile.pmax()) {
            scene.push(SceneItem::Rect {
                origin: DevicePoint::new(at.x - radius, at.y - radius - 20.0),
                width: 2.0 * radius,
                height: 16.0,
                fill: Some(Paint::Solid(palette::BADGE)),
                stroke: None,
            });
            scene.text(
                format!("{}k", pmax.round() as i64),
                DevicePoint::new(at.x, at.y - radius - 12.0),
                (9.0 * vp.zoom).max(8.0),
                Color::WHITE,
                false,
                HAlign::Center,
                VAlign::Center,
            );
        }
    }
}

fn draw_info_panel(scene: &mut Scene, input: &SceneInput<'_>, pile: &PileCoordinate) {
    let height_px = input.viewport.canvas.height;
    let lines = info_lines(pile);
    let box_height = lines.len() as f64 * INFO_LINE_HEIGHT + 16.0;

    scene.push(SceneItem::Rect {
        origin: DevicePoint::new(10.0, height_px - box_height - 10.0),
        width: INFO_PANEL_WIDTH,
        height: box_height,
        fill: Some(Paint::Solid(palette::PANEL)),
        stroke: Some(StrokeStyle::new(palette::PANEL_EDGE, 2.0)),
    });

    let top = height_px - box_height + 5.0;
    for (i, line) in lines.into_iter().enumerate() {
        let (size, bold) = if i == 0 { (14.0, true) } else { (12.0, false) };
        scene.text(
            line,
            DevicePoint::new(20.0, top + i as f64 * INFO_LINE_HEIGHT),
            size,
            Color::WHITE,
            bold,
            HAlign::Left,
            VAlign::Top,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pile::PileForces;

    fn forces(pmax: f64, pmin: f64) -> PileForces {
        PileForces {
            pmax,
            pmin,
            ..PileForces::default()
        }
    }

    fn framed(piles: &[PileCoordinate]) -> Viewport {
        let mut vp = Viewport::default();
        vp.frame(piles);
        vp
    }

    fn input<'a>(piles: &'a [PileCoordinate], vp: &'a Viewport) -> SceneInput<'a> {
        SceneInput {
            piles,
            column: ColumnGeometry::default(),
            overhang: 1.625,
            hovered: None,
            viewport: vp,
            show_forces: true,
        }
    }

    #[test]
    fn test_breakdown_signs() {
        let c = ForceComponents {
            axial: 80.0,
            moment_x: -15.0,
            moment_y: 30.0,
        };
        assert_eq!(force_breakdown("Pmax", &c), "Pmax = 80.00 - 15.00 + 30.00 = 95.00 k");
    }

    #[test]
    fn test_info_lines_without_components() {
        let pile = PileCoordinate::new(3, -13.125, 4.0).with_forces(forces(50.0, 10.0));
        assert_eq!(info_lines(&pile), vec!["Pile #3 Details".to_string(), "X: -13.125' Y: 4'".to_string()]);
    }

    #[test]
    fn test_pile_style_order() {
        let both = PileCoordinate::new(1, 0.0, 0.0).with_forces(forces(120.0, -5.0));
        assert_eq!(pile_style(&both, false, true), PileStyle::HighCompression);
        assert_eq!(pile_style(&both, true, true), PileStyle::Hovered);
        assert_eq!(pile_style(&both, false, false), PileStyle::Default);

        let tension = PileCoordinate::new(2, 0.0, 0.0).with_forces(forces(100.0, -0.1));
        assert_eq!(pile_style(&tension, false, true), PileStyle::Tension);

        let bare = PileCoordinate::new(3, 0.0, 0.0);
        assert_eq!(pile_style(&bare, false, true), PileStyle::Default);
    }

    #[test]
    fn test_hatch_stays_inside_rect() {
        let canvas = CanvasSize::new(600.0, 500.0);
        let cases = [
            (DevicePoint::new(250.0, 150.0), DevicePoint::new(350.0, 330.0), 8.0),
            (DevicePoint::new(10.0, 10.0), DevicePoint::new(13.0, 90.0), 4.0),
            (DevicePoint::new(-40.0, 5.0), DevicePoint::new(200.0, 17.5), 37.6),
        ];
        for (tl, br, pitch) in cases {
            let segments = hatch_segments(tl, br, pitch, canvas);
            assert!(!segments.is_empty());
            for (a, b) in segments {
                for p in [a, b] {
                    assert!(p.x >= tl.x.max(-CLIP_MARGIN_PX) - 1e-9 && p.x <= br.x + 1e-9, "{:?}", p);
                    assert!(p.y >= tl.y - 1e-9 && p.y <= br.y + 1e-9, "{:?}", p);
                }
            }
        }
        assert!(hatch_segments(DevicePoint::new(0.0, 0.0), DevicePoint::new(0.0, 10.0), 8.0, canvas).is_empty());
    }

    #[test]
    fn test_hatch_pattern_ignores_offscreen_part() {
        let canvas = CanvasSize::new(600.0, 500.0);
        let tl = DevicePoint::new(100.0, 100.0);
        let inside = hatch_segments(tl, DevicePoint::new(300.0, 300.0), 8.0, canvas);
        // Same corner, extending far past the canvas: the visible lines keep their positions
        let wide = hatch_segments(tl, DevicePoint::new(1.0e6, 300.0), 8.0, canvas);
        let first = inside[0];
        assert!(wide.iter().any(|(a, b)| (a.x - first.0.x).abs() < 1e-6
            && (a.y - first.0.y).abs() < 1e-6
            && (b.x - first.1.x).abs() < 1e-6
            && (b.y - first.1.y).abs() < 1e-6));
        for (a, b) in wide {
            for p in [a, b] {
                assert!(p.x <= canvas.width + CLIP_MARGIN_PX + 1e-9);
            }
        }
    }

    #[test]
    fn test_huge_column_stays_bounded() {
        let piles = vec![PileCoordinate::new(1, -5.0, 0.0), PileCoordinate::new(2, 5.0, 0.0)];
        let vp = framed(&piles);
        for width in [2.0e5, 1.0e308, f64::INFINITY, f64::NAN] {
            let scene = build_scene(&SceneInput {
                column: ColumnGeometry { width, depth: 16.0 },
                ..input(&piles, &vp)
            });
            // 600 x 500 canvas at pitch 8: a few hundred hatch lines at most
            assert!(scene.items.len() < 1000, "width {}: {} items", width, scene.items.len());
        }

        let inf = hatch_segments(
            DevicePoint::new(f64::NEG_INFINITY, 0.0),
            DevicePoint::new(f64::INFINITY, 100.0),
            8.0,
            vp.canvas,
        );
        assert!(inf.is_empty());
    }

    #[test]
    fn test_every_pile_is_drawn() {
        let piles: Vec<_> = (0..250).map(|i| PileCoordinate::new(i + 1, (i % 25) as f64, (i / 25) as f64)).collect();
        let vp = framed(&piles);
        let scene = build_scene(&input(&piles, &vp));
        let bodies = scene
            .items
            .iter()
            .filter(|i| matches!(i, SceneItem::Circle { stroke: Some(_), .. }))
            .count();
        assert_eq!(bodies, 250);
    }

    #[test]
    fn test_force_badge_and_hover_panel() {
        let piles = vec![
            PileCoordinate::new(1, -3.0, 0.0).with_forces(PileForces {
                pmax_components: Some(ForceComponents {
                    axial: 80.0,
                    moment_x: -15.0,
                    moment_y: 30.0,
                }),
                ..forces(95.0, 12.5)
            }),
            PileCoordinate::new(2, 3.0, 0.0),
        ];
        let vp = framed(&piles);
        let mut inp = input(&piles, &vp);
        inp.hovered = Some(1);
        let scene = build_scene(&inp);
        let texts: Vec<&str> = scene.texts().collect();
        assert!(texts.contains(&"95k"));
        assert!(texts.contains(&"Pile #1 Details"));
        assert!(texts.contains(&"Pmax = 80.00 - 15.00 + 30.00 = 95.00 k"));
        assert_eq!(texts.last(), Some(&INSTRUCTIONS));

        inp.show_forces = false;
        let scene = build_scene(&inp);
        assert!(!scene.texts().any(|t| t == "95k"));
    }

    #[test]
    fn test_grid_lines_are_multiples_of_five() {
        let piles = vec![PileCoordinate::new(1, 0.0, 0.0)];
        let vp = framed(&piles);
        let scene = build_scene(&input(&piles, &vp));
        let grid = scene
            .items
            .iter()
            .filter(|i| matches!(i, SceneItem::Line { stroke, .. } if stroke.color == palette::GRID))
            .count();
        // extent 10 ft: -10, -5, 0, 5, 10 in both directions
        assert_eq!(grid, 10);
    }

    #[test]
    fn test_empty_layout_draws_overlay_only() {
        let vp = Viewport::default();
        let scene = build_scene(&input(&[], &vp));
        assert_eq!(scene.items.len(), 2);
        assert_eq!(scene, build_scene(&input(&[], &vp)));
    }
}
