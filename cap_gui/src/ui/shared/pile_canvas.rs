//! Canvas program for the pile layout plan
//!
//! Paints a `cap_core::scene::Scene` onto an iced frame and turns mouse
//! input over the canvas into `PointerEvent`s for the viewport.

use iced::mouse;
use iced::widget::canvas::{self, gradient, Frame, Geometry, Path, Stroke, Text};
use iced::widget::{column, container, row, text, Column, Space};
use iced::{Border, Point, Rectangle, Renderer, Size, Theme};

use cap_core::geometry::DevicePoint;
use cap_core::scene::{self, HAlign, Paint, Scene, SceneItem, StrokeStyle, VAlign, LEGEND};
use cap_core::viewport::PointerEvent;

use crate::Message;

/// Plan drawing of the current layout
pub struct PilePlan {
    scene: Scene,
    dragging: bool,
    hovering: bool,
}

impl PilePlan {
    pub fn new(scene: Scene, dragging: bool, hovering: bool) -> Self {
        Self {
            scene,
            dragging,
            hovering,
        }
    }

    fn paint(&self, frame: &mut Frame) {
        for item in &self.scene.items {
            match item {
                SceneItem::Line { from, to, stroke } => {
                    frame.stroke(&Path::line(point(*from), point(*to)), to_stroke(stroke));
                }
                SceneItem::Rect {
                    origin,
                    width,
                    height,
                    fill,
                    stroke,
                } => {
                    let path = Path::rectangle(point(*origin), Size::new(*width as f32, *height as f32));
                    if let Some(paint) = fill {
                        frame.fill(&path, to_fill(paint));
                    }
                    if let Some(stroke) = stroke {
                        frame.stroke(&path, to_stroke(stroke));
                    }
                }
                SceneItem::Circle {
                    center,
                    radius,
                    fill,
                    stroke,
                } => {
                    let path = Path::circle(point(*center), *radius as f32);
                    if let Some(paint) = fill {
                        frame.fill(&path, to_fill(paint));
                    }
                    if let Some(stroke) = stroke {
                        frame.stroke(&path, to_stroke(stroke));
                    }
                }
                SceneItem::Text {
                    content,
                    position,
                    size,
                    color,
                    bold,
                    align_x,
                    align_y,
                } => {
                    let font = if *bold {
                        iced::Font {
                            weight: iced::font::Weight::Bold,
                            ..iced::Font::DEFAULT
                        }
                    } else {
                        iced::Font::DEFAULT
                    };
                    let horizontal = match align_x {
                        HAlign::Left => iced::alignment::Horizontal::Left,
                        HAlign::Center => iced::alignment::Horizontal::Center,
                        HAlign::Right => iced::alignment::Horizontal::Right,
                    };
                    let vertical = match align_y {
                        VAlign::Top => iced::alignment::Vertical::Top,
                        VAlign::Center => iced::alignment::Vertical::Center,
                    };
                    frame.fill_text(Text {
                        content: content.clone(),
                        position: point(*position),
                        color: to_color(*color),
                        size: iced::Pixels(*size as f32),
                        font,
                        align_x: horizontal.into(),
                        align_y: vertical,
                        ..Text::default()
                    });
                }
            }
        }
    }
}

fn point(p: DevicePoint) -> Point {
    Point::new(p.x as f32, p.y as f32)
}

fn device(p: Point) -> DevicePoint {
    DevicePoint::new(f64::from(p.x), f64::from(p.y))
}

fn to_color(c: scene::Color) -> iced::Color {
    iced::Color::from_rgba(c.r, c.g, c.b, c.a)
}

fn to_stroke(s: &StrokeStyle) -> Stroke<'static> {
    Stroke::default().with_color(to_color(s.color)).with_width(s.width as f32)
}

fn to_fill(paint: &Paint) -> canvas::Fill {
    match *paint {
        Paint::Solid(c) => to_color(c).into(),
        Paint::LinearGradient { start, end, from, to } => gradient::Linear::new(point(start), point(end))
            .add_stop(0.0, to_color(from))
            .add_stop(1.0, to_color(to))
            .into(),
    }
}

impl canvas::Program<Message> for PilePlan {
    type State = ();

    fn update(
        &self,
        _state: &mut Self::State,
        event: &canvas::Event,
        bounds: Rectangle,
        cursor: mouse::Cursor,
    ) -> Option<canvas::Action<Message>> {
        let inside = cursor.position_in(bounds);
        let canvas::Event::Mouse(mouse_event) = event else {
            return None;
        };

        let pointer = match (mouse_event, inside) {
            (mouse::Event::ButtonPressed(mouse::Button::Left), Some(p)) => PointerEvent::Pressed(device(p)),
            (mouse::Event::ButtonReleased(mouse::Button::Left), _) if self.dragging => PointerEvent::Released,
            (mouse::Event::CursorMoved { .. }, Some(p)) => PointerEvent::Moved(device(p)),
            (mouse::Event::CursorMoved { .. } | mouse::Event::CursorLeft, None)
                if self.dragging || self.hovering =>
            {
                PointerEvent::Left
            }
            (mouse::Event::WheelScrolled { delta }, Some(p)) => {
                let y = match delta {
                    mouse::ScrollDelta::Lines { y, .. } | mouse::ScrollDelta::Pixels { y, .. } => *y,
                };
                // Wheel up reports positive y and zooms in
                let event = PointerEvent::Wheel {
                    delta_y: -f64::from(y),
                    at: Some(device(p)),
                };
                return Some(canvas::Action::publish(Message::Pointer(event)).and_capture());
            }
            _ => return None,
        };

        Some(canvas::Action::publish(Message::Pointer(pointer)))
    }

    fn draw(
        &self,
        _state: &Self::State,
        renderer: &Renderer,
        _theme: &Theme,
        bounds: Rectangle,
        _cursor: mouse::Cursor,
    ) -> Vec<Geometry> {
        let mut frame = Frame::new(renderer, bounds.size());
        self.paint(&mut frame);
        vec![frame.into_geometry()]
    }

    fn mouse_interaction(&self, _state: &Self::State, bounds: Rectangle, cursor: mouse::Cursor) -> mouse::Interaction {
        if self.dragging {
            mouse::Interaction::Grabbing
        } else if cursor.is_over(bounds) {
            if self.hovering {
                mouse::Interaction::Pointer
            } else {
                mouse::Interaction::Grab
            }
        } else {
            mouse::Interaction::default()
        }
    }
}

/// Color key shown under the plan.
pub fn view_legend() -> Column<'static, Message> {
    let mut legend = column![text("Legend").size(12)].spacing(4);
    for entry in LEGEND {
        let fill = to_color(entry.swatch);
        let edge = to_color(entry.border);
        let swatch = container(Space::new().width(16).height(16)).style(move |_theme: &Theme| container::Style {
            background: Some(fill.into()),
            border: Border {
                color: edge,
                width: 1.0,
                radius: 2.0.into(),
            },
            ..container::Style::default()
        });
        legend = legend.push(
            row![swatch, Space::new().width(6), text(entry.label).size(10)].align_y(iced::Alignment::Center),
        );
    }
    legend
}
