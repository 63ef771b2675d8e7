//! Pointer input and client-to-logical coordinate mapping.

use padlink_core::CanvasSize;

/// Point in logical canvas pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    /// Horizontal position.
    pub x: f32,
    /// Vertical position.
    pub y: f32,
}

/// Point in client (display) pixels, as reported by the input device.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClientPoint {
    /// Horizontal client position.
    pub x: f64,
    /// Vertical client position.
    pub y: f64,
}

/// Where the canvas is displayed, in client pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DisplayRect {
    /// Left edge.
    pub left: f64,
    /// Top edge.
    pub top: f64,
    /// Displayed width.
    pub width: f64,
    /// Displayed height.
    pub height: f64,
}

impl DisplayRect {
    /// Rect displaying `size` unscaled at the origin.
    pub fn unscaled(size: CanvasSize) -> Self {
        Self {
            left: 0.0,
            top: 0.0,
            width: f64::from(size.width),
            height: f64::from(size.height),
        }
    }
}

/// Position reported by one input device.
#[derive(Debug, Clone, PartialEq)]
pub enum PointerInput {
    /// Mouse position.
    Mouse(ClientPoint),
    /// Active touches; the first one drives the stroke.
    Touch(Vec<ClientPoint>),
}

impl PointerInput {
    /// Position that drives the stroke.
    pub fn primary(&self) -> Option<ClientPoint> {
        match self {
            PointerInput::Mouse(point) => Some(*point),
            PointerInput::Touch(touches) => touches.first().copied(),
        }
    }
}

/// Pointer event delivered to the canvas engine.
#[derive(Debug, Clone, PartialEq)]
pub enum PointerEvent {
    /// Mouse button pressed or finger placed.
    Down(PointerInput),
    /// Pointer moved.
    Move(PointerInput),
    /// Mouse button released or finger lifted.
    Up,
}

/// Maps a client position into logical canvas coordinates using the
/// displayed-vs-logical size ratio.
///
/// Returns `None` while the canvas is not laid out (zero display size).
pub fn to_logical(point: ClientPoint, display: DisplayRect, size: CanvasSize) -> Option<Point> {
    if display.width <= 0.0 || display.height <= 0.0 {
        return None;
    }

    let scale_x = f64::from(size.width) / display.width;
    let scale_y = f64::from(size.height) / display.height;
    Some(Point {
        x: ((point.x - display.left) * scale_x) as f32,
        y: ((point.y - display.top) * scale_y) as f32,
    })
}
