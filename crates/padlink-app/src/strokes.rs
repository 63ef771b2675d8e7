//! JSON pointer-event scripts replayed through the canvas engine.

use padlink_canvas::{ClientPoint, DisplayRect, PointerEvent, PointerInput};
use serde::Deserialize;

use crate::AppError;

/// Where the canvas was displayed when the events were recorded.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct DisplaySpec {
    /// Left edge.
    #[serde(default)]
    pub left: f64,
    /// Top edge.
    #[serde(default)]
    pub top: f64,
    /// Displayed width.
    pub width: f64,
    /// Displayed height.
    pub height: f64,
}

impl From<DisplaySpec> for DisplayRect {
    fn from(display: DisplaySpec) -> Self {
        DisplayRect {
            left: display.left,
            top: display.top,
            width: display.width,
            height: display.height,
        }
    }
}

/// One recorded pointer event in client coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum StrokeStep {
    /// Pointer pressed.
    Down {
        /// Client x.
        x: f64,
        /// Client y.
        y: f64,
    },
    /// Pointer moved.
    Move {
        /// Client x.
        x: f64,
        /// Client y.
        y: f64,
    },
    /// Pointer released.
    Up,
}

impl StrokeStep {
    /// Converts into a mouse-driven canvas event.
    pub fn to_event(self) -> PointerEvent {
        match self {
            StrokeStep::Down { x, y } => PointerEvent::Down(PointerInput::Mouse(ClientPoint { x, y })),
            StrokeStep::Move { x, y } => PointerEvent::Move(PointerInput::Mouse(ClientPoint { x, y })),
            StrokeStep::Up => PointerEvent::Up,
        }
    }
}

/// Recorded drawing session.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct StrokeScript {
    /// Display rect; unscaled at the origin when absent.
    #[serde(default)]
    pub display: Option<DisplaySpec>,
    /// Events in order.
    pub events: Vec<StrokeStep>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum StrokeFile {
    Script(StrokeScript),
    Events(Vec<StrokeStep>),
}

/// Parses either `{"display": {...}, "events": [...]}` or a bare event list.
///
/// # Errors
/// Returns [`AppError::Strokes`] for anything else.
pub fn parse_strokes(raw: &str) -> Result<StrokeScript, AppError> {
    match serde_json::from_str::<StrokeFile>(raw) {
        Ok(StrokeFile::Script(script)) => Ok(script),
        Ok(StrokeFile::Events(events)) => Ok(StrokeScript {
            display: None,
            events,
        }),
        Err(error) => Err(AppError::Strokes(error.to_string())),
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for stroke script parsing.

    use super::*;

    #[test]
    fn accepts_bare_event_lists() {
        let script = parse_strokes(r#"[{"kind":"down","x":1,"y":2},{"kind":"up"}]"#)
            .expect("bare list should parse");
        assert_eq!(script.display, None);
        assert_eq!(
            script.events,
            vec![StrokeStep::Down { x: 1.0, y: 2.0 }, StrokeStep::Up]
        );
    }

    #[test]
    fn accepts_display_rect() {
        let script = parse_strokes(
            r#"{"display":{"width":150,"height":75},"events":[{"kind":"move","x":3,"y":4}]}"#,
        )
        .expect("script should parse");
        let display = DisplayRect::from(script.display.expect("display present"));
        assert_eq!(display.left, 0.0);
        assert_eq!(display.width, 150.0);
    }

    #[test]
    fn rejects_unknown_event_kinds() {
        assert!(parse_strokes(r#"[{"kind":"hover","x":1,"y":2}]"#).is_err());
    }
}
