//! Deterministic stroke workloads for the canvas smoke benchmark.

use padlink_canvas::Point;
use padlink_core::CanvasSize;

/// Zig-zag polyline crossing the canvas `rows` times, as consecutive segments.
pub fn zigzag_segments(size: CanvasSize, rows: u32) -> Vec<(Point, Point)> {
    let rows = rows.max(1);
    let right = size.width.saturating_sub(1) as f32;
    let step = size.height as f32 / rows as f32;

    let mut segments = Vec::with_capacity(rows as usize);
    let mut from = Point { x: 0.0, y: 0.0 };
    for row in 1..=rows {
        let to = Point {
            x: if row % 2 == 1 { right } else { 0.0 },
            y: (row as f32 * step).min(size.height as f32 - 1.0),
        };
        segments.push((from, to));
        from = to;
    }
    segments
}
