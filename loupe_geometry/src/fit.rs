// Copyright 2026 the Loupe Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use kurbo::{Point, Rect, Size, Vec2};

use crate::size::CustomSize;

/// Returns the center of a viewport of the given size.
///
/// Callers should pass `min(documentElement.clientWidth, innerWidth)` and the
/// height analogue, so that a visible scrollbar does not shift the center.
#[must_use]
pub fn viewport_center(viewport: Size) -> Point {
    Point::new(viewport.width / 2.0, viewport.height / 2.0)
}

/// Computes the vector that moves the center of `rect` onto `center`.
#[must_use]
pub fn calculate_translate(rect: Rect, center: Point) -> Vec2 {
    center - rect.center()
}

/// Computes the per-axis scale applied when `rect` is zoomed.
///
/// - With [`CustomSize::Absolute`], each axis scales to the requested size
///   independently and `scale_base` is ignored.
/// - Otherwise the rect is fit into the viewport: each axis gets
///   `(center - half) / half`, and the smaller of the two is added to
///   `scale_base` so the target never overflows either axis. Both output axes
///   carry this uniform value.
/// - With [`CustomSize::Percent`], the fitted scale is capped so the rendered
///   size never exceeds that percentage of `natural` (the image's intrinsic
///   resolution). When the fitted scale exceeds the cap on either axis, the
///   per-axis caps are returned instead.
///
/// Degenerate rectangles (zero or negative width or height) yield an identity
/// scale.
#[must_use]
pub fn calculate_scale(
    rect: Rect,
    center: Point,
    scale_base: f64,
    custom: Option<CustomSize>,
    natural: Size,
) -> Vec2 {
    let size = rect.size();
    if size.width <= 0.0 || size.height <= 0.0 {
        return Vec2::new(1.0, 1.0);
    }

    if let Some(CustomSize::Absolute(target)) = custom {
        return Vec2::new(target.width / size.width, target.height / size.height);
    }

    let half = Vec2::new(size.width / 2.0, size.height / 2.0);
    let edge_to_edge = center.to_vec2() - half;
    let scale_x = edge_to_edge.x / half.x;
    let scale_y = edge_to_edge.y / half.y;
    let scale = scale_base + scale_x.min(scale_y);

    if let Some(CustomSize::Percent(percent)) = custom {
        let max_x = percent * natural.width / (100.0 * size.width);
        let max_y = percent * natural.height / (100.0 * size.height);
        if scale > max_x || scale > max_y {
            return Vec2::new(max_x, max_y);
        }
    }

    Vec2::new(scale, scale)
}
