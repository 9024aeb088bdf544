// Copyright 2026 the Loupe Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Multi-touch helpers: centroid and pinch spread of the active touch points.
//!
//! ## Minimal example
//!
//! ```
//! use kurbo::{Point, Size};
//! use loupe_geometry::TouchSpread;
//!
//! let touches = [Point::new(100.0, 100.0), Point::new(300.0, 140.0)];
//! let spread = TouchSpread::from_touches(&touches).unwrap();
//!
//! assert_eq!(spread.centroid, Point::new(200.0, 120.0));
//! assert_eq!(spread.extent, Size::new(200.0, 40.0));
//!
//! // Horizontal spread dominates: 200 / 1000 * 2.
//! let extra = spread.scale_extra(Size::new(1000.0, 800.0));
//! assert!((extra - 0.4).abs() < 1e-12);
//! ```

use kurbo::{Point, Rect, Size};

/// Multiplier applied to the normalized pinch spread.
pub const MULTITOUCH_SCALE_FACTOR: f64 = 2.0;

/// Centroid and bounding extent of a set of touch points.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TouchSpread {
    /// Average of all touch coordinates.
    pub centroid: Point,
    /// Size of the bounding box of all touch coordinates.
    pub extent: Size,
    /// Number of touch points that contributed.
    pub count: usize,
}

impl TouchSpread {
    /// Computes the spread of `touches`, or `None` when there are no touches.
    #[must_use]
    pub fn from_touches(touches: &[Point]) -> Option<Self> {
        let (first, rest) = touches.split_first()?;
        let mut bounds = Rect::from_points(*first, *first);
        let mut sum = first.to_vec2();
        for touch in rest {
            bounds = bounds.union_pt(*touch);
            sum += touch.to_vec2();
        }
        #[allow(
            clippy::cast_precision_loss,
            reason = "touch counts are tiny; the conversion is exact."
        )]
        let count = touches.len() as f64;
        Some(Self {
            centroid: (sum / count).to_point(),
            extent: bounds.size(),
            count: touches.len(),
        })
    }

    /// Returns `true` when more than one touch point contributed.
    #[must_use]
    pub fn is_multitouch(&self) -> bool {
        self.count > 1
    }

    /// Extra scale derived from how far apart the touches are.
    ///
    /// See [`pinch_scale_extra`].
    #[must_use]
    pub fn scale_extra(&self, viewport: Size) -> f64 {
        pinch_scale_extra(self.extent, viewport)
    }
}

/// Maps a pinch spread to an extra scale factor.
///
/// The dominant axis of `extent` (width when strictly wider than tall,
/// height otherwise) is divided by the matching viewport dimension and
/// multiplied by [`MULTITOUCH_SCALE_FACTOR`]. An empty viewport yields `0.0`.
#[must_use]
pub fn pinch_scale_extra(extent: Size, viewport: Size) -> f64 {
    let (spread, span) = if extent.width > extent.height {
        (extent.width, viewport.width)
    } else {
        (extent.height, viewport.height)
    };
    if span <= 0.0 {
        return 0.0;
    }
    spread / span * MULTITOUCH_SCALE_FACTOR
}
