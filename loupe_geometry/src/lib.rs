// Copyright 2026 the Loupe Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Loupe Geometry: transform math for in-page image zoom.
//!
//! This crate holds the pure, side-effect free part of Loupe. Given the
//! bounding rectangle of a target element and the size of the viewport it
//! computes:
//! - The translate vector that moves the target's center onto the viewport center.
//! - The scale factor that fits the target into the viewport, or honors an
//!   explicit [`CustomSize`].
//! - The transform applied while the user grabs and drags the zoomed target.
//! - The centroid and pinch-derived extra scale of a multi-touch gesture.
//!
//! It does **not** own any element, style, or event state. The headless
//! state machine in `loupe` feeds rectangles in and writes the resulting
//! [`ZoomTransform`] back out as a CSS transform string.
//!
//! ## Minimal example
//!
//! ```rust
//! use kurbo::{Rect, Size};
//! use loupe_geometry::{ZoomTransform, calculate_scale, calculate_translate, viewport_center};
//!
//! // A 400x200 image at the top-left corner of a 1000x800 viewport.
//! let rect = Rect::new(0.0, 0.0, 400.0, 200.0);
//! let center = viewport_center(Size::new(1000.0, 800.0));
//!
//! let translate = calculate_translate(rect, center);
//! let scale = calculate_scale(rect, center, 1.0, None, Size::ZERO);
//! let open = ZoomTransform::new(translate, scale);
//!
//! // The zoomed rectangle is centered in the viewport.
//! let zoomed = open.apply_to(rect);
//! assert!((zoomed.center().x - center.x).abs() < 1e-9);
//! assert!((zoomed.center().y - center.y).abs() < 1e-9);
//! ```
//!
//! ## Design notes
//!
//! - Transforms are axis-aligned: a translate followed by a (possibly
//!   non-uniform) scale about the element's own center, matching the CSS
//!   `transform-origin: 50% 50%` default.
//! - Rectangles are frozen snapshots taken when a zoom opens; nothing here
//!   re-queries layout.
//!
//! This crate is `no_std`.

#![no_std]

extern crate alloc;

mod fit;
mod size;
mod touch;
mod transform;

pub use fit::{calculate_scale, calculate_translate, viewport_center};
pub use size::{CustomSize, ParseCustomSizeError};
pub use touch::{MULTITOUCH_SCALE_FACTOR, TouchSpread, pinch_scale_extra};
pub use transform::ZoomTransform;
