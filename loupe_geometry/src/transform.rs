// Copyright 2026 the Loupe Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use core::fmt;

use kurbo::{Affine, Point, Rect, Size, Vec2};

use crate::fit::viewport_center;

/// A translate followed by a per-axis scale about the element's center.
///
/// Formats as a CSS transform, for example
/// `translate3d(120px, -40px, 0px) scale(2.5,2.5)`. The zero Z translation
/// promotes the element to its own compositing layer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ZoomTransform {
    /// Translation in CSS pixels.
    pub translate: Vec2,
    /// Scale factor per axis.
    pub scale: Vec2,
}

impl ZoomTransform {
    /// Creates a transform from a translate vector and per-axis scale.
    #[must_use]
    pub fn new(translate: Vec2, scale: Vec2) -> Self {
        Self { translate, scale }
    }

    /// Derives the transform used while the target is grabbed or dragged.
    ///
    /// The translate moves by the offset from `pointer` to `center`, and both
    /// scale axes grow by `scale_extra`. The result is always relative to
    /// `self`; repeated calls never accumulate.
    #[must_use]
    pub fn dragged(&self, center: Point, pointer: Point, scale_extra: f64) -> Self {
        Self {
            translate: self.translate + (center - pointer),
            scale: self.scale + Vec2::new(scale_extra, scale_extra),
        }
    }

    /// Like [`ZoomTransform::dragged`], with the center derived from a viewport size.
    #[must_use]
    pub fn dragged_in(&self, viewport: Size, pointer: Point, scale_extra: f64) -> Self {
        self.dragged(viewport_center(viewport), pointer, scale_extra)
    }

    /// The equivalent affine map, with scaling about the center of `rect`.
    #[must_use]
    pub fn to_affine(&self, rect: Rect) -> Affine {
        let origin = rect.center().to_vec2();
        Affine::translate(origin + self.translate)
            * Affine::scale_non_uniform(self.scale.x, self.scale.y)
            * Affine::translate(-origin)
    }

    /// Where `rect` ends up once this transform is applied to it.
    #[must_use]
    pub fn apply_to(&self, rect: Rect) -> Rect {
        self.to_affine(rect).transform_rect_bbox(rect)
    }
}

impl fmt::Display for ZoomTransform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "translate3d({}px, {}px, 0px) scale({},{})",
            self.translate.x, self.translate.y, self.scale.x, self.scale.y
        )
    }
}
