// Copyright 2026 the Loupe Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The zoomed element: snapshots, open/close/drag transforms, and source swaps.

use alloc::string::{String, ToString};
use core::fmt;
use core::time::Duration;

use kurbo::{Point, Rect, Size};
use loupe_geometry::{CustomSize, ZoomTransform, calculate_scale, calculate_translate, viewport_center};

use crate::host::{Host, Task, TimerId};
use crate::options::Settings;
use crate::style::{StyleBatch, StyleProps, set_style, set_style_remembering};

/// Cursor values written by Loupe.
pub(crate) mod cursor {
    pub(crate) const DEFAULT: &str = "auto";
    pub(crate) const ZOOM_IN: &str = "zoom-in";
    pub(crate) const ZOOM_OUT: &str = "zoom-out";
    pub(crate) const GRAB: &str = "grab";
    pub(crate) const MOVE: &str = "move";
}

/// Delay between inserting the off-screen hi-res clone and swapping the live source.
pub const SWAP_SOURCE_DELAY: Duration = Duration::from_millis(50);

/// Attribute naming the hi-res source.
pub const ORIGINAL_ATTRIBUTE: &str = "data-original";

/// The hi-res source of `el`: its `data-original` attribute, or the `href` of
/// a wrapping link.
pub(crate) fn original_source<H: Host>(host: &H, el: &H::Element) -> Option<String> {
    if let Some(src) = host.attribute(el, ORIGINAL_ATTRIBUTE) {
        return Some(src);
    }
    let parent = host.parent(el)?;
    if host.is_anchor(&parent) {
        host.attribute(&parent, "href")
    } else {
        None
    }
}

/// Per-element target size from `data-zooming-width` / `data-zooming-height`.
fn element_size<H: Host>(host: &H, el: &H::Element) -> Option<CustomSize> {
    let width = host.attribute(el, "data-zooming-width")?.trim().parse().ok()?;
    let height = host.attribute(el, "data-zooming-height")?.trim().parse().ok()?;
    Some(CustomSize::absolute(width, height))
}

#[derive(Debug)]
struct PendingSwap<E> {
    clone: E,
    parent: Option<E>,
    timer: TimerId,
}

/// The record of the currently zoomed element.
///
/// Created by [`Zooming::open`](crate::Zooming::open) and discarded once the
/// close transition has ended and the pre-zoom styles have been restored.
#[derive(Debug)]
pub struct Target<E> {
    el: E,
    rect: Rect,
    src_thumbnail: Option<String>,
    srcset: Option<String>,
    src_original: Option<String>,
    open: ZoomTransform,
    current: ZoomTransform,
    style_open: StyleBatch,
    style_close: StyleBatch,
    pending_swap: Option<PendingSwap<E>>,
}

impl<E: Clone + PartialEq + fmt::Debug> Target<E> {
    /// Snapshots sources and the bounding box of `el`.
    pub(crate) fn init<H: Host<Element = E>>(host: &H, el: &E) -> Self {
        Self {
            el: el.clone(),
            rect: host.bounding_rect(el),
            src_thumbnail: host.attribute(el, "src"),
            srcset: host.attribute(el, "srcset"),
            src_original: original_source(host, el),
            open: ZoomTransform::new(kurbo::Vec2::ZERO, kurbo::Vec2::new(1.0, 1.0)),
            current: ZoomTransform::new(kurbo::Vec2::ZERO, kurbo::Vec2::new(1.0, 1.0)),
            style_open: StyleBatch::new(),
            style_close: StyleBatch::new(),
            pending_swap: None,
        }
    }

    /// The zoomed element.
    pub fn element(&self) -> &E {
        &self.el
    }

    /// Bounding box captured when the zoom opened.
    pub fn rect(&self) -> Rect {
        self.rect
    }

    /// The hi-res source, if the element has one.
    pub fn src_original(&self) -> Option<&str> {
        self.src_original.as_deref()
    }

    /// The source the element had before it was zoomed.
    pub fn src_thumbnail(&self) -> Option<&str> {
        self.src_thumbnail.as_deref()
    }

    /// The transform of the open pose.
    pub fn open_transform(&self) -> ZoomTransform {
        self.open
    }

    /// The transform most recently written to the element.
    pub fn current_transform(&self) -> ZoomTransform {
        self.current
    }

    /// Styles written when zooming in; reapplied on release.
    pub fn style_open(&self) -> &StyleBatch {
        &self.style_open
    }

    /// Pre-zoom values of every style touched when zooming in.
    pub fn style_close(&self) -> &StyleBatch {
        &self.style_close
    }

    /// Computes the open transform and starts the zoom-in transition.
    pub(crate) fn zoom_in<H: Host<Element = E>>(
        &mut self,
        host: &mut H,
        settings: &Settings,
        props: StyleProps,
    ) {
        let viewport = host.viewport_size();
        let center = viewport_center(viewport);
        let custom = settings
            .custom_size
            .or_else(|| element_size(&*host, &self.el));
        let natural = match custom {
            Some(CustomSize::Percent(_)) => host.natural_size(&self.el),
            _ => Size::ZERO,
        };
        self.open = ZoomTransform::new(
            calculate_translate(self.rect, center),
            calculate_scale(self.rect, center, settings.scale_base, custom, natural),
        );
        self.current = self.open;
        tracing::trace!(transform = %self.open, rect = ?self.rect, "zoom in");

        let base = StyleBatch::new()
            .with("position", "relative")
            .with("z-index", settings.z_index.saturating_add(1).to_string())
            .with(
                "cursor",
                if settings.enable_grab {
                    cursor::GRAB
                } else {
                    cursor::ZOOM_OUT
                },
            )
            .with("transition", settings.transition_for(props.transform()))
            .with("height", alloc::format!("{}px", self.rect.height()))
            .with("width", alloc::format!("{}px", self.rect.width()));
        let transform = StyleBatch::new().with("transform", self.open.to_string());

        // Position and size are the start state, the transform is the end state.
        let mut style_close = set_style_remembering(host, &self.el, &base, props);
        host.force_layout(&self.el);
        style_close.absorb(set_style_remembering(host, &self.el, &transform, props));

        let mut style_open = base;
        style_open.set("transform", self.open.to_string());
        self.style_open = style_open;
        self.style_close = style_close;
    }

    /// Reverses the zoom-in transition.
    pub(crate) fn zoom_out<H: Host<Element = E>>(&mut self, host: &mut H, props: StyleProps) {
        host.force_layout(&self.el);
        set_style(host, &self.el, &StyleBatch::new().with("transform", "none"), props);
    }

    /// Applies the grab transform and the move cursor.
    pub(crate) fn grab<H: Host<Element = E>>(
        &mut self,
        host: &mut H,
        pointer: Point,
        scale_extra: f64,
        props: StyleProps,
    ) {
        self.current = self.open.dragged_in(host.viewport_size(), pointer, scale_extra);
        let batch = StyleBatch::new()
            .with("cursor", cursor::MOVE)
            .with("transform", self.current.to_string());
        set_style(host, &self.el, &batch, props);
    }

    /// Applies the drag transform without easing.
    pub(crate) fn move_to<H: Host<Element = E>>(
        &mut self,
        host: &mut H,
        pointer: Point,
        scale_extra: f64,
        props: StyleProps,
    ) {
        self.current = self.open.dragged_in(host.viewport_size(), pointer, scale_extra);
        let batch = StyleBatch::new()
            .with("transition", props.transform())
            .with("transform", self.current.to_string());
        set_style(host, &self.el, &batch, props);
    }

    /// Returns to the open pose.
    pub(crate) fn restore_open_style<H: Host<Element = E>>(&mut self, host: &mut H, props: StyleProps) {
        self.current = self.open;
        set_style(host, &self.el, &self.style_open, props);
    }

    /// Returns to the pre-zoom styling.
    pub(crate) fn restore_close_style<H: Host<Element = E>>(&self, host: &mut H, props: StyleProps) {
        set_style(host, &self.el, &self.style_close, props);
    }

    /// Starts decoding the hi-res source off-screen and schedules the swap.
    pub(crate) fn upgrade_source<H: Host<Element = E>>(&mut self, host: &mut H, props: StyleProps) {
        let Some(original) = self.src_original.as_deref() else {
            return;
        };
        if self.pending_swap.is_some() {
            return;
        }
        let Some(clone) = host.clone_shallow(&self.el) else {
            tracing::warn!(element = ?self.el, "cannot clone target; keeping the thumbnail");
            return;
        };
        if self.srcset.is_some() {
            host.remove_attribute(&self.el, "srcset");
            host.remove_attribute(&clone, "srcset");
        }
        host.set_attribute(&clone, "src", original);
        let hidden = StyleBatch::new()
            .with("position", "fixed")
            .with("visibility", "hidden");
        set_style(host, &clone, &hidden, props);

        let parent = host.parent(&self.el);
        match &parent {
            Some(parent) => host.append_child(parent, &clone),
            None => host.append_to_body(&clone),
        }
        let timer = host.schedule(SWAP_SOURCE_DELAY, Task::SwapSource);
        tracing::trace!(src = original, "decoding hi-res source off-screen");
        self.pending_swap = Some(PendingSwap {
            clone,
            parent,
            timer,
        });
    }

    /// Swaps the live source to the hi-res one and drops the off-screen clone.
    pub(crate) fn swap_source<H: Host<Element = E>>(&mut self, host: &mut H) {
        let Some(swap) = self.pending_swap.take() else {
            return;
        };
        if let Some(original) = self.src_original.as_deref() {
            host.set_attribute(&self.el, "src", original);
        }
        Self::discard_clone(host, swap);
    }

    /// Reverts the source (and `srcset`) to the pre-zoom snapshot.
    pub(crate) fn downgrade_source<H: Host<Element = E>>(&mut self, host: &mut H) {
        if let Some(swap) = self.pending_swap.take() {
            host.cancel(swap.timer);
            Self::discard_clone(host, swap);
        }
        if self.src_original.is_none() {
            return;
        }
        if let Some(srcset) = self.srcset.as_deref() {
            host.set_attribute(&self.el, "srcset", srcset);
        }
        if let Some(thumbnail) = self.src_thumbnail.as_deref() {
            host.set_attribute(&self.el, "src", thumbnail);
        }
    }

    fn discard_clone<H: Host<Element = E>>(host: &mut H, swap: PendingSwap<E>) {
        match &swap.parent {
            Some(parent) => host.remove_child(parent, &swap.clone),
            None => host.remove_from_body(&swap.clone),
        }
    }
}
