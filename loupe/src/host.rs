// Copyright 2026 the Loupe Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The seam between the headless core and a document.
//!
//! Loupe never touches a DOM directly. Everything it needs from the page (the
//! element tree, inline styles, the viewport, timers, and listener wiring) goes
//! through [`Host`]. A browser adapter implements it over `web_sys`; tests
//! implement it over an in-memory element table.
//!
//! Hosts are borrowed per call rather than owned, so several independent
//! [`Zooming`](crate::Zooming) instances can share one document.

use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;
use core::time::Duration;

use kurbo::{Point, Rect, Size};

/// Opaque handle for a scheduled [`Task`], issued by [`Host::schedule`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(pub u64);

/// Deferred work the core asks the host to run later.
///
/// When the delay elapses the host hands the task back through
/// [`Zooming::run_task`](crate::Zooming::run_task).
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Task {
    /// Press-and-hold elapsed: grab at `position` with `scale_extra`.
    PressGrab {
        /// Pointer (or touch centroid) position at press time.
        position: Point,
        /// Extra scale for the grab.
        scale_extra: f64,
    },
    /// The off-screen clone has had time to decode; swap in the hi-res source.
    SwapSource,
    /// Fade the overlay in, one tick after it was inserted.
    ShowOverlay,
}

bitflags::bitflags! {
    /// Document-level listener groups the core currently wants to receive.
    ///
    /// Reported through [`Host::subscribe`] whenever the set changes. Events
    /// from groups that are not active are ignored by the router.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct Subscriptions: u8 {
        /// `scroll` on the document.
        const SCROLL = 1 << 0;
        /// `keydown` on the document.
        const KEYDOWN = 1 << 1;
        /// `resize` on the window.
        const RESIZE = 1 << 2;
        /// Mouse and touch press/move/release on the document.
        const GRAB = 1 << 3;
    }
}

/// Document access required by the zoom state machine.
pub trait Host {
    /// Handle to an element of the document.
    type Element: Clone + PartialEq + fmt::Debug + 'static;

    /// Returns `true` if `el` is an image element.
    fn is_image(&self, el: &Self::Element) -> bool;

    /// Returns `true` if `el` is a link (`<a>`) element.
    fn is_anchor(&self, el: &Self::Element) -> bool;

    /// Current bounding box of `el` in viewport coordinates.
    fn bounding_rect(&self, el: &Self::Element) -> Rect;

    /// Intrinsic resolution of an image element.
    fn natural_size(&self, el: &Self::Element) -> Size;

    /// Parent element, if any.
    fn parent(&self, el: &Self::Element) -> Option<Self::Element>;

    /// Reads an attribute.
    fn attribute(&self, el: &Self::Element, name: &str) -> Option<String>;

    /// Writes an attribute.
    fn set_attribute(&mut self, el: &Self::Element, name: &str, value: &str);

    /// Removes an attribute.
    fn remove_attribute(&mut self, el: &Self::Element, name: &str);

    /// All elements matching a CSS selector, in document order.
    fn query_selector_all(&self, selector: &str) -> Vec<Self::Element>;

    /// Whether the host understands the inline style property `property`.
    ///
    /// Probed once per instance to pick vendor-prefixed `transition` and
    /// `transform` names.
    fn supports_style(&self, property: &str) -> bool;

    /// Reads an inline style property; the empty string when unset.
    fn style(&self, el: &Self::Element, property: &str) -> String;

    /// Writes an inline style property. The empty string clears it.
    fn set_style(&mut self, el: &Self::Element, property: &str, value: &str);

    /// Forces a synchronous layout read on `el` (for example `offsetWidth`).
    ///
    /// Styles written before this call become the start state of any
    /// transition triggered by styles written after it.
    fn force_layout(&mut self, el: &Self::Element);

    /// Sets the cursor of the document body.
    fn set_body_cursor(&mut self, cursor: &str);

    /// Creates the detached backdrop element used as the overlay.
    ///
    /// Clicks on it must be reported as [`Event::OverlayClick`](crate::Event::OverlayClick).
    fn create_overlay(&mut self) -> Self::Element;

    /// Clones `el` without its children, or `None` if the host cannot.
    fn clone_shallow(&mut self, el: &Self::Element) -> Option<Self::Element>;

    /// Appends `child` to `parent`.
    fn append_child(&mut self, parent: &Self::Element, child: &Self::Element);

    /// Removes `child` from `parent`.
    fn remove_child(&mut self, parent: &Self::Element, child: &Self::Element);

    /// Appends `el` to the document body.
    fn append_to_body(&mut self, el: &Self::Element);

    /// Removes `el` from the document body.
    fn remove_from_body(&mut self, el: &Self::Element);

    /// Viewport size: `min(documentElement.clientWidth, innerWidth)` and the
    /// height analogue.
    fn viewport_size(&self) -> Size;

    /// Runs `task` after `delay`.
    fn schedule(&mut self, delay: Duration, task: Task) -> TimerId;

    /// Cancels a scheduled task. Unknown or already fired ids are ignored.
    fn cancel(&mut self, timer: TimerId);

    /// The set of active document-level listener groups changed.
    fn subscribe(&mut self, active: Subscriptions);

    /// Starts reporting clicks on `el` as [`Event::Click`](crate::Event::Click).
    fn listen_click(&mut self, el: &Self::Element);

    /// Opens `url` in a new browsing context.
    fn open_in_new_window(&mut self, url: &str);

    /// Starts loading `url` in the background.
    ///
    /// Hosts report completion as [`Event::ImageLoaded`](crate::Event::ImageLoaded).
    fn preload_image(&mut self, url: &str);
}
