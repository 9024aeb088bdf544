// Copyright 2026 the Loupe Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use core::time::Duration;

use crate::host::{Host, Task, TimerId};
use crate::options::Settings;
use crate::style::{StyleBatch, StyleProps, set_style};

/// The dimming backdrop behind a zoomed target.
///
/// One element per instance, created up front and reused for every open. It
/// lives in the document body rather than next to the target, so its stacking
/// does not depend on the target's containing layout.
#[derive(Debug)]
pub(crate) struct Overlay<E> {
    el: E,
    inserted: bool,
    show_timer: Option<TimerId>,
}

impl<E: Clone + PartialEq> Overlay<E> {
    pub(crate) fn new<H: Host<Element = E>>(host: &mut H, settings: &Settings, props: StyleProps) -> Self {
        let el = host.create_overlay();
        let base = StyleBatch::new()
            .with("position", "fixed")
            .with("top", "0")
            .with("left", "0")
            .with("right", "0")
            .with("bottom", "0")
            .with("opacity", "0");
        set_style(host, &el, &base, props);
        let overlay = Self {
            el,
            inserted: false,
            show_timer: None,
        };
        overlay.update_style(host, settings, props);
        overlay
    }

    pub(crate) fn element(&self) -> &E {
        &self.el
    }

    /// Reapplies the configurable parts of the overlay style.
    pub(crate) fn update_style<H: Host<Element = E>>(
        &self,
        host: &mut H,
        settings: &Settings,
        props: StyleProps,
    ) {
        let batch = StyleBatch::new()
            // One below the target, which sits at `z_index + 1`.
            .with("z-index", alloc::format!("{}", settings.z_index.min(i32::MAX - 1)))
            .with("background-color", settings.bg_color.as_str())
            .with("transition", settings.transition_for("opacity"));
        set_style(host, &self.el, &batch, props);
    }

    pub(crate) fn insert<H: Host<Element = E>>(&mut self, host: &mut H) {
        if !self.inserted {
            host.append_to_body(&self.el);
            self.inserted = true;
        }
    }

    pub(crate) fn remove<H: Host<Element = E>>(&mut self, host: &mut H) {
        if self.inserted {
            host.remove_from_body(&self.el);
            self.inserted = false;
        }
    }

    /// Schedules the fade-in for the next tick so it transitions from zero.
    pub(crate) fn show<H: Host<Element = E>>(&mut self, host: &mut H) {
        if let Some(timer) = self.show_timer.take() {
            host.cancel(timer);
        }
        self.show_timer = Some(host.schedule(Duration::ZERO, Task::ShowOverlay));
    }

    /// Runs the fade-in scheduled by [`Overlay::show`].
    pub(crate) fn reveal<H: Host<Element = E>>(&mut self, host: &mut H, opacity: f64) {
        if self.show_timer.take().is_some() {
            host.set_style(&self.el, "opacity", &alloc::format!("{opacity}"));
        }
    }

    /// Fades out immediately, dropping a fade-in that has not run yet.
    pub(crate) fn hide<H: Host<Element = E>>(&mut self, host: &mut H) {
        if let Some(timer) = self.show_timer.take() {
            host.cancel(timer);
        }
        host.set_style(&self.el, "opacity", "0");
    }
}
