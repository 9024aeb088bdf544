// Copyright 2026 the Loupe Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Raw input to zoom operations.

use core::fmt;
use core::time::Duration;

use kurbo::Point;
use loupe_geometry::TouchSpread;

use crate::event::{Event, Key, Modifiers, MouseButton};
use crate::host::{Host, Subscriptions, Task};
use crate::target::original_source;
use crate::zooming::Zooming;

/// How long a pointer must stay down before a press becomes a grab.
pub const PRESS_DELAY: Duration = Duration::from_millis(200);

fn is_plain_primary(button: MouseButton, modifiers: Modifiers) -> bool {
    button == MouseButton::Primary && !modifiers.opens_new_window()
}

impl<E: Clone + PartialEq + fmt::Debug + 'static> Zooming<E> {
    /// Routes one input event.
    ///
    /// Returns `true` when the host should suppress the event's default
    /// action (`preventDefault`). Events from listener groups that are not
    /// currently subscribed are ignored.
    pub fn handle<H: Host<Element = E>>(&mut self, host: &mut H, event: Event<E>) -> bool {
        let active = self.subscriptions();
        match event {
            Event::Click { target, modifiers } => {
                self.on_click(host, &target, modifiers);
                true
            }
            Event::OverlayClick => {
                self.drop_rejection("overlay click", |z| z.close(host));
                false
            }
            Event::Scroll { position } if active.contains(Subscriptions::SCROLL) => {
                self.on_scroll(host, position);
                false
            }
            Event::KeyDown { key } if active.contains(Subscriptions::KEYDOWN) => {
                if key == Key::Escape {
                    self.on_escape(host);
                }
                false
            }
            Event::Resize if active.contains(Subscriptions::RESIZE) => {
                self.drop_rejection("resize", |z| z.close(host));
                false
            }
            Event::MouseDown {
                position,
                button,
                modifiers,
            } if active.contains(Subscriptions::GRAB) => {
                if !is_plain_primary(button, modifiers) {
                    return false;
                }
                let scale_extra = self.settings().scale_extra;
                self.start_press(host, position, scale_extra);
                true
            }
            Event::MouseMove { position } if active.contains(Subscriptions::GRAB) => {
                if !self.state().released {
                    self.drop_rejection("mouse move", |z| z.move_to(host, position, None));
                }
                false
            }
            Event::MouseUp { button, modifiers } if active.contains(Subscriptions::GRAB) => {
                if is_plain_primary(button, modifiers) {
                    self.end_press(host);
                }
                false
            }
            Event::TouchStart { touches } if active.contains(Subscriptions::GRAB) => {
                if let Some(spread) = TouchSpread::from_touches(&touches) {
                    let scale_extra = self.touch_scale_extra(host, &spread);
                    self.start_press(host, spread.centroid, scale_extra);
                }
                true
            }
            Event::TouchMove { touches } if active.contains(Subscriptions::GRAB) => {
                if self.state().released {
                    return false;
                }
                if let Some(spread) = TouchSpread::from_touches(&touches) {
                    let scale_extra = self.touch_scale_extra(host, &spread);
                    self.drop_rejection("touch move", |z| {
                        z.move_to(host, spread.centroid, Some(scale_extra))
                    });
                }
                false
            }
            Event::TouchEnd { remaining } if active.contains(Subscriptions::GRAB) => {
                if remaining == 0 {
                    self.end_press(host);
                }
                false
            }
            Event::TransitionEnd { target } => {
                self.transition_end(host, &target);
                false
            }
            Event::ImageLoaded { src } => {
                self.image_loaded(host, &src);
                false
            }
            other => {
                tracing::trace!(event = ?other, "ignoring unsubscribed event");
                false
            }
        }
    }

    fn on_click<H: Host<Element = E>>(&mut self, host: &mut H, el: &E, modifiers: Modifiers) {
        if modifiers.opens_new_window() {
            let src = original_source(&*host, el).or_else(|| host.attribute(el, "src"));
            match src {
                Some(src) => host.open_in_new_window(&src),
                None => tracing::debug!(element = ?el, "no source to open in a new window"),
            }
            return;
        }
        if !self.state().shown {
            self.drop_rejection("click", |z| z.open(host, el));
        } else if self.state().released {
            self.drop_rejection("click", |z| z.close(host));
        } else {
            self.drop_rejection("click", |z| z.release(host));
        }
    }

    fn on_scroll<H: Host<Element = E>>(&mut self, host: &mut H, position: Point) {
        let threshold = self.settings().scroll_threshold;
        let baseline = *self
            .state_mut()
            .last_scroll_position
            .get_or_insert(position);
        let delta = baseline - position;
        if delta.x.abs() >= threshold || delta.y.abs() >= threshold {
            self.state_mut().last_scroll_position = None;
            self.drop_rejection("scroll", |z| z.close(host));
        }
    }

    fn on_escape<H: Host<Element = E>>(&mut self, host: &mut H) {
        if self.state().released {
            self.drop_rejection("escape", |z| z.close(host));
        } else {
            self.drop_rejection("escape", |z| z.release_and_close(host));
        }
    }

    fn touch_scale_extra<H: Host<Element = E>>(&self, host: &H, spread: &TouchSpread) -> f64 {
        if spread.is_multitouch() {
            spread.scale_extra(host.viewport_size())
        } else {
            self.settings().scale_extra
        }
    }

    fn start_press<H: Host<Element = E>>(&mut self, host: &mut H, position: Point, scale_extra: f64) {
        if let Some(timer) = self.state_mut().press_timer.take() {
            host.cancel(timer);
        }
        let timer = host.schedule(
            PRESS_DELAY,
            Task::PressGrab {
                position,
                scale_extra,
            },
        );
        self.state_mut().press_timer = Some(timer);
    }

    fn end_press<H: Host<Element = E>>(&mut self, host: &mut H) {
        if let Some(timer) = self.state_mut().press_timer.take() {
            host.cancel(timer);
        }
        if self.state().released {
            self.drop_rejection("press end", |z| z.close(host));
        } else {
            self.drop_rejection("press end", |z| z.release(host));
        }
    }

    fn drop_rejection<R: fmt::Display>(
        &mut self,
        source: &'static str,
        op: impl FnOnce(&mut Self) -> Result<(), R>,
    ) {
        if let Err(reason) = op(self) {
            tracing::debug!(source, %reason, "input dropped");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{MouseButton, Modifiers, is_plain_primary};

    #[test]
    fn only_unmodified_primary_presses_grab() {
        assert!(is_plain_primary(MouseButton::Primary, Modifiers::empty()));
        assert!(is_plain_primary(MouseButton::Primary, Modifiers::SHIFT));
        assert!(!is_plain_primary(MouseButton::Secondary, Modifiers::empty()));
        assert!(!is_plain_primary(MouseButton::Primary, Modifiers::META));
        assert!(!is_plain_primary(MouseButton::Primary, Modifiers::CTRL));
    }
}
