// Copyright 2026 the Loupe Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The zoom state machine and its public operations.

use alloc::boxed::Box;
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;
use core::mem;

use kurbo::Point;

use crate::error::Rejected;
use crate::host::{Host, Subscriptions, Task, TimerId};
use crate::options::{Hook, Hooks, Options, Settings, SettingsPatch};
use crate::overlay::Overlay;
use crate::style::{StyleBatch, StyleProps, set_style};
use crate::target::{Target, cursor, original_source};

/// State flags of a [`Zooming`] instance.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct State {
    /// A target is currently zoomed.
    pub shown: bool,
    /// A transition is in flight; operations are dropped until it ends.
    pub lock: bool,
    /// The pointer is not pressing (not grabbing or dragging).
    pub released: bool,
    /// Scroll offset the scroll-to-close distance is measured from.
    pub last_scroll_position: Option<Point>,
    /// Pending press-and-hold timer.
    pub press_timer: Option<TimerId>,
}

impl Default for State {
    fn default() -> Self {
        Self {
            shown: false,
            lock: false,
            released: true,
            last_scroll_position: None,
            press_timer: None,
        }
    }
}

/// What finishes when the next transition on the target ends.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Step {
    Open,
    Close,
    Grab,
    Move,
    Release,
}

impl Step {
    fn hook(self) -> Hook {
        match self {
            Self::Open => Hook::Open,
            Self::Close => Hook::Close,
            Self::Grab => Hook::Grab,
            Self::Move => Hook::Move,
            Self::Release => Hook::Release,
        }
    }
}

/// Callback run after a step finishes.
enum Then<E> {
    Hook,
    Custom(Box<dyn FnOnce(&E)>),
    Close,
}

impl<E> fmt::Debug for Then<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Hook => f.write_str("Hook"),
            Self::Custom(_) => f.write_str("Custom"),
            Self::Close => f.write_str("Close"),
        }
    }
}

/// A one-shot transition-end listener.
#[derive(Debug)]
struct Pending<E> {
    step: Step,
    el: E,
    then: Then<E>,
}

/// An image zoom instance.
///
/// `Zooming` owns the state flags, the current [`Target`], the overlay, and
/// the configuration. It never owns the document: every operation borrows a
/// [`Host`]. Operations are checked against the state flags before any side
/// effect, and a rejected operation returns [`Rejected`] without changing
/// anything.
///
/// Visual changes complete asynchronously. Each operation registers a one-shot
/// completion that runs when the host reports
/// [`Event::TransitionEnd`](crate::Event::TransitionEnd) for the target; that is
/// where `lock` is cleared and the after-hooks fire.
pub struct Zooming<E> {
    settings: Settings,
    hooks: Hooks<E>,
    props: StyleProps,
    overlay: Overlay<E>,
    target: Option<Target<E>>,
    state: State,
    subscriptions: Subscriptions,
    pending: Vec<Pending<E>>,
    zoomables: Vec<E>,
    loading: Vec<(E, String)>,
}

impl<E: fmt::Debug> fmt::Debug for Zooming<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Zooming")
            .field("settings", &self.settings)
            .field("hooks", &self.hooks)
            .field("props", &self.props)
            .field("overlay", &self.overlay)
            .field("target", &self.target)
            .field("state", &self.state)
            .field("subscriptions", &self.subscriptions)
            .field("pending", &self.pending)
            .field("zoomables", &self.zoomables)
            .field("loading", &self.loading)
            .finish()
    }
}

impl<E: Clone + PartialEq + fmt::Debug + 'static> Zooming<E> {
    /// Creates an instance, its overlay, and listens to `default_zoomable`.
    pub fn new<H: Host<Element = E>>(host: &mut H, options: Options<E>) -> Self {
        let Options { settings, hooks } = options;
        let props = StyleProps::detect(|property| host.supports_style(property));
        let overlay = Overlay::new(host, &settings, props);
        let mut zooming = Self {
            settings,
            hooks,
            props,
            overlay,
            target: None,
            state: State::default(),
            subscriptions: Subscriptions::empty(),
            pending: Vec::new(),
            zoomables: Vec::new(),
            loading: Vec::new(),
        };
        if let Some(selector) = zooming.settings.default_zoomable.clone() {
            zooming.listen_selector(host, &selector);
        }
        zooming
    }

    /// Current state flags.
    #[must_use]
    pub fn state(&self) -> &State {
        &self.state
    }

    pub(crate) fn state_mut(&mut self) -> &mut State {
        &mut self.state
    }

    /// Current settings; the read form of [`Zooming::config`].
    #[must_use]
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// The zoomed target, while one exists.
    #[must_use]
    pub fn target(&self) -> Option<&Target<E>> {
        self.target.as_ref()
    }

    /// The overlay element.
    #[must_use]
    pub fn overlay(&self) -> &E {
        self.overlay.element()
    }

    /// Listener groups currently requested from the host.
    #[must_use]
    pub fn subscriptions(&self) -> Subscriptions {
        self.subscriptions
    }

    /// Elements registered through [`Zooming::listen`].
    #[must_use]
    pub fn zoomables(&self) -> &[E] {
        &self.zoomables
    }

    /// Lifecycle hooks, for installing or clearing callbacks.
    pub fn hooks_mut(&mut self) -> &mut Hooks<E> {
        &mut self.hooks
    }

    /// Merges `patch` into the settings and restyles the overlay.
    pub fn config<H: Host<Element = E>>(&mut self, host: &mut H, patch: SettingsPatch) {
        self.settings.merge(patch);
        self.overlay.update_style(host, &self.settings, self.props);
    }

    /// Replaces the settings wholesale and restyles the overlay.
    pub fn replace_settings<H: Host<Element = E>>(&mut self, host: &mut H, settings: Settings) {
        self.settings = settings;
        self.overlay.update_style(host, &self.settings, self.props);
    }

    /// Makes `el` zoomable: zoom-in cursor, click listener, optional preload.
    ///
    /// Non-image elements are skipped. Returns `true` if `el` is an image.
    pub fn listen<H: Host<Element = E>>(&mut self, host: &mut H, el: &E) -> bool {
        if !host.is_image(el) {
            tracing::trace!(element = ?el, "skipping non-image zoomable");
            return false;
        }
        let cursor = StyleBatch::new().with("cursor", cursor::ZOOM_IN);
        set_style(host, el, &cursor, self.props);
        if !self.zoomables.contains(el) {
            host.listen_click(el);
            self.zoomables.push(el.clone());
        }
        if self.settings.preload_image {
            if let Some(src) = original_source(&*host, el) {
                host.preload_image(&src);
            }
        }
        true
    }

    /// Calls [`Zooming::listen`] on every element matching `selector`.
    ///
    /// Returns the number of image elements made zoomable.
    pub fn listen_selector<H: Host<Element = E>>(&mut self, host: &mut H, selector: &str) -> usize {
        let mut count = 0;
        for el in host.query_selector_all(selector) {
            if self.listen(host, &el) {
                count += 1;
            }
        }
        count
    }

    /// Zooms `el` in; [`Hook::Open`] fires when the transition ends.
    pub fn open<H: Host<Element = E>>(&mut self, host: &mut H, el: &E) -> Result<(), Rejected> {
        self.open_inner(host, el, Then::Hook)
    }

    /// Zooms `el` in and runs `then` instead of [`Hook::Open`] when the transition ends.
    pub fn open_then<H: Host<Element = E>>(
        &mut self,
        host: &mut H,
        el: &E,
        then: impl FnOnce(&E) + 'static,
    ) -> Result<(), Rejected> {
        self.open_inner(host, el, Then::Custom(Box::new(then)))
    }

    /// Zooms in the first element matching `selector`.
    pub fn open_selector<H: Host<Element = E>>(
        &mut self,
        host: &mut H,
        selector: &str,
    ) -> Result<(), Rejected> {
        let el = host
            .query_selector_all(selector)
            .into_iter()
            .next()
            .ok_or(Rejected::NoMatch)?;
        self.open(host, &el)
    }

    /// Zooms the target back out; [`Hook::Close`] fires when the transition ends.
    pub fn close<H: Host<Element = E>>(&mut self, host: &mut H) -> Result<(), Rejected> {
        self.close_inner(host, Then::Hook)
    }

    /// Zooms out and runs `then` instead of [`Hook::Close`] when the transition ends.
    pub fn close_then<H: Host<Element = E>>(
        &mut self,
        host: &mut H,
        then: impl FnOnce(&E) + 'static,
    ) -> Result<(), Rejected> {
        self.close_inner(host, Then::Custom(Box::new(then)))
    }

    /// Grabs the target at `position`, enlarging it by `scale_extra`
    /// (the configured `scale_extra` when `None`).
    pub fn grab<H: Host<Element = E>>(
        &mut self,
        host: &mut H,
        position: Point,
        scale_extra: Option<f64>,
    ) -> Result<(), Rejected> {
        self.grab_inner(host, position, scale_extra, Then::Hook)
    }

    /// Like [`Zooming::grab`], running `then` instead of [`Hook::Grab`].
    pub fn grab_then<H: Host<Element = E>>(
        &mut self,
        host: &mut H,
        position: Point,
        scale_extra: Option<f64>,
        then: impl FnOnce(&E) + 'static,
    ) -> Result<(), Rejected> {
        self.grab_inner(host, position, scale_extra, Then::Custom(Box::new(then)))
    }

    /// Drags the grabbed target to `position`.
    pub fn move_to<H: Host<Element = E>>(
        &mut self,
        host: &mut H,
        position: Point,
        scale_extra: Option<f64>,
    ) -> Result<(), Rejected> {
        self.move_inner(host, position, scale_extra, Then::Hook)
    }

    /// Like [`Zooming::move_to`], running `then` instead of [`Hook::Move`].
    pub fn move_to_then<H: Host<Element = E>>(
        &mut self,
        host: &mut H,
        position: Point,
        scale_extra: Option<f64>,
        then: impl FnOnce(&E) + 'static,
    ) -> Result<(), Rejected> {
        self.move_inner(host, position, scale_extra, Then::Custom(Box::new(then)))
    }

    /// Returns a grabbed target to the open pose.
    pub fn release<H: Host<Element = E>>(&mut self, host: &mut H) -> Result<(), Rejected> {
        self.release_inner(host, Then::Hook)
    }

    /// Like [`Zooming::release`], running `then` instead of [`Hook::Release`].
    pub fn release_then<H: Host<Element = E>>(
        &mut self,
        host: &mut H,
        then: impl FnOnce(&E) + 'static,
    ) -> Result<(), Rejected> {
        self.release_inner(host, Then::Custom(Box::new(then)))
    }

    /// Releases, then closes once the release transition has ended.
    pub fn release_and_close<H: Host<Element = E>>(&mut self, host: &mut H) -> Result<(), Rejected> {
        self.release_inner(host, Then::Close)
    }

    /// Runs a task previously handed to [`Host::schedule`].
    pub fn run_task<H: Host<Element = E>>(&mut self, host: &mut H, task: Task) {
        match task {
            Task::PressGrab {
                position,
                scale_extra,
            } => {
                self.state.press_timer = None;
                if let Err(reason) = self.grab(host, position, Some(scale_extra)) {
                    tracing::debug!(%reason, "press-and-hold grab dropped");
                }
            }
            Task::SwapSource => {
                if let Some(target) = self.target.as_mut() {
                    target.swap_source(host);
                }
            }
            Task::ShowOverlay => {
                if self.state.shown {
                    self.overlay.reveal(host, self.settings.bg_opacity);
                }
            }
        }
    }

    /// Finishes every completion registered on `el`.
    ///
    /// Transition ends on any element other than the current target are ignored.
    pub fn transition_end<H: Host<Element = E>>(&mut self, host: &mut H, el: &E) {
        let is_target = self.target.as_ref().is_some_and(|t| t.element() == el);
        if !is_target || self.pending.is_empty() {
            return;
        }
        for pending in mem::take(&mut self.pending) {
            self.finish(host, pending);
        }
    }

    /// A source requested through [`Host::preload_image`] finished loading.
    pub fn image_loaded<H: Host<Element = E>>(&mut self, _host: &mut H, src: &str) {
        let (done, waiting) = mem::take(&mut self.loading)
            .into_iter()
            .partition::<Vec<_>, _>(|(_, s)| s == src);
        self.loading = waiting;
        for (el, _) in done {
            self.hooks.fire(Hook::ImageLoaded, &el);
        }
    }

    fn check_idle(&self) -> Result<(), Rejected> {
        if self.state.lock {
            return Err(Rejected::Locked);
        }
        if self.state.shown {
            return Err(Rejected::AlreadyShown);
        }
        Ok(())
    }

    fn check_shown(&self) -> Result<E, Rejected> {
        if self.state.lock {
            return Err(Rejected::Locked);
        }
        match self.target.as_ref() {
            Some(target) if self.state.shown => Ok(target.element().clone()),
            _ => Err(Rejected::NotShown),
        }
    }

    fn set_subscriptions<H: Host<Element = E>>(&mut self, host: &mut H, active: Subscriptions) {
        if self.subscriptions != active {
            self.subscriptions = active;
            host.subscribe(active);
        }
    }

    fn open_inner<H: Host<Element = E>>(
        &mut self,
        host: &mut H,
        el: &E,
        then: Then<E>,
    ) -> Result<(), Rejected> {
        self.check_idle().inspect_err(|reason| {
            tracing::debug!(%reason, "open dropped");
        })?;
        if !host.is_image(el) {
            tracing::debug!(element = ?el, "open dropped: not an image");
            return Err(Rejected::NotImage);
        }

        self.hooks.fire(Hook::BeforeOpen, el);
        let mut target = Target::init(&*host, el);

        if !self.settings.preload_image {
            if let Some(src) = target.src_original() {
                let src = String::from(src);
                self.hooks.fire(Hook::ImageLoading, el);
                host.preload_image(&src);
                self.loading.push((el.clone(), src));
            }
        }

        self.state.shown = true;
        self.state.lock = true;
        target.zoom_in(host, &self.settings, self.props);
        self.target = Some(target);

        self.overlay.insert(host);
        self.overlay.show(host);

        let mut active = self.subscriptions | Subscriptions::SCROLL | Subscriptions::KEYDOWN;
        if self.settings.close_on_window_resize {
            active |= Subscriptions::RESIZE;
        }
        self.set_subscriptions(host, active);

        self.pending.push(Pending {
            step: Step::Open,
            el: el.clone(),
            then,
        });
        tracing::trace!(element = ?el, "opening");
        Ok(())
    }

    fn close_inner<H: Host<Element = E>>(&mut self, host: &mut H, then: Then<E>) -> Result<(), Rejected> {
        let el = self.check_shown().inspect_err(|reason| {
            tracing::debug!(%reason, "close dropped");
        })?;

        self.hooks.fire(Hook::BeforeClose, &el);
        self.state.lock = true;
        self.state.last_scroll_position = None;
        host.set_body_cursor(cursor::DEFAULT);
        self.overlay.hide(host);
        if let Some(target) = self.target.as_mut() {
            target.zoom_out(host, self.props);
        }

        let active = self.subscriptions
            - (Subscriptions::SCROLL | Subscriptions::KEYDOWN | Subscriptions::RESIZE);
        self.set_subscriptions(host, active);

        self.pending.push(Pending {
            step: Step::Close,
            el,
            then,
        });
        tracing::trace!("closing");
        Ok(())
    }

    fn grab_inner<H: Host<Element = E>>(
        &mut self,
        host: &mut H,
        position: Point,
        scale_extra: Option<f64>,
        then: Then<E>,
    ) -> Result<(), Rejected> {
        let el = self.check_shown().inspect_err(|reason| {
            tracing::debug!(%reason, "grab dropped");
        })?;
        let scale_extra = scale_extra.unwrap_or(self.settings.scale_extra);

        self.hooks.fire(Hook::BeforeGrab, &el);
        self.state.released = false;
        if let Some(target) = self.target.as_mut() {
            target.grab(host, position, scale_extra, self.props);
        }

        self.pending.push(Pending {
            step: Step::Grab,
            el,
            then,
        });
        tracing::trace!(?position, scale_extra, "grabbed");
        Ok(())
    }

    fn move_inner<H: Host<Element = E>>(
        &mut self,
        host: &mut H,
        position: Point,
        scale_extra: Option<f64>,
        then: Then<E>,
    ) -> Result<(), Rejected> {
        let el = self.check_shown().inspect_err(|reason| {
            tracing::debug!(%reason, "move dropped");
        })?;
        let scale_extra = scale_extra.unwrap_or(self.settings.scale_extra);

        self.hooks.fire(Hook::BeforeMove, &el);
        self.state.released = false;
        host.set_body_cursor(cursor::MOVE);
        if let Some(target) = self.target.as_mut() {
            target.move_to(host, position, scale_extra, self.props);
        }

        self.pending.push(Pending {
            step: Step::Move,
            el,
            then,
        });
        Ok(())
    }

    fn release_inner<H: Host<Element = E>>(&mut self, host: &mut H, then: Then<E>) -> Result<(), Rejected> {
        let el = self.check_shown().inspect_err(|reason| {
            tracing::debug!(%reason, "release dropped");
        })?;

        self.hooks.fire(Hook::BeforeRelease, &el);
        self.state.lock = true;
        host.set_body_cursor(cursor::DEFAULT);
        if let Some(target) = self.target.as_mut() {
            target.restore_open_style(host, self.props);
        }

        self.pending.push(Pending {
            step: Step::Release,
            el,
            then,
        });
        tracing::trace!("releasing");
        Ok(())
    }

    fn finish<H: Host<Element = E>>(&mut self, host: &mut H, pending: Pending<E>) {
        let Pending { step, el, then } = pending;
        match step {
            Step::Open => {
                self.state.lock = false;
                if let Some(target) = self.target.as_mut() {
                    target.upgrade_source(host, self.props);
                }
                if self.settings.enable_grab {
                    let active = self.subscriptions | Subscriptions::GRAB;
                    self.set_subscriptions(host, active);
                }
                tracing::trace!(element = ?el, "opened");
            }
            Step::Close => {
                self.state.shown = false;
                self.state.lock = false;
                self.state.released = true;
                if let Some(timer) = self.state.press_timer.take() {
                    host.cancel(timer);
                }
                if let Some(mut target) = self.target.take() {
                    target.downgrade_source(host);
                    target.restore_close_style(host, self.props);
                } else {
                    tracing::warn!(element = ?el, "close finished without a target");
                }
                let active = self.subscriptions - Subscriptions::GRAB;
                self.set_subscriptions(host, active);
                self.overlay.remove(host);
                tracing::trace!(element = ?el, "closed");
            }
            Step::Release => {
                self.state.lock = false;
                self.state.released = true;
            }
            Step::Grab | Step::Move => {}
        }

        match then {
            Then::Hook => self.hooks.fire(step.hook(), &el),
            Then::Custom(callback) => callback(&el),
            Then::Close => {
                if let Err(reason) = self.close(host) {
                    tracing::debug!(%reason, "close after release dropped");
                }
            }
        }
    }
}
