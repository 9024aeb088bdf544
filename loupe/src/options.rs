// Copyright 2026 the Loupe Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Instance configuration: data settings and lifecycle hooks.
//!
//! [`Settings`] carries every data key and is plain, comparable, and (with the
//! `serde` feature) deserializable. [`Hooks`] carries the twelve lifecycle
//! callbacks. [`Options`] bundles both for [`Zooming::new`](crate::Zooming::new).
//!
//! ## Merging
//!
//! ```
//! use loupe::{Settings, SettingsPatch};
//!
//! let mut settings = Settings::default();
//! settings.merge(SettingsPatch {
//!     bg_color: Some("black".into()),
//!     scroll_threshold: Some(80.0),
//!     ..SettingsPatch::default()
//! });
//!
//! assert_eq!(settings.bg_color, "black");
//! assert_eq!(settings.scroll_threshold, 80.0);
//! // Untouched keys keep their values.
//! assert!(settings.enable_grab);
//! ```

use alloc::boxed::Box;
use alloc::string::String;
use core::fmt;

use loupe_geometry::CustomSize;

/// Data configuration of a [`Zooming`](crate::Zooming) instance.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[cfg_attr(feature = "serde", serde(default, rename_all = "camelCase"))]
pub struct Settings {
    /// Selector listened to on construction.
    pub default_zoomable: Option<String>,
    /// Allow press-and-hold to grab and drag the zoomed image.
    pub enable_grab: bool,
    /// Preload hi-res sources as soon as an element is listened to.
    pub preload_image: bool,
    /// Close when the window is resized.
    pub close_on_window_resize: bool,
    /// Transition duration, in seconds.
    pub transition_duration: f64,
    /// CSS timing function for all transitions.
    pub transition_timing_function: String,
    /// Overlay background color.
    pub bg_color: String,
    /// Overlay opacity once faded in.
    pub bg_opacity: f64,
    /// Added to the fitted scale when zooming in.
    pub scale_base: f64,
    /// Added to the open scale while grabbing.
    pub scale_extra: f64,
    /// Scroll distance, in pixels, that closes the zoom.
    pub scroll_threshold: f64,
    /// Overlay stacking order; the zoomed target sits one above.
    pub z_index: i32,
    /// Explicit target size instead of fitting the viewport.
    pub custom_size: Option<CustomSize>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            default_zoomable: Some("img[data-action=\"zoom\"]".into()),
            enable_grab: true,
            preload_image: false,
            close_on_window_resize: true,
            transition_duration: 0.4,
            transition_timing_function: "cubic-bezier(0.4, 0, 0, 1)".into(),
            bg_color: "rgb(255, 255, 255)".into(),
            bg_opacity: 1.0,
            scale_base: 1.0,
            scale_extra: 0.5,
            scroll_threshold: 40.0,
            z_index: 998,
            custom_size: None,
        }
    }
}

impl Settings {
    /// Overwrites every key set in `patch`, leaving the others untouched.
    pub fn merge(&mut self, patch: SettingsPatch) {
        let SettingsPatch {
            default_zoomable,
            enable_grab,
            preload_image,
            close_on_window_resize,
            transition_duration,
            transition_timing_function,
            bg_color,
            bg_opacity,
            scale_base,
            scale_extra,
            scroll_threshold,
            z_index,
            custom_size,
        } = patch;

        if let Some(v) = default_zoomable {
            self.default_zoomable = Some(v);
        }
        if let Some(v) = enable_grab {
            self.enable_grab = v;
        }
        if let Some(v) = preload_image {
            self.preload_image = v;
        }
        if let Some(v) = close_on_window_resize {
            self.close_on_window_resize = v;
        }
        if let Some(v) = transition_duration {
            self.transition_duration = v;
        }
        if let Some(v) = transition_timing_function {
            self.transition_timing_function = v;
        }
        if let Some(v) = bg_color {
            self.bg_color = v;
        }
        if let Some(v) = bg_opacity {
            self.bg_opacity = v;
        }
        if let Some(v) = scale_base {
            self.scale_base = v;
        }
        if let Some(v) = scale_extra {
            self.scale_extra = v;
        }
        if let Some(v) = scroll_threshold {
            self.scroll_threshold = v;
        }
        if let Some(v) = z_index {
            self.z_index = v;
        }
        if let Some(v) = custom_size {
            self.custom_size = Some(v);
        }
    }

    /// CSS `transition` value for `property` using the configured duration and curve.
    pub(crate) fn transition_for(&self, property: &str) -> String {
        alloc::format!(
            "{property} {}s {}",
            self.transition_duration, self.transition_timing_function
        )
    }
}

/// A partial [`Settings`] update; `None` keeps the current value.
///
/// Clearing `default_zoomable` or `custom_size` requires replacing the
/// settings wholesale.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default, rename_all = "camelCase"))]
#[allow(missing_docs, reason = "fields mirror `Settings`")]
pub struct SettingsPatch {
    pub default_zoomable: Option<String>,
    pub enable_grab: Option<bool>,
    pub preload_image: Option<bool>,
    pub close_on_window_resize: Option<bool>,
    pub transition_duration: Option<f64>,
    pub transition_timing_function: Option<String>,
    pub bg_color: Option<String>,
    pub bg_opacity: Option<f64>,
    pub scale_base: Option<f64>,
    pub scale_extra: Option<f64>,
    pub scroll_threshold: Option<f64>,
    pub z_index: Option<i32>,
    pub custom_size: Option<CustomSize>,
}

/// Lifecycle callback slots.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Hook {
    /// Open transition finished.
    Open,
    /// Close transition finished and styles were restored.
    Close,
    /// Grab transition finished.
    Grab,
    /// Move transition finished.
    Move,
    /// Release transition finished.
    Release,
    /// About to open.
    BeforeOpen,
    /// About to close.
    BeforeClose,
    /// About to grab.
    BeforeGrab,
    /// About to move.
    BeforeMove,
    /// About to release.
    BeforeRelease,
    /// Started loading the hi-res source of the target being opened.
    ImageLoading,
    /// The hi-res source of the open target finished loading.
    ImageLoaded,
}

impl Hook {
    const COUNT: usize = 12;

    /// Every hook, in slot order.
    pub const ALL: [Self; Self::COUNT] = [
        Self::Open,
        Self::Close,
        Self::Grab,
        Self::Move,
        Self::Release,
        Self::BeforeOpen,
        Self::BeforeClose,
        Self::BeforeGrab,
        Self::BeforeMove,
        Self::BeforeRelease,
        Self::ImageLoading,
        Self::ImageLoaded,
    ];

    fn index(self) -> usize {
        self as usize
    }
}

type Callback<E> = Box<dyn FnMut(&E)>;

/// The twelve lifecycle callbacks, each optional.
///
/// Hooks are notifications: a `Before*` hook runs before the state change and
/// the visual change, but cannot cancel the operation.
pub struct Hooks<E> {
    slots: [Option<Callback<E>>; Hook::COUNT],
}

impl<E> Default for Hooks<E> {
    fn default() -> Self {
        Self {
            slots: core::array::from_fn(|_| None),
        }
    }
}

impl<E> Hooks<E> {
    /// No hooks installed.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`Hooks::set`].
    #[must_use]
    pub fn with(mut self, hook: Hook, callback: impl FnMut(&E) + 'static) -> Self {
        self.set(hook, callback);
        self
    }

    /// Installs `callback` in `hook`'s slot, replacing any previous one.
    pub fn set(&mut self, hook: Hook, callback: impl FnMut(&E) + 'static) {
        self.slots[hook.index()] = Some(Box::new(callback));
    }

    /// Empties `hook`'s slot.
    pub fn clear(&mut self, hook: Hook) {
        self.slots[hook.index()] = None;
    }

    /// Returns `true` if `hook` has a callback.
    #[must_use]
    pub fn is_set(&self, hook: Hook) -> bool {
        self.slots[hook.index()].is_some()
    }

    pub(crate) fn fire(&mut self, hook: Hook, el: &E) {
        if let Some(callback) = self.slots[hook.index()].as_mut() {
            callback(el);
        }
    }
}

impl<E> fmt::Debug for Hooks<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set()
            .entries(Hook::ALL.iter().filter(|hook| self.is_set(**hook)))
            .finish()
    }
}

/// Settings plus hooks, consumed by [`Zooming::new`](crate::Zooming::new).
#[derive(Debug)]
pub struct Options<E> {
    /// Data configuration.
    pub settings: Settings,
    /// Lifecycle callbacks.
    pub hooks: Hooks<E>,
}

impl<E> Default for Options<E> {
    fn default() -> Self {
        Self {
            settings: Settings::default(),
            hooks: Hooks::default(),
        }
    }
}

impl<E> From<Settings> for Options<E> {
    fn from(settings: Settings) -> Self {
        Self {
            settings,
            hooks: Hooks::default(),
        }
    }
}
