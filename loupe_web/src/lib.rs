// Copyright 2026 the Loupe Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Browser adapter for Loupe.
//!
//! This crate wires the headless `loupe` state machine to a real page when
//! targeting `wasm32`: a [`WebHost`] implements `loupe::Host` over `web_sys`,
//! and [`Loupe`] owns one instance together with its host, its DOM listeners,
//! and its timers.
//!
//! # Usage
//!
//! ```no_run
//! #[cfg(target_arch = "wasm32")]
//! fn zoom_all_figures() -> Result<loupe_web::Loupe, wasm_bindgen::JsValue> {
//!     let mut options = loupe::Options::default();
//!     options.settings.bg_color = "rgb(0, 0, 0)".into();
//!     let loupe = loupe_web::Loupe::new(options)?;
//!     loupe.listen("figure img");
//!     Ok(loupe)
//! }
//! ```
//!
//! Notes:
//! - Click listeners are attached per zoomable element; scroll, keyboard,
//!   resize, and pointer listeners are attached to the document only while the
//!   instance asks for them.
//! - `transitionend` is observed on the document, so targets do not need to be
//!   registered through `listen` to complete an open or close.
//! - Hooks run while the instance is borrowed. Calling back into the same
//!   [`Loupe`] from a hook is dropped with a warning.
//! - Dropping the last [`Loupe`] handle detaches every listener and clears
//!   pending timers.

#![no_std]

extern crate alloc;

#[cfg(target_arch = "wasm32")]
mod host;

#[cfg(target_arch = "wasm32")]
pub use host::WebHost;

#[cfg(target_arch = "wasm32")]
pub use web::Loupe;

#[cfg(target_arch = "wasm32")]
mod web {
    use alloc::rc::Rc;
    use core::cell::RefCell;

    use kurbo::Point;
    use loupe::{Options, Rejected, Settings, SettingsPatch, State, Zooming};
    use wasm_bindgen::JsValue;
    use web_sys::HtmlElement;

    use crate::host::{Inner, WebHost, dispatch};

    /// A zoom instance bound to the current document.
    ///
    /// Cloning yields another handle to the same instance.
    #[derive(Clone, Debug)]
    pub struct Loupe {
        inner: Rc<RefCell<Inner>>,
    }

    impl Loupe {
        /// Creates an instance over the current document.
        pub fn new(options: Options<HtmlElement>) -> Result<Self, JsValue> {
            let inner = Rc::new(RefCell::new(Inner {
                zooming: None,
                host: WebHost::new()?,
            }));
            {
                let mut guard = inner.borrow_mut();
                let Inner { zooming, host } = &mut *guard;
                host.bind(Rc::downgrade(&inner));
                *zooming = Some(Zooming::new(host, options));
            }
            Ok(Self { inner })
        }

        /// Runs `f` with the instance and its host.
        ///
        /// Returns `None` when called from inside one of this instance's hooks.
        pub fn with<R>(&self, f: impl FnOnce(&mut Zooming<HtmlElement>, &mut WebHost) -> R) -> Option<R> {
            dispatch(&Rc::downgrade(&self.inner), f)
        }

        fn op(
            &self,
            f: impl FnOnce(&mut Zooming<HtmlElement>, &mut WebHost) -> Result<(), Rejected>,
        ) -> Result<(), Rejected> {
            self.with(f).unwrap_or(Err(Rejected::Locked))
        }

        /// Makes every image matching `selector` zoomable.
        pub fn listen(&self, selector: &str) -> usize {
            self.with(|zooming, host| zooming.listen_selector(host, selector))
                .unwrap_or_default()
        }

        /// Makes `el` zoomable.
        pub fn listen_element(&self, el: &HtmlElement) -> bool {
            self.with(|zooming, host| zooming.listen(host, el))
                .unwrap_or_default()
        }

        /// Zooms `el` in.
        pub fn open(&self, el: &HtmlElement) -> Result<(), Rejected> {
            self.op(|zooming, host| zooming.open(host, el))
        }

        /// Zooms in the first element matching `selector`.
        pub fn open_selector(&self, selector: &str) -> Result<(), Rejected> {
            self.op(|zooming, host| zooming.open_selector(host, selector))
        }

        /// Zooms the current target out.
        pub fn close(&self) -> Result<(), Rejected> {
            self.op(|zooming, host| zooming.close(host))
        }

        /// Grabs the target at client position `(x, y)`.
        pub fn grab(&self, x: f64, y: f64, scale_extra: Option<f64>) -> Result<(), Rejected> {
            self.op(|zooming, host| zooming.grab(host, Point::new(x, y), scale_extra))
        }

        /// Drags the grabbed target to client position `(x, y)`.
        pub fn move_to(&self, x: f64, y: f64, scale_extra: Option<f64>) -> Result<(), Rejected> {
            self.op(|zooming, host| zooming.move_to(host, Point::new(x, y), scale_extra))
        }

        /// Returns a grabbed target to the open pose.
        pub fn release(&self) -> Result<(), Rejected> {
            self.op(|zooming, host| zooming.release(host))
        }

        /// Merges `patch` into the settings.
        pub fn config(&self, patch: SettingsPatch) {
            self.with(|zooming, host| zooming.config(host, patch));
        }

        /// A copy of the current settings.
        #[must_use]
        pub fn settings(&self) -> Option<Settings> {
            self.with(|zooming, _| zooming.settings().clone())
        }

        /// A copy of the state flags.
        #[must_use]
        pub fn state(&self) -> Option<State> {
            self.with(|zooming, _| *zooming.state())
        }
    }
}
