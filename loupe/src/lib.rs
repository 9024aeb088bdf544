// Copyright 2026 the Loupe Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Loupe: headless in-page image zoom.
//!
//! Clicking a registered image smoothly enlarges it toward the center of the
//! viewport over a dimmed backdrop; clicking again, scrolling away, pressing
//! Escape, or resizing the window returns it to its original place. While
//! zoomed, press-and-hold (or a multi-touch pinch) grabs the image so it can
//! be dragged and enlarged further.
//!
//! The crate is split along these lines:
//!
//! - [`Zooming`]: the state machine. It owns the `shown`/`lock`/`released`
//!   flags, the current [`Target`], the overlay, and the configuration, and
//!   exposes the operations `listen`, `open`, `close`, `grab`, `move_to`,
//!   `release`, and `config`.
//! - [`Zooming::handle`]: the event router. It turns raw [`Event`]s into those
//!   operations, including press-and-hold detection and pinch tracking.
//! - [`Host`]: everything Loupe needs from a document. Loupe never touches a
//!   DOM directly; a browser adapter (see `loupe_web`) or a test double
//!   implements this trait and passes itself into every call.
//! - [`StyleBatch`] and [`set_style_remembering`]: batched inline style writes
//!   that return the values they replaced, so the target can be restored
//!   exactly after closing.
//!
//! The transform math lives in `loupe_geometry` and is re-exported where it
//! appears in this crate's API.
//!
//! ## Asynchronous completion
//!
//! Every visual change runs as a CSS transition. Operations return as soon as
//! the styles are written and register a one-shot completion; the host reports
//! [`Event::TransitionEnd`] for the target and the completion clears `lock` and
//! fires the after-hooks. While `lock` is set, every operation is dropped with
//! [`Rejected::Locked`]. Nothing is queued.
//!
//! Timers work the same way: the core hands a [`Task`] to
//! [`Host::schedule`] and the host gives it back through
//! [`Zooming::run_task`] when the delay elapses.
//!
//! ## Minimal example
//!
//! ```rust
//! use loupe::{Event, Hook, Host, Modifiers, Options, Rejected, SettingsPatch, Zooming};
//!
//! fn zoom_on_click<H: Host>(host: &mut H, images: &str, clicked: H::Element) {
//!     let mut options: Options<H::Element> = Options::default();
//!     options.settings.bg_color = "#000".into();
//!     options.hooks.set(Hook::Open, |el| tracing::info!(?el, "zoomed"));
//!
//!     let mut zooming = Zooming::new(host, options);
//!     zooming.listen_selector(host, images);
//!     zooming.config(host, SettingsPatch {
//!         scroll_threshold: Some(80.0),
//!         ..SettingsPatch::default()
//!     });
//!
//!     let click = Event::Click { target: clicked.clone(), modifiers: Modifiers::empty() };
//!     let prevent_default = zooming.handle(host, click);
//!     assert!(prevent_default);
//!
//!     // The open transition has not ended yet.
//!     assert_eq!(zooming.close(host), Err(Rejected::Locked));
//!     zooming.handle(host, Event::TransitionEnd { target: clicked });
//!     assert!(zooming.state().shown);
//! }
//! ```
//!
//! ## Features
//!
//! - `std` (default): compile dependencies with the standard library.
//! - `libm`: floating point support for `no_std` targets.
//! - `serde`: deserialize [`Settings`] and [`SettingsPatch`] from partial
//!   configuration documents with camelCase keys.
//!
//! This crate is `no_std` compatible (with `alloc`).

#![no_std]

extern crate alloc;

mod error;
mod event;
mod host;
mod options;
mod overlay;
mod router;
mod style;
mod target;
mod zooming;

pub use error::Rejected;
pub use event::{Event, Key, Modifiers, MouseButton};
pub use host::{Host, Subscriptions, Task, TimerId};
pub use options::{Hook, Hooks, Options, Settings, SettingsPatch};
pub use router::PRESS_DELAY;
pub use style::{StyleBatch, StyleProps, set_style, set_style_remembering};
pub use target::{ORIGINAL_ATTRIBUTE, SWAP_SOURCE_DELAY, Target};
pub use zooming::{State, Zooming};

pub use loupe_geometry::{CustomSize, ZoomTransform};
