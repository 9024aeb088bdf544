// Copyright 2026 the Loupe Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::string::String;
use alloc::vec::Vec;

use kurbo::Point;

bitflags::bitflags! {
    /// Modifier keys held during a pointer event.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct Modifiers: u8 {
        /// Shift.
        const SHIFT = 1 << 0;
        /// Control.
        const CTRL = 1 << 1;
        /// Alt / Option.
        const ALT = 1 << 2;
        /// Meta / Command / Windows.
        const META = 1 << 3;
    }
}

impl Modifiers {
    /// Meta or Control: the "open the original in a new tab" escape hatch.
    #[must_use]
    pub fn opens_new_window(self) -> bool {
        self.intersects(Self::META | Self::CTRL)
    }
}

/// Mouse button of a press or release.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MouseButton {
    /// Usually the left button.
    Primary,
    /// Usually the wheel button.
    Auxiliary,
    /// Usually the right button.
    Secondary,
    /// Any other button, by DOM button index.
    Other(u16),
}

impl MouseButton {
    /// Maps a DOM `MouseEvent.button` index.
    #[must_use]
    pub fn from_dom(button: i16) -> Self {
        match button {
            0 => Self::Primary,
            1 => Self::Auxiliary,
            2 => Self::Secondary,
            other => Self::Other(other.unsigned_abs()),
        }
    }
}

/// Keys the router reacts to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Key {
    /// Escape.
    Escape,
    /// Anything else.
    Other,
}

impl Key {
    /// Maps a DOM `KeyboardEvent.key` value.
    #[must_use]
    pub fn from_dom(key: &str) -> Self {
        match key {
            "Escape" | "Esc" => Self::Escape,
            _ => Self::Other,
        }
    }
}

/// Raw input delivered to [`Zooming::handle`](crate::Zooming::handle).
///
/// Positions are client (viewport) coordinates.
#[derive(Clone, Debug, PartialEq)]
pub enum Event<E> {
    /// A registered zoomable element was clicked.
    Click {
        /// The element the click listener was registered on.
        target: E,
        /// Modifier keys held.
        modifiers: Modifiers,
    },
    /// The overlay was clicked.
    OverlayClick,
    /// The document scrolled; `position` is the new scroll offset.
    Scroll {
        /// Current horizontal and vertical scroll offset.
        position: Point,
    },
    /// A key was pressed.
    KeyDown {
        /// The key.
        key: Key,
    },
    /// A mouse button went down.
    MouseDown {
        /// Pointer position.
        position: Point,
        /// Button pressed.
        button: MouseButton,
        /// Modifier keys held.
        modifiers: Modifiers,
    },
    /// The mouse moved.
    MouseMove {
        /// Pointer position.
        position: Point,
    },
    /// A mouse button went up.
    MouseUp {
        /// Button released.
        button: MouseButton,
        /// Modifier keys held.
        modifiers: Modifiers,
    },
    /// Touches began; `touches` lists every active touch point.
    TouchStart {
        /// All active touch points.
        touches: Vec<Point>,
    },
    /// Touches moved; `touches` lists every active touch point.
    TouchMove {
        /// All active touch points.
        touches: Vec<Point>,
    },
    /// A touch ended.
    TouchEnd {
        /// Touches still active on the event target.
        remaining: usize,
    },
    /// The window was resized.
    Resize,
    /// A CSS transition finished on `target`.
    TransitionEnd {
        /// The element whose transition ended.
        target: E,
    },
    /// A source requested through [`Host::preload_image`](crate::Host::preload_image) loaded.
    ImageLoaded {
        /// The loaded URL.
        src: String,
    },
}
