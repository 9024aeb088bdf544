// Copyright 2026 the Loupe Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

/// Why a zoom operation was dropped.
///
/// A rejected operation has no effect: no state flag changes, no style is
/// written, and no hook fires. Rejections are expected in normal use (a
/// double click racing a transition, a scroll while closing) and are safe to
/// ignore.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum Rejected {
    /// A transition is in flight; the operation was dropped, not queued.
    #[error("a zoom transition is in flight")]
    Locked,
    /// A target is already zoomed.
    #[error("a target is already zoomed")]
    AlreadyShown,
    /// No target is zoomed.
    #[error("no target is zoomed")]
    NotShown,
    /// The element is not an image.
    #[error("element is not an image")]
    NotImage,
    /// The selector matched no element.
    #[error("selector matched no element")]
    NoMatch,
}
