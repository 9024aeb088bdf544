// Copyright 2026 the Loupe Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Batched inline style writes with optional snapshot of the prior values.
//!
//! [`set_style_remembering`] returns the values it overwrote as a new
//! [`StyleBatch`]; applying that batch with [`set_style`] puts the element back
//! exactly as it was. This pairing is how a zoomed target returns to its
//! pre-zoom styling without the caller tracking individual properties.

use alloc::string::String;

use smallvec::SmallVec;

use crate::host::Host;

/// Host-specific names of the `transition` and `transform` style properties.
///
/// Detected once per instance from [`Host::supports_style`]; unprefixed names
/// win, then `-webkit-`, then `-moz-`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StyleProps {
    transition: &'static str,
    transform: &'static str,
}

impl Default for StyleProps {
    fn default() -> Self {
        Self {
            transition: "transition",
            transform: "transform",
        }
    }
}

impl StyleProps {
    const TRANSITIONS: [&'static str; 3] = ["transition", "-webkit-transition", "-moz-transition"];
    const TRANSFORMS: [&'static str; 3] = ["transform", "-webkit-transform", "-moz-transform"];

    /// Picks the first supported name of each property.
    #[must_use]
    pub fn detect(supports: impl Fn(&str) -> bool) -> Self {
        let pick = |names: [&'static str; 3]| names.into_iter().find(|name| supports(name));
        let fallback = Self::default();
        Self {
            transition: pick(Self::TRANSITIONS).unwrap_or(fallback.transition),
            transform: pick(Self::TRANSFORMS).unwrap_or(fallback.transform),
        }
    }

    /// The host's name for `transition`.
    #[must_use]
    pub fn transition(&self) -> &'static str {
        self.transition
    }

    /// The host's name for `transform`, as used in style keys and in
    /// `transition` values.
    #[must_use]
    pub fn transform(&self) -> &'static str {
        self.transform
    }

    /// Rewrites the logical `transition` and `transform` keys; other keys pass through.
    #[must_use]
    pub fn normalize(&self, property: &'static str) -> &'static str {
        match property {
            "transition" => self.transition,
            "transform" => self.transform,
            other => other,
        }
    }
}

/// An ordered set of inline style assignments.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StyleBatch {
    entries: SmallVec<[(&'static str, String); 8]>,
}

impl StyleBatch {
    /// An empty batch.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`StyleBatch::set`].
    #[must_use]
    pub fn with(mut self, property: &'static str, value: impl Into<String>) -> Self {
        self.set(property, value);
        self
    }

    /// Sets `property`, replacing an earlier assignment of the same property.
    pub fn set(&mut self, property: &'static str, value: impl Into<String>) {
        let value = value.into();
        match self.entries.iter_mut().find(|(p, _)| *p == property) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((property, value)),
        }
    }

    /// Value assigned to `property`, if any.
    #[must_use]
    pub fn get(&self, property: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(p, _)| *p == property)
            .map(|(_, v)| v.as_str())
    }

    /// Adds every assignment of `other` that this batch does not already have.
    ///
    /// Used to combine snapshots taken in several steps while keeping the
    /// earliest captured value of each property.
    pub fn absorb(&mut self, other: Self) {
        for (property, value) in other.entries {
            if self.get(property).is_none() {
                self.entries.push((property, value));
            }
        }
    }

    /// Returns `true` if the batch assigns nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of assignments.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Iterates assignments in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> + '_ {
        self.entries.iter().map(|(p, v)| (*p, v.as_str()))
    }
}

/// Applies `batch` to `el`.
pub fn set_style<H: Host>(host: &mut H, el: &H::Element, batch: &StyleBatch, props: StyleProps) {
    for (property, value) in batch.iter() {
        host.set_style(el, props.normalize(property), value);
    }
}

/// Applies `batch` to `el` and returns the values it replaced.
///
/// Every touched property is captured before it is overwritten, with unset
/// properties captured as the empty string. Keys in the returned batch are
/// already normalized.
pub fn set_style_remembering<H: Host>(
    host: &mut H,
    el: &H::Element,
    batch: &StyleBatch,
    props: StyleProps,
) -> StyleBatch {
    let mut prior = StyleBatch::new();
    for (property, value) in batch.iter() {
        let property = props.normalize(property);
        prior.set(property, host.style(el, property));
        host.set_style(el, property, value);
    }
    prior
}
