// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Public types for dropdowns: identifiers, trigger and alignment modes, visibility,
//! and the element markers used to classify pointer targets.

use alloc::format;
use alloc::string::String;
use core::fmt;
use core::sync::atomic::{AtomicU64, Ordering};

/// Counter backing [`DropdownId::next`].
static NEXT_DROPDOWN_ID: AtomicU64 = AtomicU64::new(1);

/// Identifier for a dropdown instance.
///
/// Ids are allocated from a process-wide counter. They are unique within a process
/// and are not meant to be unpredictable.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct DropdownId(pub(crate) u64);

impl DropdownId {
    /// Allocate a fresh id.
    pub fn next() -> Self {
        Self(NEXT_DROPDOWN_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// Raw numeric value.
    pub const fn get(self) -> u64 {
        self.0
    }

    /// Id rendered as a string suitable for an element id or a query selector.
    pub fn dom_id(self) -> String {
        format!("{self}")
    }
}

impl fmt::Display for DropdownId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "understory-dropdown-{:x}", self.0)
    }
}

/// Which family of pointer events opens a dropdown.
///
/// The mode is fixed for the lifetime of an instance. Click dropdowns ignore hover
/// events and hover dropdowns ignore click toggles.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
pub enum Trigger {
    /// Clicking the trigger toggles the body.
    #[default]
    Click,
    /// Entering the trigger opens the body; leaving closes it.
    Hover,
}

/// Side of the trigger the body is placed on.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
pub enum Align {
    /// Body sits above the trigger, left edges aligned.
    Top,
    /// Body sits to the right of the trigger, top edges aligned.
    Right,
    /// Body sits below the trigger, left edges aligned.
    #[default]
    Bottom,
    /// Body sits to the left of the trigger, top edges aligned.
    Left,
}

/// Visibility state of a dropdown.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
pub enum Visibility {
    /// Body is not shown.
    #[default]
    Hidden,
    /// The pre-open hook is pending; the body is still not shown.
    Loading,
    /// Body is shown.
    Shown,
}

bitflags::bitflags! {
    /// Dropdown markers found on an element or its ancestors.
    ///
    /// Hosts tag trigger elements with [`Markers::TRIGGER`], body panels with
    /// [`Markers::BODY`], and nested dropdown containers with [`Markers::SUB`].
    /// Pointer events carry the union of the markers along the target's ancestry.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct Markers: u8 {
        /// Element is (inside) a dropdown trigger.
        const TRIGGER = 0b0000_0001;
        /// Element is (inside) a dropdown body panel.
        const BODY    = 0b0000_0010;
        /// Element is (inside) a nested sub-dropdown.
        const SUB     = 0b0000_0100;
    }
}

impl Default for Markers {
    fn default() -> Self {
        Self::empty()
    }
}

impl Markers {
    /// True if the element belongs to any dropdown trigger or body.
    pub const fn is_dropdown(self) -> bool {
        self.intersects(Self::TRIGGER.union(Self::BODY))
    }

    /// Fold the markers of an ancestry chain, target first.
    pub fn from_ancestry(chain: impl IntoIterator<Item = Self>) -> Self {
        chain.into_iter().fold(Self::empty(), |acc, m| acc | m)
    }
}

/// Where a pointer interaction happened, as seen by the dropdown.
///
/// For leave events this describes the element the pointer moved to; `None` in
/// a leave means the pointer left without a related target (for example, it
/// left the window).
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
pub struct PointerTarget {
    /// Union of dropdown markers along the target's ancestry.
    pub markers: Markers,
}

impl PointerTarget {
    /// A target outside every dropdown.
    pub const OUTSIDE: Self = Self {
        markers: Markers::empty(),
    };

    /// A target inside a trigger.
    pub const TRIGGER: Self = Self {
        markers: Markers::TRIGGER,
    };

    /// A target inside a body panel.
    pub const BODY: Self = Self {
        markers: Markers::BODY,
    };

    /// Build a target from its markers.
    pub const fn new(markers: Markers) -> Self {
        Self { markers }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_distinct_and_render_as_dom_ids() {
        let a = DropdownId::next();
        let b = DropdownId::next();
        assert_ne!(a, b);
        assert!(a.dom_id().starts_with("understory-dropdown-"));
        assert_eq!(alloc::string::ToString::to_string(&a), a.dom_id());
    }

    #[test]
    fn ancestry_folds_markers() {
        let m = Markers::from_ancestry([Markers::empty(), Markers::SUB, Markers::BODY]);
        assert_eq!(m, Markers::SUB | Markers::BODY);
        assert!(m.is_dropdown());
        assert!(!Markers::SUB.is_dropdown());
        assert!(!Markers::from_ancestry([]).is_dropdown());
    }

    #[test]
    fn defaults_match_component_defaults() {
        assert_eq!(Trigger::default(), Trigger::Click);
        assert_eq!(Align::default(), Align::Bottom);
        assert_eq!(Visibility::default(), Visibility::Hidden);
    }
}
