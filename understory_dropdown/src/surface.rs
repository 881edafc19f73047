// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Host environment seen by a dropdown.
//!
//! A dropdown never touches a document tree directly. The host implements
//! [`Surface`] to answer measurement queries and to apply the one style mutation the
//! dropdown needs (suppressing overflow on a scroll-lock target).
//!
//! Methods take `&self`; hosts that need to mutate their own bookkeeping use
//! interior mutability, the same way the rest of a single-threaded UI loop does.

use alloc::string::String;
use core::fmt::Debug;

use kurbo::{Rect, Size, Vec2};

use crate::types::{DropdownId, Markers};

/// Measurement and style access provided by the host.
pub trait Surface {
    /// Host element handle.
    type Element: Clone + Debug;

    /// Bounding box of the dropdown's trigger in viewport coordinates.
    ///
    /// Returns `None` if the trigger is not currently mounted.
    fn trigger_bounds(&self, id: DropdownId) -> Option<Rect>;

    /// Rendered size of the dropdown's body panel.
    ///
    /// Returns `None` if the body is not currently part of the layout.
    fn body_size(&self, id: DropdownId) -> Option<Size>;

    /// Current page scroll offset.
    fn scroll_offset(&self) -> Vec2;

    /// Resolve a selector to an element, if one matches.
    fn query_selector(&self, selector: &str) -> Option<Self::Element>;

    /// Suppress (`true`) or restore (`false`) the element's overflow.
    fn set_overflow_suppressed(&self, element: &Self::Element, suppressed: bool);

    /// Dropdown markers carried by `element` itself.
    fn markers(&self, element: &Self::Element) -> Markers {
        let _ = element;
        Markers::empty()
    }

    /// Parent of `element`, or `None` at the root.
    fn parent(&self, element: &Self::Element) -> Option<Self::Element> {
        let _ = element;
        None
    }
}

/// Union of the markers on `element` and all of its ancestors.
///
/// This is the equivalent of asking whether the element is inside a trigger or a body.
pub fn ancestry_markers<S: Surface + ?Sized>(surface: &S, element: &S::Element) -> Markers {
    let mut markers = surface.markers(element);
    let mut cursor = surface.parent(element);
    while let Some(el) = cursor {
        markers |= surface.markers(&el);
        cursor = surface.parent(&el);
    }
    markers
}

/// Element whose overflow is suppressed while a dropdown is shown.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ScrollLock<E> {
    /// A direct element handle.
    Element(E),
    /// A selector, resolved each time the dropdown opens or closes.
    Selector(String),
}

impl<E: Clone> ScrollLock<E> {
    /// Resolve to an element at the moment of use.
    pub fn resolve<S>(&self, surface: &S) -> Option<E>
    where
        S: Surface<Element = E> + ?Sized,
    {
        match self {
            Self::Element(el) => Some(el.clone()),
            Self::Selector(sel) => surface.query_selector(sel),
        }
    }

    /// Apply the lock for the given shown state. A target that does not resolve is ignored.
    pub fn apply<S>(&self, surface: &S, shown: bool)
    where
        S: Surface<Element = E> + ?Sized,
    {
        match self.resolve(surface) {
            Some(el) => surface.set_overflow_suppressed(&el, shown),
            None => tracing::trace!("scroll-lock target not found; skipping"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::TestSurface;

    #[test]
    fn selector_resolves_at_use() {
        let surface = TestSurface::new();
        let lock: ScrollLock<u32> = ScrollLock::Selector("body".into());
        lock.apply(&surface, true);
        assert!(surface.overflow_log().is_empty());

        surface.add_selector("body", 9);
        lock.apply(&surface, true);
        lock.apply(&surface, false);
        assert_eq!(surface.overflow_log(), [(9, true), (9, false)]);
    }

    #[test]
    fn element_lock_skips_lookup() {
        let surface = TestSurface::new();
        ScrollLock::Element(3).apply(&surface, true);
        assert_eq!(surface.overflow_log(), [(3, true)]);
    }

    #[test]
    fn ancestry_collects_markers() {
        let surface = TestSurface::new();
        // 1 (body) → 2 → 3 (sub)
        surface.add_element(1, None, Markers::BODY);
        surface.add_element(2, Some(1), Markers::empty());
        surface.add_element(3, Some(2), Markers::SUB);
        assert_eq!(ancestry_markers(&surface, &3), Markers::BODY | Markers::SUB);
        assert_eq!(ancestry_markers(&surface, &2), Markers::BODY);

        surface.add_element(10, None, Markers::empty());
        assert!(!ancestry_markers(&surface, &10).is_dropdown());
    }
}
