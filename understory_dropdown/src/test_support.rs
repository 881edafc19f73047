// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! In-memory [`Surface`] used by unit tests.

use alloc::collections::BTreeMap;
use alloc::string::{String, ToString};
use alloc::vec::Vec;
use core::cell::{Cell, RefCell};

use kurbo::{Rect, Size, Vec2};

use crate::surface::Surface;
use crate::types::{DropdownId, Markers};

#[derive(Debug, Default)]
pub(crate) struct TestSurface {
    triggers: RefCell<BTreeMap<DropdownId, Rect>>,
    bodies: RefCell<BTreeMap<DropdownId, Size>>,
    scroll: Cell<Vec2>,
    selectors: RefCell<BTreeMap<String, u32>>,
    elements: RefCell<BTreeMap<u32, (Option<u32>, Markers)>>,
    overflow: RefCell<Vec<(u32, bool)>>,
}

impl TestSurface {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn set_trigger(&self, id: DropdownId, rect: Rect) {
        self.triggers.borrow_mut().insert(id, rect);
    }

    pub(crate) fn remove_trigger(&self, id: DropdownId) {
        self.triggers.borrow_mut().remove(&id);
    }

    pub(crate) fn set_body(&self, id: DropdownId, size: Size) {
        self.bodies.borrow_mut().insert(id, size);
    }

    pub(crate) fn set_scroll(&self, scroll: Vec2) {
        self.scroll.set(scroll);
    }

    pub(crate) fn add_selector(&self, selector: &str, element: u32) {
        self.selectors
            .borrow_mut()
            .insert(selector.to_string(), element);
    }

    pub(crate) fn add_element(&self, element: u32, parent: Option<u32>, markers: Markers) {
        self.elements
            .borrow_mut()
            .insert(element, (parent, markers));
    }

    pub(crate) fn overflow_log(&self) -> Vec<(u32, bool)> {
        self.overflow.borrow().clone()
    }
}

impl Surface for TestSurface {
    type Element = u32;

    fn trigger_bounds(&self, id: DropdownId) -> Option<Rect> {
        self.triggers.borrow().get(&id).copied()
    }

    fn body_size(&self, id: DropdownId) -> Option<Size> {
        self.bodies.borrow().get(&id).copied()
    }

    fn scroll_offset(&self) -> Vec2 {
        self.scroll.get()
    }

    fn query_selector(&self, selector: &str) -> Option<u32> {
        self.selectors.borrow().get(selector).copied()
    }

    fn set_overflow_suppressed(&self, element: &u32, suppressed: bool) {
        self.overflow.borrow_mut().push((*element, suppressed));
    }

    fn markers(&self, element: &u32) -> Markers {
        self.elements
            .borrow()
            .get(element)
            .map(|(_, m)| *m)
            .unwrap_or_default()
    }

    fn parent(&self, element: &u32) -> Option<u32> {
        self.elements.borrow().get(element).and_then(|(p, _)| *p)
    }
}
