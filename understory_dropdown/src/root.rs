// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Application root: the shared context every dropdown is mounted into.

use alloc::rc::Rc;
use core::fmt;

use crate::channel::DismissChannel;
use crate::dropdown::{Dropdown, DropdownConfig};
use crate::layout::LayoutQueue;
use crate::surface::{Surface, ancestry_markers};
use crate::types::PointerTarget;

/// Shared context for the dropdowns under one application root.
///
/// Holds the host [`Surface`], the root's [`DismissChannel`], and its
/// [`LayoutQueue`]. Cloning yields another handle to the same root.
pub struct DropdownRoot<S: Surface> {
    surface: Rc<S>,
    channel: DismissChannel,
    layout: Rc<LayoutQueue>,
}

impl<S: Surface> Clone for DropdownRoot<S> {
    fn clone(&self) -> Self {
        Self {
            surface: self.surface.clone(),
            channel: self.channel.clone(),
            layout: self.layout.clone(),
        }
    }
}

impl<S: Surface> fmt::Debug for DropdownRoot<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DropdownRoot")
            .field("channel", &self.channel)
            .field("layout", &self.layout)
            .finish_non_exhaustive()
    }
}

impl<S: Surface> DropdownRoot<S> {
    /// Create a root over `surface` with a fresh channel and layout queue.
    pub fn new(surface: Rc<S>) -> Self {
        Self {
            surface,
            channel: DismissChannel::new(),
            layout: Rc::new(LayoutQueue::new()),
        }
    }

    /// Host surface.
    pub fn surface(&self) -> &Rc<S> {
        &self.surface
    }

    /// Dismissal channel shared by this root's dropdowns.
    pub fn channel(&self) -> &DismissChannel {
        &self.channel
    }

    /// Queue of measurements waiting for the next layout pass.
    pub fn layout(&self) -> &Rc<LayoutQueue> {
        &self.layout
    }

    /// Forward a document-level pointer-down on `target`.
    ///
    /// Returns `true` if it landed outside every dropdown and the watcher hid them all.
    pub fn pointer_down(&self, target: &S::Element) -> bool {
        let markers = ancestry_markers(&*self.surface, target);
        self.channel.pointer_down(PointerTarget::new(markers))
    }

    /// Run the measurements queued for after layout. Call once per layout pass, before painting.
    pub fn after_layout(&self) -> usize {
        self.layout.flush()
    }
}

impl<S: Surface + 'static> DropdownRoot<S> {
    /// Mount a dropdown under this root. See [`Dropdown::mount`].
    pub fn mount(&self, config: DropdownConfig<S::Element>) -> Dropdown<S> {
        Dropdown::mount(self, config)
    }
}
