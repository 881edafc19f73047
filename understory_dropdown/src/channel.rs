// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Root-scoped dismissal channel.
//!
//! Every dropdown mounted under one application root shares a [`DismissChannel`].
//! The channel carries two broadcasts:
//!
//! - [`ChannelEvent::Opening`]: a dropdown is opening; every other subscriber closes.
//! - [`ChannelEvent::HideAll`]: every subscriber closes.
//!
//! It also owns the outside-click watcher. The host forwards document pointer-downs
//! to [`DismissChannel::pointer_down`]; once the watcher is installed, a pointer-down
//! whose target is outside every trigger and body hides everything. Installation is
//! guarded by a flag on the channel, so installing twice still yields one watcher.
//!
//! ```
//! use core::cell::Cell;
//! use std::rc::Rc;
//! use understory_dropdown::{ChannelEvent, DismissChannel, DropdownId, PointerTarget};
//!
//! let channel = DismissChannel::new();
//! let me = DropdownId::next();
//! let closes = Rc::new(Cell::new(0));
//!
//! let c = closes.clone();
//! let _sub = channel.subscribe(Some(me), move |_| c.set(c.get() + 1));
//!
//! // Our own announcement skips us.
//! assert_eq!(channel.announce_opening(me), 0);
//!
//! // Outside clicks only count once the watcher is installed.
//! assert!(!channel.pointer_down(PointerTarget::OUTSIDE));
//! assert!(channel.install_global_dismiss_watch());
//! assert!(!channel.install_global_dismiss_watch());
//! assert!(channel.pointer_down(PointerTarget::OUTSIDE));
//! assert_eq!(closes.get(), 1);
//! ```
//!
//! Delivery is synchronous and in subscription order. The subscriber list is
//! snapshotted before delivery, so listeners may subscribe or unsubscribe while a
//! broadcast is running.

use alloc::rc::{Rc, Weak};
use alloc::vec::Vec;
use core::cell::{Cell, RefCell};
use core::fmt;

use smallvec::SmallVec;

use crate::types::{DropdownId, PointerTarget};

/// Broadcast carried by a [`DismissChannel`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ChannelEvent {
    /// The given dropdown is opening; others should close.
    Opening(DropdownId),
    /// Everyone should close.
    HideAll,
}

type Listener = Rc<RefCell<dyn FnMut(ChannelEvent)>>;

struct Entry {
    key: u64,
    owner: Option<DropdownId>,
    listener: Listener,
}

#[derive(Default)]
struct Inner {
    entries: RefCell<Vec<Entry>>,
    next_key: Cell<u64>,
    watch_installed: Cell<bool>,
}

/// Shared dismissal bus for the dropdowns under one application root.
///
/// Cloning yields another handle to the same channel.
#[derive(Clone, Default)]
pub struct DismissChannel {
    inner: Rc<Inner>,
}

impl fmt::Debug for DismissChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DismissChannel")
            .field("subscribers", &self.subscriber_count())
            .field("watch_installed", &self.is_watch_installed())
            .finish()
    }
}

impl DismissChannel {
    /// Create a channel for a new application root.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `listener`.
    ///
    /// `owner` identifies the subscribing dropdown so that its own
    /// [`announce_opening`](Self::announce_opening) skips it. The listener stays
    /// registered until the returned [`Subscription`] is dropped.
    pub fn subscribe(
        &self,
        owner: Option<DropdownId>,
        listener: impl FnMut(ChannelEvent) + 'static,
    ) -> Subscription {
        let key = self.inner.next_key.get();
        self.inner.next_key.set(key + 1);
        let listener: Listener = Rc::new(RefCell::new(listener));
        self.inner.entries.borrow_mut().push(Entry {
            key,
            owner,
            listener,
        });
        Subscription {
            key,
            channel: Rc::downgrade(&self.inner),
        }
    }

    /// Number of live subscriptions.
    pub fn subscriber_count(&self) -> usize {
        self.inner.entries.borrow().len()
    }

    /// Tell every subscriber except `from` that `from` is opening.
    ///
    /// Returns the number of listeners the event was delivered to.
    pub fn announce_opening(&self, from: DropdownId) -> usize {
        self.deliver(ChannelEvent::Opening(from), Some(from))
    }

    /// Tell every subscriber to close.
    ///
    /// Returns the number of listeners the event was delivered to.
    pub fn announce_hide_all(&self) -> usize {
        self.deliver(ChannelEvent::HideAll, None)
    }

    /// Install the outside-click watcher.
    ///
    /// Returns `true` if this call installed it, `false` if it was already installed.
    pub fn install_global_dismiss_watch(&self) -> bool {
        if self.inner.watch_installed.replace(true) {
            return false;
        }
        tracing::debug!("installed outside-click dismiss watcher");
        true
    }

    /// True once [`install_global_dismiss_watch`](Self::install_global_dismiss_watch) has run.
    pub fn is_watch_installed(&self) -> bool {
        self.inner.watch_installed.get()
    }

    /// Feed a document-level pointer-down.
    ///
    /// If the watcher is installed and `target` is outside every trigger and body, hides
    /// all dropdowns and returns `true`.
    pub fn pointer_down(&self, target: PointerTarget) -> bool {
        if !self.is_watch_installed() || target.markers.is_dropdown() {
            return false;
        }
        tracing::debug!("pointer-down outside dropdowns; hiding all");
        self.announce_hide_all();
        true
    }

    fn deliver(&self, event: ChannelEvent, skip: Option<DropdownId>) -> usize {
        let targets: SmallVec<[Listener; 8]> = self
            .inner
            .entries
            .borrow()
            .iter()
            .filter(|e| skip.is_none() || e.owner != skip)
            .map(|e| e.listener.clone())
            .collect();
        tracing::trace!(?event, receivers = targets.len(), "broadcast");
        let mut delivered = 0;
        for listener in targets {
            // A listener that is already running (it triggered this broadcast) is skipped.
            let Ok(mut f) = listener.try_borrow_mut() else {
                continue;
            };
            (&mut *f)(event);
            delivered += 1;
        }
        delivered
    }
}

/// Registration handle returned by [`DismissChannel::subscribe`].
///
/// Dropping it unsubscribes.
#[must_use = "dropping a Subscription unsubscribes immediately"]
pub struct Subscription {
    key: u64,
    channel: Weak<Inner>,
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("key", &self.key)
            .field("live", &(self.channel.strong_count() > 0))
            .finish()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(inner) = self.channel.upgrade() {
            inner.entries.borrow_mut().retain(|e| e.key != self.key);
        }
    }
}
