// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Dropdown instances: configuration, state, and the visibility state machine.
//!
//! ## States
//!
//! ```text
//!            toggle / hover-enter            hook resolves
//!   Hidden ───────────────────────▶ Loading ───────────────▶ Shown
//!     ▲                               │                        │
//!     │          hook rejects         │                        │
//!     ├───────────────────────────────┘                        │
//!     │  toggle, outside click, sibling opened, hide-all,      │
//!     │  hover leave, grace timer, body click (if enabled)     │
//!     └────────────────────────────────────────────────────────┘
//! ```
//!
//! On `Loading → Shown` the dropdown, in this order:
//! 1. commits to `Shown` and suppresses overflow on its scroll-lock target,
//! 2. announces itself on the [`DismissChannel`] so siblings close (unless the
//!    interaction came from inside a body panel),
//! 3. schedules a measurement on the [`LayoutQueue`]; running it fills
//!    [`DropdownState::top`], [`DropdownState::left`] and [`DropdownState::width`].
//!
//! ## Trigger modes
//!
//! [`Trigger::Click`] dropdowns react to [`Dropdown::toggle`] only.
//! [`Trigger::Hover`] dropdowns react to the enter/leave family only. Leaving the trigger
//! arms a grace timer when the dropdown has a non-empty role; entering the body panel
//! disarms it. Leaving the trigger for somewhere outside every dropdown, or leaving the
//! body for somewhere that is neither a trigger nor a sub-dropdown, closes at once.
//! A leave or grace expiry that arrives while the hook is pending cancels the open:
//! the dropdown settles back to `Hidden` instead of `Shown`. Re-entering the trigger
//! before the hook settles withdraws the cancellation.
//!
//! Time is passed in explicitly as milliseconds. Hosts call [`Dropdown::poll_timers`]
//! from their timer loop; [`Dropdown::next_deadline`] tells them when.

use alloc::boxed::Box;
use alloc::rc::{Rc, Weak};
use alloc::string::String;
use core::cell::{Cell, RefCell};
use core::fmt;

use kurbo::Vec2;

use crate::channel::{ChannelEvent, DismissChannel, Subscription};
use crate::error::{DropdownError, Result};
use crate::hook::{BeforeOpen, OpenResolver, OpenSink, ResolveImmediately};
use crate::layout::LayoutQueue;
use crate::position::try_place;
use crate::root::DropdownRoot;
use crate::surface::{ScrollLock, Surface};
use crate::types::{Align, DropdownId, Markers, PointerTarget, Trigger, Visibility};

/// Default hover grace period in milliseconds.
pub const HOVER_GRACE_MS: u64 = 100;

/// Per-instance configuration.
#[derive(Clone, Debug, PartialEq)]
pub struct DropdownConfig<E> {
    /// Role name. A non-empty role enables the hover grace timer.
    pub role: String,
    /// Element whose overflow is suppressed while shown.
    pub scroll_lock: Option<ScrollLock<E>>,
    /// Side of the trigger the body is placed on.
    pub align: Align,
    /// Manual offset added to the computed position (`x` to left, `y` to top).
    pub offset: Vec2,
    /// Event family that opens the dropdown.
    pub trigger: Trigger,
    /// Close when the body panel is clicked.
    pub close_on_body_click: bool,
    /// Render the trigger as an icon. Presentation only.
    pub is_icon: bool,
    /// Extra class names for the host to render. Presentation only.
    pub class_name: String,
    /// Grace period before a hover dropdown closes after leaving its trigger.
    pub hover_grace_ms: u64,
}

impl<E> Default for DropdownConfig<E> {
    fn default() -> Self {
        Self {
            role: String::new(),
            scroll_lock: None,
            align: Align::Bottom,
            offset: Vec2::ZERO,
            trigger: Trigger::Click,
            close_on_body_click: false,
            is_icon: true,
            class_name: String::new(),
            hover_grace_ms: HOVER_GRACE_MS,
        }
    }
}

impl<E> DropdownConfig<E> {
    /// Default configuration with the given trigger mode.
    pub fn new(trigger: Trigger) -> Self {
        Self {
            trigger,
            ..Self::default()
        }
    }

    /// Set the role.
    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.role = role.into();
        self
    }

    /// Set the scroll-lock target.
    pub fn with_scroll_lock(mut self, lock: ScrollLock<E>) -> Self {
        self.scroll_lock = Some(lock);
        self
    }

    /// Set the alignment.
    pub fn with_align(mut self, align: Align) -> Self {
        self.align = align;
        self
    }

    /// Set the manual offset.
    pub fn with_offset(mut self, x: f64, y: f64) -> Self {
        self.offset = Vec2::new(x, y);
        self
    }

    /// Close when the body is clicked.
    pub fn with_close_on_body_click(mut self, close: bool) -> Self {
        self.close_on_body_click = close;
        self
    }

    /// Set the icon display flag.
    pub fn with_icon(mut self, is_icon: bool) -> Self {
        self.is_icon = is_icon;
        self
    }

    /// Set the extra class names.
    pub fn with_class_name(mut self, class_name: impl Into<String>) -> Self {
        self.class_name = class_name.into();
        self
    }

    /// Set the hover grace period.
    pub fn with_hover_grace_ms(mut self, ms: u64) -> Self {
        self.hover_grace_ms = ms;
        self
    }
}

/// Observable state of a dropdown.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct DropdownState {
    /// Current visibility.
    pub visibility: Visibility,
    /// Body top edge in page coordinates, once measured.
    pub top: Option<f64>,
    /// Body left edge in page coordinates, once measured.
    pub left: Option<f64>,
    /// Trigger width, once measured.
    pub width: Option<f64>,
}

impl DropdownState {
    /// True unless shown.
    pub fn is_hidden(&self) -> bool {
        self.visibility != Visibility::Shown
    }

    /// True while the pre-open hook is pending.
    pub fn is_loading(&self) -> bool {
        self.visibility == Visibility::Loading
    }
}

#[derive(Default)]
struct Inner {
    state: DropdownState,
    grace_deadline: Option<u64>,
    opened_from_body: bool,
    close_when_open: bool,
    attempt: u64,
    failure: Option<(u64, DropdownError)>,
}

struct Shared<S: Surface> {
    id: DropdownId,
    config: DropdownConfig<S::Element>,
    surface: Rc<S>,
    channel: DismissChannel,
    layout: Rc<LayoutQueue>,
    me: Weak<Self>,
    inner: RefCell<Inner>,
    hook: RefCell<Box<dyn BeforeOpen>>,
    hook_running: Cell<bool>,
    _subscription: Subscription,
}

/// One dropdown instance.
///
/// Dropping the handle destroys the instance: it unsubscribes from the channel,
/// cancels its grace timer, and turns any pending resolver or layout task into a
/// no-op.
pub struct Dropdown<S: Surface + 'static> {
    shared: Rc<Shared<S>>,
}

impl<S: Surface + 'static> fmt::Debug for Dropdown<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.shared.inner.borrow();
        f.debug_struct("Dropdown")
            .field("id", &self.shared.id)
            .field("trigger", &self.shared.config.trigger)
            .field("state", &inner.state)
            .field("grace_deadline", &inner.grace_deadline)
            .finish_non_exhaustive()
    }
}

impl<S: Surface + 'static> Dropdown<S> {
    /// Mount a dropdown under `root` with a hook that resolves immediately.
    pub fn mount(root: &DropdownRoot<S>, config: DropdownConfig<S::Element>) -> Self {
        Self::mount_with_hook(root, config, ResolveImmediately)
    }

    /// Mount a dropdown under `root` with a pre-open hook.
    ///
    /// Click dropdowns install the root's outside-click watcher; installing is
    /// idempotent, so any number of click dropdowns share one watcher.
    pub fn mount_with_hook(
        root: &DropdownRoot<S>,
        config: DropdownConfig<S::Element>,
        hook: impl BeforeOpen + 'static,
    ) -> Self {
        let id = DropdownId::next();
        let channel = root.channel().clone();
        if config.trigger == Trigger::Click {
            channel.install_global_dismiss_watch();
        }
        let shared = Rc::new_cyclic(|me: &Weak<Shared<S>>| {
            let listener = me.clone();
            let subscription = channel.subscribe(Some(id), move |event| {
                if let Some(shared) = listener.upgrade() {
                    shared.on_channel(event);
                }
            });
            Shared {
                id,
                config,
                surface: root.surface().clone(),
                channel: channel.clone(),
                layout: root.layout().clone(),
                me: me.clone(),
                inner: RefCell::new(Inner::default()),
                hook: RefCell::new(Box::new(hook)),
                hook_running: Cell::new(false),
                _subscription: subscription,
            }
        });
        tracing::debug!(%id, trigger = ?shared.config.trigger, "mounted dropdown");
        Self { shared }
    }

    /// Identifier of this dropdown.
    pub fn id(&self) -> DropdownId {
        self.shared.id
    }

    /// Configuration this dropdown was mounted with.
    pub fn config(&self) -> &DropdownConfig<S::Element> {
        &self.shared.config
    }

    /// Snapshot of the current state.
    pub fn state(&self) -> DropdownState {
        self.shared.inner.borrow().state
    }

    /// Current visibility.
    pub fn visibility(&self) -> Visibility {
        self.state().visibility
    }

    /// True unless shown.
    pub fn is_hidden(&self) -> bool {
        self.state().is_hidden()
    }

    /// True while the pre-open hook is pending.
    pub fn is_loading(&self) -> bool {
        self.state().is_loading()
    }

    /// Deadline of the pending hover grace timer, if any.
    pub fn next_deadline(&self) -> Option<u64> {
        self.shared.inner.borrow().grace_deadline
    }

    /// Take the most recent pre-open failure, if one has not been reported yet.
    pub fn take_failure(&self) -> Option<DropdownError> {
        self.shared.inner.borrow_mut().failure.take().map(|(_, e)| e)
    }

    /// Click on the trigger.
    ///
    /// Hidden dropdowns start opening; shown dropdowns close. Ignored for hover
    /// dropdowns and while loading. `origin` is where the click landed.
    ///
    /// Returns the rejection if the hook rejected before this call returned.
    pub fn toggle(&self, origin: PointerTarget) -> Result<()> {
        if self.shared.config.trigger != Trigger::Click {
            return Ok(());
        }
        match self.visibility() {
            Visibility::Shown => {
                self.shared.hide();
                Ok(())
            }
            Visibility::Loading => Ok(()),
            Visibility::Hidden => self.shared.begin_open(origin),
        }
    }

    /// Pointer entered the trigger. Opens a hidden hover dropdown.
    ///
    /// `origin` is the element the pointer entered, with the markers of its ancestry.
    /// A trigger that sits inside another dropdown's body carries [`Markers::BODY`],
    /// and opening it leaves the enclosing dropdowns open.
    ///
    /// Returns the rejection if the hook rejected before this call returned.
    pub fn pointer_enter_trigger(&self, origin: PointerTarget) -> Result<()> {
        if self.shared.config.trigger != Trigger::Hover {
            return Ok(());
        }
        match self.visibility() {
            Visibility::Hidden => self.shared.begin_open(origin),
            Visibility::Loading => {
                self.shared.inner.borrow_mut().close_when_open = false;
                Ok(())
            }
            Visibility::Shown => {
                self.shared.inner.borrow_mut().grace_deadline = None;
                Ok(())
            }
        }
    }

    /// Pointer left the trigger for `to` at time `now`.
    pub fn pointer_leave_trigger(&self, to: Option<PointerTarget>, now: u64) {
        let config = &self.shared.config;
        if config.trigger != Trigger::Hover {
            return;
        }
        if !config.role.is_empty() {
            self.shared.inner.borrow_mut().grace_deadline =
                Some(now.saturating_add(config.hover_grace_ms));
        }
        let Some(to) = to else {
            return;
        };
        if to.markers.is_dropdown() {
            return;
        }
        self.shared.dismiss();
    }

    /// Pointer entered the body panel. Cancels a pending grace timer.
    pub fn pointer_enter_body(&self) {
        self.shared.inner.borrow_mut().grace_deadline = None;
    }

    /// Pointer left the body panel for `to`.
    pub fn pointer_leave_body(&self, to: Option<PointerTarget>) {
        if self.shared.config.trigger != Trigger::Hover {
            return;
        }
        let Some(to) = to else {
            return;
        };
        if to.markers.intersects(Markers::TRIGGER | Markers::SUB) {
            return;
        }
        self.shared.hide();
    }

    /// Click inside the body panel.
    pub fn body_click(&self) {
        if self.shared.config.close_on_body_click {
            self.shared.hide();
        }
    }

    /// Fire the grace timer if its deadline has passed. Returns `true` if the dropdown closed.
    pub fn poll_timers(&self, now: u64) -> bool {
        let due = {
            let mut inner = self.shared.inner.borrow_mut();
            match inner.grace_deadline {
                Some(deadline) if deadline <= now => {
                    inner.grace_deadline = None;
                    true
                }
                _ => false,
            }
        };
        due && self.shared.dismiss()
    }

    /// Close if shown. Returns `true` if the state changed.
    pub fn hide(&self) -> bool {
        self.shared.hide()
    }

    /// Destroy the instance. Equivalent to dropping it.
    pub fn destroy(self) {
        tracing::debug!(id = %self.shared.id, "destroying dropdown");
    }
}

impl<S: Surface + 'static> Shared<S> {
    fn on_channel(&self, event: ChannelEvent) {
        match event {
            ChannelEvent::Opening(other) => {
                if self.hide() {
                    tracing::debug!(id = %self.id, opener = %other, "closed for sibling");
                }
            }
            ChannelEvent::HideAll => {
                self.hide();
            }
        }
    }

    fn hide(&self) -> bool {
        {
            let mut inner = self.inner.borrow_mut();
            if inner.state.visibility != Visibility::Shown {
                return false;
            }
            inner.state.visibility = Visibility::Hidden;
            inner.grace_deadline = None;
        }
        tracing::debug!(id = %self.id, from = ?Visibility::Shown, to = ?Visibility::Hidden, "transition");
        self.apply_scroll_lock(false);
        true
    }

    /// Close if shown; if the open is still pending, make it settle as `Hidden`.
    fn dismiss(&self) -> bool {
        {
            let mut inner = self.inner.borrow_mut();
            if inner.state.visibility == Visibility::Loading {
                inner.close_when_open = true;
                tracing::trace!(id = %self.id, "pointer left while loading; open cancelled");
                return false;
            }
        }
        self.hide()
    }

    fn begin_open(&self, origin: PointerTarget) -> Result<()> {
        if self.hook_running.get() {
            tracing::warn!(id = %self.id, "open requested from inside its own before-open hook; ignored");
            return Ok(());
        }
        let attempt = {
            let mut inner = self.inner.borrow_mut();
            inner.state.visibility = Visibility::Loading;
            inner.opened_from_body = origin.markers.contains(Markers::BODY);
            inner.close_when_open = false;
            inner.attempt += 1;
            inner.attempt
        };
        tracing::debug!(id = %self.id, from = ?Visibility::Hidden, to = ?Visibility::Loading, "transition");

        let sink: Weak<dyn OpenSink> = self.me.clone();
        let resolver = OpenResolver::new(self.id, sink);
        self.hook_running.set(true);
        self.hook.borrow_mut().before_open(resolver);
        self.hook_running.set(false);

        let mut inner = self.inner.borrow_mut();
        match inner.failure.take() {
            Some((failed, err)) if failed == attempt => Err(err),
            other => {
                inner.failure = other;
                Ok(())
            }
        }
    }

    fn finish_open(&self) {
        {
            let mut inner = self.inner.borrow_mut();
            inner.state.visibility = Visibility::Shown;
        }
        tracing::debug!(id = %self.id, from = ?Visibility::Loading, to = ?Visibility::Shown, "transition");
        self.apply_scroll_lock(true);

        let from_body = self.inner.borrow().opened_from_body;
        if !from_body {
            self.channel.announce_opening(self.id);
        }

        let me = self.me.clone();
        self.layout.schedule(move || {
            if let Some(shared) = me.upgrade() {
                shared.measure();
            } else {
                tracing::trace!("dropdown destroyed before layout; skipping measurement");
            }
        });
    }

    fn measure(&self) {
        if self.inner.borrow().state.visibility != Visibility::Shown {
            tracing::trace!(id = %self.id, "closed before layout; skipping measurement");
            return;
        }
        let trigger = self.surface.trigger_bounds(self.id);
        let body = self.surface.body_size(self.id);
        let scroll = self.surface.scroll_offset();
        let mut inner = self.inner.borrow_mut();
        if let Some(t) = trigger {
            inner.state.width = Some(t.width());
        }
        let Some(p) = try_place(trigger, body, scroll, self.config.align, self.config.offset)
        else {
            tracing::trace!(id = %self.id, "trigger or body not measurable; position unchanged");
            return;
        };
        inner.state.top = Some(p.top());
        inner.state.left = Some(p.left());
    }

    fn apply_scroll_lock(&self, shown: bool) {
        if let Some(lock) = &self.config.scroll_lock {
            lock.apply(&*self.surface, shown);
        }
    }
}

impl<S: Surface + 'static> OpenSink for Shared<S> {
    fn settle(&self, outcome: Result<()>) {
        if self.inner.borrow().state.visibility != Visibility::Loading {
            tracing::trace!(id = %self.id, "resolver settled while not loading; ignored");
            return;
        }
        match outcome {
            Ok(()) => {
                let cancelled = {
                    let mut inner = self.inner.borrow_mut();
                    let cancelled = core::mem::take(&mut inner.close_when_open);
                    if cancelled {
                        inner.state.visibility = Visibility::Hidden;
                        inner.grace_deadline = None;
                    }
                    cancelled
                };
                if cancelled {
                    tracing::debug!(id = %self.id, from = ?Visibility::Loading, to = ?Visibility::Hidden, "transition");
                } else {
                    self.finish_open();
                }
            }
            Err(err) => {
                let mut inner = self.inner.borrow_mut();
                let attempt = inner.attempt;
                inner.state.visibility = Visibility::Hidden;
                inner.failure = Some((attempt, err));
                tracing::debug!(id = %self.id, from = ?Visibility::Loading, to = ?Visibility::Hidden, "transition");
            }
        }
    }
}

impl<S: Surface> Drop for Shared<S> {
    fn drop(&mut self) {
        if self.inner.get_mut().state.visibility == Visibility::Shown {
            if let Some(lock) = &self.config.scroll_lock {
                lock.apply(&*self.surface, false);
            }
        }
    }
}
