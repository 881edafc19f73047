// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_dropdown --heading-base-level=0

//! Understory Dropdown: a headless dropdown controller.
//!
//! A dropdown is a trigger plus a floating body panel. This crate owns the parts with
//! actual logic and leaves rendering to the host:
//!
//! - **Visibility** ([`Dropdown`]): `Hidden → Loading → Shown`, gated by the trigger
//!   mode ([`Trigger`]) and an optional asynchronous pre-open hook ([`BeforeOpen`]).
//! - **Placement** ([`position`]): page coordinates for the body given the trigger's
//!   bounding box, the body size, the scroll offset, an [`Align`]ment and a manual offset.
//! - **Dismissal** ([`DismissChannel`]): a root-scoped bus so that opening one dropdown
//!   closes its siblings, plus one outside-click watcher per root.
//!
//! ## Integration
//!
//! The host implements [`Surface`] (measurement, scroll offset, selector lookup,
//! overflow style, and ancestry markers) and creates one [`DropdownRoot`] per
//! application root. It then:
//!
//! 1. mounts dropdowns with [`DropdownRoot::mount`] or [`Dropdown::mount_with_hook`],
//! 2. forwards trigger/body events ([`Dropdown::toggle`], [`Dropdown::pointer_enter_trigger`], …),
//! 3. forwards document pointer-downs to [`DropdownRoot::pointer_down`],
//! 4. calls [`DropdownRoot::after_layout`] after each layout pass and before painting,
//! 5. calls [`Dropdown::poll_timers`] when [`Dropdown::next_deadline`] passes.
//!
//! ## Minimal example
//!
//! ```rust
//! use std::rc::Rc;
//! use kurbo::{Rect, Size, Vec2};
//! use understory_dropdown::{
//!     DropdownConfig, DropdownId, DropdownRoot, Markers, PointerTarget, Surface, Trigger,
//! };
//!
//! // A host with one trigger at (50, 100), 80 × 30, and a 120 × 60 body.
//! struct Page;
//! impl Surface for Page {
//!     type Element = u32;
//!     fn trigger_bounds(&self, _: DropdownId) -> Option<Rect> {
//!         Some(Rect::new(50.0, 100.0, 130.0, 130.0))
//!     }
//!     fn body_size(&self, _: DropdownId) -> Option<Size> {
//!         Some(Size::new(120.0, 60.0))
//!     }
//!     fn scroll_offset(&self) -> Vec2 {
//!         Vec2::ZERO
//!     }
//!     fn query_selector(&self, _: &str) -> Option<u32> {
//!         None
//!     }
//!     fn set_overflow_suppressed(&self, _: &u32, _: bool) {}
//! }
//!
//! let root = DropdownRoot::new(Rc::new(Page));
//! let menu = root.mount(DropdownConfig::new(Trigger::Click));
//!
//! menu.toggle(PointerTarget::TRIGGER).unwrap();
//! assert!(!menu.is_hidden());
//!
//! // Position is filled in after the host's layout pass.
//! assert_eq!(menu.state().top, None);
//! root.after_layout();
//! assert_eq!(menu.state().top, Some(130.0));
//! assert_eq!(menu.state().left, Some(50.0));
//! assert_eq!(menu.state().width, Some(80.0));
//!
//! // A pointer-down outside every dropdown closes it.
//! assert!(root.channel().pointer_down(PointerTarget::new(Markers::empty())));
//! assert!(menu.is_hidden());
//! ```
//!
//! ## Features
//!
//! - `std` (default): enables `std` support for dependencies such as `kurbo`.
//! - `libm`: enables `no_std` + `alloc` builds that rely on `libm` for floating-point math.
//!
//! This crate is `no_std` and uses `alloc`. It is single-threaded: handles are `Rc`-based
//! and all transitions run on the host's event loop.

#![no_std]

extern crate alloc;

pub mod channel;
pub mod dropdown;
pub mod error;
pub mod hook;
pub mod layout;
pub mod position;
pub mod root;
pub mod surface;
pub mod types;

#[cfg(test)]
mod test_support;

pub use channel::{ChannelEvent, DismissChannel, Subscription};
pub use dropdown::{Dropdown, DropdownConfig, DropdownState, HOVER_GRACE_MS};
pub use error::DropdownError;
pub use hook::{BeforeOpen, OpenResolver, ResolveImmediately};
pub use layout::LayoutQueue;
pub use position::{Measurement, Placement};
pub use root::DropdownRoot;
pub use surface::{ScrollLock, Surface, ancestry_markers};
pub use types::{Align, DropdownId, Markers, PointerTarget, Trigger, Visibility};
