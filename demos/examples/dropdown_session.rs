// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scripted dropdown session.
//!
//! Mounts a click menu, a second click menu, and a hover tooltip-style dropdown under one
//! root, then drives them through a short session: open, sibling dismissal, an async
//! pre-open hook, an outside click, and the hover grace timer.
//!
//! Run:
//! - `RUST_LOG=understory_dropdown=debug cargo run -p understory_demos --example dropdown_session`

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use kurbo::{Rect, Size, Vec2};
use tracing_subscriber::EnvFilter;
use understory_dropdown::{
    Align, Dropdown, DropdownConfig, DropdownId, DropdownRoot, Markers, OpenResolver, PointerTarget,
    ScrollLock, Surface, Trigger,
};

/// Element handles in this toy page.
const PAGE: u32 = 0;
const BACKGROUND: u32 = 1;
const MENU_BODY: u32 = 2;

#[derive(Default)]
struct Page {
    triggers: RefCell<BTreeMap<DropdownId, Rect>>,
    bodies: RefCell<BTreeMap<DropdownId, Size>>,
    overflow_hidden: RefCell<bool>,
}

impl Page {
    fn lay_out(&self, id: DropdownId, trigger: Rect, body: Size) {
        self.triggers.borrow_mut().insert(id, trigger);
        self.bodies.borrow_mut().insert(id, body);
    }
}

impl Surface for Page {
    type Element = u32;

    fn trigger_bounds(&self, id: DropdownId) -> Option<Rect> {
        self.triggers.borrow().get(&id).copied()
    }

    fn body_size(&self, id: DropdownId) -> Option<Size> {
        self.bodies.borrow().get(&id).copied()
    }

    fn scroll_offset(&self) -> Vec2 {
        Vec2::new(0.0, 40.0)
    }

    fn query_selector(&self, selector: &str) -> Option<u32> {
        (selector == "body").then_some(PAGE)
    }

    fn set_overflow_suppressed(&self, _element: &u32, suppressed: bool) {
        *self.overflow_hidden.borrow_mut() = suppressed;
    }

    fn markers(&self, element: &u32) -> Markers {
        match *element {
            MENU_BODY => Markers::BODY,
            _ => Markers::empty(),
        }
    }

    fn parent(&self, element: &u32) -> Option<u32> {
        (*element != PAGE).then_some(PAGE)
    }
}

fn report<S: Surface + 'static>(label: &str, dd: &Dropdown<S>) {
    let s = dd.state();
    tracing::info!(
        label,
        id = %dd.id(),
        visibility = ?s.visibility,
        top = ?s.top,
        left = ?s.left,
        width = ?s.width,
    );
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let page = Rc::new(Page::default());
    let root = DropdownRoot::new(page.clone());

    let file = root.mount(
        DropdownConfig::new(Trigger::Click)
            .with_scroll_lock(ScrollLock::Selector("body".into()))
            .with_close_on_body_click(true),
    );
    page.lay_out(file.id(), Rect::new(10.0, 10.0, 70.0, 34.0), Size::new(160.0, 200.0));

    // The edit menu loads its entries before opening; the resolver is settled later.
    let pending: Rc<RefCell<Option<OpenResolver>>> = Rc::new(RefCell::new(None));
    let slot = pending.clone();
    let edit = Dropdown::mount_with_hook(
        &root,
        DropdownConfig::new(Trigger::Click).with_align(Align::Right),
        move |r: OpenResolver| *slot.borrow_mut() = Some(r),
    );
    page.lay_out(
        edit.id(),
        Rect::new(80.0, 10.0, 140.0, 34.0),
        Size::new(180.0, 120.0),
    );

    let help = root.mount(
        DropdownConfig::new(Trigger::Hover)
            .with_role("tooltip")
            .with_offset(0.0, 4.0),
    );
    page.lay_out(
        help.id(),
        Rect::new(300.0, 10.0, 324.0, 34.0),
        Size::new(240.0, 80.0),
    );

    // Open "file" and let the host lay it out.
    file.toggle(PointerTarget::TRIGGER)
        .expect("default hook never rejects");
    root.after_layout();
    report("file opened", &file);
    tracing::info!(overflow_hidden = *page.overflow_hidden.borrow());

    // Opening "edit" goes through its hook; "file" closes once it resolves.
    edit.toggle(PointerTarget::TRIGGER)
        .expect("hook has not settled yet");
    report("edit loading", &edit);
    if let Some(resolver) = pending.borrow_mut().take() {
        resolver.resolve();
    }
    root.after_layout();
    report("edit opened", &edit);
    report("file after sibling opened", &file);

    // A click on the page background closes everything.
    root.pointer_down(&BACKGROUND);
    report("edit after outside click", &edit);

    // Hover: enter, leave toward the body, never arrive; the grace timer closes it.
    help.pointer_enter_trigger(PointerTarget::TRIGGER)
        .expect("default hook never rejects");
    root.after_layout();
    report("help hovered", &help);
    help.pointer_leave_trigger(Some(PointerTarget::BODY), 1_000);
    if let Some(deadline) = help.next_deadline() {
        help.poll_timers(deadline);
    }
    report("help after grace", &help);
}
