// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! "After next layout" queue.
//!
//! Measuring a body panel only makes sense once the host has laid it out. Dropdowns
//! push a task here when they open; the host calls [`LayoutQueue::flush`] after its
//! layout pass and before painting.
//!
//! Tasks are single-shot. Each task is responsible for its own liveness check: a
//! dropdown schedules a closure holding a weak reference to itself, so a task whose
//! dropdown was destroyed in the meantime does nothing.

use alloc::boxed::Box;
use alloc::collections::VecDeque;
use core::cell::RefCell;
use core::fmt;

type Task = Box<dyn FnOnce()>;

/// Queue of tasks to run after the next layout pass.
#[derive(Default)]
pub struct LayoutQueue {
    tasks: RefCell<VecDeque<Task>>,
}

impl fmt::Debug for LayoutQueue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LayoutQueue")
            .field("pending", &self.len())
            .finish()
    }
}

impl LayoutQueue {
    /// Create an empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue `task` for the next flush.
    pub fn schedule(&self, task: impl FnOnce() + 'static) {
        self.tasks.borrow_mut().push_back(Box::new(task));
    }

    /// Number of pending tasks.
    pub fn len(&self) -> usize {
        self.tasks.borrow().len()
    }

    /// True if nothing is pending.
    pub fn is_empty(&self) -> bool {
        self.tasks.borrow().is_empty()
    }

    /// Run every task that was pending when the flush started, in scheduling order.
    ///
    /// Tasks scheduled while flushing wait for the next flush. Returns the number of
    /// tasks run.
    pub fn flush(&self) -> usize {
        let batch = core::mem::take(&mut *self.tasks.borrow_mut());
        let n = batch.len();
        for task in batch {
            task();
        }
        n
    }
}
