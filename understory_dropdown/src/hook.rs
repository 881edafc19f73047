// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pre-open hooks.
//!
//! Before a dropdown opens it calls its [`BeforeOpen`] hook with an [`OpenResolver`].
//! The dropdown stays in [`Visibility::Loading`](crate::Visibility::Loading) until the
//! resolver is settled, which may happen inside the hook call or at any later point.
//!
//! - [`OpenResolver::resolve`] finishes the open.
//! - [`OpenResolver::reject`] aborts it. The dropdown returns to hidden and the
//!   rejection comes back as an `Err` that the caller has to deal with. It is also
//!   logged and recorded on the dropdown (see [`Dropdown::take_failure`](crate::Dropdown::take_failure)).
//! - Dropping the resolver unsettled counts as a rejection
//!   ([`DropdownError::BeforeOpenAbandoned`]).
//!
//! A resolver that outlives its dropdown settles into nothing.

use alloc::rc::Weak;
use alloc::string::String;
use core::fmt;

use crate::error::{DropdownError, Result};
use crate::types::DropdownId;

/// Hook run before every open.
pub trait BeforeOpen {
    /// Start the pre-open work. Settle `resolver` when done.
    fn before_open(&mut self, resolver: OpenResolver);
}

impl<F: FnMut(OpenResolver)> BeforeOpen for F {
    fn before_open(&mut self, resolver: OpenResolver) {
        self(resolver);
    }
}

/// Hook that resolves immediately. This is the default.
#[derive(Copy, Clone, Debug, Default)]
pub struct ResolveImmediately;

impl BeforeOpen for ResolveImmediately {
    fn before_open(&mut self, resolver: OpenResolver) {
        resolver.resolve();
    }
}

/// Receiver of a settled pre-open hook.
pub(crate) trait OpenSink {
    fn settle(&self, outcome: Result<()>);
}

/// Single-shot continuation handed to a [`BeforeOpen`] hook.
pub struct OpenResolver {
    id: DropdownId,
    sink: Weak<dyn OpenSink>,
    settled: bool,
}

impl fmt::Debug for OpenResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpenResolver")
            .field("id", &self.id)
            .field("live", &(self.sink.strong_count() > 0))
            .field("settled", &self.settled)
            .finish()
    }
}

impl OpenResolver {
    pub(crate) fn new(id: DropdownId, sink: Weak<dyn OpenSink>) -> Self {
        Self {
            id,
            sink,
            settled: false,
        }
    }

    /// Dropdown this resolver belongs to.
    pub fn id(&self) -> DropdownId {
        self.id
    }

    /// True while the dropdown that issued this resolver is still alive.
    pub fn is_live(&self) -> bool {
        self.sink.strong_count() > 0
    }

    /// Let the dropdown open.
    pub fn resolve(mut self) {
        self.settled = true;
        self.send(Ok(()));
    }

    /// Abort the open. Always returns the rejection as an error.
    #[must_use = "a rejected pre-open hook is a failure the caller must handle"]
    pub fn reject(mut self, reason: impl Into<String>) -> Result<()> {
        self.settled = true;
        let err = DropdownError::BeforeOpenRejected {
            id: self.id,
            reason: reason.into(),
        };
        tracing::error!(id = %self.id, error = %err, "before-open hook rejected");
        self.send(Err(err.clone()));
        Err(err)
    }

    fn send(&self, outcome: Result<()>) {
        match self.sink.upgrade() {
            Some(sink) => sink.settle(outcome),
            None => tracing::trace!(id = %self.id, "resolver settled after dropdown was destroyed"),
        }
    }
}

impl Drop for OpenResolver {
    fn drop(&mut self) {
        if self.settled {
            return;
        }
        let err = DropdownError::BeforeOpenAbandoned { id: self.id };
        tracing::error!(id = %self.id, error = %err, "before-open hook never settled");
        self.send(Err(err));
    }
}
