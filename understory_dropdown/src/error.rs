// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Error types for dropdowns.

use alloc::string::String;

use thiserror::Error;

use crate::types::DropdownId;

/// Failures surfaced by a dropdown.
///
/// Only the pre-open hook can fail. Geometry and scroll-lock problems are not errors;
/// they are skipped.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DropdownError {
    /// The pre-open hook rejected.
    #[error("before-open hook for {id} rejected: {reason}")]
    BeforeOpenRejected {
        /// Dropdown whose hook rejected.
        id: DropdownId,
        /// Reason given by the hook.
        reason: String,
    },

    /// The pre-open hook dropped its resolver without settling it.
    #[error("before-open hook for {id} dropped its resolver without settling")]
    BeforeOpenAbandoned {
        /// Dropdown whose hook never settled.
        id: DropdownId,
    },
}

impl DropdownError {
    /// Dropdown the error belongs to.
    pub fn id(&self) -> DropdownId {
        match self {
            Self::BeforeOpenRejected { id, .. } | Self::BeforeOpenAbandoned { id } => *id,
        }
    }
}

/// Result type for dropdown operations.
pub type Result<T> = core::result::Result<T, DropdownError>;
