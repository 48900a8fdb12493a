// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for the WebView tracker bridge.

use thiserror::Error;

use crate::types::{ChannelId, EventKind};

/// Top-level error type for all bridge operations.
///
/// A channel that is not present is never an error; only failures while
/// encoding a payload or handing it to a present channel surface here.
#[derive(Debug, Error)]
pub enum BridgeError {
    // -- Encoding --
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    // -- Transport --
    #[error("{channel} transport failed: {reason}")]
    Transport { channel: ChannelId, reason: String },

    #[error("{channel} cannot carry this payload (expected {expected})")]
    PayloadMismatch {
        channel: ChannelId,
        expected: &'static str,
    },

    #[error("{channel} has no encoding for {kind}")]
    UnsupportedEvent { channel: ChannelId, kind: EventKind },

    // -- Configuration --
    #[error("invalid bridge configuration: {0}")]
    InvalidConfig(String),
}

impl BridgeError {
    /// Convenience constructor for host transports reporting a failure.
    pub fn transport(channel: ChannelId, reason: impl Into<String>) -> Self {
        Self::Transport {
            channel,
            reason: reason.into(),
        }
    }
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, BridgeError>;
