//! Wire messages exchanged between provider and renderer.
//!
//! Every datagram carries one JSON object tagged by its `type` field:
//!
//! | type              | direction          | payload                      |
//! |-------------------|--------------------|------------------------------|
//! | `init`            | renderer→provider  | none                         |
//! | `initial-batch`   | provider→renderer  | `{data: UpdateResult, total}`|
//! | `request-refresh` | renderer→provider  | `{value: {index, id}}`       |
//! | `refresh`         | provider→renderer  | `{data: UpdateResult}`       |
//! | `ping`            | renderer→provider  | none                         |
//!
//! Unknown types fail to decode and surface as [`CoinboardError::MalformedMessage`];
//! receivers drop them.
use serde::{Deserialize, Serialize};

use crate::error::CoinboardError;
use crate::result::Result;
use crate::update::{EventKind, TrackedItem, UpdateResult};

/// Message envelope sent over the channel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum Message {
    /// Renderer asks for a full batch of the tracked list.
    Init,
    /// One item of a full batch.
    InitialBatch {
        /// Result for a single slot.
        data: UpdateResult,
        /// Number of items in the batch.
        total: usize,
    },
    /// Renderer asks for a forced refetch of one stale item.
    RequestRefresh {
        /// Slot and id to refresh.
        value: TrackedItem,
    },
    /// Single-item refresh result.
    Refresh {
        /// Result for a single slot.
        data: UpdateResult,
    },
    /// Renderer keep-alive.
    Ping,
}

impl Message {
    /// Wraps `data` into the message for `kind`. `total` is only carried by batch items.
    pub fn update(kind: EventKind, data: UpdateResult, total: usize) -> Self {
        match kind {
            EventKind::InitialBatch => Message::InitialBatch { data, total },
            EventKind::Refresh => Message::Refresh { data },
        }
    }

    /// Value of the `type` field.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Message::Init => "init",
            Message::InitialBatch { .. } => "initial-batch",
            Message::RequestRefresh { .. } => "request-refresh",
            Message::Refresh { .. } => "refresh",
            Message::Ping => "ping",
        }
    }

    /// Encode the message to JSON bytes.
    pub fn to_json_bytes(&self) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec(self)?)
    }

    /// Decode a message from a received datagram.
    pub fn from_json_bytes(bytes: &[u8]) -> Result<Self> {
        serde_json::from_slice(bytes).map_err(|e| CoinboardError::MalformedMessage(e.to_string()))
    }
}
