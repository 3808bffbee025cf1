//! # Routing stack
//!
//! LIFO of visited paths used for "back" navigation across show/edit
//! overlays. Carried between page loads as an opaque query parameter:
//! versioned JSON, gzip, base64 (URL-safe, no padding), percent-encoded.
//! Decoding never fails; anything unreadable is an empty stack.

use std::io::{Read, Write};

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use percent_encoding::{percent_decode_str, utf8_percent_encode, NON_ALPHANUMERIC};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::Result;

/// Current encoding version.
pub const STACK_VERSION: u32 = 1;

/// How a stack entry is revisited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NavigationKind {
    /// Full mount of a (possibly different) view.
    Navigate,
    /// Parameter change within the mounted view.
    Patch,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoutingEntry {
    #[serde(rename = "type")]
    pub kind: NavigationKind,
    pub path: String,
}

impl RoutingEntry {
    pub fn navigate(path: impl Into<String>) -> Self {
        Self {
            kind: NavigationKind::Navigate,
            path: path.into(),
        }
    }

    pub fn patch(path: impl Into<String>) -> Self {
        Self {
            kind: NavigationKind::Patch,
            path: path.into(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct Envelope {
    v: u32,
    entries: Vec<RoutingEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RoutingStack {
    entries: Vec<RoutingEntry>,
}

impl RoutingStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_entries(entries: Vec<RoutingEntry>) -> Self {
        Self { entries }
    }

    pub fn push(&mut self, entry: RoutingEntry) {
        self.entries.push(entry);
    }

    pub fn pop(&mut self) -> Option<RoutingEntry> {
        self.entries.pop()
    }

    /// Pop, falling back to `default` on an empty stack.
    pub fn pop_or(&mut self, default: RoutingEntry) -> RoutingEntry {
        self.entries.pop().unwrap_or(default)
    }

    pub fn peek(&self) -> Option<&RoutingEntry> {
        self.entries.last()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[RoutingEntry] {
        &self.entries
    }

    /// Encode for a query parameter value.
    pub fn encode(&self) -> Result<String> {
        let json = serde_json::to_vec(&Envelope {
            v: STACK_VERSION,
            entries: self.entries.clone(),
        })?;

        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(&json)?;
        let compressed = encoder.finish()?;

        let b64 = URL_SAFE_NO_PAD.encode(compressed);
        Ok(utf8_percent_encode(&b64, NON_ALPHANUMERIC).to_string())
    }

    /// Decode a query parameter value. Malformed input, or a version this
    /// build does not know, yields an empty stack.
    pub fn decode(encoded: &str) -> Self {
        match Self::try_decode(encoded) {
            Some(stack) => stack,
            None => {
                debug!("Discarding undecodable routing stack ({} bytes)", encoded.len());
                Self::new()
            }
        }
    }

    fn try_decode(encoded: &str) -> Option<Self> {
        if encoded.is_empty() {
            return None;
        }
        let b64 = percent_decode_str(encoded).decode_utf8().ok()?;
        let compressed = URL_SAFE_NO_PAD.decode(b64.as_bytes()).ok()?;

        let mut decoder = GzDecoder::new(compressed.as_slice());
        let mut json = Vec::new();
        decoder.read_to_end(&mut json).ok()?;

        let envelope: Envelope = serde_json::from_slice(&json).ok()?;
        if envelope.v != STACK_VERSION {
            debug!("Routing stack version {} is not supported", envelope.v);
            return None;
        }
        Some(Self {
            entries: envelope.entries,
        })
    }
}
