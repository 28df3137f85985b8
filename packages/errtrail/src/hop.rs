//! Per-process segments of an error chain
//!
//! Each node carrying a stack trace closes a hop: the hop owns that trace,
//! the binary that captured it and every contributing node walked since the
//! previous hop closed. Nodes past the last trace belong to the oldest hop.

use crate::chain;
use crate::error::Error;
use crate::trace;
use serde::{Deserialize, Serialize};

/// The part of an error's journey attributable to one process
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hop {
    /// Binary that captured `stack_trace`, empty when unknown
    pub binary: String,
    /// Frames captured in that binary
    pub stack_trace: Vec<String>,
    /// Errors contributed in that binary, newest first
    pub errors: Vec<HopError>,
}

/// One node as recorded in a hop
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HopError {
    /// Identity code, may be empty
    pub code: String,
    /// Message, may be empty
    pub message: String,
    /// Call site, may be empty
    pub source: String,
    /// Key/values in insertion order
    pub parameters: Vec<(String, String)>,
}

impl HopError {
    fn from_node(node: &Error) -> Self {
        Self {
            code: node.code().to_string(),
            message: node.message().to_string(),
            source: node.location().unwrap_or_default().to_string(),
            parameters: node.key_values().to_vec(),
        }
    }
}

/// Segment the chain into hops, latest hop first
pub fn hops<'a>(err: impl Into<Option<&'a Error>>) -> Vec<Hop> {
    let mut hops = Vec::new();
    let mut pending = Vec::new();
    chain::walk(err, |node| {
        if contributes(node) {
            pending.push(HopError::from_node(node));
        }
        if !node.stack_trace().is_empty() {
            hops.push(Hop {
                binary: node.binary().unwrap_or_default().to_string(),
                stack_trace: node.stack_trace().to_vec(),
                errors: std::mem::take(&mut pending),
            });
        }
        true
    });

    if !pending.is_empty() {
        match hops.last_mut() {
            Some(oldest) => oldest.errors.append(&mut pending),
            None => hops.push(Hop {
                errors: pending,
                ..Hop::default()
            }),
        }
    }
    hops
}

/// The whole trace across every hop, latest hop first, with boundary markers
pub fn full_stack_trace<'a>(err: impl Into<Option<&'a Error>>) -> Vec<String> {
    let hops = hops(err);
    trace::merge(
        hops.iter()
            .map(|hop| (hop.stack_trace.as_slice(), hop.binary.as_str())),
    )
}

fn contributes(node: &Error) -> bool {
    !node.message().is_empty() || !node.code().is_empty() || !node.key_values().is_empty()
}
