//! Traversal and inspection of error chains
//!
//! Every function accepts `&Error` or `Option<&Error>` and treats `None` as
//! an empty chain. Walk order is depth-first pre-order: a node, then what it
//! wraps; joined branches are visited in argument order, each fully before
//! the next.

use crate::error::{Error, Link};
use std::collections::{BTreeMap, VecDeque};

/// Visit every node depth-first, newest first
///
/// Returning `false` from `visit` stops the whole walk, including any
/// sibling branches not yet visited.
pub fn walk<'a, F>(err: impl Into<Option<&'a Error>>, mut visit: F)
where
    F: FnMut(&'a Error) -> bool,
{
    let Some(root) = err.into() else {
        return;
    };
    let mut pending = vec![root];
    while let Some(node) = pending.pop() {
        if !visit(node) {
            return;
        }
        match node.link() {
            Link::Leaf => {}
            Link::Wrapped(inner) => pending.push(inner),
            Link::Joined(branches) => pending.extend(branches.iter().rev()),
        }
    }
}

/// Every root-to-leaf path through the chain
///
/// Partial paths are drained from a queue: a single wrap extends the path
/// and puts it back at the front, a join appends one extended path per
/// branch at the back.
pub fn flatten<'a>(err: impl Into<Option<&'a Error>>) -> Vec<Vec<Error>> {
    let Some(root) = err.into() else {
        return Vec::new();
    };
    let mut paths = Vec::new();
    let mut queue = VecDeque::from([vec![root.clone()]]);
    while let Some(mut path) = queue.pop_front() {
        let Some(last) = path.last().cloned() else {
            continue;
        };
        match last.link() {
            Link::Leaf => paths.push(path),
            Link::Wrapped(inner) => {
                path.push(inner.clone());
                queue.push_front(path);
            }
            Link::Joined(branches) => {
                for branch in branches {
                    let mut extended = path.clone();
                    extended.push(branch.clone());
                    queue.push_back(extended);
                }
            }
        }
    }
    paths
}

/// Whether `err` matches `target` by identity or by code
///
/// True when some node of `err` is the very same node as `target`, or
/// carries the same code as `target`'s most recent non-empty code.
/// `target`'s older codes are never consulted.
pub fn is<'a, 'b>(
    err: impl Into<Option<&'a Error>>,
    target: impl Into<Option<&'b Error>>,
) -> bool {
    let (Some(err), Some(target)) = (err.into(), target.into()) else {
        return false;
    };
    let target_code = code(target);
    let mut found = false;
    walk(err, |node| {
        found = node.ptr_eq(target) || (!target_code.is_empty() && node.code() == target_code);
        !found
    });
    found
}

/// One entry per node in walk order: its code, or its message if it has none
///
/// The message fallback is kept for compatibility with consumers that
/// group on this list; nodes without a code still get an entry.
pub fn codes<'a>(err: impl Into<Option<&'a Error>>) -> Vec<String> {
    let mut out = Vec::new();
    walk(err, |node| {
        let entry = if node.code().is_empty() {
            node.message()
        } else {
            node.code()
        };
        out.push(entry.to_string());
        true
    });
    out
}

/// Most recent non-empty code in the chain
pub fn code<'a>(err: impl Into<Option<&'a Error>>) -> &'a str {
    let mut found = "";
    walk(err, |node| {
        found = node.code();
        found.is_empty()
    });
    found
}

/// Most recent non-empty message in the chain
pub fn message<'a>(err: impl Into<Option<&'a Error>>) -> &'a str {
    let mut found = "";
    walk(err, |node| {
        found = node.message();
        found.is_empty()
    });
    found
}

/// All key/values in the chain; the newest node wins on duplicate keys
pub fn key_values<'a>(err: impl Into<Option<&'a Error>>) -> BTreeMap<String, String> {
    let mut out = BTreeMap::new();
    walk(err, |node| {
        for (key, value) in node.key_values() {
            out.entry(key.clone()).or_insert_with(|| value.clone());
        }
        true
    });
    out
}

/// Binary and stack trace of the most recent node that has a trace
pub fn last_stack_trace<'a>(err: impl Into<Option<&'a Error>>) -> Option<(&'a str, &'a [String])> {
    let mut found = None;
    walk(err, |node| {
        if !node.stack_trace().is_empty() {
            found = Some((node.binary().unwrap_or_default(), node.stack_trace()));
        }
        found.is_none()
    });
    found
}

/// Whether any node in the chain carries a stack trace
pub fn has_stack_trace<'a>(err: impl Into<Option<&'a Error>>) -> bool {
    last_stack_trace(err).is_some()
}

/// The chain minus its newest node
///
/// Returns the wrapped error, which is shared rather than copied; nodes
/// are immutable so the original chain is untouched. Joined nodes and
/// leaves have nothing single to unwrap.
pub fn unwrap<'a>(err: impl Into<Option<&'a Error>>) -> Option<Error> {
    match err.into()?.link() {
        Link::Wrapped(inner) => Some(inner.clone()),
        Link::Leaf | Link::Joined(_) => None,
    }
}

/// Branches one level down: the wrapped error, every joined branch, or nothing
pub fn unwrap_all<'a>(err: impl Into<Option<&'a Error>>) -> Vec<Error> {
    match err.into().map(Error::link) {
        Some(Link::Wrapped(inner)) => vec![inner.clone()],
        Some(Link::Joined(branches)) => branches.clone(),
        Some(Link::Leaf) | None => Vec::new(),
    }
}

/// First preserved foreign error of type `E` in the chain
///
/// Foreign values do not survive the wire; this only finds errors adopted
/// in the current process.
pub fn find_original<'a, E>(err: impl Into<Option<&'a Error>>) -> Option<&'a E>
where
    E: std::error::Error + 'static,
{
    let mut found = None;
    walk(err, |node| {
        found = node.original().and_then(|e| e.downcast_ref::<E>());
        found.is_none()
    });
    found
}
