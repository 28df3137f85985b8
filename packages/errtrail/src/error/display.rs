//! Display and trait implementations for Error
//!
//! `{}` renders the message chain (`"c: b: a"`), skipping empty messages.
//! `{:#}` additionally renders each node's key/values right after its
//! message (`"c: b(k=v): a"`). Joined branches render as `[x; y]`.

use super::types::{Error, Link};
use std::fmt;

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&render(self, f.alternate()))
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match &self.inner.link {
            Link::Wrapped(inner) => Some(inner as &(dyn std::error::Error + 'static)),
            Link::Joined(_) => None,
            Link::Leaf => self
                .inner
                .original
                .as_ref()
                .map(|e| e.as_ref() as &(dyn std::error::Error + 'static)),
        }
    }
}

fn render(err: &Error, detailed: bool) -> String {
    let own = own_segment(err, detailed);
    let rest = match err.link() {
        Link::Leaf => String::new(),
        Link::Wrapped(inner) => render(inner, detailed),
        Link::Joined(branches) => {
            let parts: Vec<String> = branches
                .iter()
                .map(|b| render(b, detailed))
                .filter(|s| !s.is_empty())
                .collect();
            match parts.len() {
                0 => String::new(),
                1 => parts.concat(),
                _ => format!("[{}]", parts.join("; ")),
            }
        }
    };

    match (own.is_empty(), rest.is_empty()) {
        (true, _) => rest,
        (false, true) => own,
        (false, false) => format!("{own}: {rest}"),
    }
}

fn own_segment(err: &Error, detailed: bool) -> String {
    if !detailed || err.key_values().is_empty() {
        return err.message().to_string();
    }
    let pairs: Vec<String> = err
        .key_values()
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect();
    format!("{}({})", err.message(), pairs.join(", "))
}
