//! Construction options applied to a node in the order given

/// A single construction option
///
/// Build these with the helper functions ([`with_code`], [`without_trace`],
/// ...) rather than by hand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Opt {
    /// Set the identity code
    Code(String),
    /// Drop any stack trace captured so far
    WithoutTrace,
    /// Capture a stack trace even if the wrapped chain already has one
    WithTrace,
    /// Append one key/value pair
    KeyValue(String, String),
    /// Append several key/value pairs
    KeyValues(Vec<(String, String)>),
    /// Code plus no trace, for pre-declared sentinels
    Static(String),
}

/// Set the node's identity code
pub fn with_code(code: impl Into<String>) -> Opt {
    Opt::Code(code.into())
}

/// Clear the trace captured at construction
///
/// Meant for sentinels declared at start-up: the first `wrap` at a real
/// call site captures the trace instead.
#[must_use]
pub fn without_trace() -> Opt {
    Opt::WithoutTrace
}

/// Force a stack trace on this node
#[must_use]
pub fn with_stack_trace() -> Opt {
    Opt::WithTrace
}

/// Attach a key/value pair
pub fn with_key_value(key: impl Into<String>, value: impl ToString) -> Opt {
    Opt::KeyValue(key.into(), value.to_string())
}

/// Attach a key/value pair whose value may not be valid UTF-8
///
/// Invalid byte sequences are kept as `\xNN` escapes.
pub fn with_key_value_bytes(key: impl Into<String>, value: &[u8]) -> Opt {
    Opt::KeyValue(key.into(), escape_bytes(value))
}

/// Attach every pair of a map, ordered by key
pub fn with_key_values<I, K, V>(pairs: I) -> Opt
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: ToString,
{
    let mut pairs: Vec<(String, String)> = pairs
        .into_iter()
        .map(|(k, v)| (k.into(), v.to_string()))
        .collect();
    pairs.sort();
    Opt::KeyValues(pairs)
}

/// Static error code: [`with_code`] plus [`without_trace`]
pub fn c(code: impl Into<String>) -> Opt {
    Opt::Static(code.into())
}

pub(crate) fn escape_bytes(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len());
    for chunk in bytes.utf8_chunks() {
        out.push_str(chunk.valid());
        for byte in chunk.invalid() {
            out.push_str(&format!("\\x{byte:02x}"));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escape_keeps_valid_utf8() {
        assert_eq!(escape_bytes("héllo".as_bytes()), "héllo");
    }

    #[test]
    fn escape_invalid_sequences() {
        assert_eq!(escape_bytes(&[b'a', 0xff, b'b', 0xc3]), "a\\xffb\\xc3");
    }

    #[test]
    fn key_values_are_sorted() {
        let opt = with_key_values([("b", 2), ("a", 1)]);
        assert_eq!(
            opt,
            Opt::KeyValues(vec![
                ("a".to_string(), "1".to_string()),
                ("b".to_string(), "2".to_string())
            ])
        );
    }
}
