//! Merging per-hop stack traces into one

/// Prefix and suffix of the line that opens each hop
pub const BOUNDARY_PREFIX: &str = "--- ";
/// See [`BOUNDARY_PREFIX`]
pub const BOUNDARY_SUFFIX: &str = " ---";

/// Flatten `(trace, binary)` hops into one trace
///
/// Every hop is introduced by a boundary marker naming its binary
/// (`--- name ---`, `<unknown>` when empty), followed by its frames in
/// their original order. Hops are emitted in the order given.
pub fn merge<'a, I>(hops: I) -> Vec<String>
where
    I: IntoIterator<Item = (&'a [String], &'a str)>,
{
    let mut merged = Vec::new();
    for (frames, binary) in hops {
        merged.push(boundary_marker(binary));
        merged.extend(frames.iter().cloned());
    }
    merged
}

/// The marker line for one binary
#[must_use]
pub fn boundary_marker(binary: &str) -> String {
    let name = if binary.is_empty() { "<unknown>" } else { binary };
    format!("{BOUNDARY_PREFIX}{name}{BOUNDARY_SUFFIX}")
}

/// Whether a merged trace line is a boundary marker
#[must_use]
pub fn is_boundary_marker(line: &str) -> bool {
    line.starts_with(BOUNDARY_PREFIX) && line.ends_with(BOUNDARY_SUFFIX)
}
