//! Tests for chain traversal, identity and extraction

use errtrail::{
    c, chain, hop, join, trace, with_code, with_key_value, with_stack_trace, without_trace, wrap,
    Error,
};

fn messages(path: &[Error]) -> Vec<&str> {
    path.iter().map(Error::message).collect()
}

#[test]
fn codes_fall_back_to_message() {
    // Nodes without a code contribute their message; kept for existing consumers.
    let err = wrap(
        wrap(Error::new("id1", &[with_code("code1")]), "id2", &[]),
        "id3",
        &[with_code("code3")],
    );
    assert_eq!(chain::codes(&err), ["code3", "id2", "code1"]);
}

#[test]
fn code_and_message_are_most_recent_non_empty() {
    let err = wrap(
        wrap(Error::new("root cause", &[with_code("E_ROOT")]), "", &[]),
        "",
        &[with_key_value("k", "v")],
    );
    assert_eq!(chain::code(&err), "E_ROOT");
    assert_eq!(chain::message(&err), "root cause");
}

#[test]
fn is_survives_deep_wrapping() {
    let sentinel = Error::new("not found", &[c("not_found")]);
    let mut err = wrap(sentinel.clone(), "lookup", &[]);
    for depth in 0..6 {
        err = wrap(err, format!("layer {depth}"), &[]);
    }
    assert!(chain::is(&err, &sentinel));

    // A different node with the same code matches as well.
    let twin = Error::new("other text", &[with_code("not_found")]);
    assert!(chain::is(&err, &twin));
}

#[test]
fn is_is_directional() {
    let inner = Error::new("inner", &[with_code("A")]);
    let target = wrap(inner, "target", &[with_code("B")]);
    let err = Error::new("err", &[with_code("A")]);

    // Only the target's most recent code (B) is compared.
    assert!(!chain::is(&err, &target));
    assert!(chain::is(&target, &err));
}

#[test]
fn is_without_codes_needs_identity() {
    let target = Error::new("plain", &[]);
    let same_text = Error::new("plain", &[]);
    assert!(!chain::is(&same_text, &target));
    assert!(chain::is(&wrap(target.clone(), "outer", &[]), &target));
    assert!(!chain::is(None, &target));
    assert!(!chain::is(&target, None));
}

#[test]
fn is_finds_code_in_any_branch() {
    let timeout = Error::new("timeout", &[c("timeout")]);
    let err = wrap(
        join([
            Error::new("a", &[with_code("A")]),
            wrap(timeout.clone(), "b", &[]),
        ])
        .expect("non-empty"),
        "batch",
        &[],
    );
    assert!(chain::is(&err, &timeout));
}

#[test]
fn walk_visits_join_then_branches_in_order() {
    let err = wrap(
        join([Error::new("one", &[]), Error::new("two", &[])]).expect("non-empty"),
        "outer",
        &[],
    );
    let mut seen = Vec::new();
    chain::walk(&err, |node| {
        seen.push(node.message().to_string());
        true
    });
    assert_eq!(seen, ["outer", "one", "two"]);
}

#[test]
fn walk_visits_each_branch_fully_before_the_next() {
    let err = wrap(
        join([
            wrap(Error::new("a2", &[]), "a1", &[]),
            wrap(Error::new("b2", &[]), "b1", &[]),
        ])
        .expect("non-empty"),
        "root",
        &[],
    );
    let mut seen = Vec::new();
    chain::walk(&err, |node| {
        seen.push(node.message().to_string());
        true
    });
    assert_eq!(seen, ["root", "a1", "a2", "b1", "b2"]);
}

#[test]
fn walk_abort_skips_sibling_branches() {
    let err = wrap(
        join([
            wrap(Error::new("a2", &[]), "a1", &[]),
            wrap(Error::new("b2", &[]), "b1", &[]),
        ])
        .expect("non-empty"),
        "root",
        &[],
    );
    let mut seen = Vec::new();
    chain::walk(&err, |node| {
        seen.push(node.message().to_string());
        node.message() != "a2"
    });
    assert_eq!(seen, ["root", "a1", "a2"]);
}

#[test]
fn flatten_lists_one_path_per_leaf() {
    let left = Error::new("left", &[]);
    let right_leaf = Error::new("right leaf", &[]);
    let right = wrap(right_leaf, "right", &[]);
    let err = wrap(join([left, right]).expect("non-empty"), "root", &[]);

    let paths = chain::flatten(&err);
    let rendered: Vec<Vec<&str>> = paths.iter().map(|p| messages(p)).collect();
    assert_eq!(
        rendered,
        vec![vec!["root", "left"], vec!["root", "right", "right leaf"]]
    );
}

#[test]
fn flatten_single_chain_is_one_path() {
    let err = wrap(wrap(Error::new("a", &[]), "b", &[]), "c", &[]);
    let paths = chain::flatten(&err);
    assert_eq!(paths.len(), 1);
    assert_eq!(messages(&paths[0]), ["c", "b", "a"]);
}

#[test]
fn flatten_nested_joins() {
    let inner = join([Error::new("x", &[]), Error::new("y", &[])]).expect("non-empty");
    let err = wrap(
        join([wrap(inner, "mid", &[]), Error::new("z", &[])]).expect("non-empty"),
        "top",
        &[],
    );
    let rendered: Vec<Vec<String>> = chain::flatten(&err)
        .iter()
        .map(|p| p.iter().map(|e| e.message().to_string()).collect())
        .collect();
    assert_eq!(
        rendered,
        vec![
            vec!["top", "z"],
            vec!["top", "mid", "x"],
            vec!["top", "mid", "y"],
        ]
    );
}

#[test]
fn key_values_prefer_newest() {
    let err = wrap(
        Error::new("a", &[with_key_value("user", "old"), with_key_value("db", "main")]),
        "b",
        &[with_key_value("user", "new")],
    );
    let kvs = chain::key_values(&err);
    assert_eq!(kvs.get("user").map(String::as_str), Some("new"));
    assert_eq!(kvs.get("db").map(String::as_str), Some("main"));
}

#[test]
fn last_stack_trace_is_most_recent() {
    let inner = Error::new("inner", &[]);
    let outer = wrap(inner.clone(), "outer", &[with_stack_trace()]);

    let (binary, frames) = chain::last_stack_trace(&outer).expect("trace present");
    assert_eq!(binary, errtrail::stack::binary_name());
    assert_eq!(frames, outer.stack_trace());
    assert_ne!(frames, inner.stack_trace());

    let untraced = Error::new("x", &[without_trace()]);
    assert!(chain::last_stack_trace(&untraced).is_none());
}

#[test]
fn unwrap_returns_inner_without_touching_outer() {
    let inner = Error::new("inner", &[]);
    let outer = wrap(inner.clone(), "outer", &[]);

    let unwrapped = chain::unwrap(&outer).expect("single wrap");
    assert!(unwrapped.ptr_eq(&inner));
    assert_eq!(outer.to_string(), "outer: inner");
    assert!(chain::unwrap(&inner).is_none());

    let joined = join([Error::new("a", &[]), Error::new("b", &[])]).expect("non-empty");
    assert!(chain::unwrap(&joined).is_none());
    assert_eq!(chain::unwrap_all(&joined).len(), 2);
}

#[test]
fn hops_group_nodes_by_trace() {
    let sentinel = Error::new("gone", &[c("gone")]);
    let server_side = wrap(wrap(sentinel, "fetch", &[]), "handler", &[]);
    let boundary = wrap(server_side, "", &[with_stack_trace()]);
    let client_side = wrap(boundary, "calling service", &[with_key_value("attempt", 1)]);

    let hops = hop::hops(&client_side);
    assert_eq!(hops.len(), 2);

    let newest: Vec<&str> = hops[0].errors.iter().map(|e| e.message.as_str()).collect();
    assert_eq!(newest, ["calling service"]);
    assert_eq!(hops[0].errors[0].parameters, [("attempt".to_string(), "1".to_string())]);

    let oldest: Vec<&str> = hops[1].errors.iter().map(|e| e.message.as_str()).collect();
    assert_eq!(oldest, ["handler", "fetch", "gone"]);
    assert_eq!(hops[1].errors[2].code, "gone");
    assert!(!hops[1].stack_trace.is_empty());
}

#[test]
fn full_stack_trace_marks_each_hop() {
    let boundary = wrap(Error::new("a", &[]), "", &[with_stack_trace()]);
    let merged = hop::full_stack_trace(&boundary);

    let markers: Vec<&String> = merged
        .iter()
        .filter(|line| trace::is_boundary_marker(line))
        .collect();
    assert_eq!(markers.len(), 2);
    assert_eq!(merged[0], trace::boundary_marker(errtrail::stack::binary_name()));
}

#[test]
fn merge_inserts_markers_between_binaries() {
    let client = vec!["client.rs:1 client::call".to_string()];
    let server = vec![
        "server.rs:9 server::load".to_string(),
        "server.rs:3 server::handle".to_string(),
    ];
    let merged = trace::merge([(client.as_slice(), "client"), (server.as_slice(), "")]);
    assert_eq!(
        merged,
        [
            "--- client ---",
            "client.rs:1 client::call",
            "--- <unknown> ---",
            "server.rs:9 server::load",
            "server.rs:3 server::handle",
        ]
    );
}

#[test]
fn untraced_chain_is_a_single_anonymous_hop() {
    let err = Error::new("quiet", &[c("quiet")]);
    let hops = hop::hops(&err);
    assert_eq!(hops.len(), 1);
    assert!(hops[0].binary.is_empty());
    assert_eq!(hops[0].errors[0].code, "quiet");
}
