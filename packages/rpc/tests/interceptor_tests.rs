//! End-to-end unary calls through the in-memory transport

mod common;

use errtrail::{c, chain, hop, with_key_value, wrap, Error};
use errtrail_rpc::{
    canceled, deadline_exceeded, BridgeConfig, ClientInterceptor, Context, ServerInterceptor,
    DEFAULT_METADATA_PREFIX,
};
use std::time::{Duration, Instant};

#[tokio::test]
async fn expired_deadline_reads_as_local_sentinel() {
    let client = ClientInterceptor::default();
    let server = ServerInterceptor::default();
    let ctx = Context::new().with_deadline(Instant::now() - Duration::from_millis(1));

    let result: Result<(), Error> = client
        .unary(&ctx, "ping", |request| {
            common::unary(&server, request, |_ctx, _msg| async { Ok(()) })
        })
        .await;

    let err = result.expect_err("deadline already passed");
    assert!(chain::is(&err, deadline_exceeded()));
    assert_eq!(
        chain::key_values(&err).get("code").map(String::as_str),
        Some("DeadlineExceeded")
    );
}

#[tokio::test]
async fn context_key_values_reach_the_handler() {
    let client = ClientInterceptor::default();
    let server = ServerInterceptor::default();
    let ctx = Context::new()
        .with_key_value("tenant", "acme")
        .with_key_value("request_id", "r-17");

    let seen = client
        .unary(&ctx, 5_u32, |request| {
            assert_eq!(
                request.metadata.get(&format!("{DEFAULT_METADATA_PREFIX}tenant")),
                Some("acme")
            );
            common::unary(&server, request, |ctx, n| async move {
                Ok((ctx.key_values().to_vec(), n * 2))
            })
        })
        .await
        .expect("call succeeds");

    assert_eq!(
        seen.0,
        [
            ("request_id".to_string(), "r-17".to_string()),
            ("tenant".to_string(), "acme".to_string()),
        ]
    );
    assert_eq!(seen.1, 10);
}

#[tokio::test]
async fn server_error_comes_back_with_context_key_values() {
    let client = ClientInterceptor::default();
    let server = ServerInterceptor::default();
    let ctx = Context::new().with_key_value("ctx_key", "ctx_value");
    let not_found = Error::new("no such user", &[c("not_found")]);

    let result: Result<(), Error> = client
        .unary(&ctx, "u-1", |request| {
            common::unary(&server, request, |_ctx, id| {
                let not_found = not_found.clone();
                async move { Err(wrap(not_found, "lookup", &[with_key_value("id", id)])) }
            })
        })
        .await;

    let err = wrap(result.expect_err("handler failed"), "fetching profile", &[]);
    assert!(chain::is(&err, &not_found));

    let kvs = chain::key_values(&err);
    assert_eq!(kvs.get("ctx_key").map(String::as_str), Some("ctx_value"));
    assert_eq!(kvs.get("id").map(String::as_str), Some("u-1"));
    assert_eq!(err.to_string(), "fetching profile: lookup: no such user");

    // Client part of the trace first, then the server's.
    let hops = hop::hops(&err);
    assert_eq!(hops.len(), 2);
    assert_eq!(hops[0].errors[0].message, "fetching profile");
    assert!(hops[1].errors.iter().any(|e| e.code == "not_found"));
}

#[tokio::test]
async fn echo_can_be_disabled() {
    let client = ClientInterceptor::default();
    let server = ServerInterceptor::new(BridgeConfig::new().echo_key_values(false));
    let ctx = Context::new().with_key_value("ctx_key", "ctx_value");

    let result: Result<(), Error> = client
        .unary(&ctx, (), |request| {
            common::unary(&server, request, |_ctx, ()| async {
                Err(Error::new("failed", &[]))
            })
        })
        .await;

    let err = result.expect_err("handler failed");
    assert!(chain::key_values(&err).get("ctx_key").is_none());
}

#[tokio::test]
async fn handler_cancellation_maps_to_canceled() {
    let client = ClientInterceptor::default();
    let server = ServerInterceptor::default();
    let ctx = Context::new();

    let result: Result<(), Error> = client
        .unary(&ctx, (), |request| {
            common::unary(&server, request, |ctx, ()| async move {
                ctx.cancel();
                match ctx.err() {
                    Some(stop) => Err(wrap(stop, "handler stopped", &[])),
                    None => Ok(()),
                }
            })
        })
        .await;

    let err = result.expect_err("handler stopped");
    assert!(chain::is(&err, canceled()));
    assert!(!chain::is(&err, deadline_exceeded()));
}

#[tokio::test]
async fn custom_prefix_is_used_on_both_sides() {
    let config = BridgeConfig::new().metadata_prefix("x-app-");
    let client = ClientInterceptor::new(config.clone());
    let server = ServerInterceptor::new(config);
    let ctx = Context::new().with_key_value("zone", "eu");

    let zone = client
        .unary(&ctx, (), |request| {
            assert_eq!(request.metadata.get("x-app-zone"), Some("eu"));
            common::unary(&server, request, |ctx, ()| async move {
                Ok(ctx.key_values()[0].1.clone())
            })
        })
        .await
        .expect("call succeeds");
    assert_eq!(zone, "eu");
}

#[test]
fn context_deadline_helpers() {
    let ctx = Context::new().with_timeout(Duration::from_secs(60));
    assert!(!ctx.is_expired());
    assert!(ctx.err().is_none());
    assert!(ctx.time_remaining().is_some_and(|left| left > Duration::from_secs(30)));

    let expired = Context::new().with_deadline(Instant::now() - Duration::from_secs(1));
    assert!(expired.is_expired());
    let err = expired.err().expect("expired");
    assert!(err.ptr_eq(deadline_exceeded()));

    expired.cancel();
    assert!(expired.err().expect("canceled").ptr_eq(canceled()));
}
