//! The process-wide stack configuration can be installed exactly once.
//!
//! Kept in its own test binary so no other test observes the installed config.

use errtrail::stack::{self, StackConfig};
use errtrail::Error;
use std::panic;

#[test]
fn config_is_set_once_and_used_by_constructors() {
    assert!(!stack::configured());
    let before = Error::new("before", &[]);
    assert!(!before.stack_trace().is_empty());

    stack::set_config(StackConfig::default().max_frames(1));
    assert!(stack::configured());
    assert_eq!(stack::config().max_frames, 1);

    let after = Error::new("after", &[]);
    assert_eq!(after.stack_trace().len(), 1);
    assert!(after.stack_trace()[0].contains("config_is_set_once_and_used_by_constructors"));

    let second = panic::catch_unwind(|| stack::set_config(StackConfig::default()));
    assert!(second.is_err());
    assert_eq!(stack::config().max_frames, 1);
}
