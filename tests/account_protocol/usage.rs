//! Usage Error Tests
//!
//! Calling-discipline violations must surface as usage errors, never as
//! aborts, and must leave holder state and value unchanged.

use crate::*;

fn assert_usage<T: std::fmt::Debug>(result: Result<T>, expected: UsageError) {
    match result {
        Err(Error::Usage(actual)) => assert_eq!(actual, expected),
        other => panic!("expected {:?}, got {:?}", expected, other),
    }
}

#[test]
fn test_update_without_write_lock() {
    let (_, account) = create_account(1);
    let x = txn(1);

    assert_usage(account.update(x, 2), UsageError::NotWriter(x));
    account.open_read(x).unwrap();
    assert_usage(account.update(x, 2), UsageError::NotWriter(x));
    assert_eq!(account.snapshot_value(), 1);
}

#[test]
fn test_verify_without_read_lock() {
    let (_, account) = create_account(1);
    let x = txn(1);

    assert_usage(account.verify(x, 1), UsageError::NotReader(x));
    account.open_write(x).unwrap();
    assert_usage(account.verify(x, 1), UsageError::NotReader(x));
}

#[test]
fn test_close_holding_nothing() {
    let (_, account) = create_account(0);
    let (x, y) = (txn(1), txn(2));
    account.open_write(y).unwrap();
    let before = account.holders();

    assert_usage(account.close(x), UsageError::NotHolding(x));
    assert_eq!(account.holders(), before);
}

#[test]
fn test_double_open() {
    let (_, account) = create_account(0);
    let x = txn(1);

    account.open_read(x).unwrap();
    assert_usage(account.open_read(x), UsageError::AlreadyHolding(x));

    account.open_write(x).unwrap();
    assert_usage(account.open_write(x), UsageError::AlreadyWriter(x));
    assert_usage(account.open_read(x), UsageError::AlreadyHolding(x));
}

#[test]
fn test_peek_after_open() {
    let (_, account) = create_account(5);
    let x = txn(1);
    account.open_read(x).unwrap();
    assert_usage(account.peek(x), UsageError::PeekWhileHolding(x));
}

#[test]
fn test_usage_errors_are_not_retryable() {
    let (_, account) = create_account(0);
    let err = account.close(txn(1)).unwrap_err();
    assert!(!err.is_retryable());
    assert!(!err.is_serious());
    assert!(err.to_string().starts_with("usage error"));
}
