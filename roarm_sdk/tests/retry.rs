//! Bounded-retry laws of the request cycle, driven with stub attempts.
#![cfg(feature = "driver")]

use roarm_sdk::drivers::{request_with_retries, MAX_TRIES};
use roarm_sdk::RoarmError;

#[tokio::test]
async fn test_success_on_final_attempt() {
    let mut attempts_made = 0u32;
    let result = request_with_retries(&mut attempts_made, MAX_TRIES, |made, attempt| {
        Box::pin(async move {
            *made += 1;
            if attempt < MAX_TRIES - 1 {
                Ok(None)
            } else {
                Ok(Some("data"))
            }
        })
    })
    .await;

    assert_eq!(result, Ok("data"));
    assert_eq!(attempts_made, 10);
}

#[tokio::test]
async fn test_first_attempt_success_stops_immediately() {
    let mut attempts_made = 0u32;
    let result = request_with_retries(&mut attempts_made, MAX_TRIES, |made, _| {
        Box::pin(async move {
            *made += 1;
            Ok(Some(42))
        })
    })
    .await;

    assert_eq!(result, Ok(42));
    assert_eq!(attempts_made, 1);
}

#[tokio::test]
async fn test_exhaustion_after_exactly_max_tries() {
    let mut attempts_made = 0u32;
    let result: Result<(), RoarmError> =
        request_with_retries(&mut attempts_made, MAX_TRIES, |made, _| {
            Box::pin(async move {
                *made += 1;
                Ok(None)
            })
        })
        .await;

    assert_eq!(result, Err(RoarmError::RetriesExhausted));
    assert_eq!(attempts_made, 10);
}

#[tokio::test]
async fn test_transport_errors_count_as_failed_attempts() {
    let mut attempts_made = 0u32;
    let result: Result<(), RoarmError> =
        request_with_retries(&mut attempts_made, MAX_TRIES, |made, _| {
            Box::pin(async move {
                *made += 1;
                Err(RoarmError::FailedToSend("wire fell out".to_string()))
            })
        })
        .await;

    // Hard faults are retried like empty reads, then surfaced only as
    // the exhaustion sentinel.
    assert_eq!(result, Err(RoarmError::RetriesExhausted));
    assert_eq!(attempts_made, 10);
}

#[tokio::test]
async fn test_error_then_recovery() {
    let mut attempts_made = 0u32;
    let result = request_with_retries(&mut attempts_made, MAX_TRIES, |made, attempt| {
        Box::pin(async move {
            *made += 1;
            match attempt {
                0..=2 => Err(RoarmError::FailedToReceive("nothing yet".to_string())),
                3..=5 => Ok(None),
                _ => Ok(Some(attempt)),
            }
        })
    })
    .await;

    assert_eq!(result, Ok(6));
    assert_eq!(attempts_made, 7);
}
