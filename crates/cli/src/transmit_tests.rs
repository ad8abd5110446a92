// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use super::*;
use std::time::Duration;

fn transmitter(server: &mockito::ServerGuard) -> HttpTransmitter {
    let client = ApiClient::new(&server.url(), Duration::from_secs(5))
        .unwrap()
        .with_token("tok");
    HttpTransmitter::new(client)
}

fn pdf() -> FilePart<'static> {
    FilePart {
        file_name: "a.pdf",
        content_type: "application/pdf",
        payload: b"%PDF",
    }
}

#[tokio::test]
async fn test_success_becomes_receipt() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/documents/upload")
        .with_header("content-type", "application/json")
        .with_body(r#"{"success": true, "message": "indexed"}"#)
        .create_async()
        .await;

    let receipt = transmitter(&server)
        .transmit_document(pdf(), CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(receipt, TransmitReceipt::ok("indexed"));
}

#[tokio::test]
async fn test_401_becomes_unauthorized() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/images/upload")
        .with_status(401)
        .create_async()
        .await;
    let image = FilePart {
        file_name: "a.png",
        content_type: "image/png",
        payload: b"png",
    };

    let err = transmitter(&server)
        .transmit_image(image, CancellationToken::new())
        .await
        .unwrap_err();

    assert_eq!(err, TransmitError::Unauthorized);
}

#[tokio::test]
async fn test_server_error_becomes_failure_message() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/documents/upload")
        .with_status(500)
        .with_body(r#"{"detail": "disk full"}"#)
        .create_async()
        .await;

    let err = transmitter(&server)
        .transmit_document(pdf(), CancellationToken::new())
        .await
        .unwrap_err();

    assert_eq!(
        err,
        TransmitError::Failed("API request failed with status 500: disk full".to_string())
    );
}

#[tokio::test]
async fn test_cancelled_token_wins() {
    let server = mockito::Server::new_async().await;
    let cancel = CancellationToken::new();
    cancel.cancel();

    let err = transmitter(&server)
        .transmit_document(pdf(), cancel)
        .await
        .unwrap_err();

    assert_eq!(err, TransmitError::Cancelled);
}

#[test]
fn test_failure_message_drops_hint_lines() {
    let err = to_transmit_error(Error::QueueBusy);
    match err {
        TransmitError::Failed(msg) => {
            assert!(!msg.contains('\n'));
            assert!(msg.starts_with("queue is busy"));
        }
        other => unreachable!("unexpected {other:?}"),
    }
}
