use chrono::Utc;
use httpmock::prelude::*;
use hotel_booking::adapters::{JsonRpcClient, JsonRpcLedger, WalletGateway};
use hotel_booking::core::{LedgerReader, LedgerRelay, RoomAvailabilityProvider, SigningAgentGateway};
use hotel_booking::domain::model::{LedgerCall, PendingTransaction, SignedTransaction};
use hotel_booking::BookingError;
use serde_json::json;
use std::time::Duration;

const CONTRACT: &str = "0x5fbdb2315678afecb367f032d93f642f64180aa3";
const ACCOUNT: &str = "0x70997970c51812dc3a010c7d01b50e0d17dc79c8";

fn rpc_result(result: serde_json::Value) -> serde_json::Value {
    json!({ "jsonrpc": "2.0", "id": 1, "result": result })
}

fn rpc_error(code: i64, message: &str) -> serde_json::Value {
    json!({ "jsonrpc": "2.0", "id": 1, "error": { "code": code, "message": message } })
}

fn word(value: u64) -> String {
    format!("{:064x}", value)
}

fn ledger_for(server: &MockServer) -> JsonRpcLedger {
    let rpc = JsonRpcClient::new(server.url("/"), Duration::from_secs(5)).unwrap();
    JsonRpcLedger::new(rpc, CONTRACT).with_polling(Duration::from_millis(10), Duration::from_millis(300))
}

fn wallet_for(server: &MockServer) -> WalletGateway {
    let rpc = JsonRpcClient::new(server.url("/"), Duration::from_secs(5)).unwrap();
    WalletGateway::new(rpc, CONTRACT, 4157)
}

fn pending(tx_hash: &str) -> PendingTransaction {
    PendingTransaction {
        tx_hash: tx_hash.to_string(),
        submitted_at: Utc::now(),
    }
}

#[tokio::test]
async fn test_read_max_stay_via_eth_call() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/")
                .body_contains("eth_call")
                .body_contains("0x693eafff");
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(rpc_result(json!(format!("0x{}", word(14)))));
        })
        .await;

    let max_stay = ledger_for(&server).read_max_stay().await.unwrap();

    assert_eq!(max_stay, 14);
    mock.assert_async().await;
}

#[tokio::test]
async fn test_list_available_rooms_decodes_array() {
    let server = MockServer::start_async().await;
    let encoded = format!("0x{}{}{}{}{}", word(32), word(3), word(101), word(102), word(205));
    server
        .mock_async(|when, then| {
            when.method(POST).path("/").body_contains("0xd0144595");
            then.status(200).json_body(rpc_result(json!(encoded)));
        })
        .await;

    let rooms = ledger_for(&server).list_available_rooms().await.unwrap();

    assert_eq!(rooms.into_iter().collect::<Vec<_>>(), vec![101, 102, 205]);
}

#[tokio::test]
async fn test_empty_room_list() {
    let server = MockServer::start_async().await;
    let encoded = format!("0x{}{}", word(32), word(0));
    server
        .mock_async(|when, then| {
            when.method(POST).path("/").body_contains("0xd0144595");
            then.status(200).json_body(rpc_result(json!(encoded)));
        })
        .await;

    assert!(ledger_for(&server).list_available_rooms().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_submit_and_confirm() {
    let server = MockServer::start_async().await;
    let send = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/")
                .body_contains("eth_sendRawTransaction")
                .body_contains("0xf86c01");
            then.status(200).json_body(rpc_result(json!("0xabc123")));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/")
                .body_contains("eth_getTransactionReceipt")
                .body_contains("0xabc123");
            then.status(200).json_body(rpc_result(json!({
                "transactionHash": "0xabc123",
                "blockNumber": "0x2a",
                "status": "0x1"
            })));
        })
        .await;

    let ledger = ledger_for(&server);
    let pending = ledger
        .submit(SignedTransaction {
            raw: "0xf86c01".to_string(),
            signer: ACCOUNT.to_string(),
        })
        .await
        .unwrap();
    assert_eq!(pending.tx_hash, "0xabc123");

    let receipt = ledger.wait_for_confirmation(&pending).await.unwrap();
    assert_eq!(receipt.block_number, Some(42));
    send.assert_async().await;
}

#[tokio::test]
async fn test_reverted_receipt() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/").body_contains("eth_getTransactionReceipt");
            then.status(200).json_body(rpc_result(json!({
                "transactionHash": "0xdead",
                "blockNumber": "0x10",
                "status": "0x0"
            })));
        })
        .await;

    let result = ledger_for(&server).wait_for_confirmation(&pending("0xdead")).await;

    assert!(matches!(result, Err(BookingError::TransactionReverted { tx_hash }) if tx_hash == "0xdead"));
}

#[tokio::test]
async fn test_confirmation_times_out_while_unmined() {
    let server = MockServer::start_async().await;
    let receipt_mock = server
        .mock_async(|when, then| {
            when.method(POST).path("/").body_contains("eth_getTransactionReceipt");
            then.status(200).json_body(rpc_result(json!(null)));
        })
        .await;

    let result = ledger_for(&server).wait_for_confirmation(&pending("0xbeef")).await;

    assert!(matches!(result, Err(BookingError::ConfirmationTimeout { .. })));
    assert!(receipt_mock.hits_async().await > 1);
}

#[tokio::test]
async fn test_rpc_error_object_is_surfaced() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/").body_contains("eth_sendRawTransaction");
            then.status(200)
                .json_body(rpc_error(-32000, "execution reverted: Room is not available"));
        })
        .await;

    let result = ledger_for(&server)
        .submit(SignedTransaction {
            raw: "0x01".to_string(),
            signer: ACCOUNT.to_string(),
        })
        .await;

    assert!(matches!(
        result,
        Err(BookingError::RpcError { code: -32000, message }) if message.contains("Room is not available")
    ));
}

#[tokio::test]
async fn test_http_failure_is_rpc_error() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/");
            then.status(502).body("bad gateway");
        })
        .await;

    let result = ledger_for(&server).read_max_stay().await;

    assert!(matches!(result, Err(BookingError::RpcError { code: 502, .. })));
}

#[tokio::test]
async fn test_wallet_signs_check_out() {
    let server = MockServer::start_async().await;
    let accounts = server
        .mock_async(|when, then| {
            when.method(POST).path("/").body_contains("eth_requestAccounts");
            then.status(200).json_body(rpc_result(json!([ACCOUNT])));
        })
        .await;
    let sign = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/")
                .body_contains("eth_signTransaction")
                .body_contains("0xcba5751c")
                .body_contains(CONTRACT)
                .body_contains("\"chainId\":\"0x103d\"");
            then.status(200).json_body(rpc_result(json!({ "raw": "0xf86b80", "tx": {} })));
        })
        .await;

    let signer = wallet_for(&server).acquire_signer().await.unwrap();
    assert_eq!(signer.account(), ACCOUNT);

    let signed = signer.sign(&LedgerCall::CheckOut).await.unwrap();
    assert_eq!(signed.raw, "0xf86b80");
    assert_eq!(signed.signer, ACCOUNT);

    accounts.assert_async().await;
    sign.assert_async().await;
}

#[tokio::test]
async fn test_wallet_signs_check_in_with_value() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/").body_contains("eth_requestAccounts");
            then.status(200).json_body(rpc_result(json!([ACCOUNT])));
        })
        .await;
    let sign = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/")
                .body_contains("eth_signTransaction")
                .body_contains("0x60ac728c")
                .body_contains("\"value\":\"0x5543df729c000\"");
            then.status(200).json_body(rpc_result(json!("0xf8aa01")));
        })
        .await;

    let signer = wallet_for(&server).acquire_signer().await.unwrap();
    let signed = signer
        .sign(&LedgerCall::CheckIn {
            room_number: 3,
            guest_name: "ALICE".to_string(),
            days_to_stay: 3,
            value: 1_500_000_000_000_000,
        })
        .await
        .unwrap();

    assert_eq!(signed.raw, "0xf8aa01");
    sign.assert_async().await;
}

#[tokio::test]
async fn test_wallet_user_denial() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/").body_contains("eth_requestAccounts");
            then.status(200).json_body(rpc_error(4001, "User rejected the request."));
        })
        .await;

    let result = wallet_for(&server).acquire_signer().await;

    assert!(matches!(result, Err(BookingError::UserDenied { .. })));
}

#[tokio::test]
async fn test_wallet_signature_declined() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/").body_contains("eth_requestAccounts");
            then.status(200).json_body(rpc_result(json!([ACCOUNT])));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/").body_contains("eth_signTransaction");
            then.status(200).json_body(rpc_error(4001, "User denied transaction signature."));
        })
        .await;

    let signer = wallet_for(&server).acquire_signer().await.unwrap();
    let result = signer.sign(&LedgerCall::CheckOut).await;

    assert!(matches!(result, Err(BookingError::UserDenied { .. })));
}

#[tokio::test]
async fn test_locked_wallet_has_no_agent() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/").body_contains("eth_requestAccounts");
            then.status(200).json_body(rpc_result(json!([])));
        })
        .await;

    let result = wallet_for(&server).acquire_signer().await;

    assert!(matches!(result, Err(BookingError::NoSigningAgent { .. })));
}

#[tokio::test]
async fn test_unreachable_or_unconfigured_wallet_has_no_agent() {
    let rpc = JsonRpcClient::new("http://127.0.0.1:1", Duration::from_secs(2)).unwrap();
    let unreachable = WalletGateway::new(rpc, CONTRACT, 4157).acquire_signer().await;
    assert!(matches!(unreachable, Err(BookingError::NoSigningAgent { .. })));

    let absent = WalletGateway::absent().acquire_signer().await;
    assert!(matches!(absent, Err(BookingError::NoSigningAgent { .. })));
}
