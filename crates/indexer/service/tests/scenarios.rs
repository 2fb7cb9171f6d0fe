//! End-to-end behavior of the service against an in-memory chain.

use std::{sync::Arc, time::Duration};
use txscan_protocol::parse_transaction;
use txscan_service::{
    ScanError, ScannerConfig, TxParserService,
    test_utils::{FakeChain, transfer},
};

fn service(chain: &Arc<FakeChain>) -> TxParserService<Arc<FakeChain>> {
    TxParserService::new(Arc::clone(chain), ScannerConfig::default())
}

#[tokio::test]
async fn records_transfer_for_subscribed_sender_only() {
    let chain = Arc::new(FakeChain::new(100));
    let wire = transfer(100, "0xfeed", "0xAA", "0xBB");
    chain.insert_block(100, vec![wire.clone()]);

    let service = service(&chain);
    assert!(service.subscribe("0xAA"));
    assert_eq!(service.scanner().advance().await, Ok(Some(100)));

    assert_eq!(service.transactions_for("0xAA"), vec![parse_transaction(&wire)]);
    assert!(service.transactions_for("0xBB").is_empty());
    assert_eq!(service.current_scan_position(), 100);
}

#[tokio::test]
async fn subscriptions_are_not_retroactive() {
    let chain = Arc::new(FakeChain::new(100));
    chain.insert_block(100, vec![transfer(100, "0x01", "0xCC", "0xDD")]);

    let service = service(&chain);
    assert_eq!(service.scanner().advance().await, Ok(Some(100)));

    assert!(service.subscribe("0xCC"));
    assert_eq!(service.scanner().advance().await, Ok(None));
    assert!(service.transactions_for("0xCC").is_empty());

    chain.insert_block(101, vec![transfer(101, "0x02", "0xDD", "0xCC")]);
    chain.set_head(101);
    assert_eq!(service.scanner().advance().await, Ok(Some(101)));

    let history = service.transactions_for("0xcc");
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].hash, "0x02");
}

#[tokio::test]
async fn failed_fetch_is_retried_at_the_same_block() {
    let chain = Arc::new(FakeChain::new(100));
    let service = service(&chain);
    assert_eq!(service.scanner().advance().await, Ok(Some(100)));

    chain.set_head(102);
    chain.fail_block(101);
    let err = service.scanner().advance().await.unwrap_err();
    assert!(matches!(err, ScanError::BlockFetch { index: 101, .. }));
    assert_eq!(service.current_scan_position(), 100);

    chain.heal_block(101);
    assert_eq!(service.scanner().advance().await, Ok(Some(101)));
    assert_eq!(service.scanner().advance().await, Ok(Some(102)));
    assert_eq!(chain.fetched(), vec![100, 101, 101, 102]);
}

#[tokio::test(start_paused = true)]
async fn background_loop_follows_the_head() {
    let chain = Arc::new(FakeChain::new(500));
    let service = service(&chain);
    assert!(service.subscribe("0xaa"));
    assert!(service.start(Duration::from_secs(10)));

    tokio::time::sleep(Duration::from_secs(1)).await;
    assert_eq!(service.current_scan_position(), 500);

    chain.insert_block(501, vec![transfer(501, "0x01", "0xaa", "0xaa")]);
    chain.insert_block(503, vec![transfer(503, "0x02", "0xbb", "0xaa")]);
    chain.set_head(503);
    tokio::time::sleep(Duration::from_secs(10)).await;

    assert_eq!(service.current_scan_position(), 503);
    let hashes: Vec<_> = service.transactions_for("0xAA").into_iter().map(|tx| tx.hash).collect();
    assert_eq!(hashes, vec!["0x01", "0x01", "0x02"]);

    service.stop().await;
    assert!(!service.is_running());
}
