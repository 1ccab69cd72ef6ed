//! End-to-end tests for two linked runtimes in one process: request and
//! reply crossing the boundary in both directions, ownership hand-off on
//! every send outcome, and the publish fan-out path.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tandem_runtime::{
    ActorRef, ActorSystem, CodecTable, DeliveryStatus, Inbound, Mailbox, Message, SendError,
    SubscriberTable,
};
use tandem_wire::{
    DataRequest, DataResponse, MarketUpdate, MsgKind, Ping, Pong, WireMessage,
};
use tokio_test::assert_ok;

async fn recv_soon(mailbox: &mut Mailbox) -> Inbound {
    tokio::time::timeout(Duration::from_secs(1), mailbox.recv())
        .await
        .expect("mailbox wait timed out")
        .expect("mailbox closed")
}

/// Counts its own drops so a test can assert a sent message is released
/// exactly once on each delivery branch. Reports a real registered kind so
/// the remote branches exercise the real decode path.
#[derive(Debug)]
struct DropProbe {
    kind: MsgKind,
    bytes: [u8; 4],
    drops: Arc<AtomicUsize>,
}

impl DropProbe {
    fn new(kind: MsgKind, drops: &Arc<AtomicUsize>) -> Box<Self> {
        Box::new(Self {
            kind,
            bytes: 1i32.to_le_bytes(),
            drops: Arc::clone(drops),
        })
    }
}

impl Message for DropProbe {
    fn kind(&self) -> MsgKind {
        self.kind
    }

    fn wire_bytes(&self) -> &[u8] {
        &self.bytes
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }

    fn into_any(self: Box<Self>) -> Box<dyn std::any::Any> {
        self
    }
}

impl Drop for DropProbe {
    fn drop(&mut self) {
        self.drops.fetch_add(1, Ordering::SeqCst);
    }
}

#[test]
fn message_released_once_on_every_send_branch() {
    let alpha = ActorSystem::new("alpha");
    let beta = ActorSystem::new("beta");
    ActorSystem::link(&alpha, &beta);
    let mut local_mb = alpha.register("local_target");
    let _remote_mb = beta.register("remote_target");
    let drops = Arc::new(AtomicUsize::new(0));

    // Unbound: the error consumes the message
    let unbound = ActorRef::default();
    assert_eq!(
        unbound.send(DropProbe::new(MsgKind::Ping, &drops), None),
        Err(SendError::UnresolvedTarget)
    );
    assert_eq!(drops.load(Ordering::SeqCst), 1);

    // Local delivered: released when the receiver drops it
    let local = alpha.resolve("local_target").unwrap();
    local.send(DropProbe::new(MsgKind::Ping, &drops), None).unwrap();
    assert_eq!(drops.load(Ordering::SeqCst), 1);
    drop(local_mb.try_recv().unwrap());
    assert_eq!(drops.load(Ordering::SeqCst), 2);

    // Remote delivered: the peer decodes a fresh value, the original is
    // released on the sending side
    let remote = alpha.resolve("remote_target").unwrap();
    let status = remote.send(DropProbe::new(MsgKind::Ping, &drops), None).unwrap();
    assert_eq!(status, DeliveryStatus::Delivered);
    assert_eq!(drops.load(Ordering::SeqCst), 3);

    // Remote not found: released even though nothing was enqueued
    let ghost = ActorRef::remote("ghost", alpha.peer_bridge().unwrap());
    let status = ghost.send(DropProbe::new(MsgKind::Ping, &drops), None).unwrap();
    assert_eq!(status, DeliveryStatus::NotFound);
    assert_eq!(drops.load(Ordering::SeqCst), 4);
}

#[test]
fn message_released_once_when_peer_drops_unknown_kind() {
    let alpha = ActorSystem::new("alpha");
    let mut codecs = CodecTable::new();
    codecs.register::<Ping>();
    let beta = ActorSystem::with_codecs("beta", codecs);
    ActorSystem::link(&alpha, &beta);
    let mut worker_mb = beta.register("worker");
    let drops = Arc::new(AtomicUsize::new(0));

    // The peer knows only Ping, so a Pong is dropped by policy; the bridge
    // still accepted the bytes and the original is released exactly once
    let worker = alpha.resolve("worker").unwrap();
    let status = worker.send(DropProbe::new(MsgKind::Pong, &drops), None).unwrap();
    assert_eq!(status, DeliveryStatus::Delivered);
    assert_eq!(drops.load(Ordering::SeqCst), 1);
    assert!(worker_mb.try_recv().is_err());
}

#[tokio::test]
async fn ping_pong_round_trips_across_the_boundary() {
    let alpha = ActorSystem::new("alpha");
    let beta = ActorSystem::new("beta");
    ActorSystem::link(&alpha, &beta);
    let mut pinger_mb = alpha.register("pinger");
    let mut ponger_mb = beta.register("ponger");

    let ponger = tokio::spawn(async move {
        while let Some(inbound) = ponger_mb.recv().await {
            let count = match inbound.get::<Ping>() {
                Some(ping) => ping.count,
                None => continue,
            };
            if let Some(reply_to) = inbound.sender().and_then(|s| beta.resolve(s)) {
                let _ = reply_to.send(Box::new(Pong::new(count)), Some("ponger"));
            }
            if count >= 3 {
                return beta;
            }
        }
        beta
    });

    let target = alpha.resolve("ponger").unwrap();
    assert!(target.is_remote());
    for round in 1..=3 {
        let status = target
            .send(Box::new(Ping::new(round)), Some("pinger"))
            .unwrap();
        assert!(status.is_delivered());

        let reply = recv_soon(&mut pinger_mb).await;
        assert_eq!(reply.kind(), MsgKind::Pong);
        assert_eq!(reply.sender(), Some("ponger"));
        assert_eq!(reply.get::<Pong>().unwrap().count, round);
    }

    // One proxy served all three replies
    let beta = ponger.await.unwrap();
    assert_eq!(beta.proxy_count(), 1);
}

#[tokio::test]
async fn request_reply_carries_text_and_flags_intact() {
    let alpha = ActorSystem::new("alpha");
    let beta = ActorSystem::new("beta");
    ActorSystem::link(&alpha, &beta);
    let mut client_mb = alpha.register("client");
    let mut provider_mb = beta.register("provider");

    tokio::spawn(async move {
        while let Some(inbound) = provider_mb.recv().await {
            let request = match inbound.get::<DataRequest>() {
                Some(request) => *request,
                None => continue,
            };
            let response = match request.symbol() {
                "BTC-USD" => DataResponse::new(request.request_id, 68_000.5, true),
                _ => DataResponse::new(request.request_id, 0.0, false),
            };
            if let Some(reply_to) = inbound.sender().and_then(|s| beta.resolve(s)) {
                let _ = reply_to.send(Box::new(response), Some("provider"));
            }
        }
    });

    let provider = alpha.resolve("provider").unwrap();
    assert_ok!(
        provider.send(Box::new(DataRequest::new(1, "BTC-USD")), Some("client"))
    );
    assert_ok!(
        provider.send(Box::new(DataRequest::new(2, "NO-SUCH")), Some("client"))
    );

    let hit = recv_soon(&mut client_mb).await;
    let hit = hit.get::<DataResponse>().unwrap();
    assert_eq!(hit.request_id, 1);
    assert!(hit.found());
    assert_eq!(hit.value, 68_000.5);

    let miss = recv_soon(&mut client_mb).await;
    let miss = miss.get::<DataResponse>().unwrap();
    assert_eq!(miss.request_id, 2);
    assert!(!miss.found());
}

#[tokio::test]
async fn deliveries_to_one_target_arrive_in_send_order() {
    // Ordering per target is a property of the in-process bridge plus the
    // mailbox channel; sends from one task must not be reordered.
    let alpha = ActorSystem::new("alpha");
    let beta = ActorSystem::new("beta");
    ActorSystem::link(&alpha, &beta);
    let mut sink_mb = beta.register("sink");

    let sink = alpha.resolve("sink").unwrap();
    for i in 0..100 {
        sink.send(Box::new(Ping::new(i)), None).unwrap();
    }

    for expected in 0..100 {
        let inbound = recv_soon(&mut sink_mb).await;
        assert_eq!(inbound.get::<Ping>().unwrap().count, expected);
    }
}

#[test]
fn publish_fans_out_to_local_and_remote_subscribers() {
    let alpha = ActorSystem::new("alpha");
    let beta = ActorSystem::new("beta");
    ActorSystem::link(&alpha, &beta);
    let mut near_mb = alpha.register("near_trader");
    let mut second_mb = alpha.register("second_trader");
    let mut far_mb = beta.register("far_trader");
    let mut other_mb = alpha.register("other_trader");

    let mut table = SubscriberTable::new();
    assert!(table
        .subscribe(&alpha, Some("near_trader"), "BTC-USD")
        .is_some_and(|r| r.is_local()));
    assert!(table
        .subscribe(&alpha, Some("second_trader"), "BTC-USD")
        .is_some_and(|r| r.is_local()));
    assert!(table
        .subscribe(&alpha, Some("far_trader"), "BTC-USD")
        .is_some_and(|r| r.is_remote()));
    assert!(table
        .subscribe(&alpha, Some("other_trader"), "ETH-USD")
        .is_some());

    // Two local subscribers plus one across the boundary: exactly three
    // sends, each addressed through its own reference
    let delivered = table.publish("BTC-USD", "feed", || {
        Box::new(MarketUpdate::new("BTC-USD", 68_000.0, 1_724_000_000, 42))
    });
    assert_eq!(delivered, 3);

    for mailbox in [&mut near_mb, &mut second_mb, &mut far_mb] {
        let inbound = mailbox.try_recv().unwrap();
        assert_eq!(inbound.sender(), Some("feed"));
        let update = inbound.get::<MarketUpdate>().unwrap();
        assert_eq!(update.symbol(), "BTC-USD");
        assert_eq!(update.volume, 42);
    }
    assert!(other_mb.try_recv().is_err());

    // Remote subscriber disappearing degrades that one send, not the rest
    beta.unregister("far_trader");
    drop(far_mb);
    let delivered = table.publish("BTC-USD", "feed", || {
        Box::new(MarketUpdate::new("BTC-USD", 68_100.0, 1_724_000_001, 7))
    });
    assert_eq!(delivered, 2);
    assert_eq!(second_mb.try_recv().unwrap().kind(), MsgKind::MarketUpdate);
    assert_eq!(near_mb.try_recv().unwrap().kind(), MsgKind::MarketUpdate);
}

#[test]
fn bridge_status_codes_match_the_boundary_contract() {
    let alpha = ActorSystem::new("alpha");
    let beta = ActorSystem::new("beta");
    ActorSystem::link(&alpha, &beta);
    let mut worker_mb = beta.register("worker");
    let bridge = alpha.peer_bridge().unwrap();

    let ping = Ping::new(5);
    let ok = bridge.deliver("worker", None, MsgKind::Ping as i32, ping.to_wire());
    assert_eq!(ok.status_code(), 0);
    assert_eq!(worker_mb.try_recv().unwrap().kind(), MsgKind::Ping);

    let missing = bridge.deliver("nobody", None, MsgKind::Ping as i32, ping.to_wire());
    assert_eq!(missing.status_code(), -1);

    // Truncated payloads are accepted at the boundary and dropped on decode
    let short = bridge.deliver("worker", None, MsgKind::Ping as i32, &ping.to_wire()[..2]);
    assert_eq!(short.status_code(), 0);
    assert!(worker_mb.try_recv().is_err());

    assert!(bridge.exists("worker"));
    assert!(!bridge.exists("nobody"));
}
