//! Market Data Demo
//!
//! A `feed` actor in runtime `alpha` owns a subscriber table, caches the
//! last update per topic, and publishes ticks and depth snapshots. One
//! trader subscribes from the same runtime, another from runtime `beta`;
//! both send the same `Subscribe` message, both get a snapshot on arrival
//! and the same live updates, and both leave via `Unsubscribe`. The table
//! does not care where they live.

use anyhow::Result;
use std::collections::HashMap;
use tandem_runtime::{ActorRef, ActorSystem, Mailbox, SubscriberTable};
use tandem_wire::{MarketDepth, MarketUpdate, MsgKind, Subscribe, Unsubscribe};
use tracing::{info, warn};

const TICKS: usize = 4;
const TOPIC: &str = "BTC-USD";

/// Feed loop: control messages mutate the table, a tick interval publishes.
/// Exits once every subscriber has unsubscribed again.
async fn run_feed(system: ActorSystem, mut mailbox: Mailbox) {
    let mut table = SubscriberTable::new();
    let mut last_update: HashMap<String, MarketUpdate> = HashMap::new();
    let mut interval = tokio::time::interval(std::time::Duration::from_millis(50));
    let mut had_subscribers = false;
    let mut tick = 0usize;
    let mut price = 68_000.0;

    loop {
        tokio::select! {
            inbound = mailbox.recv() => {
                let Some(inbound) = inbound else { break };
                match inbound.kind() {
                    MsgKind::Subscribe => {
                        let topic = inbound.get::<Subscribe>().map(Subscribe::topic);
                        if let Some(topic) = topic {
                            match table.subscribe(&system, inbound.sender(), topic) {
                                Some(subscriber) => {
                                    had_subscribers = true;
                                    info!(topic, remote = subscriber.is_remote(), "subscriber added");
                                    // Snapshot straight to the new subscriber:
                                    // last cached tick, then current depth
                                    if let Some(update) = last_update.get(topic) {
                                        if let Err(err) = subscriber.send(Box::new(*update), Some("feed")) {
                                            warn!(%err, "snapshot send failed");
                                        }
                                    }
                                    let depth = MarketDepth::new(topic, &[
                                        (price - 0.5, 100, price + 0.5, 120),
                                        (price - 1.0, 250, price + 1.0, 200),
                                    ]);
                                    if let Err(err) = subscriber.send(Box::new(depth), Some("feed")) {
                                        warn!(%err, "snapshot send failed");
                                    }
                                }
                                None => warn!(topic, "subscribe rejected"),
                            }
                        }
                    }
                    MsgKind::Unsubscribe => {
                        if let Some(unsub) = inbound.get::<Unsubscribe>() {
                            table.unsubscribe(inbound.sender(), unsub.topic());
                            info!(topic = unsub.topic(), "subscriber removed");
                        }
                    }
                    other => warn!(kind = ?other, "feed ignoring unexpected message"),
                }
                if had_subscribers && table.subscriber_count() == 0 {
                    break;
                }
            }
            _ = interval.tick() => {
                if table.subscriber_count() == 0 {
                    continue;
                }
                tick += 1;
                price += 1.5;
                let update = MarketUpdate::new(TOPIC, price, tick as i64, 10 * tick as i32);
                last_update.insert(TOPIC.to_owned(), update);
                let delivered = table.publish(TOPIC, "feed", || Box::new(update));
                info!(tick, price, delivered, "📊 tick published");
                if tick % 2 == 0 {
                    let depth = MarketDepth::new(TOPIC, &[
                        (price - 0.5, 100, price + 0.5, 120),
                        (price - 1.0, 250, price + 1.0, 200),
                    ]);
                    table.publish(TOPIC, "feed", || Box::new(depth));
                }
            }
        }
    }
    info!(ticks = tick, "feed done");
}

/// Trader loop: consume the snapshot and live ticks, then unsubscribe.
async fn run_trader(name: &'static str, mut mailbox: Mailbox, feed: ActorRef) {
    let mut seen = 0usize;
    while let Some(inbound) = mailbox.recv().await {
        match inbound.kind() {
            MsgKind::MarketDepth => {
                if let Some(depth) = inbound.get::<MarketDepth>() {
                    info!(trader = name, symbol = depth.symbol(), levels = depth.levels(), "depth snapshot");
                }
            }
            MsgKind::MarketUpdate => {
                if let Some(update) = inbound.get::<MarketUpdate>() {
                    info!(trader = name, symbol = update.symbol(), price = update.price, "tick");
                }
                seen += 1;
                if seen >= TICKS {
                    break;
                }
            }
            other => warn!(trader = name, kind = ?other, "unexpected message"),
        }
    }
    if let Err(err) = feed.send(Box::new(Unsubscribe::new(TOPIC)), Some(name)) {
        warn!(trader = name, %err, "unsubscribe failed");
    }
    info!(trader = name, seen, "trader done");
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    info!("🚀 Starting market data feed across two runtimes");

    let alpha = ActorSystem::new("alpha");
    let beta = ActorSystem::new("beta");
    ActorSystem::link(&alpha, &beta);

    let feed_mailbox = alpha.register("feed");
    let near_mailbox = alpha.register("near_trader");
    let far_mailbox = beta.register("far_trader");
    alpha.init();
    beta.init();

    // Both traders reach the feed the same way, one locally and one over
    // the bridge
    let near_feed = alpha
        .resolve("feed")
        .ok_or_else(|| anyhow::anyhow!("feed not resolvable from alpha"))?;
    let far_feed = beta
        .resolve("feed")
        .ok_or_else(|| anyhow::anyhow!("feed not resolvable from beta"))?;

    near_feed.send(Box::new(Subscribe::new(TOPIC)), Some("near_trader"))?;
    far_feed.send(Box::new(Subscribe::new(TOPIC)), Some("far_trader"))?;

    let feed = tokio::spawn(run_feed(alpha, feed_mailbox));
    let near = tokio::spawn(run_trader("near_trader", near_mailbox, near_feed));
    let far = tokio::spawn(run_trader("far_trader", far_mailbox, far_feed));

    near.await?;
    far.await?;
    feed.await?;

    beta.shutdown();
    info!("✅ feed drained, both traders caught every tick");
    Ok(())
}
