//! Ping-Pong Demo
//!
//! Two runtimes in one process, one actor each. `pinger` lives in `alpha`,
//! `ponger` in `beta`; every ping crosses the bridge, the reply comes back
//! through the proxy that `beta` created for the sender name. Neither actor
//! knows which side the other lives on.

use anyhow::Result;
use tandem_runtime::{ActorSystem, Mailbox};
use tandem_wire::{Ping, Pong};
use tracing::{info, warn};

const ROUNDS: i32 = 5;

async fn run_ponger(system: ActorSystem, mut mailbox: Mailbox) {
    while let Some(inbound) = mailbox.recv().await {
        let ping = match inbound.get::<Ping>() {
            Some(ping) => *ping,
            None => {
                warn!(kind = ?inbound.kind(), "ponger ignoring unexpected message");
                continue;
            }
        };
        info!(count = ping.count, "🏓 ponger got ping");

        // Resolving the envelope's sender name finds the reply proxy
        match inbound.sender().and_then(|name| system.resolve(name)) {
            Some(reply_to) => {
                if let Err(err) = reply_to.send(Box::new(Pong::new(ping.count)), Some("ponger")) {
                    warn!(%err, "reply failed");
                }
            }
            None => warn!("ping carried no resolvable sender, dropping"),
        }

        if ping.count >= ROUNDS {
            break;
        }
    }
    info!("ponger done");
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tandem_runtime=debug".into()),
        )
        .init();

    info!("🚀 Starting ping-pong across two runtimes");

    let alpha = ActorSystem::new("alpha");
    let beta = ActorSystem::new("beta");
    ActorSystem::link(&alpha, &beta);

    let mut pinger_mailbox = alpha.register("pinger");
    let ponger_mailbox = beta.register("ponger");
    alpha.init();
    beta.init();

    let ponger = tokio::spawn(run_ponger(beta, ponger_mailbox));

    let target = alpha
        .resolve("ponger")
        .ok_or_else(|| anyhow::anyhow!("ponger not resolvable from alpha"))?;
    info!(remote = target.is_remote(), "pinger resolved ponger");

    for round in 1..=ROUNDS {
        let status = target.send(Box::new(Ping::new(round)), Some("pinger"))?;
        info!(round, code = status.status_code(), "ping sent");

        match pinger_mailbox.recv().await {
            Some(reply) => match reply.get::<Pong>() {
                Some(pong) => info!(count = pong.count, "🏓 pinger got pong"),
                None => warn!(kind = ?reply.kind(), "pinger ignoring unexpected message"),
            },
            None => break,
        }
    }

    ponger.await?;
    alpha.shutdown();
    info!("✅ {ROUNDS} round trips completed");
    Ok(())
}
