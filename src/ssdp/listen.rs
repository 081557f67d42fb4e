use std::time::Duration;

use tokio::net::UdpSocket;
use tokio::time::Instant;

use crate::ssdp::messages::{NotifyKind, SsdpMessage};
use crate::ssdp::search::MAX_DATAGRAM;
use crate::ssdp::socket;
use crate::verdict::{ProbeError, Verdict};

/// Which NOTIFY sub-types have been seen so far.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct NotifyTracker {
    pub alive: bool,
    pub byebye: bool,
}

impl NotifyTracker {
    /// Record one datagram. Returns the NOTIFY kind it carried, if any.
    pub fn observe(&mut self, datagram: &str) -> Option<NotifyKind> {
        let message = SsdpMessage::parse(datagram);
        if !message.is_notify() {
            return None;
        }
        let kind = message.nts()?;
        match kind {
            NotifyKind::Alive => self.alive = true,
            NotifyKind::Byebye => self.byebye = true,
        }
        Some(kind)
    }

    /// Both a byebye and an alive have been seen, in either order.
    pub fn restart_seen(&self) -> bool {
        self.alive && self.byebye
    }
}

/// Read datagrams from `socket` until `done` accepts the tracker state or
/// `window` elapses. Every datagram is echoed to stdout.
async fn watch(
    socket: &UdpSocket,
    window: Duration,
    waiting_for: &'static str,
    done: impl Fn(&NotifyTracker) -> bool,
) -> Result<(), ProbeError> {
    let deadline = Instant::now() + window;
    let mut tracker = NotifyTracker::default();
    let mut buf = vec![0u8; MAX_DATAGRAM];
    loop {
        let Ok(received) = tokio::time::timeout_at(deadline, socket.recv_from(&mut buf)).await else {
            return Err(ProbeError::Timeout {
                after: window,
                waiting_for,
            });
        };
        let (len, from) = received?;
        let datagram = String::from_utf8_lossy(&buf[..len]);
        println!("{from} {datagram}");
        if let Some(kind) = tracker.observe(&datagram) {
            tracing::debug!("SSDP: {:?} NOTIFY from {}", kind, from);
        }
        if done(&tracker) {
            return Ok(());
        }
    }
}

/// PASS at the first `ssdp:alive` NOTIFY received within `window`.
pub async fn watch_alive(socket: &UdpSocket, window: Duration) -> Verdict {
    Verdict::from(watch(socket, window, "an ssdp:alive NOTIFY", |t| t.alive).await)
}

/// PASS once both an `ssdp:byebye` and an `ssdp:alive` NOTIFY arrived within `window`.
pub async fn watch_restart(socket: &UdpSocket, window: Duration) -> Verdict {
    Verdict::from(
        watch(socket, window, "both ssdp:byebye and ssdp:alive NOTIFYs", |t| {
            t.restart_seen()
        })
        .await,
    )
}

/// Alive listener probe on the SSDP group.
pub async fn alive(window: Duration) -> Verdict {
    println!("Please run DLNA server now!\n");
    match socket::build_listen_socket() {
        Ok(socket) => {
            println!("Waiting for alive signal...\n");
            watch_alive(&socket, window).await
        }
        Err(e) => Verdict::Failed(e.into()),
    }
}

/// Byebye/alive listener probe on the SSDP group.
pub async fn notify(window: Duration) -> Verdict {
    match socket::build_listen_socket() {
        Ok(socket) => {
            println!(
                "Please start tested DLNA server within {} seconds ...",
                window.as_secs()
            );
            watch_restart(&socket, window).await
        }
        Err(e) => Verdict::Failed(e.into()),
    }
}

/// Print all traffic on `socket` until `duration` elapses, or until Ctrl+C
/// when `duration` is `None`. Returns the number of datagrams seen.
pub async fn dump(socket: &UdpSocket, duration: Option<Duration>) -> std::io::Result<usize> {
    let stop = async {
        match duration {
            Some(d) => tokio::time::sleep(d).await,
            None => {
                if let Err(e) = tokio::signal::ctrl_c().await {
                    tracing::warn!("Ctrl+C handler unavailable: {}", e);
                    std::future::pending::<()>().await;
                }
            }
        }
    };
    tokio::pin!(stop);

    let mut seen = 0usize;
    let mut buf = vec![0u8; MAX_DATAGRAM];
    loop {
        tokio::select! {
            _ = &mut stop => return Ok(seen),
            received = socket.recv_from(&mut buf) => {
                let (len, from) = received?;
                seen += 1;
                println!("Client {from}: {}", String::from_utf8_lossy(&buf[..len]));
            }
        }
    }
}

/// Join the SSDP group and print everything received.
pub async fn monitor(duration: Option<Duration>) -> std::io::Result<()> {
    let socket = socket::build_listen_socket()?;
    tracing::info!("Monitoring {} ...", socket::ssdp_group());
    let seen = dump(&socket, duration).await?;
    tracing::info!("Monitor stopped after {} datagram(s)", seen);
    Ok(())
}
