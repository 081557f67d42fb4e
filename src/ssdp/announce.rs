use std::net::SocketAddr;
use std::time::Duration;

use tokio::net::UdpSocket;

use crate::ssdp::{messages, socket};

/// Device UUID used when spoofing a byebye without an explicit one.
pub const DEFAULT_BYEBYE_UUID: &str = "4d696e69-444c-164e-9d41-080027237071";

/// Send one NOTIFY byebye for `uuid` to `target`, then wait up to `wait` for a
/// single reply datagram. Returns the reply, if any arrived.
pub async fn send_byebye(
    socket: &UdpSocket,
    target: SocketAddr,
    uuid: &uuid::Uuid,
    wait: Duration,
) -> std::io::Result<Option<(SocketAddr, String)>> {
    let msg = messages::notify_byebye(&uuid.hyphenated().to_string());
    socket.send_to(msg.as_bytes(), target).await?;
    tracing::info!("byebye for uuid:{} sent to {}", uuid, target);

    let mut buf = [0u8; 1024];
    match tokio::time::timeout(wait, socket.recv_from(&mut buf)).await {
        Ok(received) => {
            let (len, from) = received?;
            Ok(Some((from, String::from_utf8_lossy(&buf[..len]).into_owned())))
        }
        Err(_) => Ok(None),
    }
}

/// Announce a byebye on the SSDP group and print any reply.
pub async fn announce_byebye(uuid: &uuid::Uuid, wait: Duration) -> std::io::Result<()> {
    let socket = socket::build_send_socket()?;
    match send_byebye(&socket, socket::ssdp_group(), uuid, wait).await? {
        Some((from, reply)) => println!("Server {from}: {reply}"),
        None => tracing::info!("No reply within {}s", wait.as_secs_f32()),
    }
    Ok(())
}
