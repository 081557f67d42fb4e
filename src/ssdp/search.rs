use std::net::SocketAddr;
use std::time::Duration;

use tokio::net::UdpSocket;
use tokio::time::Instant;

use crate::ssdp::{messages, socket};
use crate::verdict::{ProbeError, Verdict};

/// Largest UDP payload over IPv4.
pub const MAX_DATAGRAM: usize = 65507;

/// One M-SEARCH: where it goes, what it asks for and how long to wait.
#[derive(Debug, Clone)]
pub struct Search {
    pub target: SocketAddr,
    pub st: String,
    pub mx: u8,
    /// Overall deadline for a matching reply, counted from the send.
    pub timeout: Duration,
}

impl Search {
    /// Root-device search sent to the SSDP multicast group.
    pub fn root_device(timeout: Duration) -> Self {
        Search {
            target: socket::ssdp_group(),
            st: messages::ST_ROOT_DEVICE.to_string(),
            mx: messages::DEFAULT_MX,
            timeout,
        }
    }
}

/// M-SEARCH discovery probe: PASS on the first DLNA root device reply.
pub async fn msearch(search: &Search) -> Verdict {
    Verdict::from(discover(search).await.map(|_| ()))
}

/// Send the search on a fresh socket and return the first DLNA root reply.
pub async fn discover(search: &Search) -> Result<String, ProbeError> {
    let socket = socket::build_search_socket()?;
    find_root_response(&socket, search).await
}

/// Discover the DUT and return the description URL from its reply.
pub async fn discover_description_url(search: &Search) -> Result<String, ProbeError> {
    let reply = discover(search).await?;
    let url = messages::description_url(&reply).ok_or(ProbeError::NoDescriptionUrl(reply))?;
    tracing::info!("Root description at {}", url);
    Ok(url)
}

/// Send one M-SEARCH on `socket` and read replies until one is a DLNA root
/// device response or the deadline passes. Every reply is echoed to stdout.
pub async fn find_root_response(socket: &UdpSocket, search: &Search) -> Result<String, ProbeError> {
    let request = messages::msearch_request(&search.st, search.mx);
    println!("{} {}", search.target, request);
    socket.send_to(request.as_bytes(), search.target).await?;

    let deadline = Instant::now() + search.timeout;
    let mut buf = vec![0u8; MAX_DATAGRAM];
    loop {
        let Ok(received) = tokio::time::timeout_at(deadline, socket.recv_from(&mut buf)).await else {
            return Err(ProbeError::Timeout {
                after: search.timeout,
                waiting_for: "a DLNA root device response",
            });
        };
        let (len, from) = received?;
        let reply = String::from_utf8_lossy(&buf[..len]);
        println!("{from} {reply}");
        if messages::is_dlna_root_response(&reply) {
            return Ok(reply.into_owned());
        }
        tracing::debug!("SSDP: ignoring non-DLNA reply from {}", from);
    }
}
