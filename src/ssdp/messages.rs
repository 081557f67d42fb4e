/// Search target used by every discovery probe.
pub const ST_ROOT_DEVICE: &str = "upnp:rootdevice";
/// Maximum wait the DUT may take before answering an M-SEARCH.
pub const DEFAULT_MX: u8 = 2;

/// Build an M-SEARCH request.
/// Headers carry no space after the colon. CRLF line endings throughout.
pub fn msearch_request(st: &str, mx: u8) -> String {
    format!(
        "M-SEARCH * HTTP/1.1\r\n\
HOST:239.255.255.250:1900\r\n\
ST:{st}\r\n\
MX:{mx}\r\n\
MAN:\"ssdp:discover\"\r\n\
\r\n"
    )
}

/// Build a NOTIFY byebye announcing that `uuid` is leaving the network.
pub fn notify_byebye(uuid: &str) -> String {
    format!(
        "NOTIFY * HTTP/1.1\r\n\
HOST:239.255.255.250:1900\r\n\
NT:uuid:{uuid}\r\n\
USN:uuid:{uuid}\r\n\
NTS:ssdp:byebye\r\n\
\r\n"
    )
}

/// NOTIFY sub-type from the NTS header.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum NotifyKind {
    Alive,
    Byebye,
}

/// A received SSDP datagram split into start line and headers.
#[derive(Debug, Clone)]
pub struct SsdpMessage<'a> {
    pub start_line: &'a str,
    headers: Vec<(&'a str, &'a str)>,
}

impl<'a> SsdpMessage<'a> {
    /// Lines without a colon are skipped; parsing stops at the first blank line.
    pub fn parse(text: &'a str) -> Self {
        let mut lines = text.lines();
        let start_line = lines.next().unwrap_or("").trim();
        let headers = lines
            .map(str::trim)
            .take_while(|line| !line.is_empty())
            .filter_map(|line| {
                let (name, value) = line.split_once(':')?;
                Some((name.trim(), value.trim()))
            })
            .collect();
        SsdpMessage { start_line, headers }
    }

    /// Header value by case-insensitive name.
    pub fn header(&self, name: &str) -> Option<&'a str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| *v)
    }

    pub fn is_notify(&self) -> bool {
        self.start_line.starts_with("NOTIFY ")
    }

    pub fn location(&self) -> Option<&'a str> {
        self.header("LOCATION").filter(|v| !v.is_empty())
    }

    pub fn nts(&self) -> Option<NotifyKind> {
        let nts = self.header("NTS")?;
        if nts.eq_ignore_ascii_case("ssdp:alive") {
            Some(NotifyKind::Alive)
        } else if nts.eq_ignore_ascii_case("ssdp:byebye") {
            Some(NotifyKind::Byebye)
        } else {
            None
        }
    }
}

/// A search reply counts as the DUT's root device when it mentions both the
/// DLNA server string and the `rootDesc` description document.
pub fn is_dlna_root_response(text: &str) -> bool {
    text.contains("DLNA") && text.contains("rootDesc")
}

/// Description URL advertised in a search reply.
///
/// Uses the LOCATION header when present. Otherwise takes the first `http://`
/// through the next `xml`, for replies whose LOCATION line does not parse.
pub fn description_url(text: &str) -> Option<String> {
    if let Some(location) = SsdpMessage::parse(text).location() {
        return Some(location.to_string());
    }
    let start = text.find("http://")?;
    let end = text[start..].find("xml")? + start + 3;
    Some(text[start..end].to_string())
}
