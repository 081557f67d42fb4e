use std::borrow::Cow;

// ── Constants ─────────────────────────────────────────────────────────────────

pub const CDS_SERVICE_TYPE: &str = "urn:schemas-upnp-org:service:ContentDirectory:1";
pub const SOAP_ENVELOPE_NS: &str = "http://schemas.xmlsoap.org/soap/envelope/";
pub const SOAP_ENCODING: &str = "http://schemas.xmlsoap.org/soap/encoding/";

/// Filter sent with the reference Browse request.
pub const BROWSE_FILTER: &str = "@id,@parentID,@restricted,@childCount,dc:title,dc:creator,upnp:artist,upnp:class,dc:date,upnp:album,upnp:genre,res,res@size,res@duration,res@protection,res@bitrate,res@resolution,res@protocolInfo,res@nrAudioChannels,res@sampleFrequency,upnp:albumArtURI,upnp:albumArtURI@dlna:profileID, res@dlna:cleartextSize";

// ── Envelope ──────────────────────────────────────────────────────────────────

/// How the request envelope is laid out on the wire.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum EnvelopeStyle {
    /// Action element in the `u:` prefix bound to the service type, SOAP 1.1
    /// envelope namespace.
    Conformant,
    /// Action element in an undeclared `m:` prefix and the envelope namespace
    /// without its trailing slash. A strict DUT must reject this with a fault.
    Malformed,
}

/// One UPnP control action with its in-arguments, in wire order.
#[derive(Debug, Clone)]
pub struct SoapRequest {
    pub action: String,
    pub service_type: String,
    pub args: Vec<(String, String)>,
}

impl SoapRequest {
    pub fn new(action: &str, service_type: &str) -> Self {
        SoapRequest {
            action: action.to_string(),
            service_type: service_type.to_string(),
            args: Vec::new(),
        }
    }

    pub fn arg(mut self, name: &str, value: impl ToString) -> Self {
        self.args.push((name.to_string(), value.to_string()));
        self
    }

    /// Value of the `SOAPAction` header, quotes included.
    pub fn soap_action(&self) -> String {
        format!("\"{}#{}\"", self.service_type, self.action)
    }

    pub fn envelope(&self, style: EnvelopeStyle) -> String {
        let (envelope_ns, prefix) = match style {
            EnvelopeStyle::Conformant => (SOAP_ENVELOPE_NS, "u"),
            EnvelopeStyle::Malformed => (SOAP_ENVELOPE_NS.trim_end_matches('/'), "m"),
        };
        let arg_values = self
            .args
            .iter()
            .map(|(name, value)| format!("<{name}>{}</{name}>", xml_escape(value)))
            .collect::<Vec<_>>()
            .join("\n");
        format!(
            r#"<?xml version="1.0"?>
<SOAP-ENV:Envelope xmlns:SOAP-ENV="{envelope_ns}" SOAP-ENV:encodingStyle="{SOAP_ENCODING}">
  <SOAP-ENV:Body>
    <{prefix}:{action} xmlns:u="{service_type}">
      {arg_values}
    </{prefix}:{action}>
   </SOAP-ENV:Body>
</SOAP-ENV:Envelope>
"#,
            action = self.action,
            service_type = self.service_type,
        )
    }
}

// ── Browse ────────────────────────────────────────────────────────────────────

/// In-arguments of ContentDirectory `Browse`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrowseArgs {
    pub object_id: String,
    pub browse_flag: String,
    pub filter: String,
    pub starting_index: u32,
    pub requested_count: u32,
    pub sort_criteria: String,
}

/// The video container listing the reference document was captured from.
impl Default for BrowseArgs {
    fn default() -> Self {
        BrowseArgs {
            object_id: "64".to_string(),
            browse_flag: "BrowseDirectChildren".to_string(),
            filter: BROWSE_FILTER.to_string(),
            starting_index: 0,
            requested_count: 24,
            sort_criteria: String::new(),
        }
    }
}

impl BrowseArgs {
    pub fn into_request(self) -> SoapRequest {
        SoapRequest::new("Browse", CDS_SERVICE_TYPE)
            .arg("ObjectID", self.object_id)
            .arg("BrowseFlag", self.browse_flag)
            .arg("Filter", self.filter)
            .arg("StartingIndex", self.starting_index)
            .arg("RequestedCount", self.requested_count)
            .arg("SortCriteria", self.sort_criteria)
    }
}

/// The request the error-path probe sends: a valid action in a broken envelope.
pub fn malformed_system_update_id() -> SoapRequest {
    SoapRequest::new("GetSystemUpdateID", CDS_SERVICE_TYPE)
}

// ── Faults ────────────────────────────────────────────────────────────────────

/// `<UPnPError>` detail of a SOAP fault.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpnpError {
    pub code: Option<u32>,
    pub description: Option<String>,
}

impl UpnpError {
    /// None when the body carries no UPnPError detail at all.
    pub fn parse(body: &str) -> Option<Self> {
        if !contains_upnp_error(body) {
            return None;
        }
        Some(UpnpError {
            code: extract_element(body, "errorCode").and_then(|c| c.trim().parse().ok()),
            description: extract_element(body, "errorDescription").map(|d| d.trim().to_string()),
        })
    }
}

pub fn contains_upnp_error(body: &str) -> bool {
    body.contains("UPnPError")
}

/// Content between `<{name}>` and `</{name}>`, by plain string search.
pub fn extract_element<'a>(body: &'a str, name: &str) -> Option<&'a str> {
    let open = format!("<{}>", name);
    let close = format!("</{}>", name);
    let start = body.find(&open)? + open.len();
    let end = body[start..].find(&close)? + start;
    Some(&body[start..end])
}

/// Thin wrapper around `quick_xml::escape::escape` for argument values.
pub fn xml_escape(s: &str) -> Cow<'_, str> {
    quick_xml::escape::escape(s)
}
