use dlnaprobe::http::soap::{
    contains_upnp_error, extract_element, malformed_system_update_id, xml_escape, BrowseArgs,
    EnvelopeStyle, SoapRequest, UpnpError, BROWSE_FILTER, CDS_SERVICE_TYPE,
};

fn fault_body() -> &'static str {
    r#"<?xml version="1.0" encoding="utf-8"?>
<s:Envelope xmlns:s="http://schemas.xmlsoap.org/soap/envelope/" s:encodingStyle="http://schemas.xmlsoap.org/soap/encoding/">
  <s:Body>
    <s:Fault>
      <faultcode>s:Client</faultcode>
      <faultstring>UPnPError</faultstring>
      <detail>
        <UPnPError xmlns="urn:schemas-upnp-org:control-1-0">
          <errorCode>401</errorCode>
          <errorDescription>Invalid Action</errorDescription>
        </UPnPError>
      </detail>
    </s:Fault>
  </s:Body>
</s:Envelope>"#
}

// ── SoapRequest ───────────────────────────────────────────────────────────────

#[test]
fn soap_action_header_is_quoted_service_hash_action() {
    let request = SoapRequest::new("Browse", CDS_SERVICE_TYPE);
    assert_eq!(
        request.soap_action(),
        "\"urn:schemas-upnp-org:service:ContentDirectory:1#Browse\""
    );
}

#[test]
fn malformed_envelope_matches_wire_layout() {
    let body = malformed_system_update_id().envelope(EnvelopeStyle::Malformed);
    assert_eq!(
        body,
        "<?xml version=\"1.0\"?>\n\
         <SOAP-ENV:Envelope xmlns:SOAP-ENV=\"http://schemas.xmlsoap.org/soap/envelope\" SOAP-ENV:encodingStyle=\"http://schemas.xmlsoap.org/soap/encoding/\">\n  \
         <SOAP-ENV:Body>\n    \
         <m:GetSystemUpdateID xmlns:u=\"urn:schemas-upnp-org:service:ContentDirectory:1\">\n      \
         \n    \
         </m:GetSystemUpdateID>\n   \
         </SOAP-ENV:Body>\n\
         </SOAP-ENV:Envelope>\n"
    );
}

#[test]
fn conformant_envelope_binds_action_prefix() {
    let body = SoapRequest::new("Browse", CDS_SERVICE_TYPE).envelope(EnvelopeStyle::Conformant);
    assert!(body.contains("xmlns:SOAP-ENV=\"http://schemas.xmlsoap.org/soap/envelope/\""));
    assert!(body.contains("<u:Browse xmlns:u=\"urn:schemas-upnp-org:service:ContentDirectory:1\">"));
    assert!(body.contains("</u:Browse>"));
}

#[test]
fn conformant_envelope_is_well_formed() {
    let body = BrowseArgs::default().into_request().envelope(EnvelopeStyle::Conformant);
    assert!(dlnaprobe::xml::diff::parse(&body).is_ok(), "not well-formed:\n{body}");
}

#[test]
fn args_are_one_per_line_in_order() {
    let body = SoapRequest::new("Browse", CDS_SERVICE_TYPE)
        .arg("ObjectID", "0")
        .arg("StartingIndex", 5)
        .envelope(EnvelopeStyle::Conformant);
    assert!(body.contains("<ObjectID>0</ObjectID>\n<StartingIndex>5</StartingIndex>"), "{body}");
}

#[test]
fn arg_values_are_escaped() {
    let body = SoapRequest::new("Search", CDS_SERVICE_TYPE)
        .arg("SearchCriteria", "dc:title contains \"a&b\"")
        .envelope(EnvelopeStyle::Conformant);
    assert!(body.contains("a&amp;b"), "{body}");
}

// ── BrowseArgs ────────────────────────────────────────────────────────────────

#[test]
fn browse_defaults() {
    let args = BrowseArgs::default();
    assert_eq!(args.object_id, "64");
    assert_eq!(args.browse_flag, "BrowseDirectChildren");
    assert_eq!(args.filter, BROWSE_FILTER);
    assert_eq!(args.starting_index, 0);
    assert_eq!(args.requested_count, 24);
    assert_eq!(args.sort_criteria, "");
}

#[test]
fn browse_request_carries_all_six_arguments() {
    let request = BrowseArgs::default().into_request();
    assert_eq!(request.action, "Browse");
    let names: Vec<&str> = request.args.iter().map(|(n, _)| n.as_str()).collect();
    assert_eq!(
        names,
        ["ObjectID", "BrowseFlag", "Filter", "StartingIndex", "RequestedCount", "SortCriteria"]
    );
}

#[test]
fn browse_envelope_contains_requested_count() {
    let body = BrowseArgs::default().into_request().envelope(EnvelopeStyle::Conformant);
    assert!(body.contains("<RequestedCount>24</RequestedCount>"));
    assert!(body.contains("<SortCriteria></SortCriteria>"));
}

// ── UPnPError ─────────────────────────────────────────────────────────────────

#[test]
fn upnp_error_parses_code_and_description() {
    let fault = UpnpError::parse(fault_body()).unwrap();
    assert_eq!(fault.code, Some(401));
    assert_eq!(fault.description.as_deref(), Some("Invalid Action"));
}

#[test]
fn upnp_error_absent_in_plain_error_page() {
    let page = "<html><body>500 Internal Server Error</body></html>";
    assert!(!contains_upnp_error(page));
    assert_eq!(UpnpError::parse(page), None);
}

#[test]
fn upnp_error_without_code_still_detected() {
    let fault = UpnpError::parse("<UPnPError></UPnPError>").unwrap();
    assert_eq!(fault.code, None);
}

#[test]
fn extract_element_missing_returns_none() {
    assert_eq!(extract_element("<a>1</a>", "b"), None);
}

#[test]
fn xml_escape_no_special_chars_unchanged() {
    assert_eq!(xml_escape("normal text").as_ref(), "normal text");
}
