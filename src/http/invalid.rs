use crate::http::client::{ControlEndpoint, DutClient};
use crate::http::soap::{self, EnvelopeStyle, UpnpError};
use crate::verdict::{ProbeError, Verdict};

/// SOAP error-path probe: a malformed `GetSystemUpdateID` must be answered
/// with an HTTP error whose body carries a UPnPError fault.
pub async fn soap_invalid(client: &DutClient, endpoint: &ControlEndpoint) -> Verdict {
    Verdict::from(check_soap_invalid(client, endpoint).await)
}

async fn check_soap_invalid(client: &DutClient, endpoint: &ControlEndpoint) -> Result<(), ProbeError> {
    let request = soap::malformed_system_update_id();
    let reply = client.post_soap(endpoint, &request, EnvelopeStyle::Malformed).await?;

    let fault = if reply.status.is_success() {
        None
    } else {
        UpnpError::parse(&reply.body)
    };
    match fault {
        Some(fault) => {
            tracing::info!(
                "DUT rejected malformed request: HTTP {} errorCode={:?} errorDescription={:?}",
                reply.status.as_u16(),
                fault.code,
                fault.description
            );
            Ok(())
        }
        None => Err(ProbeError::MissingUpnpError {
            status: reply.status.as_u16(),
            body: reply.body,
        }),
    }
}
