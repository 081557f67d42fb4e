use crate::http::client::{ControlEndpoint, DutClient};
use crate::http::soap::{BrowseArgs, EnvelopeStyle};
use crate::verdict::{ProbeError, Verdict};
use crate::workdir::{Staging, WorkDir};
use crate::xml::diff;

/// Reference document captured for the default Browse arguments.
pub const BROWSE_REFERENCE_FILE: &str = "browse_BrowseDirectChildren_VIDEO.xml";

/// SOAP Browse probe: send one Browse, stage the response under
/// `reference_file` and diff it against the reference of the same name.
pub async fn browse(
    client: &DutClient,
    endpoint: &ControlEndpoint,
    args: BrowseArgs,
    staging: &Staging,
    reference_file: &str,
) -> Verdict {
    Verdict::from(check_browse(client, endpoint, args, staging, reference_file).await)
}

async fn check_browse(
    client: &DutClient,
    endpoint: &ControlEndpoint,
    args: BrowseArgs,
    staging: &Staging,
    reference_file: &str,
) -> Result<(), ProbeError> {
    let work_dir = WorkDir::create(&staging.work_dir)?;
    let request = args.into_request();
    let reply = client.post_soap(endpoint, &request, EnvelopeStyle::Conformant).await?;
    if !reply.status.is_success() {
        return Err(ProbeError::Status {
            status: reply.status.as_u16(),
            body: reply.body,
        });
    }

    let staged = work_dir.stage(reference_file, reply.body.as_bytes())?;
    let differences = diff::diff_files(&staging.reference(reference_file), &staged)?;
    if differences.is_empty() {
        Ok(())
    } else {
        Err(ProbeError::Mismatch(differences))
    }
}
