use crate::http::client::DutClient;
use crate::ssdp::search::{discover_description_url, Search};
use crate::verdict::{ProbeError, Verdict};
use crate::workdir::{Staging, WorkDir};
use crate::xml::diff;

/// File name of the root description, both as reference and as staged copy.
pub const ROOT_DESC_FILE: &str = "rootDesc.xml";

/// Root description probe: discover the DUT, download its root description
/// and diff it against the reference copy. PASS iff there are no differences.
pub async fn root_desc(search: &Search, client: &DutClient, staging: &Staging) -> Verdict {
    Verdict::from(check_root_desc(search, client, staging).await)
}

async fn check_root_desc(search: &Search, client: &DutClient, staging: &Staging) -> Result<(), ProbeError> {
    let work_dir = WorkDir::create(&staging.work_dir)?;
    let url = discover_description_url(search).await?;
    println!("{url}");
    let document = client.fetch(&url).await?;
    let staged = work_dir.stage(ROOT_DESC_FILE, &document)?;

    let differences = diff::diff_files(&staging.reference(ROOT_DESC_FILE), &staged)?;
    if differences.is_empty() {
        Ok(())
    } else {
        Err(ProbeError::Mismatch(differences))
    }
}
