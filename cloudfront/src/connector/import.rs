use std::path::Path;

use crate::{addr::CloudFrontResourceAddress, client::OriginRequestPolicyApi, op::GetResourceOutput};

use super::CloudFrontConnector;

impl<C: OriginRequestPolicyApi> CloudFrontConnector<C> {
    /// Binds `addr` to an existing policy ID. Outputs are only touched once
    /// the ID has been read back.
    pub async fn do_import(&self, addr: &Path, external_id: &str) -> Result<Option<GetResourceOutput>, anyhow::Error> {
        let addr = CloudFrontResourceAddress::from_path(addr)?;
        let policy_id = self.resource.import(external_id);

        let Some(state) = self.read_existing(&policy_id).await? else {
            tracing::warn!("No origin request policy with ID {} to import", policy_id);
            return Ok(None);
        };

        Ok(Some(self.record_state(&addr, state)?))
    }
}
