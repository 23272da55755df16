use std::path::Path;

use crate::{
    addr::{CloudFrontResourceAddress, POLICY_ID},
    client::OriginRequestPolicyApi,
    error::PolicyError,
    op::GetResourceOutput,
    resource::PolicyState,
};

use super::CloudFrontConnector;

impl<C: OriginRequestPolicyApi> CloudFrontConnector<C> {
    pub async fn do_get(&self, addr: &Path) -> Result<Option<GetResourceOutput>, anyhow::Error> {
        let addr = CloudFrontResourceAddress::from_path(addr)?;

        match &addr {
            CloudFrontResourceAddress::OriginRequestPolicy { name } => {
                let state = match addr.get_output(&self.prefix, POLICY_ID)? {
                    Some(policy_id) => match self.read_existing(&policy_id).await? {
                        Some(state) => Some(state),
                        None => {
                            tracing::warn!(
                                "Recorded origin request policy {} no longer exists, looking up `{}` by name",
                                policy_id,
                                name
                            );
                            addr.remove_outputs(&self.prefix)?;
                            self.read_by_name(name).await?
                        }
                    },
                    None => self.read_by_name(name).await?,
                };

                match state {
                    Some(state) => Ok(Some(self.record_state(&addr, state)?)),
                    None => Ok(None),
                }
            }
        }
    }

    /// Writes the outputs of `state` beside `addr` and renders it.
    pub(super) fn record_state(
        &self,
        addr: &CloudFrontResourceAddress,
        state: PolicyState,
    ) -> anyhow::Result<GetResourceOutput> {
        if state.policy.name != addr.name() {
            tracing::warn!(
                "Origin request policy {} is named `{}` remotely but addressed as `{}`",
                state.id,
                state.policy.name,
                addr.name()
            );
        }

        let outputs = state.outputs();
        addr.write_outputs(&self.prefix, &outputs)?;

        Ok(GetResourceOutput {
            resource_definition: state.policy.to_ron()?,
            outputs: Some(outputs),
        })
    }

    pub(super) async fn read_existing(&self, policy_id: &str) -> anyhow::Result<Option<PolicyState>> {
        match self.resource.read(policy_id).await {
            Ok(state) => Ok(Some(state)),
            Err(PolicyError::NotFound { .. }) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn read_by_name(&self, name: &str) -> anyhow::Result<Option<PolicyState>> {
        let policies = self.resource.list().await?;
        match policies.into_iter().find(|p| p.name == name) {
            Some(summary) => self.read_existing(&summary.id).await,
            None => Ok(None),
        }
    }
}
