use std::path::Path;

use anyhow::Context;

use crate::{
    addr::CloudFrontResourceAddress,
    client::OriginRequestPolicyApi,
    op::{CloudFrontConnectorOp, OpExecOutput, op_exec_output},
};

use super::CloudFrontConnector;

impl<C: OriginRequestPolicyApi> CloudFrontConnector<C> {
    pub async fn do_op_exec(&self, addr: &Path, op: &str) -> Result<OpExecOutput, anyhow::Error> {
        let addr = CloudFrontResourceAddress::from_path(addr)?;
        let op = CloudFrontConnectorOp::from_ron(op)?;

        match &addr {
            CloudFrontResourceAddress::OriginRequestPolicy { name } => match op {
                CloudFrontConnectorOp::CreateOriginRequestPolicy(policy) => {
                    let state = self
                        .resource
                        .create(&policy)
                        .await
                        .with_context(|| format!("Failed to create origin request policy `{}`", name))?;

                    let outputs = state.outputs();
                    addr.write_outputs(&self.prefix, &outputs)?;
                    op_exec_output!(
                        Some(outputs),
                        format!("Created CloudFront origin request policy `{}` ({})", name, state.id)
                    )
                }
                CloudFrontConnectorOp::UpdateOriginRequestPolicy(policy) => {
                    let (policy_id, etag) = self.recorded_identity(&addr)?;
                    let state = self
                        .resource
                        .update(&policy_id, &etag, &policy)
                        .await
                        .with_context(|| format!("Failed to update origin request policy `{}`", name))?;

                    let outputs = state.outputs();
                    addr.write_outputs(&self.prefix, &outputs)?;
                    op_exec_output!(
                        Some(outputs),
                        format!("Updated CloudFront origin request policy `{}`", name)
                    )
                }
                CloudFrontConnectorOp::DeleteOriginRequestPolicy => {
                    let (policy_id, etag) = self.recorded_identity(&addr)?;
                    self.resource
                        .delete(&policy_id, &etag)
                        .await
                        .with_context(|| format!("Failed to delete origin request policy `{}`", name))?;

                    addr.remove_outputs(&self.prefix)?;
                    op_exec_output!(None, format!("Deleted CloudFront origin request policy `{}`", name))
                }
            },
        }
    }
}
