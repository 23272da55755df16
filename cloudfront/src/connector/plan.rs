use std::path::Path;

use anyhow::bail;
use cloudfront_orp_core::util::diff_ron_values;

use crate::{
    addr::CloudFrontResourceAddress,
    client::OriginRequestPolicyApi,
    op::{CloudFrontConnectorOp, OpPlanOutput, connector_op},
    resource::OriginRequestPolicy,
};

use super::CloudFrontConnector;

fn parse_desired(name: &str, s: &str) -> anyhow::Result<OriginRequestPolicy> {
    let policy = OriginRequestPolicy::from_ron(s)?;
    if policy.name != name {
        bail!(
            "Origin request policy name `{}` does not match its address `{}`",
            policy.name,
            name
        );
    }
    Ok(policy)
}

impl<C: OriginRequestPolicyApi> CloudFrontConnector<C> {
    pub async fn do_plan(
        &self,
        addr: &Path,
        current: Option<String>,
        desired: Option<String>,
    ) -> Result<Vec<OpPlanOutput>, anyhow::Error> {
        let addr = CloudFrontResourceAddress::from_path(addr)?;

        match addr {
            CloudFrontResourceAddress::OriginRequestPolicy { name } => match (current, desired) {
                (None, None) => Ok(vec![]),
                (None, Some(new_policy)) => {
                    let new_policy = parse_desired(&name, &new_policy)?;
                    Ok(vec![connector_op!(
                        CloudFrontConnectorOp::CreateOriginRequestPolicy(new_policy),
                        format!("Create new CloudFront origin request policy `{}`", name),
                    )])
                }
                (Some(_old_policy), None) => Ok(vec![connector_op!(
                    CloudFrontConnectorOp::DeleteOriginRequestPolicy,
                    format!("DELETE CloudFront origin request policy `{}`", name),
                )]),
                (Some(old_policy), Some(new_policy)) => {
                    let old_policy = OriginRequestPolicy::from_ron(&old_policy)?;
                    let new_policy = parse_desired(&name, &new_policy)?;

                    if old_policy == new_policy {
                        Ok(Vec::new())
                    } else {
                        let diff = diff_ron_values(&old_policy, &new_policy)?;
                        Ok(vec![connector_op!(
                            CloudFrontConnectorOp::UpdateOriginRequestPolicy(new_policy),
                            format!("Modify CloudFront origin request policy `{}`\n{}", name, diff),
                        )])
                    }
                }
            },
        }
    }
}
