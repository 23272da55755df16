use std::path::{Path, PathBuf};

use anyhow::bail;
use cloudfront_orp_core::{config::AwsServiceConfig, util::ron_check_eq};

use crate::{
    addr::{CloudFrontResourceAddress, ETAG, POLICY_ID},
    client::OriginRequestPolicyApi,
    config::CloudFrontConnectorConfig,
    lifecycle::OriginRequestPolicyResource,
    op::SkeletonOutput,
    resource::OriginRequestPolicy,
};

mod get;
mod import;
mod list;
mod op_exec;
mod plan;

/// Maps policy definition files under `prefix` onto CloudFront.
///
/// The policy ID and last-read ETag of each address are kept as outputs
/// beside its definition, so `get` must run (or `import`) before an update or
/// delete can be executed.
pub struct CloudFrontConnector<C = aws_sdk_cloudfront::Client> {
    prefix:   PathBuf,
    resource: OriginRequestPolicyResource<C>,
}

/// Template definitions for new resources.
pub fn skeletons() -> anyhow::Result<Vec<SkeletonOutput>> {
    let name = String::from("[policy_name]");
    let mut policy = OriginRequestPolicy::forwarding_nothing(name.clone());
    policy.comment = Some(String::from("[comment]"));

    Ok(vec![SkeletonOutput {
        addr: CloudFrontResourceAddress::OriginRequestPolicy { name }.to_path_buf(),
        body: policy.to_ron()?,
    }])
}

impl CloudFrontConnector<aws_sdk_cloudfront::Client> {
    pub async fn init(prefix: &Path) -> anyhow::Result<Self> {
        let config = CloudFrontConnectorConfig::try_load(prefix).await?;
        let account_id = config.verify_sts().await?;
        tracing::info!("CloudFront connector using AWS account {}", account_id);

        let client = config.client().await;
        Ok(Self::new(prefix, client))
    }
}

impl<C: OriginRequestPolicyApi> CloudFrontConnector<C> {
    pub fn new(prefix: &Path, client: C) -> Self {
        Self {
            prefix:   prefix.into(),
            resource: OriginRequestPolicyResource::new(client),
        }
    }

    pub fn prefix(&self) -> &Path {
        &self.prefix
    }

    pub fn filter(&self, addr: &Path) -> bool {
        CloudFrontResourceAddress::from_path(addr).is_ok()
    }

    pub fn eq(&self, addr: &Path, a: &str, b: &str) -> anyhow::Result<bool> {
        match CloudFrontResourceAddress::from_path(addr)? {
            CloudFrontResourceAddress::OriginRequestPolicy { .. } => ron_check_eq::<OriginRequestPolicy>(a, b),
        }
    }

    /// The recorded `(policy_id, etag)` for `addr`.
    fn recorded_identity(&self, addr: &CloudFrontResourceAddress) -> anyhow::Result<(String, String)> {
        let Some(policy_id) = addr.get_output(&self.prefix, POLICY_ID)? else {
            bail!(
                "No recorded policy ID for `{}`; run `get` or `import` first",
                addr.to_path_buf().display()
            );
        };
        let Some(etag) = addr.get_output(&self.prefix, ETAG)? else {
            bail!(
                "No recorded ETag for `{}`; run `get` to refresh it",
                addr.to_path_buf().display()
            );
        };
        Ok((policy_id, etag))
    }
}
