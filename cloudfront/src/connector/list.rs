use std::path::{Path, PathBuf};

use crate::{addr::CloudFrontResourceAddress, client::OriginRequestPolicyApi};

use super::CloudFrontConnector;

impl<C: OriginRequestPolicyApi> CloudFrontConnector<C> {
    pub async fn do_list(&self, subpath: &Path) -> Result<Vec<PathBuf>, anyhow::Error> {
        let mut results = Vec::<PathBuf>::new();

        for policy in self.resource.list().await? {
            let path = CloudFrontResourceAddress::OriginRequestPolicy { name: policy.name }.to_path_buf();
            if path.starts_with(subpath) {
                results.push(path);
            }
        }

        results.sort();
        Ok(results)
    }
}
