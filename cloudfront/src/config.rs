use cloudfront_orp_core::{
    config::{TimeoutConfig, load_sdk_config},
    impl_aws_config,
};
use serde::{Deserialize, Serialize};

/// CloudFront is a global service; its control plane lives in us-east-1.
const CLOUDFRONT_REGION: &str = "us-east-1";

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct CloudFrontConnectorConfig {
    pub account_id:     Option<String>,
    pub endpoint_url:   Option<String>,
    pub timeout_config: Option<TimeoutConfig>,
    pub sts_region:     String,
}

impl_aws_config!(CloudFrontConnectorConfig, "aws/cloudfront/config.ron");

impl CloudFrontConnectorConfig {
    pub async fn client(&self) -> aws_sdk_cloudfront::Client {
        let config = load_sdk_config(
            CLOUDFRONT_REGION,
            self.endpoint_url.as_deref(),
            self.timeout_config.as_ref(),
        )
        .await;
        aws_sdk_cloudfront::Client::new(&config)
    }
}
