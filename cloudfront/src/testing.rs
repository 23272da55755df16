//! In-memory stand-in for CloudFront, shared by the unit tests.

use std::collections::BTreeMap;

use async_trait::async_trait;
use aws_sdk_cloudfront::types::OriginRequestPolicyConfig;
use tokio::sync::Mutex;

use crate::{
    client::{OriginRequestPolicyApi, PolicySummary, RemotePolicy},
    error::PolicyError,
};

#[derive(Default)]
struct FakeState {
    next_id:   u64,
    next_etag: u64,
    policies:  BTreeMap<String, (String, OriginRequestPolicyConfig)>,
}

impl FakeState {
    fn fresh_etag(&mut self) -> String {
        self.next_etag += 1;
        format!("E{:04}", self.next_etag)
    }

    fn check_if_match(&self, id: &str, if_match: &str) -> Result<(), PolicyError> {
        match self.policies.get(id) {
            None => Err(PolicyError::NotFound { id: id.to_string() }),
            Some((etag, _)) if etag != if_match => Err(PolicyError::Conflict { id: id.to_string() }),
            Some(_) => Ok(()),
        }
    }
}

/// Assigns IDs, rotates the ETag on every write and enforces If-Match.
#[derive(Default)]
pub struct FakeCloudFront {
    state: Mutex<FakeState>,
}

impl FakeCloudFront {
    pub async fn stored_config(&self, id: &str) -> Option<OriginRequestPolicyConfig> {
        self.state.lock().await.policies.get(id).map(|(_, config)| config.clone())
    }

    pub async fn stored_etag(&self, id: &str) -> Option<String> {
        self.state.lock().await.policies.get(id).map(|(etag, _)| etag.clone())
    }

    pub async fn len(&self) -> usize {
        self.state.lock().await.policies.len()
    }
}

#[async_trait]
impl OriginRequestPolicyApi for FakeCloudFront {
    async fn create_policy(&self, config: OriginRequestPolicyConfig) -> Result<RemotePolicy, PolicyError> {
        let mut state = self.state.lock().await;
        if state.policies.values().any(|(_, c)| c.name() == config.name()) {
            return Err(PolicyError::Remote(format!(
                "OriginRequestPolicyAlreadyExists: {}",
                config.name()
            )));
        }

        state.next_id += 1;
        let id = format!("orp-{:08x}", state.next_id);
        let etag = state.fresh_etag();
        state.policies.insert(id.clone(), (etag.clone(), config.clone()));
        Ok(RemotePolicy { id, etag, config })
    }

    async fn get_policy(&self, id: &str) -> Result<RemotePolicy, PolicyError> {
        let state = self.state.lock().await;
        let Some((etag, config)) = state.policies.get(id) else {
            return Err(PolicyError::NotFound { id: id.to_string() });
        };
        Ok(RemotePolicy {
            id:     id.to_string(),
            etag:   etag.clone(),
            config: config.clone(),
        })
    }

    async fn update_policy(
        &self,
        id: &str,
        if_match: &str,
        config: OriginRequestPolicyConfig,
    ) -> Result<String, PolicyError> {
        let mut state = self.state.lock().await;
        state.check_if_match(id, if_match)?;
        let etag = state.fresh_etag();
        state.policies.insert(id.to_string(), (etag.clone(), config));
        Ok(etag)
    }

    async fn delete_policy(&self, id: &str, if_match: &str) -> Result<(), PolicyError> {
        let mut state = self.state.lock().await;
        state.check_if_match(id, if_match)?;
        state.policies.remove(id);
        Ok(())
    }

    async fn list_policies(&self) -> Result<Vec<PolicySummary>, PolicyError> {
        let state = self.state.lock().await;
        Ok(state
            .policies
            .iter()
            .map(|(id, (_, config))| PolicySummary {
                id:   id.clone(),
                name: config.name().to_string(),
            })
            .collect())
    }
}
