use crate::{
    client::{OriginRequestPolicyApi, PolicySummary},
    error::PolicyError,
    resource::{OriginRequestPolicy, PolicyState},
    transform::{expand, flatten},
};

/// Create/read/update/delete/import for CloudFront origin request policies.
///
/// Every mutation resends the full policy and is followed by a `read`, so the
/// returned `PolicyState` always carries the ETag CloudFront now holds.
/// Nothing is retried: the ETag precondition is the only concurrency control.
pub struct OriginRequestPolicyResource<C> {
    client: C,
}

impl<C: OriginRequestPolicyApi> OriginRequestPolicyResource<C> {
    pub fn new(client: C) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    pub async fn create(&self, policy: &OriginRequestPolicy) -> Result<PolicyState, PolicyError> {
        policy.validate()?;
        let created = self.client.create_policy(expand(policy)?).await?;
        tracing::info!("Created origin request policy `{}` ({})", policy.name, created.id);

        self.read(&created.id).await
    }

    pub async fn read(&self, id: &str) -> Result<PolicyState, PolicyError> {
        let remote = self.client.get_policy(id).await?;
        tracing::debug!("Read origin request policy {} at ETag {}", id, remote.etag);

        Ok(PolicyState {
            id:     id.to_string(),
            etag:   remote.etag,
            policy: flatten(&remote.config)?,
        })
    }

    /// Replaces the whole policy, provided `etag` is still current.
    pub async fn update(&self, id: &str, etag: &str, policy: &OriginRequestPolicy) -> Result<PolicyState, PolicyError> {
        policy.validate()?;
        let new_etag = self.client.update_policy(id, etag, expand(policy)?).await?;
        tracing::info!("Updated origin request policy `{}` ({}), ETag {} -> {}", policy.name, id, etag, new_etag);

        self.read(id).await
    }

    /// Deletes the policy. A policy that is already gone counts as deleted.
    pub async fn delete(&self, id: &str, etag: &str) -> Result<(), PolicyError> {
        match self.client.delete_policy(id, etag).await {
            Ok(()) => {
                tracing::info!("Deleted origin request policy {}", id);
                Ok(())
            }
            Err(PolicyError::NotFound { .. }) => {
                tracing::warn!("Origin request policy {} was already deleted", id);
                Ok(())
            }
            Err(e) => Err(e),
        }
    }

    /// Adopts an existing policy by ID, verbatim. The caller reads it afterwards.
    pub fn import(&self, external_id: &str) -> String {
        tracing::info!("Importing origin request policy {}", external_id);
        external_id.to_string()
    }

    pub async fn list(&self) -> Result<Vec<PolicySummary>, PolicyError> {
        self.client.list_policies().await
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::*;
    use crate::{
        resource::{CookieBehavior, HeaderBehavior, QueryStringBehavior},
        testing::FakeCloudFront,
    };

    fn resource() -> OriginRequestPolicyResource<FakeCloudFront> {
        OriginRequestPolicyResource::new(FakeCloudFront::default())
    }

    #[tokio::test]
    async fn test_create_then_read() {
        let resource = resource();
        let created = resource
            .create(&OriginRequestPolicy::forwarding_nothing("p1"))
            .await
            .unwrap();

        assert!(!created.id.is_empty());
        assert!(!created.etag.is_empty());

        let read = resource.read(&created.id).await.unwrap();
        assert_eq!(read.id, created.id);
        assert!(!read.etag.is_empty());
        assert_eq!(read.policy.cookies_config.cookie_behavior, CookieBehavior::None);
        assert_eq!(read.policy.headers_config.header_behavior, HeaderBehavior::None);
        assert_eq!(
            read.policy.query_strings_config.query_string_behavior,
            QueryStringBehavior::None
        );
    }

    #[tokio::test]
    async fn test_update_to_header_whitelist() {
        let resource = resource();
        let created = resource
            .create(&OriginRequestPolicy::forwarding_nothing("p1"))
            .await
            .unwrap();
        let read = resource.read(&created.id).await.unwrap();

        let mut desired = read.policy.clone();
        desired.headers_config.header_behavior = HeaderBehavior::Whitelist;
        desired.headers_config.headers = Some(BTreeSet::from([String::from("X-Custom")]));

        let updated = resource.update(&read.id, &read.etag, &desired).await.unwrap();
        assert_ne!(updated.etag, read.etag);

        let reread = resource.read(&read.id).await.unwrap();
        assert_eq!(reread.policy.headers_config.header_behavior, HeaderBehavior::Whitelist);
        assert_eq!(
            reread.policy.headers_config.headers,
            Some(BTreeSet::from([String::from("X-Custom")]))
        );
        assert_eq!(reread.etag, updated.etag);
    }

    #[tokio::test]
    async fn test_stale_etag_conflicts_and_leaves_remote_alone() {
        let resource = resource();
        let created = resource
            .create(&OriginRequestPolicy::forwarding_nothing("p1"))
            .await
            .unwrap();

        let mut desired = created.policy.clone();
        desired.comment = Some(String::from("first writer"));
        let current = resource.update(&created.id, &created.etag, &desired).await.unwrap();
        let before = resource.client().stored_config(&created.id).await;

        desired.comment = Some(String::from("second writer"));
        let err = resource.update(&created.id, &created.etag, &desired).await.unwrap_err();
        assert!(err.is_conflict());
        assert_eq!(resource.client().stored_config(&created.id).await, before);

        let err = resource.delete(&created.id, &created.etag).await.unwrap_err();
        assert!(err.is_conflict());
        assert_eq!(
            resource.client().stored_etag(&created.id).await.as_deref(),
            Some(current.etag.as_str())
        );
    }

    #[tokio::test]
    async fn test_delete_is_idempotent() {
        let resource = resource();
        let created = resource
            .create(&OriginRequestPolicy::forwarding_nothing("p1"))
            .await
            .unwrap();

        resource.delete(&created.id, &created.etag).await.unwrap();
        resource.delete(&created.id, &created.etag).await.unwrap();
        assert_eq!(resource.client().len().await, 0);

        let err = resource.read(&created.id).await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_items_forwarded_with_none_behavior() {
        let resource = resource();
        let mut policy = OriginRequestPolicy::forwarding_nothing("p1");
        policy.cookies_config.cookies = Some(BTreeSet::from([String::from("session")]));

        let created = resource.create(&policy).await.unwrap();
        let stored = resource.client().stored_config(&created.id).await.unwrap();
        let cookies_config = stored.cookies_config().unwrap();
        assert_eq!(cookies_config.cookie_behavior().as_str(), "none");
        assert_eq!(cookies_config.cookies().unwrap().items(), ["session"]);
        assert_eq!(created.policy, policy);
    }

    #[tokio::test]
    async fn test_import_is_passthrough() {
        let resource = resource();
        assert_eq!(resource.import("E2QWRUHAPOMQZL"), "E2QWRUHAPOMQZL");
        assert_eq!(resource.import("not/even-an-id "), "not/even-an-id ");
        assert_eq!(resource.client().len().await, 0);
    }

    #[tokio::test]
    async fn test_invalid_policy_is_not_sent() {
        let resource = resource();
        let err = resource
            .create(&OriginRequestPolicy::forwarding_nothing(""))
            .await
            .unwrap_err();
        assert!(matches!(err, PolicyError::InvalidConfig(_)));
        assert_eq!(resource.client().len().await, 0);
    }

    #[tokio::test]
    async fn test_remote_failure_is_surfaced() {
        let resource = resource();
        resource
            .create(&OriginRequestPolicy::forwarding_nothing("p1"))
            .await
            .unwrap();

        let err = resource
            .create(&OriginRequestPolicy::forwarding_nothing("p1"))
            .await
            .unwrap_err();
        assert!(matches!(err, PolicyError::Remote(_)));
        assert_eq!(resource.client().len().await, 1);
    }
}
