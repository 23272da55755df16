use async_trait::async_trait;
use aws_sdk_cloudfront::{
    error::{DisplayErrorContext, SdkError},
    operation::{
        delete_origin_request_policy::DeleteOriginRequestPolicyError,
        get_origin_request_policy::GetOriginRequestPolicyError,
        update_origin_request_policy::UpdateOriginRequestPolicyError,
    },
    types::{OriginRequestPolicy, OriginRequestPolicyConfig, OriginRequestPolicyType},
};

use crate::error::PolicyError;

/// A policy as stored by CloudFront.
#[derive(Debug, Clone, PartialEq)]
pub struct RemotePolicy {
    pub id:     String,
    pub etag:   String,
    pub config: OriginRequestPolicyConfig,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PolicySummary {
    pub id:   String,
    pub name: String,
}

/// The CloudFront calls the policy lifecycle depends on.
///
/// `get_policy`, `update_policy` and `delete_policy` report an unknown ID as
/// `PolicyError::NotFound`. `update_policy` and `delete_policy` report a
/// stale `if_match` as `PolicyError::Conflict` and leave the policy untouched.
#[async_trait]
pub trait OriginRequestPolicyApi: Send + Sync {
    async fn create_policy(&self, config: OriginRequestPolicyConfig) -> Result<RemotePolicy, PolicyError>;

    async fn get_policy(&self, id: &str) -> Result<RemotePolicy, PolicyError>;

    /// Returns the new ETag.
    async fn update_policy(
        &self,
        id: &str,
        if_match: &str,
        config: OriginRequestPolicyConfig,
    ) -> Result<String, PolicyError>;

    async fn delete_policy(&self, id: &str, if_match: &str) -> Result<(), PolicyError>;

    /// All custom policies. AWS-managed policies are not listed.
    async fn list_policies(&self) -> Result<Vec<PolicySummary>, PolicyError>;
}

fn remote_error(err: &impl std::error::Error) -> PolicyError {
    PolicyError::Remote(DisplayErrorContext(err).to_string())
}

fn get_error(id: &str, err: SdkError<GetOriginRequestPolicyError>) -> PolicyError {
    match err.as_service_error() {
        Some(se) if se.is_no_such_origin_request_policy() => PolicyError::NotFound { id: id.to_string() },
        _ => remote_error(&err),
    }
}

// InvalidIfMatchVersion means the If-Match header itself was unusable, not stale.
fn update_error(id: &str, err: SdkError<UpdateOriginRequestPolicyError>) -> PolicyError {
    match err.as_service_error() {
        Some(se) if se.is_no_such_origin_request_policy() => PolicyError::NotFound { id: id.to_string() },
        Some(se) if se.is_precondition_failed() => PolicyError::Conflict { id: id.to_string() },
        _ => remote_error(&err),
    }
}

fn delete_error(id: &str, err: SdkError<DeleteOriginRequestPolicyError>) -> PolicyError {
    match err.as_service_error() {
        Some(se) if se.is_no_such_origin_request_policy() => PolicyError::NotFound { id: id.to_string() },
        Some(se) if se.is_precondition_failed() => PolicyError::Conflict { id: id.to_string() },
        _ => remote_error(&err),
    }
}

fn remote_policy(policy: Option<&OriginRequestPolicy>, etag: Option<&str>) -> Result<RemotePolicy, PolicyError> {
    let Some(policy) = policy else {
        return Err(PolicyError::InvalidResponse(String::from(
            "response carried no origin request policy",
        )));
    };
    let Some(config) = policy.origin_request_policy_config() else {
        return Err(PolicyError::InvalidResponse(format!(
            "policy `{}` carried no config",
            policy.id()
        )));
    };
    let Some(etag) = etag else {
        return Err(PolicyError::InvalidResponse(format!("policy `{}` carried no ETag", policy.id())));
    };

    Ok(RemotePolicy {
        id:     policy.id().to_string(),
        etag:   etag.to_string(),
        config: config.clone(),
    })
}

#[async_trait]
impl OriginRequestPolicyApi for aws_sdk_cloudfront::Client {
    async fn create_policy(&self, config: OriginRequestPolicyConfig) -> Result<RemotePolicy, PolicyError> {
        let output = self
            .create_origin_request_policy()
            .origin_request_policy_config(config)
            .send()
            .await
            .map_err(|e| remote_error(&e))?;

        remote_policy(output.origin_request_policy(), output.e_tag())
    }

    async fn get_policy(&self, id: &str) -> Result<RemotePolicy, PolicyError> {
        let output = self
            .get_origin_request_policy()
            .id(id)
            .send()
            .await
            .map_err(|e| get_error(id, e))?;

        remote_policy(output.origin_request_policy(), output.e_tag())
    }

    async fn update_policy(
        &self,
        id: &str,
        if_match: &str,
        config: OriginRequestPolicyConfig,
    ) -> Result<String, PolicyError> {
        let output = self
            .update_origin_request_policy()
            .id(id)
            .if_match(if_match)
            .origin_request_policy_config(config)
            .send()
            .await
            .map_err(|e| update_error(id, e))?;

        let Some(etag) = output.e_tag() else {
            return Err(PolicyError::InvalidResponse(format!(
                "update of policy `{id}` returned no ETag"
            )));
        };
        Ok(etag.to_string())
    }

    async fn delete_policy(&self, id: &str, if_match: &str) -> Result<(), PolicyError> {
        self.delete_origin_request_policy()
            .id(id)
            .if_match(if_match)
            .send()
            .await
            .map_err(|e| delete_error(id, e))?;
        Ok(())
    }

    async fn list_policies(&self) -> Result<Vec<PolicySummary>, PolicyError> {
        let mut results = Vec::new();

        let mut next_marker: Option<String> = None;
        loop {
            let policies = self
                .list_origin_request_policies()
                .r#type(OriginRequestPolicyType::Custom)
                .set_marker(next_marker)
                .send()
                .await
                .map_err(|e| remote_error(&e))?;
            let Some(policy_list) = policies.origin_request_policy_list() else {
                break;
            };

            for summary in policy_list.items() {
                if let Some(policy) = summary.origin_request_policy() {
                    results.push(PolicySummary {
                        id:   policy.id().to_string(),
                        name: policy
                            .origin_request_policy_config()
                            .map(|c| c.name().to_string())
                            .unwrap_or_default(),
                    });
                }
            }
            tracing::debug!("Listed {} origin request policies so far", results.len());

            next_marker = policy_list.next_marker().map(str::to_string);
            if next_marker.is_none() {
                break;
            }
        }

        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use aws_sdk_cloudfront::{
        config::http::HttpResponse,
        types::error::{InvalidIfMatchVersion, NoSuchOriginRequestPolicy, PreconditionFailed},
    };
    use aws_smithy_types::body::SdkBody;

    use super::*;

    fn service_error<E>(status: u16, err: E) -> SdkError<E> {
        let raw = HttpResponse::new(status.try_into().unwrap(), SdkBody::empty());
        SdkError::service_error(err, raw)
    }

    fn no_such_policy() -> NoSuchOriginRequestPolicy {
        NoSuchOriginRequestPolicy::builder().message("The origin request policy does not exist.").build()
    }

    fn precondition_failed() -> PreconditionFailed {
        PreconditionFailed::builder().message("The If-Match version is stale.").build()
    }

    fn invalid_if_match() -> InvalidIfMatchVersion {
        InvalidIfMatchVersion::builder().message("The If-Match version is invalid.").build()
    }

    #[test]
    fn test_get_classifies_missing_policy() {
        let err = service_error(404, GetOriginRequestPolicyError::NoSuchOriginRequestPolicy(no_such_policy()));
        assert_eq!(get_error("orp-1", err), PolicyError::NotFound { id: String::from("orp-1") });
    }

    #[test]
    fn test_delete_classifies_missing_and_stale() {
        let err = service_error(404, DeleteOriginRequestPolicyError::NoSuchOriginRequestPolicy(no_such_policy()));
        assert!(delete_error("orp-1", err).is_not_found());

        let err = service_error(412, DeleteOriginRequestPolicyError::PreconditionFailed(precondition_failed()));
        assert_eq!(delete_error("orp-1", err), PolicyError::Conflict { id: String::from("orp-1") });
    }

    #[test]
    fn test_update_classifies_missing_and_stale() {
        let err = service_error(404, UpdateOriginRequestPolicyError::NoSuchOriginRequestPolicy(no_such_policy()));
        assert!(update_error("orp-1", err).is_not_found());

        let err = service_error(412, UpdateOriginRequestPolicyError::PreconditionFailed(precondition_failed()));
        assert!(update_error("orp-1", err).is_conflict());
    }

    #[test]
    fn test_invalid_if_match_is_a_remote_error() {
        let err = service_error(400, UpdateOriginRequestPolicyError::InvalidIfMatchVersion(invalid_if_match()));
        let PolicyError::Remote(message) = update_error("orp-1", err) else {
            panic!("expected a remote error");
        };
        assert!(message.contains("If-Match version is invalid"));

        let err = service_error(400, DeleteOriginRequestPolicyError::InvalidIfMatchVersion(invalid_if_match()));
        assert!(matches!(delete_error("orp-1", err), PolicyError::Remote(_)));
    }
}
