pub mod addr;
pub mod client;
pub mod config;
pub mod connector;
pub mod error;
pub mod lifecycle;
pub mod op;
pub mod resource;
pub mod transform;

#[cfg(test)]
pub(crate) mod testing;

pub use client::{OriginRequestPolicyApi, PolicySummary, RemotePolicy};
pub use connector::CloudFrontConnector;
pub use error::PolicyError;
pub use lifecycle::OriginRequestPolicyResource;
pub use resource::{OriginRequestPolicy, PolicyState};
