use std::{collections::BTreeSet, fmt, str::FromStr};

use cloudfront_orp_core::util::{RON, pretty_config};
use serde::{Deserialize, Serialize};

use crate::{
    addr::{ETAG, Outputs, POLICY_ID},
    error::PolicyError,
};

macro_rules! behavior_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $wire:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(
                #[serde(rename = $wire)]
                $variant,
            )+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// The CloudFront wire string for this behavior.
            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $wire,)+
                }
            }
        }

        impl FromStr for $name {
            type Err = PolicyError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($wire => Ok($name::$variant),)+
                    other => Err(PolicyError::InvalidResponse(format!(
                        concat!("unrecognized ", stringify!($name), " `{}`"),
                        other
                    ))),
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

behavior_enum!(
    /// Which viewer cookies are forwarded to the origin.
    CookieBehavior {
        None => "none",
        Whitelist => "whitelist",
        All => "all",
    }
);

behavior_enum!(
    /// Which viewer headers are forwarded to the origin.
    HeaderBehavior {
        None => "none",
        Whitelist => "whitelist",
        AllViewer => "allViewer",
        AllViewerAndWhitelistCloudFront => "allViewerAndWhitelistCloudFront",
    }
);

behavior_enum!(
    /// Which query string parameters are forwarded to the origin.
    QueryStringBehavior {
        None => "none",
        Whitelist => "whitelist",
        AllExcept => "allExcept",
        All => "all",
    }
);

// `None` for an item set means the request carries no items block at all.
// `Some(empty)` is an items block with quantity 0. The two are kept apart so
// a read reproduces exactly what was sent.

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CookiesConfig {
    pub cookie_behavior: CookieBehavior,
    #[serde(default)]
    pub cookies: Option<BTreeSet<String>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HeadersConfig {
    pub header_behavior: HeaderBehavior,
    #[serde(default)]
    pub headers: Option<BTreeSet<String>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct QueryStringsConfig {
    pub query_string_behavior: QueryStringBehavior,
    #[serde(default)]
    pub query_strings: Option<BTreeSet<String>>,
}

/// Desired configuration of a CloudFront origin request policy.
///
/// Items supplied alongside a behavior that does not use them (for example
/// `none` with a cookie list) are not rejected here. CloudFront gets the
/// final say on such combinations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OriginRequestPolicy {
    pub name: String,
    #[serde(default)]
    pub comment: Option<String>,
    pub cookies_config: CookiesConfig,
    pub headers_config: HeadersConfig,
    pub query_strings_config: QueryStringsConfig,
}

impl OriginRequestPolicy {
    /// A policy named `name` that forwards nothing.
    pub fn forwarding_nothing(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            comment: None,
            cookies_config: CookiesConfig {
                cookie_behavior: CookieBehavior::None,
                cookies: None,
            },
            headers_config: HeadersConfig {
                header_behavior: HeaderBehavior::None,
                headers: None,
            },
            query_strings_config: QueryStringsConfig {
                query_string_behavior: QueryStringBehavior::None,
                query_strings: None,
            },
        }
    }

    pub fn validate(&self) -> Result<(), PolicyError> {
        if self.name.trim().is_empty() {
            return Err(PolicyError::InvalidConfig(String::from("name must not be empty")));
        }
        Ok(())
    }

    /// Parses and validates a policy definition.
    pub fn from_ron(s: &str) -> Result<Self, PolicyError> {
        let policy: OriginRequestPolicy = RON
            .from_str(s)
            .map_err(|e| PolicyError::InvalidConfig(e.to_string()))?;
        policy.validate()?;
        Ok(policy)
    }

    pub fn to_ron(&self) -> anyhow::Result<String> {
        Ok(RON.to_string_pretty(self, pretty_config())?)
    }
}

/// Local state of a managed policy: the remote identity, the ETag from the
/// most recent read, and the configuration as CloudFront reports it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyState {
    pub id:     String,
    pub etag:   String,
    pub policy: OriginRequestPolicy,
}

impl PolicyState {
    pub fn outputs(&self) -> Outputs {
        let mut outputs = Outputs::new();
        outputs.insert(String::from(POLICY_ID), self.id.clone());
        outputs.insert(String::from(ETAG), self.etag.clone());
        outputs
    }
}
