//! Conversion between the local policy model and the CloudFront request
//! shape. `flatten` is the exact inverse of `expand`.

use std::collections::BTreeSet;

use aws_sdk_cloudfront::types::{
    CookieNames, Headers, OriginRequestPolicyConfig, OriginRequestPolicyCookieBehavior, OriginRequestPolicyCookiesConfig,
    OriginRequestPolicyHeaderBehavior, OriginRequestPolicyHeadersConfig, OriginRequestPolicyQueryStringBehavior,
    OriginRequestPolicyQueryStringsConfig, QueryStringNames,
};

use crate::{
    error::PolicyError,
    resource::{CookiesConfig, HeadersConfig, OriginRequestPolicy, QueryStringsConfig},
};

pub fn expand(policy: &OriginRequestPolicy) -> Result<OriginRequestPolicyConfig, PolicyError> {
    Ok(OriginRequestPolicyConfig::builder()
        .set_comment(policy.comment.clone())
        .name(&policy.name)
        .cookies_config(expand_cookies_config(&policy.cookies_config)?)
        .headers_config(expand_headers_config(&policy.headers_config)?)
        .query_strings_config(expand_query_strings_config(&policy.query_strings_config)?)
        .build()?)
}

pub fn flatten(config: &OriginRequestPolicyConfig) -> Result<OriginRequestPolicy, PolicyError> {
    let cookies_config = config.cookies_config().ok_or_else(|| missing("CookiesConfig"))?;
    let headers_config = config.headers_config().ok_or_else(|| missing("HeadersConfig"))?;
    let query_strings_config = config
        .query_strings_config()
        .ok_or_else(|| missing("QueryStringsConfig"))?;

    Ok(OriginRequestPolicy {
        name: config.name().to_string(),
        comment: config.comment().map(str::to_string),
        cookies_config: flatten_cookies_config(cookies_config)?,
        headers_config: flatten_headers_config(headers_config)?,
        query_strings_config: flatten_query_strings_config(query_strings_config)?,
    })
}

fn missing(field: &str) -> PolicyError {
    PolicyError::InvalidResponse(format!("policy config has no {field}"))
}

/// Items are sent sorted. An empty set is sent as quantity 0 with no items list.
fn expand_items(items: &BTreeSet<String>) -> Result<(i32, Option<Vec<String>>), PolicyError> {
    let quantity =
        i32::try_from(items.len()).map_err(|_| PolicyError::InvalidConfig(format!("too many items: {}", items.len())))?;

    if items.is_empty() {
        Ok((0, None))
    } else {
        Ok((quantity, Some(items.iter().cloned().collect())))
    }
}

fn flatten_items(items: &[String], quantity: i32) -> Result<BTreeSet<String>, PolicyError> {
    let set: BTreeSet<String> = items.iter().cloned().collect();
    if usize::try_from(quantity).ok() != Some(set.len()) {
        return Err(PolicyError::InvalidResponse(format!(
            "item quantity {} does not match the {} distinct items returned",
            quantity,
            set.len()
        )));
    }
    Ok(set)
}

fn expand_cookies_config(config: &CookiesConfig) -> Result<OriginRequestPolicyCookiesConfig, PolicyError> {
    let cookies = match &config.cookies {
        Some(items) => {
            let (quantity, items) = expand_items(items)?;
            Some(CookieNames::builder().quantity(quantity).set_items(items).build()?)
        }
        None => None,
    };

    Ok(OriginRequestPolicyCookiesConfig::builder()
        .cookie_behavior(OriginRequestPolicyCookieBehavior::from(config.cookie_behavior.as_str()))
        .set_cookies(cookies)
        .build()?)
}

fn flatten_cookies_config(config: &OriginRequestPolicyCookiesConfig) -> Result<CookiesConfig, PolicyError> {
    Ok(CookiesConfig {
        cookie_behavior: config.cookie_behavior().as_str().parse()?,
        cookies: config
            .cookies()
            .map(|names| flatten_items(names.items(), names.quantity()))
            .transpose()?,
    })
}

fn expand_headers_config(config: &HeadersConfig) -> Result<OriginRequestPolicyHeadersConfig, PolicyError> {
    let headers = match &config.headers {
        Some(items) => {
            let (quantity, items) = expand_items(items)?;
            Some(Headers::builder().quantity(quantity).set_items(items).build()?)
        }
        None => None,
    };

    Ok(OriginRequestPolicyHeadersConfig::builder()
        .header_behavior(OriginRequestPolicyHeaderBehavior::from(config.header_behavior.as_str()))
        .set_headers(headers)
        .build()?)
}

fn flatten_headers_config(config: &OriginRequestPolicyHeadersConfig) -> Result<HeadersConfig, PolicyError> {
    Ok(HeadersConfig {
        header_behavior: config.header_behavior().as_str().parse()?,
        headers: config
            .headers()
            .map(|names| flatten_items(names.items(), names.quantity()))
            .transpose()?,
    })
}

fn expand_query_strings_config(config: &QueryStringsConfig) -> Result<OriginRequestPolicyQueryStringsConfig, PolicyError> {
    let query_strings = match &config.query_strings {
        Some(items) => {
            let (quantity, items) = expand_items(items)?;
            Some(QueryStringNames::builder().quantity(quantity).set_items(items).build()?)
        }
        None => None,
    };

    Ok(OriginRequestPolicyQueryStringsConfig::builder()
        .query_string_behavior(OriginRequestPolicyQueryStringBehavior::from(
            config.query_string_behavior.as_str(),
        ))
        .set_query_strings(query_strings)
        .build()?)
}

fn flatten_query_strings_config(
    config: &OriginRequestPolicyQueryStringsConfig,
) -> Result<QueryStringsConfig, PolicyError> {
    Ok(QueryStringsConfig {
        query_string_behavior: config.query_string_behavior().as_str().parse()?,
        query_strings: config
            .query_strings()
            .map(|names| flatten_items(names.items(), names.quantity()))
            .transpose()?,
    })
}
