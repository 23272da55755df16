use std::{
    collections::BTreeMap,
    ffi::OsString,
    path::{Path, PathBuf},
};

use anyhow::{Context, bail};

pub type Outputs = BTreeMap<String, String>;

pub const POLICY_ID: &str = "policy_id";
pub const ETAG: &str = "etag";

/// Policies are addressed by name, which CloudFront keeps unique:
/// `aws/cloudfront/origin_request_policies/<name>.ron`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CloudFrontResourceAddress {
    OriginRequestPolicy { name: String },
}

impl CloudFrontResourceAddress {
    pub fn to_path_buf(&self) -> PathBuf {
        match self {
            CloudFrontResourceAddress::OriginRequestPolicy { name } => {
                PathBuf::from(format!("aws/cloudfront/origin_request_policies/{}.ron", name))
            }
        }
    }

    pub fn from_path(path: &Path) -> anyhow::Result<Self> {
        let path_components: Vec<&str> = path
            .components()
            .map(|s| s.as_os_str().to_str())
            .collect::<Option<_>>()
            .with_context(|| format!("Address {:?} is not valid UTF-8", path))?;

        match path_components[..] {
            ["aws", "cloudfront", "origin_request_policies", file] => match file.strip_suffix(".ron") {
                Some(name) if !name.is_empty() => Ok(CloudFrontResourceAddress::OriginRequestPolicy {
                    name: name.to_string(),
                }),
                _ => bail!("Invalid CloudFront resource address: {:?}", path),
            },
            _ => bail!("Invalid CloudFront resource address: {:?}", path),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            CloudFrontResourceAddress::OriginRequestPolicy { name } => name,
        }
    }

    fn outputs_path(&self, prefix: &Path) -> PathBuf {
        let mut path: OsString = prefix.join(self.to_path_buf()).into_os_string();
        path.push(".out.json");
        PathBuf::from(path)
    }

    pub fn read_outputs(&self, prefix: &Path) -> anyhow::Result<Option<Outputs>> {
        let path = self.outputs_path(prefix);
        if !path.is_file() {
            return Ok(None);
        }
        let outputs = serde_json::from_str(&std::fs::read_to_string(&path)?)
            .with_context(|| format!("Failed to parse outputs at {:?}", path))?;
        Ok(Some(outputs))
    }

    pub fn get_output(&self, prefix: &Path, key: &str) -> anyhow::Result<Option<String>> {
        Ok(self.read_outputs(prefix)?.and_then(|mut outputs| outputs.remove(key)))
    }

    pub fn write_outputs(&self, prefix: &Path, outputs: &Outputs) -> anyhow::Result<()> {
        let path = self.outputs_path(prefix);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&path, serde_json::to_string_pretty(outputs)?)
            .with_context(|| format!("Failed to write outputs at {:?}", path))?;
        Ok(())
    }

    pub fn remove_outputs(&self, prefix: &Path) -> anyhow::Result<()> {
        let path = self.outputs_path(prefix);
        if path.is_file() {
            std::fs::remove_file(path)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_address_round_trips_through_path() {
        let addr = CloudFrontResourceAddress::from_path(Path::new(
            "aws/cloudfront/origin_request_policies/api-origin.ron",
        ))
        .unwrap();
        assert_eq!(addr.name(), "api-origin");
        assert_eq!(
            addr.to_path_buf(),
            PathBuf::from("aws/cloudfront/origin_request_policies/api-origin.ron")
        );
    }

    #[test]
    fn test_foreign_paths_are_rejected() {
        for path in [
            "aws/cloudfront/origin_request_policies/.ron",
            "aws/cloudfront/origin_request_policies/p1.json",
            "aws/cloudfront/cache_policies/p1.ron",
            "aws/cloudfront/origin_request_policies/nested/p1.ron",
        ] {
            assert!(CloudFrontResourceAddress::from_path(Path::new(path)).is_err(), "{path}");
        }
    }

    #[test]
    fn test_outputs_live_beside_the_definition() {
        let prefix = std::env::temp_dir().join(format!("orp-addr-{}", uuid::Uuid::new_v4()));
        let addr = CloudFrontResourceAddress::OriginRequestPolicy { name: String::from("p1") };
        assert_eq!(addr.read_outputs(&prefix).unwrap(), None);

        let outputs = Outputs::from([
            (String::from(POLICY_ID), String::from("abc")),
            (String::from(ETAG), String::from("E1")),
        ]);
        addr.write_outputs(&prefix, &outputs).unwrap();
        assert!(prefix.join("aws/cloudfront/origin_request_policies/p1.ron.out.json").is_file());
        assert_eq!(addr.get_output(&prefix, ETAG).unwrap().as_deref(), Some("E1"));

        addr.remove_outputs(&prefix).unwrap();
        assert_eq!(addr.get_output(&prefix, POLICY_ID).unwrap(), None);
    }
}
