use std::fmt::Write;

use lazy_static::lazy_static;
use ron::{extensions::Extensions, ser::PrettyConfig};
use serde::{Serialize, de::DeserializeOwned};
use similar::{ChangeTag, TextDiff};

lazy_static! {
    pub static ref RON: ron::Options = ron::Options::default().with_default_extension(Extensions::IMPLICIT_SOME);
}

pub fn pretty_config() -> PrettyConfig {
    PrettyConfig::default().struct_names(true)
}

/// Renders a line diff between the pretty RON forms of `a` and `b`.
pub fn diff_ron_values<T: Serialize>(a: &T, b: &T) -> anyhow::Result<String> {
    let a = RON.to_string_pretty(a, pretty_config())?;
    let b = RON.to_string_pretty(b, pretty_config())?;

    let mut out = String::new();
    for change in TextDiff::from_lines(&a, &b).iter_all_changes() {
        let sign = match change.tag() {
            ChangeTag::Delete => "-",
            ChangeTag::Insert => "+",
            ChangeTag::Equal => " ",
        };
        write!(out, "{sign}{change}")?;
    }
    Ok(out)
}

/// Semantic equality of two RON documents, ignoring formatting.
pub fn ron_check_eq<T: DeserializeOwned + PartialEq>(a: &str, b: &str) -> anyhow::Result<bool> {
    let a: T = RON.from_str(a)?;
    let b: T = RON.from_str(b)?;
    Ok(a == b)
}
