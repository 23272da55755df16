use cloudfront_orp_core::util::RON;
use serde::{Deserialize, Serialize};

use crate::{addr::Outputs, resource::OriginRequestPolicy};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CloudFrontConnectorOp {
    CreateOriginRequestPolicy(OriginRequestPolicy),
    UpdateOriginRequestPolicy(OriginRequestPolicy),
    DeleteOriginRequestPolicy,
}

impl CloudFrontConnectorOp {
    pub fn to_ron(&self) -> anyhow::Result<String> {
        Ok(RON.to_string(self)?)
    }

    pub fn from_ron(s: &str) -> anyhow::Result<Self> {
        Ok(RON.from_str(s)?)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct OpPlanOutput {
    pub op_definition:    String,
    pub friendly_message: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OpExecOutput {
    pub outputs:          Option<Outputs>,
    pub friendly_message: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GetResourceOutput {
    pub resource_definition: String,
    pub outputs:             Option<Outputs>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SkeletonOutput {
    pub addr: std::path::PathBuf,
    pub body: String,
}

/// Builds an `OpPlanOutput`; the enclosing fn must return `anyhow::Result`.
macro_rules! connector_op {
    ($op:expr, $msg:expr $(,)?) => {
        $crate::op::OpPlanOutput {
            op_definition:    $crate::op::CloudFrontConnectorOp::to_ron(&$op)?,
            friendly_message: Some($msg),
        }
    };
}

macro_rules! op_exec_output {
    ($outputs:expr, $msg:expr $(,)?) => {
        Ok($crate::op::OpExecOutput {
            outputs:          $outputs,
            friendly_message: Some($msg),
        })
    };
}

pub(crate) use connector_op;
pub(crate) use op_exec_output;
