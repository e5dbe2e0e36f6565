use crate::error::QueryError;
use crate::utils::format_scope;

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

const PREFIX: &str = "arn:";
const SECTIONS: usize = 6;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ArnError {
    #[error("arn: invalid prefix in `{0}`")]
    InvalidPrefix(String),
    #[error("arn: not enough sections in `{0}`")]
    NotEnoughSections(String),
    #[error("arn: missing {section} in `{arn}`")]
    Missing { section: &'static str, arn: String },
}

impl From<ArnError> for QueryError {
    fn from(err: ArnError) -> QueryError {
        QueryError::other(format!("{err}"))
    }
}

/// A parsed Amazon Resource Name.
///
/// Format: `arn:partition:service:region:account-id:resource`, where the
/// resource is usually `resource-type/resource-id` or
/// `resource-type:resource-id` and may contain further separators.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Arn {
    partition: String,
    service: String,
    region: String,
    account_id: String,
    resource: String,
}

impl Arn {
    /// Parses `value`, requiring a non-empty partition, service and
    /// resource. Region and account ID may be empty, as they are for S3
    /// buckets and IAM policies.
    pub fn parse(value: &str) -> Result<Self, ArnError> {
        if !value.starts_with(PREFIX) {
            return Err(ArnError::InvalidPrefix(value.to_string()));
        }

        let sections: Vec<&str> = value.splitn(SECTIONS, ':').collect();
        if sections.len() != SECTIONS {
            return Err(ArnError::NotEnoughSections(value.to_string()));
        }

        let missing = |section: &'static str| ArnError::Missing {
            section,
            arn: value.to_string(),
        };

        if sections[1].is_empty() {
            return Err(missing("partition"));
        }
        if sections[2].is_empty() {
            return Err(missing("service"));
        }
        if sections[5].is_empty() {
            return Err(missing("resource"));
        }

        Ok(Self {
            partition: sections[1].to_string(),
            service: sections[2].to_string(),
            region: sections[3].to_string(),
            account_id: sections[4].to_string(),
            resource: sections[5].to_string(),
        })
    }

    pub fn partition(&self) -> &str {
        self.partition.as_str()
    }

    pub fn service(&self) -> &str {
        self.service.as_str()
    }

    pub fn region(&self) -> &str {
        self.region.as_str()
    }

    pub fn account_id(&self) -> &str {
        self.account_id.as_str()
    }

    pub fn resource(&self) -> &str {
        self.resource.as_str()
    }

    /// Everything after the resource type. This might include a version or
    /// other components, e.g. `ecs-demo-app:1` for
    /// `arn:aws:ecs:eu-west-1:052392120703:task-definition/ecs-demo-app:1`.
    pub fn resource_id(&self) -> &str {
        match self.separator() {
            Some(idx) => &self.resource[idx + 1..],
            None => self.resource.as_str(),
        }
    }

    /// The part of the resource before the first `/` or `:`.
    pub fn resource_type(&self) -> &str {
        match self.separator() {
            Some(idx) => &self.resource[..idx],
            None => self.resource.as_str(),
        }
    }

    /// The scope the resource lives in.
    pub fn scope(&self) -> String {
        format_scope(&self.account_id, &self.region)
    }

    fn separator(&self) -> Option<usize> {
        self.resource.find(|c: char| c == '/' || c == ':')
    }
}

impl FromStr for Arn {
    type Err = ArnError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Arn::parse(value)
    }
}

impl fmt::Display for Arn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "arn:{}:{}:{}:{}:{}",
            self.partition, self.service, self.region, self.account_id, self.resource
        )
    }
}
