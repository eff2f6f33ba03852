//! Security scan findings and license compliance results

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Report types understood by the `securityReportFindings` GraphQL field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum SecurityReportType {
    Sast,
    Dast,
    DependencyScanning,
    ContainerScanning,
    SecretDetection,
}

impl SecurityReportType {
    /// Human-readable name used in messages
    pub fn label(&self) -> &'static str {
        match self {
            Self::Sast => "SAST",
            Self::Dast => "DAST",
            Self::DependencyScanning => "dependency scanning",
            Self::ContainerScanning => "container scanning",
            Self::SecretDetection => "secret detection",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FindingLocation {
    pub file: Option<String>,
    #[serde(rename = "startLine")]
    pub start_line: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FindingIdentifier {
    pub name: String,
    pub url: Option<String>,
}

/// One vulnerability reported by a pipeline security scan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SecurityFinding {
    pub title: String,
    pub severity: Option<String>,
    pub location: Option<FindingLocation>,
    #[serde(default)]
    pub identifiers: Vec<FindingIdentifier>,
}

/// Software license detected in a project's dependencies
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct License {
    pub name: String,
    #[serde(rename = "spdxIdentifier")]
    pub spdx_identifier: Option<String>,
    pub url: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_type_graphql_names() {
        assert_eq!(SecurityReportType::Sast.to_string(), "SAST");
        assert_eq!(
            SecurityReportType::DependencyScanning.to_string(),
            "DEPENDENCY_SCANNING"
        );
        assert_eq!(
            "SECRET_DETECTION".parse::<SecurityReportType>().unwrap(),
            SecurityReportType::SecretDetection
        );
    }
}
