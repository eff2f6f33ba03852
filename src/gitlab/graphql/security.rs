use serde::{Deserialize, Serialize};

use super::{GraphQLExecutor, GraphQLPayload};
use crate::gitlab::GitLabClient;
use crate::gitlab::error::ApiError;
use crate::types::{License, SecurityFinding, SecurityReportType};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectPathVariable {
    #[serde(rename = "fullPath")]
    pub full_path: String,
}

/// Findings of one report type from the latest pipeline of a project
pub fn security_findings_query(report_type: SecurityReportType) -> String {
    format!(
        r#"
        query($fullPath: ID!) {{
            project(fullPath: $fullPath) {{
                pipelines(last: 1) {{
                    nodes {{
                        securityReportFindings(reportTypes: [{report_type}]) {{
                            nodes {{
                                title
                                severity
                                location {{
                                    file
                                    startLine
                                }}
                                identifiers {{
                                    name
                                    url
                                }}
                            }}
                        }}
                    }}
                }}
            }}
        }}
    "#
    )
}

pub fn license_compliance_query() -> String {
    r#"
        query($fullPath: ID!) {
            project(fullPath: $fullPath) {
                licenses {
                    nodes {
                        name
                        spdxIdentifier
                        url
                    }
                }
            }
        }
    "#
    .to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct Nodes<T> {
    #[serde(default = "Vec::new")]
    pub nodes: Vec<T>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineNode {
    pub security_report_findings: Option<Nodes<SecurityFinding>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SecurityProject {
    pub pipelines: Option<Nodes<PipelineNode>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SecurityFindingsResponse {
    pub project: Option<SecurityProject>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LicenseProject {
    pub licenses: Option<Nodes<License>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LicenseComplianceResponse {
    pub project: Option<LicenseProject>,
}

impl SecurityFindingsResponse {
    /// Findings of the most recent pipeline, empty when the project has no pipeline
    pub fn into_findings(self) -> Vec<SecurityFinding> {
        self.project
            .and_then(|project| project.pipelines)
            .and_then(|pipelines| pipelines.nodes.into_iter().next())
            .and_then(|pipeline| pipeline.security_report_findings)
            .map(|findings| findings.nodes)
            .unwrap_or_default()
    }
}

impl LicenseComplianceResponse {
    pub fn into_licenses(self) -> Vec<License> {
        self.project
            .and_then(|project| project.licenses)
            .map(|licenses| licenses.nodes)
            .unwrap_or_default()
    }
}

impl GitLabClient {
    pub async fn fetch_security_findings(
        &self,
        project_path: &str,
        report_type: SecurityReportType,
    ) -> Result<Vec<SecurityFinding>, ApiError> {
        let payload = GraphQLPayload {
            query: security_findings_query(report_type),
            variables: ProjectPathVariable {
                full_path: project_path.to_string(),
            },
        };
        let response: SecurityFindingsResponse = self
            .execute_graphql(&format!("{}_findings", report_type), payload)
            .await?;
        Ok(response.into_findings())
    }

    pub async fn fetch_license_compliance(&self, project_path: &str) -> Result<Vec<License>, ApiError> {
        let payload = GraphQLPayload {
            query: license_compliance_query(),
            variables: ProjectPathVariable {
                full_path: project_path.to_string(),
            },
        };
        let response: LicenseComplianceResponse =
            self.execute_graphql("license_compliance", payload).await?;
        Ok(response.into_licenses())
    }
}
