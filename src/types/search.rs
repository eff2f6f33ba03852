//! Search scopes and resource types for the GitLab search API

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Kind of resource searched by the GitLab search API (`scope` query parameter)
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema, Display, EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum SearchResourceType {
    Projects,
    Issues,
    MergeRequests,
    Blobs,
    Commits,
    Milestones,
    SnippetTitles,
    SnippetBlobs,
    WikiBlobs,
    Notes,
}

/// Where a search runs: instance-wide, inside a group, or inside a project
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    JsonSchema,
    Display,
    EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum SearchScope {
    #[default]
    Global,
    Group,
    Project,
}

impl SearchResourceType {
    /// Scopes GitLab accepts for this resource type
    pub fn supported_scopes(&self) -> &'static [SearchScope] {
        use SearchScope::*;
        match self {
            Self::Projects => &[Global, Group],
            Self::Commits => &[Global, Project],
            Self::SnippetTitles | Self::SnippetBlobs | Self::WikiBlobs => &[Global],
            Self::Notes => &[Project],
            Self::Issues | Self::MergeRequests | Self::Blobs | Self::Milestones => {
                &[Global, Group, Project]
            }
        }
    }

    pub fn supports(&self, scope: SearchScope) -> bool {
        self.supported_scopes().contains(&scope)
    }

    /// Validation message for an unsupported scope, e.g.
    /// "commits search only supports global or project scope"
    pub fn unsupported_scope_message(&self) -> String {
        let scopes = self
            .supported_scopes()
            .iter()
            .map(|scope| scope.to_string())
            .collect::<Vec<_>>()
            .join(" or ");
        format!("{} search only supports {} scope", self, scopes)
    }
}
