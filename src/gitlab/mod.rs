//! GitLab REST v4 and GraphQL API client

pub mod client;
pub mod error;
pub mod graphql;
pub mod issues;
pub mod merge_requests;
pub mod milestones;
pub mod projects;
pub mod search;
pub mod users;

pub use client::{ApiResponse, DEFAULT_GITLAB_HOST, GitLabClient};
pub use error::ApiError;
