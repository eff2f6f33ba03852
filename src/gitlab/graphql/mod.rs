//! GraphQL request/response envelopes and the queries sent to GitLab's GraphQL API

pub mod security;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use super::error::ApiError;

/// Request body posted to `/api/graphql`
#[derive(Debug, Clone, Serialize)]
pub struct GraphQLPayload<T: Serialize> {
    pub query: String,
    pub variables: T,
}

/// Response body; GitLab may return partial `data` alongside `errors`
#[derive(Debug, Deserialize)]
pub struct GraphQLResponse<T> {
    pub data: Option<T>,
    #[serde(default)]
    pub errors: Vec<GraphQLError>,
}

#[derive(Debug, Deserialize)]
pub struct GraphQLError {
    pub message: String,
}

/// Executes a GraphQL query and returns its `data` payload.
///
/// Errors reported in the response body are returned as [`ApiError::GraphQL`].
pub trait GraphQLExecutor {
    #[allow(async_fn_in_trait)]
    async fn execute_graphql<T: Serialize, R: DeserializeOwned>(
        &self,
        query_name: &str,
        payload: GraphQLPayload<T>,
    ) -> Result<R, ApiError>;
}
