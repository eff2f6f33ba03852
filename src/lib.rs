/// Server configuration resolved from flags, environment and config file
pub mod config;

/// Truncation, field filtering and pagination shaping of list responses
pub mod formatter;

/// GitLab REST and GraphQL client
pub mod gitlab;

/// MCP tool implementations exposing GitLab through the protocol
pub mod tools;

/// Named groups of tools that are enabled or disabled together
pub mod toolsets;

/// Transport layer implementations for MCP server modes (stdio, HTTP)
pub mod transport;

/// Core type definitions and domain models used throughout the library
pub mod types;
