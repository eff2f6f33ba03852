//! Transport layer implementations for MCP server
//!
//! This module provides the two transports the server runs on: stdio for
//! subprocess-based clients and streamable HTTP for network clients.

/// Streamable HTTP transport for network-based MCP communication
pub mod http_server;

/// Standard I/O transport for subprocess-based MCP communication
pub mod stdio;
