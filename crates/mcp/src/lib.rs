// MCP (Model Context Protocol) server exposing the ClinicalTrials.gov
// registry queries as tools to agent clients.

pub mod protocol;
pub mod server;
pub mod tools;
pub mod transport;

pub use server::McpServer;
pub use transport::StdioTransport;
