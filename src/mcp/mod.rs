/// MCP front end
///
/// Newline-delimited JSON-RPC over stdio: `protocol` holds the wire types
/// and error codes, `server` the request loop and tool dispatch.

pub mod protocol;
pub mod server;

pub use server::McpServer;
