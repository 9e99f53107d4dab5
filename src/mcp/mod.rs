pub mod dispatcher;
pub mod protocol;
pub mod server;

pub use dispatcher::Dispatcher;
pub use server::McpServer;
