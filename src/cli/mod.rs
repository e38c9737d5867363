pub mod commands;
pub mod handlers;

pub use commands::CliArgs;
pub use handlers::handle_dump;
