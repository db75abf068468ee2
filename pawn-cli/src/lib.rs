pub mod app_config;
pub mod shell;

pub use app_config::Config;
pub use shell::Shell;
