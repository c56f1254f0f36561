pub mod commands;
pub mod config;
pub mod error;
pub mod notify;
pub mod token;

pub mod cmd {
    pub use super::commands::Cli;
}
