//! Claude Command Log - record every Bash command Claude Code runs.

pub mod command_log;
pub mod config;
pub mod display;
pub mod monitor;
pub mod watcher;
