//! 应用层 - 命令
//!
//! 朗读流水线的命令与处理器

mod narrate_commands;

pub mod handlers;

pub use narrate_commands::*;
