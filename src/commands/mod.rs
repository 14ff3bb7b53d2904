pub mod completions;
pub mod config;
pub mod decode;
pub mod publish;
