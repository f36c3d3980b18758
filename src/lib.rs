pub mod config;
pub mod fetch;
pub mod output;
pub mod pipeline;
pub mod process;
pub mod transform;
