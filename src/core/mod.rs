pub mod config;
pub mod emit;
pub mod lint;
pub mod loader;
pub mod normalize;
pub mod pipeline;
pub mod prose;
pub mod rules;
pub mod samples;
