pub mod builder;
pub mod config;
pub mod docker;
pub mod names;
pub mod preview;

pub use preview::run;
