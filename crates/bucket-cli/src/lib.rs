//! Library components of the `bucket` command-line client.

pub mod logging;
pub mod render;
