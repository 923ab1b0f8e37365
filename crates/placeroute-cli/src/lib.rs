//! placeroute CLI library.
//!
//! Terminal styling and output formatting shared by the `placeroute` binary.

pub mod output;
pub mod terminal;
