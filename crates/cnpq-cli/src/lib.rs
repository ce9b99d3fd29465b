//! CLI library components for the CNPq payment ledger tool.

pub mod cli;
pub mod logging;
pub mod types;
