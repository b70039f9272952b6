// All review functionality is in drawcheck-core
// This CLI acts as a thin wrapper around the core library

// CLI-specific modules
pub mod logging;

// Re-export core types for convenience
pub use drawcheck_core::*;

pub use logging::init_logging;
