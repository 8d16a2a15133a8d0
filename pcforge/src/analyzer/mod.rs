pub mod classify;
pub mod power;
pub mod rules;

// Re-export for convenience
pub use classify::{classify, classify_with, CompatStatus};
pub use power::{estimate, PowerBudget};
pub use rules::*;
