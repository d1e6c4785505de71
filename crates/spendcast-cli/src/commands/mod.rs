//! CLI command implementations
//!
//! Commands are organized by domain:
//! - `audit` - Audit log viewer
//! - `core` - Core commands (init) and shared utilities (open_db, find_user)
//! - `expenses` - Expense commands (list, add, delete)
//! - `predict` - Spending forecast
//! - `serve` - Web server command
//! - `users` - User account commands (list, add, activate, deactivate)

pub mod audit;
pub mod core;
pub mod expenses;
pub mod predict;
pub mod serve;
pub mod users;

// Re-export command functions for main.rs
pub use audit::*;
pub use core::*;
pub use expenses::*;
pub use predict::*;
pub use serve::*;
pub use users::*;

/// Truncate a string to a maximum number of characters, adding "..." if truncated
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
