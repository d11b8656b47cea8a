//! Database migration command.
//!
//! # Usage
//!
//! ```bash
//! mc-cli migrate
//! ```
//!
//! # Environment Variables
//!
//! - `DATABASE_URL` - `PostgreSQL` connection string
//!
//! The full environment is validated first, so a broken deploy config fails
//! here rather than at app start.
//!
//! # Migration Files
//!
//! Migrations are embedded from `crates/app/migrations/`:
//! ```text
//! migrations/
//! └── 20260301000001_create_shops.sql
//! ```

use mitto_connect::state::AppState;

use super::CommandError;

/// Run the embedded migrations against `DATABASE_URL`.
pub async fn run(state: &AppState) -> Result<(), CommandError> {
    state.database().migrate().await?;
    Ok(())
}
