//! Audit history persistence.
//!
//! SQLite via `sqlx`, one `audits` table. Scores and status are stored as
//! columns for cheap history listings; the full result (details,
//! recommendations) is stored as a JSON blob alongside them.

mod audits;
mod pool;

pub use audits::{get_audit, insert_audit, list_audits, AuditSummary};
pub use pool::init_db_pool_with_path;
