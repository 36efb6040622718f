/// Database layer for ToolScout
///
/// # Modules
///
/// - `pool`: PostgreSQL connection pool management with health checks
/// - `migrations`: Database migration runner
///
/// The pool is created once at startup and passed by reference into each
/// component; there is no ambient global database handle.

pub mod migrations;
pub mod pool;
