pub mod clause;
pub mod driver;
mod error;
pub mod runner;
pub mod script;
pub mod stress;
pub mod timing;
mod types;

pub use clause::{build_sql, build_where_condition};
pub use driver::{Connector, DriverManager};
pub use error::{DbError, HarnessError};
pub use runner::StatementRunner;
pub use script::{execute_sql_file, ScriptSummary};
pub use types::{ConnectionDescriptor, Outcome, QueryStats, Value};
