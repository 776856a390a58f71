//! # kate-stage
//!
//! Snowflake stage connector for K-A-T-E One.
//!
//! The [`StageStore`] trait abstracts the remote document stage used by
//! batch analysis: [`SnowflakeStage`] talks to Snowflake's REST interface,
//! [`MockStage`] backs the tests, and [`StageFile`] classifies stage paths
//! by what the dashboard can do with them.

pub mod file;
pub mod mock;
pub mod snowflake;
pub mod store;

pub use file::{to_base64, StageFile};
pub use mock::MockStage;
pub use snowflake::SnowflakeStage;
pub use store::StageStore;
