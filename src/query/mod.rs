pub mod builder;
pub mod dates;
pub mod models;
pub mod options;
pub mod report;

pub use builder::*;
pub use models::*;
pub use options::*;
pub use report::*;
