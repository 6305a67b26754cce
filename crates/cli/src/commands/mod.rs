pub mod apply;
pub mod capabilities;
pub mod query;
