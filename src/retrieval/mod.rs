pub mod types;
pub mod verses;
