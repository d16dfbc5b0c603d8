mod builder;
pub use builder::Builder;

pub mod db;
