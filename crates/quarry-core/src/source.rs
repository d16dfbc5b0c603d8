mod info;
pub use info::SourceInfo;

mod registry;
pub use registry::{Access, SourceRegistry};
