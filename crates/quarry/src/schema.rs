mod gate;
pub(crate) use gate::SyncGates;

mod generator;
pub use generator::{Generator, State, SyncReport};

pub use quarry_core::schema::{db, Builder};
