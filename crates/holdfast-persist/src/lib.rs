pub mod error;
pub mod marker;
pub mod store;

pub use error::PersistError;
pub use marker::{read_anchor, read_liberated, write_anchor, write_liberated};
pub use store::{FlagStore, MemoryFlagStore};
