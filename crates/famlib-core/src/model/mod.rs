pub mod family;
pub mod snapshot;
pub mod version;

pub use family::Family;
pub use snapshot::{Parameter, Snapshot};
pub use version::FamilyVersion;
