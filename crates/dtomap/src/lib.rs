mod context;
mod convert;
mod error;
mod lookup;

pub use context::{ContextScope, IdentityContext};
pub use convert::{ToDto, ValueTypeMapper};
pub use error::MapError;
pub use lookup::{lookup_as, DomainObjectLookup};

// Generated DTO code stores unordered entity collections keyed by instance
// identity. Re-exported so generated code only depends on this crate.
pub use by_address::ByAddress;

pub type Result<T> = std::result::Result<T, MapError>;
