//! Identity and value types shared by every unit kind.
//!
//! # Identity
//!
//! - [`HandleId`]: Ordered, node-unique identity of a unit
//! - [`HandleKind`]: Which kind of unit an identity names
//! - [`Handle`]: Capabilities a peer may use on a unit it does not own
//! - [`HandleRef`]: Shared, type-erased, ordered [`Handle`]
//!
//! # Values and Exit Reasons
//!
//! - [`Atom`]: Static symbolic constant
//! - [`Term`]: Type-erased runtime value
//! - [`Payload`]: Trait for values carried by a [`Term`]
//! - [`Exit`]: Unit termination reason

mod types;

pub use self::types::Atom;
pub use self::types::Exit;
pub use self::types::Handle;
pub use self::types::HandleId;
pub use self::types::HandleKind;
pub use self::types::HandleRef;
pub use self::types::Payload;
pub use self::types::Term;
