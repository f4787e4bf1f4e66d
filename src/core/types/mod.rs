mod atom;
mod exit;
mod handle;
mod handle_id;
mod payload;
mod term;

pub use self::atom::Atom;
pub use self::exit::Exit;
pub use self::handle::Handle;
pub use self::handle::HandleRef;
pub use self::handle_id::HandleId;
pub use self::handle_id::HandleKind;
pub use self::payload::Payload;
pub use self::term::Term;
