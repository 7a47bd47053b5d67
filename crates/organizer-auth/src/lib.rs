//! Identity for the organizer backend: password hashing, signed identity
//! tokens, bearer-header introspection, and the role-based access gate.

pub mod error;
pub mod introspect;
pub mod password;
pub mod policy;
pub mod token;

pub use error::{AccessError, PasswordError, TokenError};
pub use introspect::{Identity, Introspector, TrustMode};
pub use policy::Operation;
pub use token::{Claims, TokenCodec};
