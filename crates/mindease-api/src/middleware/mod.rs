pub mod identity;
pub mod logging;

pub use identity::{Identity, MaybeIdentity};
