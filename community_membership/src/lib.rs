// #![deny(missing_docs)]

pub mod registry;
pub use crate::registry::{Error, Registry};

pub mod actor;
pub use actor::{Address, Sig, SigningAccount};
