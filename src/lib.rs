// #![deny(missing_docs)]

pub mod community;
pub mod error;
pub mod event;
pub mod genesis;
pub mod host;
pub mod request;

pub use community::Community;
pub use community_ledger::{EscrowSlot, Ledger, Money, RequestId};
pub use community_membership::{Address, Sig, SigningAccount};
pub use error::{Error, RequestError};
pub use event::Event;
pub use genesis::Genesis;
pub use host::{Call, Host, Receipt, SignedCall};
pub use request::{RequestStatus, TransferRequest};

pub use community_ledger::Error as LedgerError;
pub use community_membership::Error as MembershipError;
