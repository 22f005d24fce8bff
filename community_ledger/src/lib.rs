pub mod money;
pub use money::Money;

pub mod ledger;
pub use ledger::{BalanceChange, EscrowSlot, Error, Ledger, RequestId};

pub mod treasury;
pub use treasury::Treasury;
