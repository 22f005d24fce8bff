use community_ledger::{BalanceChange, Money, RequestId};
use community_membership::Address;
use serde::{Deserialize, Serialize};

/// Raised once per committed state change, in the order the changes happened.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Event {
    MemberAdded(Address),
    MemberRemoved(Address),
    TransferRequested {
        id: RequestId,
        from: Address,
        to: Address,
        amount: Money,
    },
    EscrowDeposited {
        id: RequestId,
        depositor: Address,
        amount: Money,
    },
    TransferApproved(RequestId),
    TransferCompleted(RequestId),
    BalanceChanged {
        account: Address,
        balance: Money,
    },
}

impl From<BalanceChange> for Event {
    fn from(change: BalanceChange) -> Self {
        Event::BalanceChanged {
            account: change.account,
            balance: change.balance,
        }
    }
}
