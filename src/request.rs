use community_ledger::{Money, RequestId};
use community_membership::Address;
use serde::{Deserialize, Serialize};

/// A member asking another member (or the treasury) for funds.
///
/// Only `approved` and `completed` ever change after creation, and only from
/// false to true.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TransferRequest {
    pub(crate) id: RequestId,
    pub(crate) from: Address,
    pub(crate) to: Address,
    pub(crate) amount: Money,
    pub(crate) approved: bool,
    pub(crate) completed: bool,
}

impl TransferRequest {
    pub(crate) fn new(id: RequestId, from: Address, to: Address, amount: Money) -> Self {
        Self {
            id,
            from,
            to,
            amount,
            approved: false,
            completed: false,
        }
    }

    pub fn id(&self) -> RequestId {
        self.id
    }

    /// The requester, paid on completion.
    pub fn from(&self) -> Address {
        self.from
    }

    /// The payer.
    pub fn to(&self) -> Address {
        self.to
    }

    pub fn amount(&self) -> Money {
        self.amount
    }

    pub fn approved(&self) -> bool {
        self.approved
    }

    pub fn completed(&self) -> bool {
        self.completed
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RequestStatus {
    Created,
    Funded,
    Approved,
    Completed,
}
