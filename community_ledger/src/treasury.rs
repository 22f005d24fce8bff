use community_membership::Address;
use serde::{Deserialize, Serialize};

use crate::Error;

/// The community pool.
///
/// The treasury keeps an ordinary balance on the ledger, but nobody holds a
/// key for it: the only way funds leave is the coordinator pulling them into
/// escrow while approving a request addressed to the treasury.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Treasury {
    address: Address,
    coordinator: Address,
}

impl Treasury {
    pub fn new(address: Address, coordinator: Address) -> Self {
        Self {
            address,
            coordinator,
        }
    }

    pub fn address(&self) -> Address {
        self.address
    }

    pub fn coordinator(&self) -> Address {
        self.coordinator
    }

    pub fn is_treasury(&self, account: &Address) -> bool {
        &self.address == account
    }

    pub fn authorize_debit(&self, initiator: Address) -> Result<(), Error> {
        if initiator == self.coordinator {
            Ok(())
        } else {
            Err(Error::Unauthorized {
                caller: initiator,
                account: self.address,
            })
        }
    }
}
