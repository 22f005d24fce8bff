use community_ledger::Money;
use community_membership::Address;
use serde::{Deserialize, Serialize};

use crate::Error;

/// Whole tokens minted to the admin when a community is created.
pub const DEFAULT_SUPPLY: u64 = 1_000_000;

/// Everything needed to bring up a community: who administers it, the
/// treasury and coordinator accounts, and the supply minted to the admin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Genesis {
    pub admin: Address,
    pub treasury: Address,
    pub coordinator: Address,
    pub initial_supply: Money,
}

impl Genesis {
    pub fn new(admin: Address) -> Self {
        Self {
            admin,
            treasury: Address::system(b"treasury"),
            coordinator: Address::system(b"community"),
            initial_supply: Money::from_units(DEFAULT_SUPPLY),
        }
    }

    pub fn with_supply(mut self, initial_supply: Money) -> Self {
        self.initial_supply = initial_supply;
        self
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, Error> {
        Ok(bincode::serialize(self)?)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, Error> {
        Ok(bincode::deserialize(bytes)?)
    }

    /// The coordinator must be its own account; the admin/treasury pair is
    /// checked by the registry.
    pub(crate) fn validate(&self) -> Result<(), Error> {
        for account in [self.admin, self.treasury, self.coordinator].iter() {
            if account.is_zero() {
                return Err(Error::InvalidGenesis { account: *account });
            }
        }
        if self.coordinator == self.admin || self.coordinator == self.treasury {
            return Err(Error::InvalidGenesis {
                account: self.coordinator,
            });
        }
        Ok(())
    }
}
