use std::collections::BTreeSet;

use log::info;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::Address;

pub const ADMIN_INDEX: usize = 0;
pub const TREASURY_INDEX: usize = 1;

/// The ordered list of community members.
///
/// Position 0 is the admin and position 1 is the treasury, for the lifetime
/// of the registry. `index` mirrors `members` for constant time lookups.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Registry {
    members: Vec<Address>,
    index: BTreeSet<Address>,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("Only the admin ({admin}) can change membership, not {caller}")]
    Unauthorized { caller: Address, admin: Address },
    #[error("`{member}` is already a member")]
    AlreadyMember { member: Address },
    #[error("`{member}` is not a member")]
    NotAMember { member: Address },
    #[error("The admin and treasury can not be removed ({member})")]
    ProtectedAccount { member: Address },
    #[error("The admin and treasury must be distinct accounts ({account})")]
    DuplicateGenesis { account: Address },
}

impl Registry {
    pub fn new(admin: Address, treasury: Address) -> Result<Self, Error> {
        if admin == treasury {
            return Err(Error::DuplicateGenesis { account: admin });
        }

        Ok(Registry {
            members: vec![admin, treasury],
            index: vec![admin, treasury].into_iter().collect(),
        })
    }

    pub fn admin(&self) -> Address {
        self.members[ADMIN_INDEX]
    }

    pub fn treasury(&self) -> Address {
        self.members[TREASURY_INDEX]
    }

    pub fn is_admin(&self, account: &Address) -> bool {
        &self.admin() == account
    }

    pub fn is_treasury(&self, account: &Address) -> bool {
        &self.treasury() == account
    }

    pub fn contains(&self, account: &Address) -> bool {
        self.index.contains(account)
    }

    /// Members in the order they joined, admin first and treasury second.
    pub fn members(&self) -> &[Address] {
        &self.members
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn add(&mut self, caller: Address, member: Address) -> Result<(), Error> {
        self.validate_add(caller, member)?;

        info!("[MBR] {} is adding {}", caller, member);
        self.members.push(member);
        self.index.insert(member);
        Ok(())
    }

    pub fn remove(&mut self, caller: Address, member: Address) -> Result<(), Error> {
        self.validate_remove(caller, member)?;

        info!("[MBR] {} is removing {}", caller, member);
        self.members.retain(|m| m != &member);
        self.index.remove(&member);
        Ok(())
    }

    fn validate_add(&self, caller: Address, member: Address) -> Result<(), Error> {
        self.ensure_admin(caller)?;
        if self.contains(&member) {
            Err(Error::AlreadyMember { member })
        } else {
            Ok(())
        }
    }

    fn validate_remove(&self, caller: Address, member: Address) -> Result<(), Error> {
        self.ensure_admin(caller)?;
        if !self.contains(&member) {
            Err(Error::NotAMember { member })
        } else if self.is_admin(&member) || self.is_treasury(&member) {
            Err(Error::ProtectedAccount { member })
        } else {
            Ok(())
        }
    }

    fn ensure_admin(&self, caller: Address) -> Result<(), Error> {
        if self.is_admin(&caller) {
            Ok(())
        } else {
            Err(Error::Unauthorized {
                caller,
                admin: self.admin(),
            })
        }
    }
}
