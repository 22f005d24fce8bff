use std::collections::BTreeMap;

use community_membership::Address;
use log::info;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{Money, Treasury};

pub type RequestId = u64;

/// Funds locked against one transfer request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EscrowSlot {
    /// The only account allowed to release this slot.
    pub holder: Address,
    /// Whose balance the funds were taken from.
    pub depositor: Address,
    pub amount: Money,
}

/// The new balance of an account touched by a ledger operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceChange {
    pub account: Address,
    pub balance: Money,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("{account} has {balance} but {required} is required")]
    InsufficientBalance {
        account: Address,
        balance: Money,
        required: Money,
    },
    #[error("Funds can not be sent to {recipient}")]
    InvalidRecipient { recipient: Address },
    #[error("Deposit of {offered} for request {request_id} does not match the requested {required}")]
    InvalidDeposit {
        request_id: RequestId,
        required: Money,
        offered: Money,
    },
    #[error("There is no escrow for request {request_id}")]
    NoEscrow { request_id: RequestId },
    #[error("Escrow for request {request_id} is already occupied")]
    SlotOccupied { request_id: RequestId },
    #[error("{caller} is not allowed to move funds held by {account}")]
    Unauthorized { caller: Address, account: Address },
    #[error("Balance of {account} overflowed, the ledger is corrupt")]
    Overflow { account: Address },
}

/// Per-account balances plus the escrow slots keyed by request id.
///
/// The sum of all balances and all escrow slots equals `supply` after every
/// operation. Each operation validates everything it needs before touching any
/// balance, so a failed call leaves the ledger exactly as it was.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ledger {
    balances: BTreeMap<Address, Money>,
    escrow: BTreeMap<RequestId, EscrowSlot>,
    treasury: Treasury,
    supply: Money,
}

impl Ledger {
    /// A fresh ledger with the whole `supply` minted to `minter`.
    pub fn new(minter: Address, supply: Money, treasury: Treasury) -> Self {
        let mut balances = BTreeMap::new();
        if !supply.is_zero() {
            balances.insert(minter, supply);
        }

        Self {
            balances,
            escrow: Default::default(),
            treasury,
            supply,
        }
    }

    pub fn balance_of(&self, account: &Address) -> Money {
        self.balances.get(account).copied().unwrap_or_default()
    }

    pub fn escrow_of(&self, request_id: RequestId) -> Option<&EscrowSlot> {
        self.escrow.get(&request_id)
    }

    /// Amount currently locked for `request_id`, zero if the slot is empty.
    pub fn escrowed(&self, request_id: RequestId) -> Money {
        self.escrow
            .get(&request_id)
            .map(|slot| slot.amount)
            .unwrap_or_default()
    }

    pub fn treasury(&self) -> &Treasury {
        &self.treasury
    }

    pub fn total_supply(&self) -> Money {
        self.supply
    }

    pub fn total_balances(&self) -> Option<Money> {
        self.balances
            .values()
            .try_fold(Money::zero(), |sum, b| sum.checked_add(*b))
    }

    pub fn total_escrowed(&self) -> Option<Money> {
        self.escrow
            .values()
            .try_fold(Money::zero(), |sum, slot| sum.checked_add(slot.amount))
    }

    pub fn ensure_spendable(&self, account: Address, amount: Money) -> Result<(), Error> {
        let balance = self.balance_of(&account);
        if balance < amount {
            Err(Error::InsufficientBalance {
                account,
                balance,
                required: amount,
            })
        } else {
            Ok(())
        }
    }

    /// Moves `amount` from `caller` to `to`.
    pub fn transfer(
        &mut self,
        caller: Address,
        to: Address,
        amount: Money,
    ) -> Result<Vec<BalanceChange>, Error> {
        if to.is_zero() {
            return Err(Error::InvalidRecipient { recipient: to });
        }
        if self.treasury.is_treasury(&caller) {
            self.treasury.authorize_debit(caller)?;
        }
        let debited = self.debited(caller, amount)?;

        if caller == to {
            return Ok(vec![BalanceChange {
                account: caller,
                balance: self.balance_of(&caller),
            }]);
        }
        let credited = self.credited(to, amount)?;

        info!("[LEDGER] {} -> {}: {}", caller, to, amount);
        self.set_balance(caller, debited);
        self.set_balance(to, credited);

        Ok(vec![
            BalanceChange {
                account: caller,
                balance: debited,
            },
            BalanceChange {
                account: to,
                balance: credited,
            },
        ])
    }

    /// Locks `amount` of the caller's funds against `request_id`.
    ///
    /// `required` is the amount of the request being funded, supplied by the
    /// coordinator; the deposit must match it exactly. Only `holder` can
    /// release the slot afterwards.
    pub fn deposit_for_request(
        &mut self,
        caller: Address,
        holder: Address,
        amount: Money,
        request_id: RequestId,
        required: Money,
    ) -> Result<Vec<BalanceChange>, Error> {
        if holder.is_zero() {
            return Err(Error::InvalidRecipient { recipient: holder });
        }
        if self.treasury.is_treasury(&caller) {
            self.treasury.authorize_debit(caller)?;
        }
        if self.escrow.contains_key(&request_id) {
            return Err(Error::SlotOccupied { request_id });
        }
        if amount != required {
            return Err(Error::InvalidDeposit {
                request_id,
                required,
                offered: amount,
            });
        }
        let debited = self.debited(caller, amount)?;

        info!(
            "[LEDGER] {} deposited {} for request {} (held by {})",
            caller, amount, request_id, holder
        );
        self.set_balance(caller, debited);
        self.escrow.insert(
            request_id,
            EscrowSlot {
                holder,
                depositor: caller,
                amount,
            },
        );

        Ok(vec![BalanceChange {
            account: caller,
            balance: debited,
        }])
    }

    /// Moves `amount` from the treasury into escrow for `request_id`, held by
    /// the coordinator that initiated it.
    pub fn fund_from_treasury(
        &mut self,
        initiator: Address,
        amount: Money,
        request_id: RequestId,
    ) -> Result<Vec<BalanceChange>, Error> {
        self.treasury.authorize_debit(initiator)?;
        if self.escrow.contains_key(&request_id) {
            return Err(Error::SlotOccupied { request_id });
        }
        let treasury = self.treasury.address();
        let debited = self.debited(treasury, amount)?;

        info!(
            "[LEDGER] treasury funded request {} with {}",
            request_id, amount
        );
        self.set_balance(treasury, debited);
        self.escrow.insert(
            request_id,
            EscrowSlot {
                holder: initiator,
                depositor: treasury,
                amount,
            },
        );

        Ok(vec![BalanceChange {
            account: treasury,
            balance: debited,
        }])
    }

    /// Pays out the whole slot for `request_id` to `to` and clears it.
    pub fn release_escrow(
        &mut self,
        caller: Address,
        request_id: RequestId,
        to: Address,
    ) -> Result<(Money, Vec<BalanceChange>), Error> {
        let slot = *self
            .escrow
            .get(&request_id)
            .ok_or(Error::NoEscrow { request_id })?;
        if slot.holder != caller {
            return Err(Error::Unauthorized {
                caller,
                account: slot.holder,
            });
        }
        if to.is_zero() {
            return Err(Error::InvalidRecipient { recipient: to });
        }
        let credited = self.credited(to, slot.amount)?;

        info!(
            "[LEDGER] released {} from request {} to {}",
            slot.amount, request_id, to
        );
        self.escrow.remove(&request_id);
        self.set_balance(to, credited);

        Ok((
            slot.amount,
            vec![BalanceChange {
                account: to,
                balance: credited,
            }],
        ))
    }

    fn debited(&self, account: Address, amount: Money) -> Result<Money, Error> {
        let balance = self.balance_of(&account);
        balance
            .checked_sub(amount)
            .ok_or(Error::InsufficientBalance {
                account,
                balance,
                required: amount,
            })
    }

    fn credited(&self, account: Address, amount: Money) -> Result<Money, Error> {
        self.balance_of(&account)
            .checked_add(amount)
            .ok_or(Error::Overflow { account })
    }

    fn set_balance(&mut self, account: Address, balance: Money) {
        if balance.is_zero() {
            self.balances.remove(&account);
        } else {
            self.balances.insert(account, balance);
        }
    }
}
