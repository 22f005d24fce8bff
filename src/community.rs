// Copyright 2021 MaidSafe.net limited.
//
// This SAFE Network Software is licensed to you under the MIT license <LICENSE-MIT
// http://opensource.org/licenses/MIT> or the Modified BSD license <LICENSE-BSD
// https://opensource.org/licenses/BSD-3-Clause>, at your option. This file may not be copied,
// modified, or distributed except according to those terms. Please review the Licences for the
// specific language governing permissions and limitations relating to use of the SAFE Network
// Software.

//! The community coordinator.
//!
//! A member asks another member for funds with a transfer request. The payer
//! locks the exact amount in escrow, approves the request, and the requester
//! then collects the escrow. Requests addressed to the treasury skip the
//! deposit: the admin approves them and the coordinator pulls the funds out of
//! the treasury itself.
//!
//! ```text
//! Created --(deposit, or treasury debit on approval)--> Funded
//! Funded  --(approve_transfer by payer / admin)-------> Approved
//! Approved --(complete_transfer by requester)---------> Completed
//! ```
//!
//! Every operation takes the caller explicitly and either commits in full or
//! returns an error having changed nothing.

use community_ledger::{BalanceChange, EscrowSlot, Ledger, Money, RequestId, Treasury};
use community_membership::{Address, Registry};
use log::info;

use crate::event::Event;
use crate::genesis::Genesis;
use crate::request::{RequestStatus, TransferRequest};
use crate::{Error, RequestError};

/// Membership registry, token ledger and request history of one community.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Community {
    /// The coordinator's own account. Holds every escrow slot.
    address: Address,

    registry: Registry,

    ledger: Ledger,

    /// Indexed by request id; never reordered or truncated.
    requests: Vec<TransferRequest>,

    /// Events for committed changes that the collaborator has not drained yet.
    outbox: Vec<Event>,
}

impl Community {
    pub fn new(genesis: Genesis) -> Result<Self, Error> {
        genesis.validate()?;
        let registry = Registry::new(genesis.admin, genesis.treasury)?;
        let treasury = Treasury::new(genesis.treasury, genesis.coordinator);
        let ledger = Ledger::new(genesis.admin, genesis.initial_supply, treasury);

        info!(
            "[COMMUNITY] {} created by {} with {} minted",
            genesis.coordinator, genesis.admin, genesis.initial_supply
        );
        Ok(Self {
            address: genesis.coordinator,
            registry,
            ledger,
            requests: Vec::new(),
            outbox: Vec::new(),
        })
    }

    pub fn address(&self) -> Address {
        self.address
    }

    pub fn admin(&self) -> Address {
        self.registry.admin()
    }

    pub fn treasury(&self) -> Address {
        self.registry.treasury()
    }

    /// Members in join order: admin, treasury, then everyone else.
    pub fn members(&self) -> &[Address] {
        self.registry.members()
    }

    pub fn is_member(&self, account: &Address) -> bool {
        self.registry.contains(account)
    }

    /// Every request ever made, in creation order.
    pub fn requests(&self) -> &[TransferRequest] {
        &self.requests
    }

    pub fn request(&self, id: RequestId) -> Result<&TransferRequest, RequestError> {
        self.requests
            .get(id as usize)
            .ok_or(RequestError::InvalidRequestId {
                id,
                count: self.requests.len() as u64,
            })
    }

    pub fn status(&self, id: RequestId) -> Result<RequestStatus, RequestError> {
        let request = self.request(id)?;
        Ok(if request.completed {
            RequestStatus::Completed
        } else if request.approved {
            RequestStatus::Approved
        } else if self.ledger.escrow_of(id).is_some() {
            RequestStatus::Funded
        } else {
            RequestStatus::Created
        })
    }

    /// Unapproved requests `account` is allowed to approve: those it owes, and
    /// for the admin also those drawing on the treasury.
    pub fn pending_approvals(
        &self,
        account: &Address,
    ) -> impl Iterator<Item = &TransferRequest> + '_ {
        let account = *account;
        let is_admin = self.registry.is_admin(&account);
        self.requests.iter().filter(move |request| {
            !request.approved
                && if self.registry.is_treasury(&request.to) {
                    is_admin
                } else {
                    request.to == account
                }
        })
    }

    pub fn balance_of(&self, account: &Address) -> Money {
        self.ledger.balance_of(account)
    }

    pub fn escrow_of(&self, id: RequestId) -> Option<&EscrowSlot> {
        self.ledger.escrow_of(id)
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    /// Hands over the events raised since the last drain, oldest first.
    pub fn drain_events(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.outbox)
    }

    pub fn add_member(&mut self, caller: Address, member: Address) -> Result<(), Error> {
        self.registry.add(caller, member)?;
        self.outbox.push(Event::MemberAdded(member));
        Ok(())
    }

    pub fn remove_member(&mut self, caller: Address, member: Address) -> Result<(), Error> {
        self.registry.remove(caller, member)?;
        self.outbox.push(Event::MemberRemoved(member));
        Ok(())
    }

    /// Plain ledger transfer from the caller's own balance.
    pub fn transfer(&mut self, caller: Address, to: Address, amount: Money) -> Result<(), Error> {
        let changes = self.ledger.transfer(caller, to, amount)?;
        self.emit_balance_changes(changes);
        Ok(())
    }

    /// Records a request by `caller` for `amount` from `to`.
    ///
    /// The payer's balance is only checked here, not reserved.
    pub fn request_transfer(
        &mut self,
        caller: Address,
        to: Address,
        amount: Money,
    ) -> Result<RequestId, Error> {
        self.validate_request(caller, to, amount)?;

        let id = self.requests.len() as RequestId;
        info!(
            "[COMMUNITY] {} requests {} from {} (request {})",
            caller, amount, to, id
        );
        self.requests.push(TransferRequest::new(id, caller, to, amount));
        self.outbox.push(Event::TransferRequested {
            id,
            from: caller,
            to,
            amount,
        });
        Ok(id)
    }

    /// Locks `amount` of the caller's funds as the escrow for request `id`.
    ///
    /// `holder` must name this coordinator, otherwise the slot could never be
    /// released on completion.
    pub fn deposit_for_request(
        &mut self,
        caller: Address,
        holder: Address,
        amount: Money,
        id: RequestId,
    ) -> Result<(), Error> {
        let required = self.validate_deposit(holder, id)?;

        let changes = self
            .ledger
            .deposit_for_request(caller, holder, amount, id, required)?;

        self.outbox.push(Event::EscrowDeposited {
            id,
            depositor: caller,
            amount,
        });
        self.emit_balance_changes(changes);
        Ok(())
    }

    /// Approves request `id`, locking its escrow.
    ///
    /// Requests addressed to the treasury are approved by the admin and funded
    /// from the treasury right here; all others are approved by their payer
    /// once the deposit is in place.
    pub fn approve_transfer(&mut self, caller: Address, id: RequestId) -> Result<(), Error> {
        let request = self.validate_approval(caller, id)?;

        if self.registry.is_treasury(&request.to) {
            let changes = self
                .ledger
                .fund_from_treasury(self.address, request.amount, id)?;
            self.outbox.push(Event::EscrowDeposited {
                id,
                depositor: request.to,
                amount: request.amount,
            });
            self.emit_balance_changes(changes);
        }

        info!("[COMMUNITY] {} approved request {}", caller, id);
        self.requests[id as usize].approved = true;
        self.outbox.push(Event::TransferApproved(id));
        Ok(())
    }

    /// Pays the escrow of request `id` out to its requester.
    pub fn complete_transfer(&mut self, caller: Address, id: RequestId) -> Result<(), Error> {
        let request = self.validate_completion(caller, id)?;

        let (released, changes) = self.ledger.release_escrow(self.address, id, request.from)?;

        info!(
            "[COMMUNITY] request {} completed, {} paid to {}",
            id, released, request.from
        );
        self.requests[id as usize].completed = true;
        self.emit_balance_changes(changes);
        self.outbox.push(Event::TransferCompleted(id));
        Ok(())
    }

    fn validate_request(&self, caller: Address, to: Address, amount: Money) -> Result<(), Error> {
        if !self.registry.contains(&caller) {
            Err(RequestError::NotAMember { caller }.into())
        } else if !self.registry.contains(&to) {
            Err(RequestError::RecipientNotMember { to }.into())
        } else if amount.is_zero() {
            Err(RequestError::ZeroAmount.into())
        } else {
            self.ledger.ensure_spendable(to, amount).map_err(Error::Ledger)
        }
    }

    /// Returns the amount the deposit has to match.
    fn validate_deposit(&self, holder: Address, id: RequestId) -> Result<Money, Error> {
        let request = self.request(id)?;
        if self.registry.is_treasury(&request.to) {
            Err(RequestError::ImplicitlyFunded { id }.into())
        } else if request.approved || self.ledger.escrow_of(id).is_some() {
            Err(RequestError::AlreadyFunded { id }.into())
        } else if holder != self.address {
            Err(community_ledger::Error::InvalidRecipient { recipient: holder }.into())
        } else {
            Ok(request.amount)
        }
    }

    fn validate_approval(&self, caller: Address, id: RequestId) -> Result<TransferRequest, Error> {
        let request = self.request(id)?;
        if request.approved {
            return Err(RequestError::AlreadyApproved { id }.into());
        }

        if self.registry.is_treasury(&request.to) {
            if !self.registry.is_admin(&caller) {
                return Err(RequestError::AdminOnly { id, caller }.into());
            }
            // fund_from_treasury below must not fail once approval starts
            self.ledger.ensure_spendable(request.to, request.amount)?;
        } else {
            if caller != request.to {
                return Err(RequestError::PayerOnly {
                    id,
                    caller,
                    payer: request.to,
                }
                .into());
            }
            let escrowed = match self.ledger.escrow_of(id) {
                Some(slot) => slot.amount,
                None => return Err(RequestError::EscrowMissing { id }.into()),
            };
            if escrowed != request.amount {
                return Err(RequestError::EscrowInsufficient {
                    id,
                    escrowed,
                    required: request.amount,
                }
                .into());
            }
        }

        Ok(request.clone())
    }

    fn validate_completion(&self, caller: Address, id: RequestId) -> Result<TransferRequest, Error> {
        let request = self.request(id)?;
        if !request.approved {
            Err(RequestError::NotApproved { id }.into())
        } else if request.completed {
            Err(RequestError::AlreadyCompleted { id }.into())
        } else if caller != request.from {
            Err(RequestError::RequesterOnly {
                id,
                caller,
                requester: request.from,
            }
            .into())
        } else {
            Ok(request.clone())
        }
    }

    fn emit_balance_changes(&mut self, changes: Vec<BalanceChange>) {
        self.outbox.extend(changes.into_iter().map(Event::from));
    }
}
