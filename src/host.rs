// Copyright 2021 MaidSafe.net limited.
//
// This SAFE Network Software is licensed to you under the MIT license <LICENSE-MIT
// http://opensource.org/licenses/MIT> or the Modified BSD license <LICENSE-BSD
// https://opensource.org/licenses/BSD-3-Clause>, at your option. This file may not be copied,
// modified, or distributed except according to those terms. Please review the Licences for the
// specific language governing permissions and limitations relating to use of the SAFE Network
// Software.

//! An in-memory execution host for a single `Community`.
//!
//! The host is what authenticates callers: every call arrives signed by the
//! member's ed25519 key together with a per-caller nonce, and is applied one at
//! a time in submission order. The community itself trusts whatever caller the
//! host hands it.

use std::collections::{BTreeMap, HashMap};

use community_ledger::{Money, RequestId};
use community_membership::{Address, Sig, SigningAccount};
use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::community::Community;
use crate::event::Event;
use crate::genesis::Genesis;
use crate::Error;

/// The write operations a member can submit.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Call {
    AddMember {
        member: Address,
    },
    RemoveMember {
        member: Address,
    },
    Transfer {
        to: Address,
        amount: Money,
    },
    RequestTransfer {
        to: Address,
        amount: Money,
    },
    DepositForRequest {
        holder: Address,
        amount: Money,
        request_id: RequestId,
    },
    ApproveTransfer {
        request_id: RequestId,
    },
    CompleteTransfer {
        request_id: RequestId,
    },
}

/// A call together with the caller's signature over `(caller, nonce, call)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignedCall {
    pub caller: Address,
    pub nonce: u64,
    pub call: Call,
    pub sig: Sig,
}

impl SignedCall {
    pub fn new(account: &SigningAccount, nonce: u64, call: Call) -> Result<Self, Error> {
        let caller = account.address();
        let bytes = bincode::serialize(&(caller, nonce, &call))?;
        let sig = account.sign(&bytes);
        Ok(Self {
            caller,
            nonce,
            call,
            sig,
        })
    }

    pub fn verify(&self) -> Result<(), Error> {
        let bytes = bincode::serialize(&(self.caller, self.nonce, &self.call))?;
        self.caller.verify(&bytes, &self.sig)?;
        Ok(())
    }
}

/// What an accepted call did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Receipt {
    /// Set when the call created a transfer request.
    pub request_id: Option<RequestId>,
    pub events: Vec<Event>,
}

#[derive(Debug)]
pub struct Host {
    community: Community,
    /// Next nonce expected from each caller.
    nonces: BTreeMap<Address, u64>,
    /// Calls that were applied, in order.
    pub accepted: Vec<SignedCall>,
    /// total number of calls submitted during the host's lifetime
    pub n_calls: u64,
    /// count of rejected calls, by caller.
    pub rejected_calls: HashMap<Address, u64>,
}

impl Host {
    pub fn new(genesis: Genesis) -> Result<Self, Error> {
        Ok(Self {
            community: Community::new(genesis)?,
            nonces: Default::default(),
            accepted: Default::default(),
            n_calls: 0,
            rejected_calls: Default::default(),
        })
    }

    pub fn community(&self) -> &Community {
        &self.community
    }

    pub fn next_nonce(&self, caller: &Address) -> u64 {
        self.nonces.get(caller).copied().unwrap_or_default()
    }

    /// Signs `call` for `account` with its next nonce and submits it.
    pub fn execute(&mut self, account: &SigningAccount, call: Call) -> Result<Receipt, Error> {
        let signed = SignedCall::new(account, self.next_nonce(&account.address()), call)?;
        self.submit(signed)
    }

    /// Authenticates and applies one call. A rejected call changes nothing,
    /// its nonce included.
    pub fn submit(&mut self, signed: SignedCall) -> Result<Receipt, Error> {
        info!("[HOST] call from {}: {:?}", signed.caller, signed.call);
        self.n_calls += 1;
        let caller = signed.caller;

        match self.process(&signed) {
            Ok(receipt) => {
                *self.nonces.entry(caller).or_default() += 1;
                self.accepted.push(signed);
                Ok(receipt)
            }
            Err(err) => {
                warn!("[HOST] Rejected call: {:?}", err);
                *self.rejected_calls.entry(caller).or_default() += 1;
                Err(err)
            }
        }
    }

    /// counts number of rejected calls from any caller
    pub fn count_rejected_calls(&self) -> u64 {
        self.rejected_calls.values().sum()
    }

    fn process(&mut self, signed: &SignedCall) -> Result<Receipt, Error> {
        signed.verify()?;

        let expected = self.next_nonce(&signed.caller);
        if signed.nonce != expected {
            return Err(Error::BadNonce {
                caller: signed.caller,
                nonce: signed.nonce,
                expected,
            });
        }

        let request_id = self.dispatch(signed.caller, signed.call.clone())?;
        Ok(Receipt {
            request_id,
            events: self.community.drain_events(),
        })
    }

    fn dispatch(&mut self, caller: Address, call: Call) -> Result<Option<RequestId>, Error> {
        let community = &mut self.community;
        match call {
            Call::AddMember { member } => community.add_member(caller, member)?,
            Call::RemoveMember { member } => community.remove_member(caller, member)?,
            Call::Transfer { to, amount } => community.transfer(caller, to, amount)?,
            Call::RequestTransfer { to, amount } => {
                return community.request_transfer(caller, to, amount).map(Some)
            }
            Call::DepositForRequest {
                holder,
                amount,
                request_id,
            } => community.deposit_for_request(caller, holder, amount, request_id)?,
            Call::ApproveTransfer { request_id } => {
                community.approve_transfer(caller, request_id)?
            }
            Call::CompleteTransfer { request_id } => {
                community.complete_transfer(caller, request_id)?
            }
        }
        Ok(None)
    }
}
