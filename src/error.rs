use community_ledger::{Money, RequestId};
use community_membership::Address;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("error while processing membership change")]
    Membership(#[from] community_membership::Error),
    #[error("the ledger rejected the operation")]
    Ledger(#[from] community_ledger::Error),
    #[error("transfer request failed validation")]
    Request(#[from] RequestError),
    #[error("Failed to serialize all or part of a call")]
    Encoding(#[from] bincode::Error),
    #[error("Failure when working with signature")]
    Signature(#[from] ed25519::SignatureError),
    #[error("Call from {caller} carries nonce {nonce} (expected: {expected})")]
    BadNonce {
        caller: Address,
        nonce: u64,
        expected: u64,
    },
    #[error("Genesis account {account} is zero or collides with another genesis account")]
    InvalidGenesis { account: Address },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RequestError {
    #[error("Only members can request transfers ({caller} is not a member)")]
    NotAMember { caller: Address },
    #[error("Transfers can only be requested from members ({to} is not a member)")]
    RecipientNotMember { to: Address },
    #[error("Requested and deposited amounts must be positive")]
    ZeroAmount,
    #[error("Request {id} does not exist ({count} requests so far)")]
    InvalidRequestId { id: RequestId, count: u64 },
    #[error("Request {id} is already approved")]
    AlreadyApproved { id: RequestId },
    #[error("Request {id} has no escrow deposit")]
    EscrowMissing { id: RequestId },
    #[error("Request {id} has {escrowed} in escrow but {required} was requested")]
    EscrowInsufficient {
        id: RequestId,
        escrowed: Money,
        required: Money,
    },
    #[error("Request {id} draws on the treasury and only the admin can approve it, not {caller}")]
    AdminOnly { id: RequestId, caller: Address },
    #[error("Request {id} can only be approved by its payer {payer}, not {caller}")]
    PayerOnly {
        id: RequestId,
        caller: Address,
        payer: Address,
    },
    #[error("Request {id} has not been approved")]
    NotApproved { id: RequestId },
    #[error("Request {id} is already completed")]
    AlreadyCompleted { id: RequestId },
    #[error("Request {id} can only be completed by its requester {requester}, not {caller}")]
    RequesterOnly {
        id: RequestId,
        caller: Address,
        requester: Address,
    },
    #[error("Request {id} already has its escrow")]
    AlreadyFunded { id: RequestId },
    #[error("Request {id} draws on the treasury and is funded on approval")]
    ImplicitlyFunded { id: RequestId },
}
