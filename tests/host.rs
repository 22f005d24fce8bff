use community_escrow::{
    Call, Error, Event, Genesis, Host, MembershipError, Money, RequestError, SignedCall,
    SigningAccount,
};

struct Fixture {
    host: Host,
    owner: SigningAccount,
    alice: SigningAccount,
    bob: SigningAccount,
}

fn bootstrap() -> Fixture {
    let owner = SigningAccount::random();
    let alice = SigningAccount::random();
    let bob = SigningAccount::random();
    let mut host = Host::new(Genesis::new(owner.address())).unwrap();

    for member in [&alice, &bob].iter() {
        host.execute(
            &owner,
            Call::AddMember {
                member: member.address(),
            },
        )
        .unwrap();
    }

    Fixture {
        host,
        owner,
        alice,
        bob,
    }
}

#[test]
fn test_signed_calls_drive_a_request_to_completion() {
    let Fixture {
        mut host,
        owner,
        alice,
        ..
    } = bootstrap();
    let coordinator = host.community().address();

    let receipt = host
        .execute(
            &alice,
            Call::RequestTransfer {
                to: owner.address(),
                amount: Money::ONE,
            },
        )
        .unwrap();
    let request_id = receipt.request_id.unwrap();
    assert_eq!(
        receipt.events,
        vec![Event::TransferRequested {
            id: request_id,
            from: alice.address(),
            to: owner.address(),
            amount: Money::ONE,
        }]
    );

    host.execute(
        &owner,
        Call::DepositForRequest {
            holder: coordinator,
            amount: Money::ONE,
            request_id,
        },
    )
    .unwrap();
    host.execute(&owner, Call::ApproveTransfer { request_id })
        .unwrap();
    let receipt = host
        .execute(&alice, Call::CompleteTransfer { request_id })
        .unwrap();

    assert_eq!(
        receipt.events.last(),
        Some(&Event::TransferCompleted(request_id))
    );
    assert_eq!(host.community().balance_of(&alice.address()), Money::ONE);
    assert_eq!(host.accepted.len(), 6);
    assert_eq!(host.count_rejected_calls(), 0);
}

#[test]
fn test_tampered_call_is_rejected() {
    let Fixture {
        mut host,
        owner,
        alice,
        bob,
    } = bootstrap();

    let mut signed = SignedCall::new(
        &alice,
        host.next_nonce(&alice.address()),
        Call::RequestTransfer {
            to: owner.address(),
            amount: Money::ONE,
        },
    )
    .unwrap();
    // claim the call came from bob
    signed.caller = bob.address();

    assert!(matches!(host.submit(signed), Err(Error::Signature(_))));
    assert!(host.community().requests().is_empty());
    assert_eq!(host.rejected_calls.get(&bob.address()), Some(&1));
}

#[test]
fn test_replayed_call_is_rejected() {
    let Fixture {
        mut host,
        owner,
        alice,
        ..
    } = bootstrap();

    let signed = SignedCall::new(
        &alice,
        0,
        Call::RequestTransfer {
            to: owner.address(),
            amount: Money::ONE,
        },
    )
    .unwrap();
    host.submit(signed.clone()).unwrap();

    assert!(matches!(
        host.submit(signed),
        Err(Error::BadNonce {
            nonce: 0,
            expected: 1,
            ..
        })
    ));
    assert_eq!(host.community().requests().len(), 1);
    assert_eq!(host.next_nonce(&alice.address()), 1);
}

#[test]
fn test_rejected_call_does_not_consume_nonce() {
    let Fixture {
        mut host,
        owner,
        alice,
        bob,
    } = bootstrap();

    let res = host.execute(
        &alice,
        Call::AddMember {
            member: bob.address(),
        },
    );

    assert!(matches!(
        res,
        Err(Error::Membership(MembershipError::Unauthorized { .. }))
    ));
    assert_eq!(host.next_nonce(&alice.address()), 0);

    host.execute(
        &alice,
        Call::RequestTransfer {
            to: owner.address(),
            amount: Money::ONE,
        },
    )
    .unwrap();
    assert_eq!(host.next_nonce(&alice.address()), 1);
}

#[test]
fn test_treasury_request_needs_admin_signature() {
    let Fixture {
        mut host,
        owner,
        alice,
        bob,
    } = bootstrap();
    let treasury = host.community().treasury();

    host.execute(
        &owner,
        Call::Transfer {
            to: treasury,
            amount: Money::from_units(100),
        },
    )
    .unwrap();
    let request_id = host
        .execute(
            &alice,
            Call::RequestTransfer {
                to: treasury,
                amount: Money::from_units(3),
            },
        )
        .unwrap()
        .request_id
        .unwrap();

    assert!(matches!(
        host.execute(&bob, Call::ApproveTransfer { request_id }),
        Err(Error::Request(RequestError::AdminOnly { .. }))
    ));

    let receipt = host
        .execute(&owner, Call::ApproveTransfer { request_id })
        .unwrap();
    assert!(receipt.events.contains(&Event::BalanceChanged {
        account: treasury,
        balance: Money::from_units(97),
    }));

    host.execute(&alice, Call::CompleteTransfer { request_id })
        .unwrap();
    assert_eq!(
        host.community().balance_of(&alice.address()),
        Money::from_units(3)
    );
    assert_eq!(host.count_rejected_calls(), 1);
    assert_eq!(host.n_calls, 7);
}
