use community_escrow::{Address, Community, Genesis, Money};
use quickcheck::{quickcheck, Arbitrary, Gen, TestResult};

const OWNER: Address = Address([1; 32]);

#[derive(Debug, Clone)]
enum Instruction {
    AddMember(u8),
    RemoveMember(u8),
    Transfer { from: u8, to: u8, units: u8 },
    Request { from: u8, to: u8, units: u8 },
    Deposit { caller: u8, units: u8, request: u8 },
    Approve { caller: u8, request: u8 },
    Complete { caller: u8, request: u8 },
}

impl Arbitrary for Instruction {
    fn arbitrary<G: Gen>(g: &mut G) -> Self {
        let a = u8::arbitrary(g);
        let b = u8::arbitrary(g);
        let units = u8::arbitrary(g) % 6;
        match u8::arbitrary(g) % 7 {
            0 => Instruction::AddMember(a),
            1 => Instruction::RemoveMember(a),
            2 => Instruction::Transfer { from: a, to: b, units },
            3 => Instruction::Request { from: a, to: b, units },
            4 => Instruction::Deposit {
                caller: a,
                units,
                request: b % 8,
            },
            5 => Instruction::Approve {
                caller: a,
                request: b % 8,
            },
            _ => Instruction::Complete {
                caller: a,
                request: b % 8,
            },
        }
    }
}

fn account(n: u8) -> Address {
    match n % 5 {
        0 => OWNER,
        1 => Genesis::new(OWNER).treasury,
        other => Address([other + 10; 32]),
    }
}

fn apply(community: &mut Community, instr: Instruction) -> bool {
    let holder = community.address();
    let res = match instr {
        Instruction::AddMember(n) => {
            let member = account(n);
            community.add_member(OWNER, member)
        }
        Instruction::RemoveMember(n) => {
            let member = account(n);
            community.remove_member(OWNER, member)
        }
        Instruction::Transfer { from, to, units } => {
            let (from, to) = (account(from), account(to));
            community.transfer(from, to, Money::from_units(units as u64))
        }
        Instruction::Request { from, to, units } => {
            let (from, to) = (account(from), account(to));
            community
                .request_transfer(from, to, Money::from_units(units as u64))
                .map(|_| ())
        }
        Instruction::Deposit {
            caller,
            units,
            request,
        } => {
            let caller = account(caller);
            let amount = Money::from_units(units as u64);
            community.deposit_for_request(caller, holder, amount, request as u64)
        }
        Instruction::Approve { caller, request } => {
            let caller = account(caller);
            community.approve_transfer(caller, request as u64)
        }
        Instruction::Complete { caller, request } => {
            let caller = account(caller);
            community.complete_transfer(caller, request as u64)
        }
    };
    res.is_ok()
}

quickcheck! {
    fn prop_interpreter(instructions: Vec<Instruction>) -> TestResult {
        if instructions.len() > 60 {
            return TestResult::discard();
        }

        let genesis = Genesis::new(OWNER).with_supply(Money::from_units(50));
        let mut community = Community::new(genesis).unwrap();

        for instr in instructions {
            let before = community.clone();
            let applied = apply(&mut community, instr);

            if !applied {
                // failures are all-or-nothing
                assert_eq!(community, before);
            }

            let ledger = community.ledger();
            let held = ledger
                .total_balances()
                .and_then(|b| b.checked_add(ledger.total_escrowed()?));
            assert_eq!(held, Some(ledger.total_supply()));

            assert_eq!(community.members()[0], OWNER);
            assert_eq!(community.members()[1], community.treasury());
            assert!(community.requests().len() >= before.requests().len());

            for (old, new) in before.requests().iter().zip(community.requests()) {
                assert_eq!((old.from(), old.to(), old.amount()), (new.from(), new.to(), new.amount()));
                assert!(new.approved() || !old.approved());
                assert!(new.completed() || !old.completed());
            }

            for request in community.requests() {
                assert!(!request.completed() || request.approved());

                let escrow = community.escrow_of(request.id());
                if request.completed() {
                    assert_eq!(escrow, None);
                } else if request.approved() {
                    assert!(escrow.map(|slot| slot.amount == request.amount()).unwrap_or(false));
                }
            }
        }

        TestResult::passed()
    }
}
