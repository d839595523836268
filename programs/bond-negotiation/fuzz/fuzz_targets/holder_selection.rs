//! Fuzz target for set_holder
//!
//! Tests invariants:
//! - The holder is set once, only during HolderSelection
//! - The issuer can never be its own holder
//! - The recorded holder equals the candidate exactly
//!
//! Run with: cargo test --release -p bond-negotiation-fuzz holder_selection

use crate::*;
use anchor_lang::prelude::Pubkey;
use bond_negotiation::state::BondStatus;
use proptest::prelude::*;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    #[test]
    fn fuzz_set_holder(
        status in 0u8..=6u8,
        caller in arb_actor(),
        candidate in arb_id(),
    ) {
        let mut ledger = SimulatedLedger::new(512).unwrap();
        let bond_id = ledger.create_bond(Actor::Issuer.key()).unwrap();
        let status = BondStatus::from_u8(status).unwrap();
        ledger.bonds.get_mut(&bond_id).unwrap().bond.status = status;
        let candidate = Pubkey::new_from_array(candidate);

        let result = ledger.set_holder(bond_id, caller.key(), candidate);
        let bond = &ledger.bond(bond_id).unwrap().bond;

        let expected_ok = caller == Actor::Issuer
            && status == BondStatus::HolderSelection
            && candidate != Actor::Issuer.key()
            && candidate != Pubkey::default();
        prop_assert_eq!(result.is_ok(), expected_ok);
        if expected_ok {
            prop_assert_eq!(bond.holder, Some(candidate));
        } else {
            prop_assert_eq!(bond.holder, None);
        }
    }

    /// The issuer key is always rejected as holder
    #[test]
    fn fuzz_self_dealing(assigned in any::<bool>()) {
        let issuer = Actor::Issuer.key();
        let mut ledger = SimulatedLedger::new(512).unwrap();
        let bond_id = ledger.create_bond(issuer).unwrap();
        ledger
            .request_status_change(bond_id, issuer, BondStatus::HolderSelection.as_u8())
            .unwrap();
        if assigned {
            ledger.set_holder(bond_id, issuer, Actor::Holder.key()).unwrap();
        }

        prop_assert!(ledger.set_holder(bond_id, issuer, issuer).is_err());
        let expected = assigned.then(|| Actor::Holder.key());
        prop_assert_eq!(ledger.bond(bond_id).unwrap().bond.holder, expected);
    }

    /// Once chosen, the holder survives later selection rounds
    #[test]
    fn fuzz_holder_fixed_after_assignment(
        candidates in prop::collection::vec(arb_actor(), 1..6),
        reopen in any::<bool>(),
    ) {
        let issuer = Actor::Issuer.key();
        let mut ledger = SimulatedLedger::new(512).unwrap();
        let bond_id = ledger.create_bond(issuer).unwrap();
        ledger
            .request_status_change(bond_id, issuer, BondStatus::HolderSelection.as_u8())
            .unwrap();
        ledger.set_holder(bond_id, issuer, Actor::Holder.key()).unwrap();

        if reopen {
            ledger
                .request_status_change(bond_id, issuer, BondStatus::Negotiating.as_u8())
                .unwrap();
            ledger
                .request_status_change(bond_id, issuer, BondStatus::HolderSelection.as_u8())
                .unwrap();
        }

        for candidate in &candidates {
            let err = ledger
                .set_holder(bond_id, issuer, candidate.key())
                .unwrap_err();
            let wrong_stage: anchor_lang::error::Error =
                bond_negotiation::errors::BondError::WrongStage.into();
            prop_assert_eq!(&err, &wrong_stage);
        }
        prop_assert_eq!(
            ledger.bond(bond_id).unwrap().bond.holder,
            Some(Actor::Holder.key())
        );
    }
}
