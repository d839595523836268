//! Fuzz target for the bond lifecycle
//!
//! Tests invariants:
//! - Status always within the seven lifecycle values
//! - BondFinalised is absorbing
//! - Status changes start with empty sign-offs
//! - Rejected instructions leave the bond untouched
//!
//! Run with: cargo test --release -p bond-negotiation-fuzz lifecycle

use crate::*;
use bond_negotiation::state::BondStatus;
use proptest::prelude::*;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    /// Arbitrary action sequences never break a bond invariant
    #[test]
    fn fuzz_negotiation_sequence(input in any::<NegotiationInput>()) {
        let (_, results) = simulate_negotiation(input.max_payload_len, &input.steps);

        for (step, result) in results.iter().enumerate() {
            prop_assert!(!result.is_invariant_violation(),
                "Invariant violation at step {}: {:?}\nInput: {:?}", step, result, input);
        }
    }

    /// Once finalised, every instruction but the secure read fails
    #[test]
    fn fuzz_finalised_is_absorbing(steps in prop::collection::vec(any::<ActionInput>(), 1..24)) {
        let mut ledger = SimulatedLedger::new(512).unwrap();
        let bond_id = bond_at_finalised(&mut ledger).unwrap();
        let before = ledger.bond(bond_id).unwrap().snapshot();

        for step in &steps {
            let result = ledger.execute(bond_id, step);
            if !matches!(step.action, BondAction::ReadSecureDetails) {
                prop_assert!(result.is_err(), "Finalised bond accepted {:?}", step);
            }
        }

        let after = ledger.bond(bond_id).unwrap().snapshot();
        prop_assert_eq!(after.status, BondStatus::BondFinalised);
        prop_assert_eq!(&before, &after);
    }

    /// Out-of-range status codes are rejected without touching the bond
    #[test]
    fn fuzz_invalid_status_code(status in 7u8..=u8::MAX) {
        let mut ledger = SimulatedLedger::new(512).unwrap();
        let bond_id = ledger.create_bond(Actor::Issuer.key()).unwrap();
        let before = ledger.bond(bond_id).unwrap().snapshot();

        let result = ledger.request_status_change(bond_id, Actor::Issuer.key(), status);
        prop_assert!(result.is_err());
        prop_assert_eq!(ledger.bond(bond_id).unwrap().snapshot(), before);
    }

    /// Only the issuer moves the bond between statuses
    #[test]
    fn fuzz_status_change_issuer_only(
        actor in arb_actor(),
        status in 0u8..=6u8,
    ) {
        let mut ledger = SimulatedLedger::new(512).unwrap();
        let bond_id = bond_at_terms_agreement(&mut ledger).unwrap();

        let result = ledger.request_status_change(bond_id, actor.key(), status);
        if actor != Actor::Issuer {
            prop_assert!(result.is_err());
            prop_assert_eq!(
                ledger.bond(bond_id).unwrap().bond.status,
                BondStatus::TermsAgreement
            );
        }
    }
}

/// Terms edits by status, from a bond that has been through every stage
#[test]
fn test_terms_editable_until_agreement() {
    let issuer = Actor::Issuer.key();
    let mut ledger = SimulatedLedger::new(512).unwrap();
    let bond_id = ledger.create_bond(issuer).unwrap();

    for status in BondStatus::ALL {
        if status == BondStatus::BondInDispute || status == BondStatus::BondFinalised {
            continue;
        }
        let bond = &mut ledger.bonds.get_mut(&bond_id).unwrap().bond;
        bond.status = status;
        bond.holder = Some(Actor::Holder.key());

        let result = ledger.update_terms(bond_id, issuer, sample_terms());
        assert_eq!(result.is_ok(), status.allows_term_edits(), "{:?}", status);
    }
}
