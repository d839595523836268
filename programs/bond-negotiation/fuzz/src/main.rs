//! Fuzz test runner for the bond negotiation program
//!
//! Run with: cargo run --release
//! Or: cargo test (for property-based tests)

use bond_negotiation::state::BondStatus;
use bond_negotiation_fuzz::*;
use proptest::prelude::*;
use proptest::strategy::ValueTree;
use std::time::Instant;

fn main() {
    println!("=== Bond Negotiation Fuzz Testing ===\n");

    let start = Instant::now();
    let mut total_tests = 0;
    let mut passed = 0;
    let mut failed = 0;

    println!("Running negotiation sequence fuzz tests...");
    let (p, f) = run_negotiation_fuzz(200);
    passed += p;
    failed += f;
    total_tests += p + f;

    println!("Running dispute sign-off fuzz tests...");
    let (p, f) = run_dispute_signoff_fuzz(100);
    passed += p;
    failed += f;
    total_tests += p + f;

    println!("Running scripted negotiations...");
    let (p, f) = run_scripted_negotiations();
    passed += p;
    failed += f;
    total_tests += p + f;

    let duration = start.elapsed();

    println!("\n=== Fuzz Testing Complete ===");
    println!("Total tests: {}", total_tests);
    println!("Passed: {}", passed);
    println!("Failed: {}", failed);
    println!("Duration: {:?}", duration);

    if failed > 0 {
        std::process::exit(1);
    }
}

fn run_negotiation_fuzz(iterations: usize) -> (usize, usize) {
    let mut passed = 0;
    let mut failed = 0;

    let mut runner = proptest::test_runner::TestRunner::default();

    for i in 0..iterations {
        let input = any::<NegotiationInput>()
            .new_tree(&mut runner)
            .expect("Failed to generate NegotiationInput")
            .current();

        let (_, results) = simulate_negotiation(input.max_payload_len, &input.steps);

        match results.iter().find(|result| result.is_invariant_violation()) {
            Some(violation) => {
                println!("  [FAIL] Iteration {}: {:?}", i, violation);
                failed += 1;
            }
            None => passed += 1,
        }
    }

    println!("  negotiation: {} passed, {} failed", passed, failed);
    (passed, failed)
}

fn run_dispute_signoff_fuzz(iterations: usize) -> (usize, usize) {
    let mut passed = 0;
    let mut failed = 0;

    let mut runner = proptest::test_runner::TestRunner::default();
    let issuer = Actor::Issuer.key();

    for i in 0..iterations {
        let signers = prop::collection::vec(arb_actor(), 0..12)
            .new_tree(&mut runner)
            .expect("Failed to generate signers")
            .current();

        let mut ledger = SimulatedLedger::new(512).expect("valid payload limit");
        let bond_id = bond_at_terms_agreement(&mut ledger).expect("scripted negotiation");
        let disputed =
            ledger.request_status_change(bond_id, issuer, BondStatus::BondInDispute.as_u8());

        for signer in &signers {
            let _ = ledger.sign_status(bond_id, signer.key());
        }

        let both_signed = signers.contains(&Actor::Issuer) && signers.contains(&Actor::Holder);
        let resolved = ledger.request_status_change(
            bond_id,
            issuer,
            BondStatus::TermsAgreement.as_u8(),
        );

        if disputed.is_ok() && resolved.is_ok() == both_signed {
            passed += 1;
        } else {
            println!(
                "  [FAIL] Iteration {}: signers {:?} resolved {:?}",
                i, signers, resolved
            );
            failed += 1;
        }
    }

    println!("  dispute_signoff: {} passed, {} failed", passed, failed);
    (passed, failed)
}

fn run_scripted_negotiations() -> (usize, usize) {
    let mut passed = 0;
    let mut failed = 0;

    let mut ledger = match SimulatedLedger::new(512) {
        Ok(ledger) => ledger,
        Err(err) => {
            println!("  [FAIL] registry: {}", err);
            return (0, 1);
        }
    };

    match bond_at_finalised(&mut ledger) {
        Ok(bond_id) => {
            let status = ledger.bond(bond_id).map(|entry| entry.bond.status);
            if status == Some(BondStatus::BondFinalised) {
                passed += 1;
            } else {
                println!("  [FAIL] full lifecycle ended at {:?}", status);
                failed += 1;
            }
        }
        Err(err) => {
            println!("  [FAIL] full lifecycle: {}", err);
            failed += 1;
        }
    }

    match bond_at_terms_agreement(&mut ledger) {
        Ok(bond_id) => {
            let issuer = Actor::Issuer.key();
            let early = ledger.request_status_change(
                bond_id,
                issuer,
                BondStatus::ContractSigned.as_u8(),
            );
            if early.is_err() {
                passed += 1;
            } else {
                println!("  [FAIL] contract signed without sign-offs");
                failed += 1;
            }
        }
        Err(err) => {
            println!("  [FAIL] terms agreement: {}", err);
            failed += 1;
        }
    }

    println!("  scripted: {} passed, {} failed", passed, failed);
    (passed, failed)
}
