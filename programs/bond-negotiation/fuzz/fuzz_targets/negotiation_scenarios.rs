//! Scripted negotiations covering the full issuance flow and a dispute
//! round trip, checked against the emitted events.
//!
//! Run with: cargo test --release -p bond-negotiation-fuzz negotiation_scenarios

use crate::*;
use anchor_lang::error::Error;
use bond_negotiation::errors::BondError;
use bond_negotiation::state::{BondStatus, MessageType};

const CHAT_MSG: &str = "This text is a placeholder of an encrypted message";

fn bond_err(error: BondError) -> Error {
    error.into()
}

fn issuer() -> anchor_lang::prelude::Pubkey {
    Actor::Issuer.key()
}

fn holder() -> anchor_lang::prelude::Pubkey {
    Actor::Holder.key()
}

#[test]
fn test_issuance_to_contract_signed() {
    let mut ledger = SimulatedLedger::new(512).unwrap();
    let bond_id = ledger.create_bond(issuer()).unwrap();
    assert_eq!(bond_id, 0);
    assert_eq!(
        ledger.events[0],
        SimulatedEvent::BondCreated {
            bond_id,
            issuer: issuer()
        }
    );

    let err = ledger.set_holder(bond_id, issuer(), holder()).unwrap_err();
    assert_eq!(err, bond_err(BondError::WrongStage));

    ledger
        .request_status_change(bond_id, issuer(), BondStatus::HolderSelection.as_u8())
        .unwrap();
    ledger.set_holder(bond_id, issuer(), holder()).unwrap();
    ledger.update_terms(bond_id, issuer(), sample_terms()).unwrap();

    let mark = ledger.events.len();
    ledger
        .request_status_change(bond_id, issuer(), BondStatus::TermsAgreement.as_u8())
        .unwrap();
    assert_eq!(
        ledger.events[mark..],
        [
            SimulatedEvent::StatusChanged {
                bond_id,
                previous: BondStatus::HolderSelection,
                status: BondStatus::TermsAgreement,
            },
            SimulatedEvent::FinalBondTerms {
                bond_id,
                terms: sample_terms(),
            },
        ]
    );

    let err = ledger
        .request_status_change(bond_id, issuer(), BondStatus::ContractSigned.as_u8())
        .unwrap_err();
    assert_eq!(err, bond_err(BondError::SignaturesMissing));

    ledger.sign_status(bond_id, issuer()).unwrap();
    ledger.sign_status(bond_id, holder()).unwrap();
    ledger
        .request_status_change(bond_id, issuer(), BondStatus::ContractSigned.as_u8())
        .unwrap();

    let bond = &ledger.bond(bond_id).unwrap().bond;
    assert_eq!(bond.status, BondStatus::ContractSigned);
    assert_eq!(bond.terms, sample_terms());
    assert!(!ledger
        .events
        .iter()
        .any(|event| matches!(event, SimulatedEvent::DisputeResolved { .. })));
}

#[test]
fn test_dispute_round_trip() {
    let mut ledger = SimulatedLedger::new(512).unwrap();
    let bond_id = bond_at_terms_agreement(&mut ledger).unwrap();

    ledger
        .request_status_change(bond_id, issuer(), BondStatus::BondInDispute.as_u8())
        .unwrap();
    assert_eq!(
        ledger.events.last(),
        Some(&SimulatedEvent::BondUnderDispute {
            bond_id,
            holder: holder()
        })
    );

    let err = ledger
        .request_status_change(bond_id, issuer(), BondStatus::ContractSigned.as_u8())
        .unwrap_err();
    assert_eq!(err, bond_err(BondError::DisputePending));

    ledger.sign_status(bond_id, issuer()).unwrap();
    assert_eq!(
        ledger.events.last(),
        Some(&SimulatedEvent::StatusSigned {
            bond_id,
            sender: issuer(),
            status: BondStatus::BondInDispute,
        })
    );

    let err = ledger
        .request_status_change(bond_id, issuer(), BondStatus::TermsAgreement.as_u8())
        .unwrap_err();
    assert_eq!(err, bond_err(BondError::DisputePending));

    ledger.sign_status(bond_id, holder()).unwrap();
    assert_eq!(
        ledger.events.last(),
        Some(&SimulatedEvent::DisputeResolved {
            bond_id,
            sender: holder()
        })
    );

    ledger
        .request_status_change(bond_id, issuer(), BondStatus::TermsAgreement.as_u8())
        .unwrap();
    assert_eq!(
        ledger.bond(bond_id).unwrap().bond.status,
        BondStatus::TermsAgreement
    );
}

#[test]
fn test_dispute_needs_holder() {
    let mut ledger = SimulatedLedger::new(512).unwrap();
    let bond_id = ledger.create_bond(issuer()).unwrap();

    let err = ledger
        .request_status_change(bond_id, issuer(), BondStatus::BondInDispute.as_u8())
        .unwrap_err();
    assert_eq!(err, bond_err(BondError::MissingHolder));
}

#[test]
fn test_open_pool_chat_closes_after_negotiation() {
    let prospect = Actor::Prospect.key();
    let mut ledger = SimulatedLedger::new(512).unwrap();
    let bond_id = ledger.create_bond(issuer()).unwrap();

    ledger
        .add_message(bond_id, prospect, MessageType::InitChat.as_u8(), CHAT_MSG)
        .unwrap();
    assert_eq!(
        ledger.events.last(),
        Some(&SimulatedEvent::NewChatMessage {
            bond_id,
            index: 0,
            message: CHAT_MSG.to_string(),
        })
    );

    ledger
        .request_status_change(bond_id, issuer(), BondStatus::HolderSelection.as_u8())
        .unwrap();
    let err = ledger
        .add_message(bond_id, prospect, MessageType::InitChat.as_u8(), CHAT_MSG)
        .unwrap_err();
    assert_eq!(err, bond_err(BondError::Unauthorized));

    ledger.set_holder(bond_id, issuer(), holder()).unwrap();
    ledger
        .add_message(bond_id, holder(), MessageType::InitChat.as_u8(), CHAT_MSG)
        .unwrap();

    // Back to negotiating, the open pool may talk again
    ledger
        .request_status_change(bond_id, issuer(), BondStatus::Negotiating.as_u8())
        .unwrap();
    ledger
        .add_message(bond_id, prospect, MessageType::InitChat.as_u8(), CHAT_MSG)
        .unwrap();

    let entry = ledger.bond(bond_id).unwrap();
    assert_eq!(entry.bond.message_count, 3);
    let statuses: Vec<BondStatus> = entry
        .messages
        .iter()
        .map(|message| message.recorded_status)
        .collect();
    assert_eq!(
        statuses,
        [
            BondStatus::Negotiating,
            BondStatus::HolderSelection,
            BondStatus::Negotiating
        ]
    );
}

#[test]
fn test_secure_details_shared_by_parties() {
    let mut ledger = SimulatedLedger::new(512).unwrap();
    let bond_id = bond_at_terms_agreement(&mut ledger).unwrap();

    for message_type in [MessageType::Security, MessageType::Appendix] {
        ledger
            .add_message(bond_id, issuer(), message_type.as_u8(), CHAT_MSG)
            .unwrap();
        assert_eq!(
            ledger.events.last(),
            Some(&SimulatedEvent::SecureDetailRecorded {
                bond_id,
                index: ledger.bond(bond_id).unwrap().bond.message_count - 1,
                message_type,
            })
        );
    }

    let err = ledger
        .add_message(bond_id, holder(), MessageType::Security.as_u8(), CHAT_MSG)
        .unwrap_err();
    assert_eq!(err, bond_err(BondError::Unauthorized));

    let by_issuer = ledger.get_secure_details(bond_id, issuer()).unwrap();
    let by_holder = ledger.get_secure_details(bond_id, holder()).unwrap();
    assert_eq!(by_issuer.security, CHAT_MSG);
    assert_eq!(by_issuer.appendix, CHAT_MSG);
    assert_eq!(by_issuer, by_holder);

    let err = ledger
        .get_secure_details(bond_id, Actor::Stranger.key())
        .unwrap_err();
    assert_eq!(err, bond_err(BondError::Unauthorized));
}

#[test]
fn test_intro_published_as_motivation() {
    let mut ledger = SimulatedLedger::new(512).unwrap();
    let bond_id = bond_at_terms_agreement(&mut ledger).unwrap();

    let mark = ledger.events.len();
    ledger
        .add_message(bond_id, issuer(), MessageType::Intro.as_u8(), "MOTIVATION")
        .unwrap();
    assert_eq!(
        ledger.events[mark..],
        [
            SimulatedEvent::SecureDetailRecorded {
                bond_id,
                index: 0,
                message_type: MessageType::Intro,
            },
            SimulatedEvent::BondMotivation {
                bond_id,
                index: 0,
                message: "MOTIVATION".to_string(),
            },
        ]
    );

    let err = ledger
        .add_message(bond_id, holder(), MessageType::Intro.as_u8(), "MOTIVATION")
        .unwrap_err();
    assert_eq!(err, bond_err(BondError::Unauthorized));
    assert_eq!(ledger.events.len(), mark + 2);
}

#[test]
fn test_agreed_terms_revision_rerecorded() {
    let mut ledger = SimulatedLedger::new(512).unwrap();
    let bond_id = bond_at_terms_agreement(&mut ledger).unwrap();
    ledger.sign_status(bond_id, issuer()).unwrap();
    ledger.sign_status(bond_id, holder()).unwrap();

    let mut revised = sample_terms();
    revised.principal = 50_000;
    let mark = ledger.events.len();
    ledger.update_terms(bond_id, issuer(), revised).unwrap();
    assert_eq!(
        ledger.events[mark..],
        [
            SimulatedEvent::TermsUpdated {
                bond_id,
                terms: revised,
            },
            SimulatedEvent::FinalBondTerms {
                bond_id,
                terms: revised,
            },
        ]
    );

    // Resubmitting the agreed terms records nothing new
    let mark = ledger.events.len();
    ledger.update_terms(bond_id, issuer(), revised).unwrap();
    assert_eq!(ledger.events.len(), mark + 1);

    ledger.sign_status(bond_id, issuer()).unwrap();
    ledger.sign_status(bond_id, holder()).unwrap();
    ledger
        .request_status_change(bond_id, issuer(), BondStatus::ContractSigned.as_u8())
        .unwrap();
    let last_final = ledger.events.iter().rev().find_map(|event| match event {
        SimulatedEvent::FinalBondTerms { terms, .. } => Some(*terms),
        _ => None,
    });
    assert_eq!(last_final, Some(ledger.bond(bond_id).unwrap().bond.terms));
}

#[test]
fn test_bonds_are_independent() {
    let mut ledger = SimulatedLedger::new(512).unwrap();
    let first = bond_at_terms_agreement(&mut ledger).unwrap();
    let second = ledger.create_bond(Actor::Prospect.key()).unwrap();
    assert_eq!((first, second), (0, 1));

    ledger
        .request_status_change(first, issuer(), BondStatus::BondInDispute.as_u8())
        .unwrap();
    ledger
        .add_message(second, Actor::Stranger.key(), MessageType::InitChat.as_u8(), CHAT_MSG)
        .unwrap();

    assert_eq!(
        ledger.bond(second).unwrap().bond.status,
        BondStatus::Negotiating
    );
    let err = ledger
        .request_status_change(second, issuer(), BondStatus::HolderSelection.as_u8())
        .unwrap_err();
    assert_eq!(err, bond_err(BondError::Unauthorized));
}

#[test]
fn test_registry_payload_limit_bounds() {
    assert!(SimulatedLedger::new(0).is_err());
    assert!(SimulatedLedger::new(513).is_err());
    assert!(SimulatedLedger::new(1).is_ok());
}
