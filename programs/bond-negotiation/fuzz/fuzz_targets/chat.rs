//! Fuzz target for add_message and get_secure_details
//!
//! Tests invariants:
//! - Message gating follows caller role, message type and status
//! - Security and appendix payloads never appear in events, and no
//!   confidential payload is kept in the chat log
//! - Every intro is published as a bond motivation
//! - Chat indices are contiguous
//! - Issuer and holder read identical secure details
//!
//! Run with: cargo test --release -p bond-negotiation-fuzz chat

use crate::*;
use bond_negotiation::state::{BondStatus, MessageType};
use proptest::prelude::*;

fn expected_accept(status: BondStatus, actor: Actor, message_type: MessageType) -> bool {
    if status.is_terminal() || status == BondStatus::BondInDispute {
        return false;
    }
    match (actor, message_type) {
        (Actor::Issuer, _) => true,
        (_, MessageType::Intro | MessageType::Security | MessageType::Appendix) => false,
        (Actor::Holder, MessageType::InitChat) => true,
        (Actor::Prospect | Actor::Stranger, MessageType::InitChat) => {
            status == BondStatus::Negotiating
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(1000))]

    /// Gating matrix over status, caller and message type
    #[test]
    fn fuzz_message_gating(
        status in 0u8..=6u8,
        actor in arb_actor(),
        message_type in 0u8..=3u8,
    ) {
        let mut ledger = SimulatedLedger::new(512).unwrap();
        let bond_id = ledger.create_bond(Actor::Issuer.key()).unwrap();
        let status = BondStatus::from_u8(status).unwrap();
        {
            let bond = &mut ledger.bonds.get_mut(&bond_id).unwrap().bond;
            bond.status = status;
            bond.holder = Some(Actor::Holder.key());
        }

        let result = ledger.add_message(bond_id, actor.key(), message_type, "payload");
        let message_type = MessageType::from_u8(message_type).unwrap();
        prop_assert_eq!(result.is_ok(), expected_accept(status, actor, message_type),
            "status {:?} actor {:?} type {:?}", status, actor, message_type);
    }

    /// Confidential payloads stay out of events and the chat log
    #[test]
    fn fuzz_confidential_payloads(input in any::<NegotiationInput>()) {
        let (ledger, _) = simulate_negotiation(input.max_payload_len, &input.steps);
        let entry = ledger.bond(0).unwrap();

        let mut next_index = 0u64;
        for event in &ledger.events {
            match event {
                SimulatedEvent::NewChatMessage { index, message, .. } => {
                    prop_assert_eq!(*index, next_index);
                    prop_assert!(!message.is_empty());
                    next_index += 1;
                }
                SimulatedEvent::SecureDetailRecorded { index, .. } => {
                    prop_assert_eq!(*index, next_index);
                    next_index += 1;
                }
                SimulatedEvent::BondMotivation { index, message, .. } => {
                    prop_assert_eq!(*index + 1, next_index);
                    prop_assert!(!message.is_empty());
                    let recorded = &entry.messages[*index as usize];
                    prop_assert_eq!(recorded.message_type, MessageType::Intro);
                }
                _ => {}
            }
        }
        prop_assert_eq!(next_index, entry.bond.message_count);
        prop_assert_eq!(entry.messages.len() as u64, entry.bond.message_count);

        for message in &entry.messages {
            if message.message_type.is_confidential() {
                prop_assert!(message.payload.is_empty());
            }
        }
    }

    /// Payloads over the registry limit are rejected, measured in bytes
    #[test]
    fn fuzz_payload_limit(limit in 1u16..=64u16, payload in "[aé]{1,80}") {
        let mut ledger = SimulatedLedger::new(limit).unwrap();
        let bond_id = ledger.create_bond(Actor::Issuer.key()).unwrap();

        let result = ledger.add_message(bond_id, Actor::Issuer.key(), 0, &payload);
        prop_assert_eq!(result.is_ok(), payload.len() <= limit as usize);
    }

    /// Latest security and appendix win and both parties read the same bytes
    #[test]
    fn fuzz_secure_details_identical(
        details in prop::collection::vec((2u8..=3u8, "[a-z]{1,32}"), 1..8),
    ) {
        let issuer = Actor::Issuer.key();
        let mut ledger = SimulatedLedger::new(512).unwrap();
        let bond_id = ledger.create_bond(issuer).unwrap();
        ledger
            .request_status_change(bond_id, issuer, BondStatus::HolderSelection.as_u8())
            .unwrap();
        ledger.set_holder(bond_id, issuer, Actor::Holder.key()).unwrap();

        let mut latest_security = String::new();
        let mut latest_appendix = String::new();
        for (message_type, payload) in &details {
            ledger.add_message(bond_id, issuer, *message_type, payload).unwrap();
            if *message_type == MessageType::Security.as_u8() {
                latest_security = payload.clone();
            } else {
                latest_appendix = payload.clone();
            }
        }

        let by_issuer = ledger.get_secure_details(bond_id, issuer).unwrap();
        let by_holder = ledger.get_secure_details(bond_id, Actor::Holder.key()).unwrap();
        prop_assert_eq!(&by_issuer, &by_holder);
        prop_assert_eq!(by_issuer.security, latest_security);
        prop_assert_eq!(by_issuer.appendix, latest_appendix);

        for outsider in [Actor::Prospect, Actor::Stranger] {
            prop_assert!(ledger.get_secure_details(bond_id, outsider.key()).is_err());
        }
    }
}
