//! Fuzz testing scenarios that simulate instruction execution
//!
//! The ledger below drives the program's own lifecycle, sign-off and chat
//! helpers against in-memory accounts, emitting the same events the
//! instruction handlers do. No Solana runtime is needed.

use crate::arbitrary::{ActionInput, Actor, BondAction};
use crate::invariants::*;
use anchor_lang::error::{Error, ErrorCode};
use anchor_lang::prelude::*;
use bond_negotiation::errors::BondError;
use bond_negotiation::instructions::chat_helpers::{apply_message, read_secure_details};
use bond_negotiation::instructions::lifecycle_helpers::{
    apply_holder_assignment, apply_status_change, apply_terms_update,
};
use bond_negotiation::instructions::signoff_helpers::apply_signoff;
use bond_negotiation::state::{
    Bond, BondRegistry, BondSecureDetails, BondStatus, BondTerms, MessageType, SecureDetails,
};
use bond_negotiation::utils::validation::validate_payload_limit;
use std::collections::BTreeMap;

/// Events recorded by the simulated ledger
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SimulatedEvent {
    BondCreated { bond_id: u64, issuer: Pubkey },
    TermsUpdated { bond_id: u64, terms: BondTerms },
    StatusChanged { bond_id: u64, previous: BondStatus, status: BondStatus },
    FinalBondTerms { bond_id: u64, terms: BondTerms },
    BondUnderDispute { bond_id: u64, holder: Pubkey },
    HolderAssigned { bond_id: u64, holder: Pubkey },
    StatusSigned { bond_id: u64, sender: Pubkey, status: BondStatus },
    DisputeResolved { bond_id: u64, sender: Pubkey },
    NewChatMessage { bond_id: u64, index: u64, message: String },
    SecureDetailRecorded { bond_id: u64, index: u64, message_type: MessageType },
    BondMotivation { bond_id: u64, index: u64, message: String },
}

/// Chat log entry as stored in a message account
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimulatedMessage {
    pub author: Pubkey,
    pub message_type: MessageType,
    /// Empty for confidential types
    pub payload: String,
    pub recorded_status: BondStatus,
}

/// Accounts owned by one bond
#[derive(Default)]
pub struct SimulatedBond {
    pub bond: Bond,
    pub details: BondSecureDetails,
    pub messages: Vec<SimulatedMessage>,
}

impl SimulatedBond {
    pub fn snapshot(&self) -> BondSnapshot {
        BondSnapshot::capture(&self.bond, &self.details)
    }
}

/// In-memory stand-in for the registry and every bond it created
pub struct SimulatedLedger {
    pub registry: BondRegistry,
    pub bonds: BTreeMap<u64, SimulatedBond>,
    pub events: Vec<SimulatedEvent>,
    pub clock: i64,
}

/// Result of a simulated instruction execution
#[derive(Debug, Clone)]
pub enum SimulationResult {
    Success,
    Error(String),
    InvariantViolation(String),
}

impl SimulationResult {
    pub fn is_success(&self) -> bool {
        matches!(self, SimulationResult::Success)
    }

    pub fn is_error(&self) -> bool {
        matches!(self, SimulationResult::Error(_))
    }

    pub fn is_invariant_violation(&self) -> bool {
        matches!(self, SimulationResult::InvariantViolation(_))
    }
}

fn missing_bond() -> Error {
    ErrorCode::AccountNotInitialized.into()
}

impl SimulatedLedger {
    pub fn new(max_payload_len: u16) -> Result<Self> {
        validate_payload_limit(max_payload_len)?;
        Ok(Self {
            registry: BondRegistry {
                max_payload_len,
                ..BondRegistry::default()
            },
            bonds: BTreeMap::new(),
            events: Vec::new(),
            clock: 1_700_000_000,
        })
    }

    fn tick(&mut self) -> i64 {
        self.clock += 1;
        self.clock
    }

    fn bond_mut(&mut self, bond_id: u64) -> Result<&mut SimulatedBond> {
        self.bonds.get_mut(&bond_id).ok_or_else(missing_bond)
    }

    pub fn bond(&self, bond_id: u64) -> Option<&SimulatedBond> {
        self.bonds.get(&bond_id)
    }

    pub fn create_bond(&mut self, issuer: Pubkey) -> Result<u64> {
        let now = self.tick();
        let bond_id = self.registry.total_bonds;
        self.registry.total_bonds = bond_id
            .checked_add(1)
            .ok_or(BondError::ArithmeticOverflow)?;

        let bond = Bond {
            bond_id,
            issuer,
            created_at: now,
            updated_at: now,
            ..Bond::default()
        };
        self.bonds.insert(
            bond_id,
            SimulatedBond {
                bond,
                ..SimulatedBond::default()
            },
        );
        self.events.push(SimulatedEvent::BondCreated { bond_id, issuer });
        Ok(bond_id)
    }

    pub fn update_terms(&mut self, bond_id: u64, caller: Pubkey, terms: BondTerms) -> Result<()> {
        let now = self.tick();
        let entry = self.bond_mut(bond_id)?;
        let update = apply_terms_update(&mut entry.bond, &caller, terms, now)?;
        self.events.push(SimulatedEvent::TermsUpdated {
            bond_id,
            terms: update.terms,
        });
        if let Some(terms) = update.final_terms {
            self.events
                .push(SimulatedEvent::FinalBondTerms { bond_id, terms });
        }
        Ok(())
    }

    pub fn request_status_change(&mut self, bond_id: u64, caller: Pubkey, status: u8) -> Result<()> {
        let target = BondStatus::from_u8(status).ok_or(BondError::InvalidStatus)?;
        let now = self.tick();
        let entry = self.bond_mut(bond_id)?;
        let transition = apply_status_change(&mut entry.bond, &caller, target, now)?;
        let holder = entry.bond.holder;

        self.events.push(SimulatedEvent::StatusChanged {
            bond_id,
            previous: transition.previous,
            status: transition.current,
        });
        if let Some(terms) = transition.final_terms {
            self.events
                .push(SimulatedEvent::FinalBondTerms { bond_id, terms });
        }
        if transition.entered_dispute() {
            let holder = holder.ok_or(BondError::MissingHolder)?;
            self.events
                .push(SimulatedEvent::BondUnderDispute { bond_id, holder });
        }
        Ok(())
    }

    pub fn set_holder(&mut self, bond_id: u64, caller: Pubkey, holder: Pubkey) -> Result<()> {
        let now = self.tick();
        let entry = self.bond_mut(bond_id)?;
        let change = apply_holder_assignment(&mut entry.bond, &caller, holder, now)?;
        self.events.push(SimulatedEvent::HolderAssigned {
            bond_id,
            holder: change.holder,
        });
        Ok(())
    }

    pub fn sign_status(&mut self, bond_id: u64, caller: Pubkey) -> Result<()> {
        let now = self.tick();
        let entry = self.bond_mut(bond_id)?;
        let outcome = apply_signoff(&mut entry.bond, &caller, now)?;
        self.events.push(SimulatedEvent::StatusSigned {
            bond_id,
            sender: caller,
            status: outcome.status,
        });
        if outcome.dispute_resolved {
            self.events.push(SimulatedEvent::DisputeResolved {
                bond_id,
                sender: caller,
            });
        }
        Ok(())
    }

    pub fn add_message(
        &mut self,
        bond_id: u64,
        caller: Pubkey,
        message_type: u8,
        payload: &str,
    ) -> Result<()> {
        let message_type = MessageType::from_u8(message_type).ok_or(BondError::InvalidMessageType)?;
        let max_payload_len = self.registry.max_payload_len;
        let now = self.tick();
        let entry = self.bond_mut(bond_id)?;
        let record = apply_message(
            &mut entry.bond,
            &mut entry.details,
            &caller,
            message_type,
            payload,
            max_payload_len,
            now,
        )?;

        let stored_payload = if message_type.is_confidential() {
            String::new()
        } else {
            payload.to_string()
        };
        entry.messages.push(SimulatedMessage {
            author: caller,
            message_type,
            payload: stored_payload,
            recorded_status: record.recorded_status,
        });

        if message_type.is_confidential() {
            self.events.push(SimulatedEvent::SecureDetailRecorded {
                bond_id,
                index: record.index,
                message_type,
            });
            if message_type == MessageType::Intro {
                self.events.push(SimulatedEvent::BondMotivation {
                    bond_id,
                    index: record.index,
                    message: payload.to_string(),
                });
            }
        } else {
            self.events.push(SimulatedEvent::NewChatMessage {
                bond_id,
                index: record.index,
                message: payload.to_string(),
            });
        }
        Ok(())
    }

    pub fn get_secure_details(&self, bond_id: u64, caller: Pubkey) -> Result<SecureDetails> {
        let entry = self.bond(bond_id).ok_or_else(missing_bond)?;
        read_secure_details(&entry.bond, &entry.details, &caller)
    }

    /// Runs one fuzzed action, returning the instruction result.
    pub fn execute(&mut self, bond_id: u64, input: &ActionInput) -> Result<()> {
        let caller = input.actor.key();
        match &input.action {
            BondAction::UpdateTerms(terms) => self.update_terms(bond_id, caller, *terms),
            BondAction::RequestStatusChange(status) => {
                self.request_status_change(bond_id, caller, *status)
            }
            BondAction::SetHolder(candidate) => self.set_holder(bond_id, caller, candidate.key()),
            BondAction::Sign => self.sign_status(bond_id, caller),
            BondAction::AddMessage {
                message_type,
                payload,
            } => self.add_message(bond_id, caller, *message_type, payload),
            BondAction::ReadSecureDetails => self.get_secure_details(bond_id, caller).map(|_| ()),
        }
    }
}

// ============================================================================
// Negotiation Fixtures
// ============================================================================

/// Terms used by the scripted negotiations
pub fn sample_terms() -> BondTerms {
    BondTerms {
        principal: 12323,
        coupon_rate: 2,
        coupon_date: 1_690_869_606,
        maturity_date: 1_722_492_006,
        currency: 2,
    }
}

/// Creates a bond and walks it to TermsAgreement with `Actor::Holder` as
/// holder and `sample_terms()` agreed. Sign-offs are empty on return.
pub fn bond_at_terms_agreement(ledger: &mut SimulatedLedger) -> Result<u64> {
    let issuer = Actor::Issuer.key();
    let bond_id = ledger.create_bond(issuer)?;
    ledger.request_status_change(bond_id, issuer, BondStatus::HolderSelection.as_u8())?;
    ledger.set_holder(bond_id, issuer, Actor::Holder.key())?;
    ledger.update_terms(bond_id, issuer, sample_terms())?;
    ledger.request_status_change(bond_id, issuer, BondStatus::TermsAgreement.as_u8())?;
    Ok(bond_id)
}

/// Continues from `bond_at_terms_agreement` to BondFinalised.
pub fn bond_at_finalised(ledger: &mut SimulatedLedger) -> Result<u64> {
    let issuer = Actor::Issuer.key();
    let bond_id = bond_at_terms_agreement(ledger)?;
    ledger.sign_status(bond_id, issuer)?;
    ledger.sign_status(bond_id, Actor::Holder.key())?;
    for status in [
        BondStatus::ContractSigned,
        BondStatus::BondReselling,
        BondStatus::BondFinalised,
    ] {
        ledger.request_status_change(bond_id, issuer, status.as_u8())?;
    }
    Ok(bond_id)
}

// ============================================================================
// Action Simulation
// ============================================================================

/// Execute an action against `bond_id` and check every invariant that
/// relates the bond before and after it.
pub fn simulate_action(
    ledger: &mut SimulatedLedger,
    bond_id: u64,
    input: &ActionInput,
) -> SimulationResult {
    let before = match ledger.bond(bond_id) {
        Some(entry) => entry.snapshot(),
        None => return SimulationResult::Error("AccountNotInitialized".to_string()),
    };

    let result = ledger.execute(bond_id, input);

    let after = match ledger.bond(bond_id) {
        Some(entry) => entry.snapshot(),
        None => return SimulationResult::InvariantViolation("bond disappeared".to_string()),
    };

    if let LifecycleInvariantResult::StatusOutOfRange { status } =
        check_status_in_range(after.status.as_u8())
    {
        return SimulationResult::InvariantViolation(format!("status {} out of range", status));
    }

    if let Err(err) = result {
        if check_failed_call_unchanged(&before, &after) != AuthorityInvariantResult::Valid {
            return SimulationResult::InvariantViolation(format!(
                "rejected call mutated bond: {}",
                err
            ));
        }
        return SimulationResult::Error(err.to_string());
    }

    let terminal = check_terminal_absorbing(&before, &after);
    if terminal != LifecycleInvariantResult::Valid {
        return SimulationResult::InvariantViolation(format!("{:?}", terminal));
    }

    let status_requested = matches!(input.action, BondAction::RequestStatusChange(_));
    let transition = check_status_transition(&before, &after, status_requested);
    if transition != LifecycleInvariantResult::Valid {
        return SimulationResult::InvariantViolation(format!("{:?}", transition));
    }

    let parties = check_parties(&before, &after);
    if parties != AuthorityInvariantResult::Valid {
        return SimulationResult::InvariantViolation(format!("{:?}", parties));
    }

    let issuer_only = check_issuer_only_fields(&before, &after, input.actor == Actor::Issuer);
    if issuer_only != AuthorityInvariantResult::Valid {
        return SimulationResult::InvariantViolation(format!("{:?}", issuer_only));
    }

    let message_accepted = matches!(input.action, BondAction::AddMessage { .. });
    let chat = check_message_count(&before, &after, message_accepted);
    if chat != ChatInvariantResult::Valid {
        return SimulationResult::InvariantViolation(format!("{:?}", chat));
    }

    SimulationResult::Success
}

/// Drive a fresh bond through a sequence of actions, stopping at the first
/// invariant violation.
pub fn simulate_negotiation(
    max_payload_len: u16,
    steps: &[ActionInput],
) -> (SimulatedLedger, Vec<SimulationResult>) {
    let mut ledger = match SimulatedLedger::new(max_payload_len) {
        Ok(ledger) => ledger,
        Err(err) => return (empty_ledger(), vec![SimulationResult::Error(err.to_string())]),
    };
    let bond_id = match ledger.create_bond(Actor::Issuer.key()) {
        Ok(id) => id,
        Err(err) => return (ledger, vec![SimulationResult::Error(err.to_string())]),
    };

    let mut results = Vec::with_capacity(steps.len());
    for step in steps {
        let result = simulate_action(&mut ledger, bond_id, step);
        let violated = result.is_invariant_violation();
        results.push(result);
        if violated {
            break;
        }
    }
    (ledger, results)
}

fn empty_ledger() -> SimulatedLedger {
    SimulatedLedger {
        registry: BondRegistry::default(),
        bonds: BTreeMap::new(),
        events: Vec::new(),
        clock: 0,
    }
}
