//! Events emitted by the bond negotiation program
//!
//! Clients rebuild a bond's history (chat log, status timeline, agreed terms)
//! by subscribing to these events. Security and appendix payloads never
//! appear here.

use anchor_lang::prelude::*;

use crate::state::BondTerms;

/// Emitted once when the registry is initialised
#[event]
pub struct RegistryInitialized {
    pub authority: Pubkey,
    pub max_payload_len: u16,
    pub timestamp: i64,
}

/// Emitted when a new bond is created
#[event]
pub struct BondCreated {
    pub bond_id: u64,
    pub bond: Pubkey,
    pub issuer: Pubkey,
    pub timestamp: i64,
}

/// Emitted when the issuer updates the bond body terms
#[event]
pub struct BondTermsUpdated {
    pub bond_id: u64,
    pub sender: Pubkey,
    pub terms: BondTerms,
    pub timestamp: i64,
}

/// Emitted on every successful status change
#[event]
pub struct BondStatusChanged {
    pub bond_id: u64,
    pub sender: Pubkey,
    pub previous_status: u8,
    pub status: u8,
    pub timestamp: i64,
}

/// Emitted when the bond enters TermsAgreement, and again whenever the
/// issuer changes the terms while it stays there
#[event]
pub struct FinalBondTerms {
    pub bond_id: u64,
    pub sender: Pubkey,
    pub terms: BondTerms,
    pub timestamp: i64,
}

/// Emitted when the bond is marked as under dispute
#[event]
pub struct BondUnderDispute {
    pub bond_id: u64,
    pub sender: Pubkey,
    pub holder: Pubkey,
    pub timestamp: i64,
}

/// Emitted when the issuer selects the bond holder
#[event]
pub struct HolderAssigned {
    pub bond_id: u64,
    pub sender: Pubkey,
    pub holder: Pubkey,
    pub timestamp: i64,
}

/// Emitted when a party signs off the current status
#[event]
pub struct StatusSigned {
    pub bond_id: u64,
    pub sender: Pubkey,
    pub status: u8,
    pub timestamp: i64,
}

/// Emitted by the sign-off that completes a dispute resolution
#[event]
pub struct BondDisputeResolved {
    pub bond_id: u64,
    pub sender: Pubkey,
    pub timestamp: i64,
}

/// Emitted for general negotiation chat
#[event]
pub struct NewChatMessage {
    pub bond_id: u64,
    pub sender: Pubkey,
    pub message_index: u64,
    pub message: String,
    pub timestamp: i64,
}

/// Emitted when the issuer records an intro, security or appendix detail.
/// Carries the detail type only, the payload stays in the secure store.
#[event]
pub struct SecureDetailRecorded {
    pub bond_id: u64,
    pub sender: Pubkey,
    pub message_type: u8,
    pub message_index: u64,
    pub timestamp: i64,
}

/// Emitted alongside `SecureDetailRecorded` for an intro message. The intro
/// is the issuer's public pitch for the bond.
#[event]
pub struct BondMotivation {
    pub bond_id: u64,
    pub sender: Pubkey,
    pub message_index: u64,
    pub message: String,
    pub timestamp: i64,
}
