//! Chat ledger gating.
//!
//! General chat (`InitChat`) is open to both parties at any live status and
//! to the open pool while the bond is negotiating. Intro, security and
//! appendix details are issuer-only and overwrite the bond's secure store.

use crate::errors::BondError;
use crate::state::{Bond, BondSecureDetails, BondStatus, MessageType, SecureDetails};
use crate::utils::access::{require_party, role_of, Role};
use crate::utils::validation::validate_payload;
use anchor_lang::prelude::*;

/// A message accepted into the bond's chat log.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MessageRecord {
    /// Index of the new entry in the chat log
    pub index: u64,
    pub role: Role,
    pub message_type: MessageType,
    pub recorded_status: BondStatus,
}

/// Checks whether `caller` may post a `message_type` message right now.
///
/// # Errors
/// * `Finalized` - bond is BondFinalised
/// * `DisputePending` - bond is BondInDispute
/// * `Unauthorized` - caller lacks standing for this message type
pub fn authorize_message(bond: &Bond, caller: &Pubkey, message_type: MessageType) -> Result<Role> {
    require!(!bond.status.is_terminal(), BondError::Finalized);
    require!(
        bond.status != BondStatus::BondInDispute,
        BondError::DisputePending
    );

    let role = role_of(bond, caller);
    let allowed = match message_type {
        MessageType::InitChat => role != Role::Outsider,
        MessageType::Intro | MessageType::Security | MessageType::Appendix => role == Role::Issuer,
    };
    require!(allowed, BondError::Unauthorized);

    Ok(role)
}

/// Appends a message to the chat log, updating the secure store for
/// confidential types.
pub fn apply_message(
    bond: &mut Bond,
    details: &mut BondSecureDetails,
    caller: &Pubkey,
    message_type: MessageType,
    payload: &str,
    max_payload_len: u16,
    now: i64,
) -> Result<MessageRecord> {
    let role = authorize_message(bond, caller, message_type)?;
    validate_payload(payload, max_payload_len)?;

    let index = bond.message_count;
    let next_count = index
        .checked_add(1)
        .ok_or(BondError::ArithmeticOverflow)?;

    if details.set_detail(message_type, payload) {
        details.updated_at = now;
    }
    bond.message_count = next_count;
    bond.updated_at = now;

    Ok(MessageRecord {
        index,
        role,
        message_type,
        recorded_status: bond.status,
    })
}

/// Returns the latest security and appendix details to the issuer or holder.
/// Both parties receive identical content.
pub fn read_secure_details(
    bond: &Bond,
    details: &BondSecureDetails,
    caller: &Pubkey,
) -> Result<SecureDetails> {
    require_party(bond, caller)?;
    Ok(details.snapshot())
}
