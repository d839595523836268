//! Error codes for the bond negotiation program

use anchor_lang::prelude::*;

#[error_code]
pub enum BondError {
    // Authorization and lifecycle errors (6000-6099)
    #[msg("Caller has no standing for this action on the bond")]
    Unauthorized,

    #[msg("Holder can only be set once, during HolderSelection")]
    WrongStage,

    #[msg("Edits disabled on finalised bond")]
    Finalized,

    #[msg("Bond dispute is pending sign-off from both parties")]
    DisputePending,

    #[msg("Missing bond holder")]
    MissingHolder,

    #[msg("Bond terms contain empty fields")]
    IncompleteTerms,

    #[msg("Agreed terms are not signed by both parties")]
    SignaturesMissing,

    #[msg("Issuer and holder must be separate")]
    SelfDealing,

    #[msg("Bond terms update is disabled at this status")]
    EditingDisabled,

    // Input errors (6100-6199)
    #[msg("Unknown bond status")]
    InvalidStatus,

    #[msg("Unknown chat message type")]
    InvalidMessageType,

    #[msg("Holder cannot be the default pubkey")]
    InvalidHolder,

    #[msg("Message payload is empty")]
    EmptyMessage,

    #[msg("Message payload exceeds the configured limit")]
    MessageTooLong,

    #[msg("Payload limit must be between 1 and the storage capacity")]
    InvalidPayloadLimit,

    // Registry errors (6200-6299)
    #[msg("Arithmetic overflow")]
    ArithmeticOverflow,
}
