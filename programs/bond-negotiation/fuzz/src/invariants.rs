//! Bond invariant checking for fuzz testing
//!
//! Each check compares a bond snapshot taken before an instruction with the
//! snapshot taken after it.

use anchor_lang::prelude::Pubkey;
use bond_negotiation::state::{
    Bond, BondSecureDetails, BondStatus, BondTerms, SignatureSet,
};

/// Observable state of one bond
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BondSnapshot {
    pub issuer: Pubkey,
    pub holder: Option<Pubkey>,
    pub status: BondStatus,
    pub terms: BondTerms,
    pub signoff: SignatureSet,
    pub message_count: u64,
    pub intro: String,
    pub security: String,
    pub appendix: String,
}

impl BondSnapshot {
    pub fn capture(bond: &Bond, details: &BondSecureDetails) -> Self {
        Self {
            issuer: bond.issuer,
            holder: bond.holder,
            status: bond.status,
            terms: bond.terms,
            signoff: bond.signoff,
            message_count: bond.message_count,
            intro: details.intro.clone(),
            security: details.security.clone(),
            appendix: details.appendix.clone(),
        }
    }
}

/// Lifecycle invariant results
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LifecycleInvariantResult {
    Valid,
    StatusOutOfRange { status: u8 },
    TerminalStateModified,
    UnrequestedStatusChange { from: BondStatus, to: BondStatus },
    SignoffCarriedOver { from: BondStatus, to: BondStatus },
    UnsignedDisputeExit { to: BondStatus },
    UnsignedContract { from: BondStatus },
    DisputeWithoutHolder,
    IncompleteTermsAccepted { status: BondStatus },
}

/// Authority invariant results
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthorityInvariantResult {
    Valid,
    IssuerChanged,
    HolderChangedOutsideSelection { status: BondStatus },
    HolderReassigned,
    NonIssuerMutation,
    FailedCallMutated,
}

/// Chat ledger invariant results
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatInvariantResult {
    Valid,
    MessageCountRegressed { before: u64, after: u64 },
    MessageCountJumped { before: u64, after: u64 },
    SecureDetailsChangedWithoutMessage,
}

// ============================================================================
// Lifecycle Invariants
// ============================================================================

/// Status always decodes to one of the seven lifecycle values.
pub fn check_status_in_range(status: u8) -> LifecycleInvariantResult {
    match BondStatus::from_u8(status) {
        Some(_) => LifecycleInvariantResult::Valid,
        None => LifecycleInvariantResult::StatusOutOfRange { status },
    }
}

/// Nothing about a finalised bond ever changes.
pub fn check_terminal_absorbing(
    before: &BondSnapshot,
    after: &BondSnapshot,
) -> LifecycleInvariantResult {
    if before.status.is_terminal() && before != after {
        LifecycleInvariantResult::TerminalStateModified
    } else {
        LifecycleInvariantResult::Valid
    }
}

/// Status transitions start the new status with no sign-offs, and the gated
/// transitions only happen with the pair of sign-offs in place.
pub fn check_status_transition(
    before: &BondSnapshot,
    after: &BondSnapshot,
    status_requested: bool,
) -> LifecycleInvariantResult {
    if !status_requested {
        if before.status != after.status {
            return LifecycleInvariantResult::UnrequestedStatusChange {
                from: before.status,
                to: after.status,
            };
        }
        return LifecycleInvariantResult::Valid;
    }

    if after.signoff != SignatureSet::default() {
        return LifecycleInvariantResult::SignoffCarriedOver {
            from: before.status,
            to: after.status,
        };
    }

    if before.status == BondStatus::BondInDispute && !before.signoff.is_complete() {
        return LifecycleInvariantResult::UnsignedDisputeExit { to: after.status };
    }

    if after.status == BondStatus::ContractSigned
        && !(before.status == BondStatus::TermsAgreement && before.signoff.is_complete())
    {
        return LifecycleInvariantResult::UnsignedContract {
            from: before.status,
        };
    }

    if after.status == BondStatus::BondInDispute && after.holder.is_none() {
        return LifecycleInvariantResult::DisputeWithoutHolder;
    }

    if after.status.requires_complete_terms() && !after.terms.is_complete() {
        return LifecycleInvariantResult::IncompleteTermsAccepted {
            status: after.status,
        };
    }

    LifecycleInvariantResult::Valid
}

// ============================================================================
// Authority Invariants
// ============================================================================

/// The issuer is fixed and the holder is set once, during HolderSelection.
pub fn check_parties(before: &BondSnapshot, after: &BondSnapshot) -> AuthorityInvariantResult {
    if before.issuer != after.issuer {
        return AuthorityInvariantResult::IssuerChanged;
    }
    if before.holder == after.holder {
        return AuthorityInvariantResult::Valid;
    }
    if before.status != BondStatus::HolderSelection {
        return AuthorityInvariantResult::HolderChangedOutsideSelection {
            status: before.status,
        };
    }
    if before.holder.is_some() {
        return AuthorityInvariantResult::HolderReassigned;
    }
    AuthorityInvariantResult::Valid
}

/// Only the issuer may change status, terms, holder or secure details.
pub fn check_issuer_only_fields(
    before: &BondSnapshot,
    after: &BondSnapshot,
    caller_is_issuer: bool,
) -> AuthorityInvariantResult {
    if caller_is_issuer {
        return AuthorityInvariantResult::Valid;
    }
    let changed = before.status != after.status
        || before.terms != after.terms
        || before.holder != after.holder
        || before.intro != after.intro
        || before.security != after.security
        || before.appendix != after.appendix;
    if changed {
        AuthorityInvariantResult::NonIssuerMutation
    } else {
        AuthorityInvariantResult::Valid
    }
}

/// A rejected instruction leaves the bond exactly as it was.
pub fn check_failed_call_unchanged(
    before: &BondSnapshot,
    after: &BondSnapshot,
) -> AuthorityInvariantResult {
    if before != after {
        AuthorityInvariantResult::FailedCallMutated
    } else {
        AuthorityInvariantResult::Valid
    }
}

// ============================================================================
// Chat Invariants
// ============================================================================

/// The chat log only grows, one entry per accepted message.
pub fn check_message_count(
    before: &BondSnapshot,
    after: &BondSnapshot,
    message_accepted: bool,
) -> ChatInvariantResult {
    if after.message_count < before.message_count {
        return ChatInvariantResult::MessageCountRegressed {
            before: before.message_count,
            after: after.message_count,
        };
    }
    let expected = before.message_count + u64::from(message_accepted);
    if after.message_count != expected {
        return ChatInvariantResult::MessageCountJumped {
            before: before.message_count,
            after: after.message_count,
        };
    }
    if !message_accepted
        && (before.intro != after.intro
            || before.security != after.security
            || before.appendix != after.appendix)
    {
        return ChatInvariantResult::SecureDetailsChangedWithoutMessage;
    }
    ChatInvariantResult::Valid
}
