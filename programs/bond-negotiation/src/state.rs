//! Account state structures for the bond negotiation program

use anchor_lang::prelude::*;

// ============================================================================
// Size Constants
// ============================================================================

/// Storage capacity of a single chat or secure-detail payload, in bytes.
/// Must match the `max_len` attributes below.
pub const MAX_PAYLOAD_LEN: usize = 512;

/// Bond lifecycle status.
///
/// The discriminants are part of the instruction interface: clients pass the
/// target status as its `u8` value.
///
/// | Value | Status            | Notes                                        |
/// |-------|-------------------|----------------------------------------------|
/// |  0    | `Negotiating`     | Initial status, open pool may chat           |
/// |  1    | `HolderSelection` | Only status where the holder can be set      |
/// |  2    | `BondInDispute`   | Side branch, needs both parties to sign off  |
/// |  3    | `TermsAgreement`  | Needs complete terms, snapshots final terms  |
/// |  4    | `ContractSigned`  | Needs signed `TermsAgreement`                |
/// |  5    | `BondReselling`   | Terms frozen                                 |
/// |  6    | `BondFinalised`   | Terminal, bond becomes read-only             |
#[derive(
    AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq, Default, InitSpace,
)]
#[repr(u8)]
pub enum BondStatus {
    #[default]
    Negotiating = 0,
    HolderSelection = 1,
    BondInDispute = 2,
    TermsAgreement = 3,
    ContractSigned = 4,
    BondReselling = 5,
    BondFinalised = 6,
}

impl BondStatus {
    pub const ALL: [BondStatus; 7] = [
        BondStatus::Negotiating,
        BondStatus::HolderSelection,
        BondStatus::BondInDispute,
        BondStatus::TermsAgreement,
        BondStatus::ContractSigned,
        BondStatus::BondReselling,
        BondStatus::BondFinalised,
    ];

    pub fn from_u8(value: u8) -> Option<Self> {
        Self::ALL.get(value as usize).copied()
    }

    pub fn as_u8(self) -> u8 {
        self as u8
    }

    /// `BondFinalised` is absorbing: nothing mutates a bond after it.
    pub fn is_terminal(self) -> bool {
        self == BondStatus::BondFinalised
    }

    /// Statuses from `TermsAgreement` onwards can only be entered with
    /// complete terms.
    pub fn requires_complete_terms(self) -> bool {
        self.as_u8() >= BondStatus::TermsAgreement.as_u8()
    }

    /// Terms are editable up to and including `TermsAgreement`.
    pub fn allows_term_edits(self) -> bool {
        matches!(
            self,
            BondStatus::Negotiating | BondStatus::HolderSelection | BondStatus::TermsAgreement
        )
    }
}

/// Chat message type
#[derive(
    AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq, Default, InitSpace,
)]
#[repr(u8)]
pub enum MessageType {
    /// General negotiation talk
    #[default]
    InitChat = 0,
    /// Bond motivation, confidential
    Intro = 1,
    /// Security description, confidential
    Security = 2,
    /// Contract appendix, confidential
    Appendix = 3,
}

impl MessageType {
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(MessageType::InitChat),
            1 => Some(MessageType::Intro),
            2 => Some(MessageType::Security),
            3 => Some(MessageType::Appendix),
            _ => None,
        }
    }

    pub fn as_u8(self) -> u8 {
        self as u8
    }

    pub fn is_confidential(self) -> bool {
        self != MessageType::InitChat
    }
}

/// Negotiated bond body terms.
///
/// Every field is numeric and zero means "not yet negotiated".
#[derive(
    AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq, Default, InitSpace,
)]
pub struct BondTerms {
    pub principal: u64,
    pub coupon_rate: u16,
    /// Coupon payment date (unix timestamp or day index, client-defined)
    pub coupon_date: u32,
    /// Maturity date (unix timestamp)
    pub maturity_date: i64,
    /// Currency code, 0 = unset
    pub currency: u8,
}

impl BondTerms {
    pub fn is_complete(&self) -> bool {
        self.principal != 0
            && self.coupon_rate != 0
            && self.coupon_date != 0
            && self.maturity_date != 0
            && self.currency != 0
    }
}

/// Sign-offs recorded against the bond's current status.
/// Cleared whenever the status changes.
#[derive(
    AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq, Default, InitSpace,
)]
pub struct SignatureSet {
    pub issuer_signed: bool,
    pub holder_signed: bool,
}

impl SignatureSet {
    pub fn is_complete(&self) -> bool {
        self.issuer_signed && self.holder_signed
    }

    pub fn clear(&mut self) {
        *self = SignatureSet::default();
    }
}

/// Registry of all bonds, allocates bond ids
/// PDA seeds: ["registry"]
#[account]
#[derive(InitSpace)]
pub struct BondRegistry {
    /// Account that initialised the registry
    pub authority: Pubkey,
    /// Total bonds created, also the id of the next bond
    pub total_bonds: u64,
    /// Maximum accepted payload length (1..=MAX_PAYLOAD_LEN)
    pub max_payload_len: u16,
    /// Bump seed for PDA
    pub bump: u8,
    /// Reserved for future use
    pub _reserved: [u8; 8],
}

impl Default for BondRegistry {
    fn default() -> Self {
        Self {
            authority: Pubkey::default(),
            total_bonds: 0,
            max_payload_len: MAX_PAYLOAD_LEN as u16,
            bump: 0,
            _reserved: [0u8; 8],
        }
    }
}

impl BondRegistry {
    pub const SIZE: usize = 8 + // discriminator
        32 + // authority
        8 +  // total_bonds
        2 +  // max_payload_len
        1 +  // bump
        8; // _reserved
}

/// One negotiation between an issuer and a holder
/// PDA seeds: ["bond", bond_id (le bytes)]
#[account]
#[derive(Default, InitSpace)]
pub struct Bond {
    /// Identifier assigned by the registry at creation
    pub bond_id: u64,
    /// Creator, fixed for the lifetime of the bond
    pub issuer: Pubkey,
    /// Selected counterparty, `None` until assigned during HolderSelection
    pub holder: Option<Pubkey>,
    pub status: BondStatus,
    pub terms: BondTerms,
    /// Sign-offs against `status`
    pub signoff: SignatureSet,
    /// Number of chat messages appended, also the index of the next one
    pub message_count: u64,
    pub created_at: i64,
    pub updated_at: i64,
    pub bump: u8,
}

impl Bond {
    pub const SIZE: usize = 8 + // discriminator
        8 +  // bond_id
        32 + // issuer
        33 + // holder (Option<Pubkey>)
        1 +  // status
        23 + // terms
        2 +  // signoff
        8 +  // message_count
        8 +  // created_at
        8 +  // updated_at
        1; // bump

    pub fn has_holder(&self) -> bool {
        self.holder.is_some()
    }
}

/// Append-only chat log entry
/// PDA seeds: ["message", bond, index (le bytes)]
#[account]
#[derive(Default, InitSpace)]
pub struct ChatMessage {
    pub bond: Pubkey,
    pub bond_id: u64,
    /// Position in the bond's chat log
    pub index: u64,
    pub author: Pubkey,
    pub message_type: MessageType,
    #[max_len(512)]
    pub payload: String,
    /// Bond status at the time the message was recorded
    pub recorded_status: BondStatus,
    pub created_at: i64,
    pub bump: u8,
}

impl ChatMessage {
    pub const SIZE: usize = 8 + // discriminator
        32 + // bond
        8 +  // bond_id
        8 +  // index
        32 + // author
        1 +  // message_type
        (4 + MAX_PAYLOAD_LEN) + // payload
        1 +  // recorded_status
        8 +  // created_at
        1; // bump
}

/// Latest confidential contract details of a bond.
/// Readable through `get_secure_details` by the issuer and holder only;
/// byte-level confidentiality is provided by the hosting runtime.
/// PDA seeds: ["secure", bond]
#[account]
#[derive(Default, InitSpace)]
pub struct BondSecureDetails {
    pub bond: Pubkey,
    #[max_len(512)]
    pub intro: String,
    #[max_len(512)]
    pub security: String,
    #[max_len(512)]
    pub appendix: String,
    pub updated_at: i64,
    pub bump: u8,
}

impl BondSecureDetails {
    pub const SIZE: usize = 8 + // discriminator
        32 + // bond
        (4 + MAX_PAYLOAD_LEN) + // intro
        (4 + MAX_PAYLOAD_LEN) + // security
        (4 + MAX_PAYLOAD_LEN) + // appendix
        8 +  // updated_at
        1; // bump

    /// Overwrites the stored detail for a confidential message type.
    /// Returns false for `InitChat`, which has no secure slot.
    pub fn set_detail(&mut self, message_type: MessageType, payload: &str) -> bool {
        let slot = match message_type {
            MessageType::InitChat => return false,
            MessageType::Intro => &mut self.intro,
            MessageType::Security => &mut self.security,
            MessageType::Appendix => &mut self.appendix,
        };
        slot.clear();
        slot.push_str(payload);
        true
    }

    pub fn snapshot(&self) -> SecureDetails {
        SecureDetails {
            security: self.security.clone(),
            appendix: self.appendix.clone(),
        }
    }
}

/// Return value of `get_secure_details`
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, PartialEq, Eq, Default)]
pub struct SecureDetails {
    pub security: String,
    pub appendix: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Helper: SIZE should equal INIT_SPACE (borsh serialized) + 8-byte discriminator.
    macro_rules! test_size_constant {
        ($struct:ty) => {
            assert_eq!(
                <$struct>::SIZE,
                <$struct as anchor_lang::Space>::INIT_SPACE + 8,
                concat!(stringify!($struct), "::SIZE mismatch with INIT_SPACE")
            );
        };
    }

    fn complete_terms() -> BondTerms {
        BondTerms {
            principal: 12323,
            coupon_rate: 2,
            coupon_date: 3,
            maturity_date: 1_690_869_606,
            currency: 2,
        }
    }

    #[test]
    fn test_bond_registry_size() {
        test_size_constant!(BondRegistry);
    }

    #[test]
    fn test_bond_size() {
        test_size_constant!(Bond);
    }

    #[test]
    fn test_chat_message_size() {
        test_size_constant!(ChatMessage);
    }

    #[test]
    fn test_secure_details_size() {
        test_size_constant!(BondSecureDetails);
    }

    #[test]
    fn test_status_round_trips_through_u8() {
        for status in BondStatus::ALL {
            assert_eq!(BondStatus::from_u8(status.as_u8()), Some(status));
        }
        assert_eq!(BondStatus::from_u8(7), None);
        assert_eq!(BondStatus::from_u8(u8::MAX), None);
    }

    #[test]
    fn test_status_discriminants_are_stable() {
        assert_eq!(BondStatus::Negotiating.as_u8(), 0);
        assert_eq!(BondStatus::BondInDispute.as_u8(), 2);
        assert_eq!(BondStatus::TermsAgreement.as_u8(), 3);
        assert_eq!(BondStatus::BondFinalised.as_u8(), 6);
    }

    #[test]
    fn test_only_finalised_is_terminal() {
        for status in BondStatus::ALL {
            assert_eq!(status.is_terminal(), status == BondStatus::BondFinalised);
        }
    }

    #[test]
    fn test_complete_terms_required_from_terms_agreement() {
        assert!(!BondStatus::Negotiating.requires_complete_terms());
        assert!(!BondStatus::HolderSelection.requires_complete_terms());
        assert!(!BondStatus::BondInDispute.requires_complete_terms());
        assert!(BondStatus::TermsAgreement.requires_complete_terms());
        assert!(BondStatus::ContractSigned.requires_complete_terms());
        assert!(BondStatus::BondReselling.requires_complete_terms());
        assert!(BondStatus::BondFinalised.requires_complete_terms());
    }

    #[test]
    fn test_message_type_from_u8() {
        assert_eq!(MessageType::from_u8(0), Some(MessageType::InitChat));
        assert_eq!(MessageType::from_u8(3), Some(MessageType::Appendix));
        assert_eq!(MessageType::from_u8(4), None);
        assert!(!MessageType::InitChat.is_confidential());
        assert!(MessageType::Security.is_confidential());
    }

    #[test]
    fn test_terms_completeness() {
        assert!(complete_terms().is_complete());
        assert!(!BondTerms::default().is_complete());

        let mut missing_rate = complete_terms();
        missing_rate.coupon_rate = 0;
        assert!(!missing_rate.is_complete());

        let mut missing_currency = complete_terms();
        missing_currency.currency = 0;
        assert!(!missing_currency.is_complete());
    }

    #[test]
    fn test_signature_set_clear() {
        let mut set = SignatureSet {
            issuer_signed: true,
            holder_signed: true,
        };
        assert!(set.is_complete());
        set.clear();
        assert_eq!(set, SignatureSet::default());
        assert!(!set.is_complete());
    }

    #[test]
    fn test_secure_detail_latest_wins() {
        let mut details = BondSecureDetails::default();
        assert!(details.set_detail(MessageType::Security, "first"));
        assert!(details.set_detail(MessageType::Security, "second"));
        assert!(details.set_detail(MessageType::Appendix, "appendix"));
        assert!(!details.set_detail(MessageType::InitChat, "ignored"));

        assert_eq!(
            details.snapshot(),
            SecureDetails {
                security: "second".to_string(),
                appendix: "appendix".to_string(),
            }
        );
        assert!(details.intro.is_empty());
    }

    #[test]
    fn test_registry_defaults_to_full_payload_limit() {
        let registry = BondRegistry::default();
        assert_eq!(registry.total_bonds, 0);
        assert_eq!(registry.max_payload_len as usize, MAX_PAYLOAD_LEN);
    }
}
