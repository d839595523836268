//! Per-status sign-off recording for issuer and holder.

use crate::errors::BondError;
use crate::state::{Bond, BondStatus};
use crate::utils::access::{require_party, Role};
use anchor_lang::prelude::*;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SignoffOutcome {
    /// Status the sign-off was recorded against
    pub status: BondStatus,
    pub role: Role,
    /// This call completed the pair of sign-offs on a disputed bond
    pub dispute_resolved: bool,
}

/// Records `caller`'s sign-off against the bond's current status.
///
/// Signing twice is a no-op for the ledger; the dispute is reported as
/// resolved only by the call that completes the pair.
///
/// # Errors
/// * `Unauthorized` - caller is neither issuer nor assigned holder
/// * `Finalized` - bond is BondFinalised
pub fn apply_signoff(bond: &mut Bond, caller: &Pubkey, now: i64) -> Result<SignoffOutcome> {
    let role = require_party(bond, caller)?;
    require!(!bond.status.is_terminal(), BondError::Finalized);

    let was_complete = bond.signoff.is_complete();
    match role {
        Role::Issuer => bond.signoff.issuer_signed = true,
        Role::Holder => bond.signoff.holder_signed = true,
        Role::PotentialHolder | Role::Outsider => return Err(BondError::Unauthorized.into()),
    }
    bond.updated_at = now;

    let dispute_resolved = bond.status == BondStatus::BondInDispute
        && !was_complete
        && bond.signoff.is_complete();

    Ok(SignoffOutcome {
        status: bond.status,
        role,
        dispute_resolved,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instructions::lifecycle_helpers::apply_status_change;
    use crate::state::BondTerms;

    const NOW: i64 = 1_700_000_000;

    fn issuer() -> Pubkey {
        Pubkey::new_from_array([1; 32])
    }

    fn holder() -> Pubkey {
        Pubkey::new_from_array([2; 32])
    }

    fn bond_err(error: BondError) -> anchor_lang::error::Error {
        error.into()
    }

    fn disputed_bond() -> Bond {
        Bond {
            issuer: issuer(),
            holder: Some(holder()),
            status: BondStatus::BondInDispute,
            terms: BondTerms {
                principal: 12323,
                coupon_rate: 2,
                coupon_date: 3,
                maturity_date: 1_690_869_606,
                currency: 2,
            },
            ..Bond::default()
        }
    }

    #[test]
    fn test_outsiders_cannot_sign() {
        let mut bond = disputed_bond();
        let err = apply_signoff(&mut bond, &Pubkey::new_from_array([9; 32]), NOW).unwrap_err();
        assert_eq!(err, bond_err(BondError::Unauthorized));
        assert!(!bond.signoff.issuer_signed && !bond.signoff.holder_signed);
    }

    #[test]
    fn test_open_pool_cannot_sign() {
        let mut bond = disputed_bond();
        bond.status = BondStatus::Negotiating;
        bond.holder = None;
        let err = apply_signoff(&mut bond, &holder(), NOW).unwrap_err();
        assert_eq!(err, bond_err(BondError::Unauthorized));
    }

    #[test]
    fn test_finalised_bond_cannot_be_signed() {
        let mut bond = disputed_bond();
        bond.status = BondStatus::BondFinalised;
        let err = apply_signoff(&mut bond, &issuer(), NOW).unwrap_err();
        assert_eq!(err, bond_err(BondError::Finalized));
    }

    #[test]
    fn test_second_signer_resolves_dispute() {
        let mut bond = disputed_bond();

        let first = apply_signoff(&mut bond, &issuer(), NOW).unwrap();
        assert_eq!(first.status, BondStatus::BondInDispute);
        assert_eq!(first.role, Role::Issuer);
        assert!(!first.dispute_resolved);

        let second = apply_signoff(&mut bond, &holder(), NOW).unwrap();
        assert_eq!(second.role, Role::Holder);
        assert!(second.dispute_resolved);
        assert!(bond.signoff.is_complete());
    }

    #[test]
    fn test_holder_may_sign_first() {
        let mut bond = disputed_bond();
        assert!(!apply_signoff(&mut bond, &holder(), NOW).unwrap().dispute_resolved);
        assert!(apply_signoff(&mut bond, &issuer(), NOW).unwrap().dispute_resolved);
    }

    #[test]
    fn test_repeat_signature_does_not_resolve_again() {
        let mut bond = disputed_bond();
        apply_signoff(&mut bond, &issuer(), NOW).unwrap();
        assert!(!apply_signoff(&mut bond, &issuer(), NOW).unwrap().dispute_resolved);
        assert!(apply_signoff(&mut bond, &holder(), NOW).unwrap().dispute_resolved);
        assert!(!apply_signoff(&mut bond, &holder(), NOW).unwrap().dispute_resolved);
    }

    #[test]
    fn test_no_dispute_event_outside_dispute() {
        let mut bond = disputed_bond();
        bond.status = BondStatus::TermsAgreement;
        apply_signoff(&mut bond, &issuer(), NOW).unwrap();
        let outcome = apply_signoff(&mut bond, &holder(), NOW).unwrap();
        assert_eq!(outcome.status, BondStatus::TermsAgreement);
        assert!(!outcome.dispute_resolved);
        assert!(bond.signoff.is_complete());
    }

    #[test]
    fn test_status_change_wipes_signoff() {
        let mut bond = disputed_bond();
        apply_signoff(&mut bond, &issuer(), NOW).unwrap();
        apply_signoff(&mut bond, &holder(), NOW).unwrap();

        apply_status_change(&mut bond, &issuer(), BondStatus::TermsAgreement, NOW).unwrap();
        assert!(!bond.signoff.issuer_signed);
        assert!(!bond.signoff.holder_signed);
    }
}
