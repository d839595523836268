//! Bond lifecycle state machine.
//!
//! Used by `update_terms`, `request_status_change` and `set_holder`.
//!
//! Each `apply_*` function validates every precondition before it touches
//! the bond, so a failed call leaves the account exactly as it was. The
//! returned outcome tells the handler which events to emit.

use crate::errors::BondError;
use crate::state::{Bond, BondStatus, BondTerms};
use crate::utils::access::require_issuer;
use anchor_lang::prelude::*;

/// Result of a successful status change.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StatusTransition {
    pub previous: BondStatus,
    pub current: BondStatus,
    /// Snapshot of the agreed terms, set when the bond entered TermsAgreement
    pub final_terms: Option<BondTerms>,
}

impl StatusTransition {
    pub fn entered_dispute(&self) -> bool {
        self.current == BondStatus::BondInDispute
    }
}

/// Result of a successful terms update.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TermsUpdate {
    pub terms: BondTerms,
    /// Sign-offs recorded against TermsAgreement were dropped because they
    /// approved different terms
    pub signoff_cleared: bool,
    /// New agreed-terms snapshot, set when a TermsAgreement edit changed them
    pub final_terms: Option<BondTerms>,
}

/// Result of a successful holder assignment.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HolderChange {
    pub holder: Pubkey,
}

/// Checks whether `caller` may move `bond` to `target`.
///
/// # Errors
/// Checked in this order:
/// * `Unauthorized` - caller is not the issuer
/// * `Finalized` - bond is BondFinalised
/// * `DisputePending` - bond is BondInDispute without both sign-offs
/// * `MissingHolder` - dispute requested before a holder exists
/// * `IncompleteTerms` - TermsAgreement or later requested with empty terms
/// * `SignaturesMissing` - ContractSigned requested without a signed TermsAgreement
pub fn validate_status_change(bond: &Bond, caller: &Pubkey, target: BondStatus) -> Result<()> {
    require_issuer(bond, caller)?;

    require!(!bond.status.is_terminal(), BondError::Finalized);

    if bond.status == BondStatus::BondInDispute {
        require!(bond.signoff.is_complete(), BondError::DisputePending);
    }

    if target == BondStatus::BondInDispute {
        require!(bond.has_holder(), BondError::MissingHolder);
    }

    if target.requires_complete_terms() {
        require!(bond.terms.is_complete(), BondError::IncompleteTerms);
    }

    if target == BondStatus::ContractSigned {
        require!(
            bond.status == BondStatus::TermsAgreement && bond.signoff.is_complete(),
            BondError::SignaturesMissing
        );
    }

    Ok(())
}

/// Moves `bond` to `target`. A new status always starts without sign-offs.
pub fn apply_status_change(
    bond: &mut Bond,
    caller: &Pubkey,
    target: BondStatus,
    now: i64,
) -> Result<StatusTransition> {
    validate_status_change(bond, caller, target)?;

    let previous = bond.status;
    bond.status = target;
    bond.signoff.clear();
    bond.updated_at = now;

    let final_terms = (target == BondStatus::TermsAgreement).then_some(bond.terms);

    Ok(StatusTransition {
        previous,
        current: target,
        final_terms,
    })
}

/// Overwrites the bond body terms.
///
/// # Errors
/// * `Unauthorized` - caller is not the issuer
/// * `Finalized` - bond is BondFinalised
/// * `DisputePending` - bond is BondInDispute
/// * `EditingDisabled` - bond is ContractSigned or BondReselling
pub fn apply_terms_update(
    bond: &mut Bond,
    caller: &Pubkey,
    terms: BondTerms,
    now: i64,
) -> Result<TermsUpdate> {
    require_issuer(bond, caller)?;
    require!(!bond.status.is_terminal(), BondError::Finalized);
    require!(
        bond.status != BondStatus::BondInDispute,
        BondError::DisputePending
    );
    require!(bond.status.allows_term_edits(), BondError::EditingDisabled);

    let agreed_terms_changed = bond.status == BondStatus::TermsAgreement && bond.terms != terms;
    let signoff_cleared = agreed_terms_changed && bond.signoff != Default::default();
    if signoff_cleared {
        bond.signoff.clear();
    }

    bond.terms = terms;
    bond.updated_at = now;

    Ok(TermsUpdate {
        terms,
        signoff_cleared,
        final_terms: agreed_terms_changed.then_some(terms),
    })
}

/// Selects the bond holder. A bond gets one holder and keeps it.
///
/// # Errors
/// * `Unauthorized` - caller is not the issuer
/// * `WrongStage` - bond is not in HolderSelection, or already has a holder
/// * `SelfDealing` - candidate is the issuer
/// * `InvalidHolder` - candidate is the default pubkey
pub fn apply_holder_assignment(
    bond: &mut Bond,
    caller: &Pubkey,
    candidate: Pubkey,
    now: i64,
) -> Result<HolderChange> {
    require_issuer(bond, caller)?;
    require!(
        bond.status == BondStatus::HolderSelection,
        BondError::WrongStage
    );
    require!(!bond.has_holder(), BondError::WrongStage);
    require!(candidate != bond.issuer, BondError::SelfDealing);
    require!(candidate != Pubkey::default(), BondError::InvalidHolder);

    bond.holder = Some(candidate);
    bond.updated_at = now;

    Ok(HolderChange { holder: candidate })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::SignatureSet;

    const NOW: i64 = 1_700_000_000;

    fn issuer() -> Pubkey {
        Pubkey::new_from_array([1; 32])
    }

    fn holder() -> Pubkey {
        Pubkey::new_from_array([2; 32])
    }

    fn stranger() -> Pubkey {
        Pubkey::new_from_array([3; 32])
    }

    fn bond_err(error: BondError) -> anchor_lang::error::Error {
        error.into()
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

    fn create_test_bond(status: BondStatus, holder: Option<Pubkey>, terms: BondTerms) -> Bond {
        Bond {
            bond_id: 7,
            issuer: issuer(),
            holder,
            status,
            terms,
            ..Bond::default()
        }
    }

    fn both_signed() -> SignatureSet {
        SignatureSet {
            issuer_signed: true,
            holder_signed: true,
        }
    }

    mod status_change_tests {
        use super::*;

        #[test]
        fn test_only_issuer_changes_status() {
            let mut bond = create_test_bond(BondStatus::Negotiating, Some(holder()), complete_terms());
            for caller in [holder(), stranger()] {
                let err = apply_status_change(&mut bond, &caller, BondStatus::HolderSelection, NOW)
                    .unwrap_err();
                assert_eq!(err, bond_err(BondError::Unauthorized));
            }
            assert_eq!(bond.status, BondStatus::Negotiating);
        }

        #[test]
        fn test_finalised_is_absorbing() {
            let mut bond =
                create_test_bond(BondStatus::BondFinalised, Some(holder()), complete_terms());
            for target in BondStatus::ALL {
                let err = apply_status_change(&mut bond, &issuer(), target, NOW).unwrap_err();
                assert_eq!(err, bond_err(BondError::Finalized));
            }
            assert_eq!(bond.status, BondStatus::BondFinalised);
        }

        #[test]
        fn test_same_status_is_allowed_and_resets_signoff() {
            let mut bond = create_test_bond(BondStatus::Negotiating, None, BondTerms::default());
            bond.signoff.issuer_signed = true;
            let transition =
                apply_status_change(&mut bond, &issuer(), BondStatus::Negotiating, NOW).unwrap();
            assert_eq!(transition.previous, BondStatus::Negotiating);
            assert_eq!(bond.signoff, SignatureSet::default());
        }

        #[test]
        fn test_dispute_requires_holder() {
            let mut bond = create_test_bond(BondStatus::Negotiating, None, complete_terms());
            let err = apply_status_change(&mut bond, &issuer(), BondStatus::BondInDispute, NOW)
                .unwrap_err();
            assert_eq!(err, bond_err(BondError::MissingHolder));

            bond.holder = Some(holder());
            let transition =
                apply_status_change(&mut bond, &issuer(), BondStatus::BondInDispute, NOW).unwrap();
            assert!(transition.entered_dispute());
            assert_eq!(bond.status, BondStatus::BondInDispute);
        }

        #[test]
        fn test_dispute_does_not_need_complete_terms() {
            let mut bond =
                create_test_bond(BondStatus::HolderSelection, Some(holder()), BondTerms::default());
            assert!(
                apply_status_change(&mut bond, &issuer(), BondStatus::BondInDispute, NOW).is_ok()
            );
        }

        #[test]
        fn test_pending_dispute_blocks_every_target() {
            let mut bond =
                create_test_bond(BondStatus::BondInDispute, Some(holder()), complete_terms());
            bond.signoff.issuer_signed = true;
            for target in BondStatus::ALL {
                let err = apply_status_change(&mut bond, &issuer(), target, NOW).unwrap_err();
                assert_eq!(err, bond_err(BondError::DisputePending));
            }
        }

        #[test]
        fn test_resolved_dispute_unblocks() {
            let mut bond =
                create_test_bond(BondStatus::BondInDispute, Some(holder()), complete_terms());
            bond.signoff = both_signed();
            let transition =
                apply_status_change(&mut bond, &issuer(), BondStatus::TermsAgreement, NOW).unwrap();
            assert_eq!(transition.previous, BondStatus::BondInDispute);
            assert_eq!(bond.signoff, SignatureSet::default());
        }

        #[test]
        fn test_incomplete_terms_block_terms_agreement_and_later() {
            let mut terms = complete_terms();
            terms.coupon_rate = 0;
            terms.maturity_date = 0;
            let mut bond = create_test_bond(BondStatus::HolderSelection, Some(holder()), terms);

            for target in [
                BondStatus::TermsAgreement,
                BondStatus::BondReselling,
                BondStatus::BondFinalised,
            ] {
                let err = apply_status_change(&mut bond, &issuer(), target, NOW).unwrap_err();
                assert_eq!(err, bond_err(BondError::IncompleteTerms));
            }
            assert!(apply_status_change(&mut bond, &issuer(), BondStatus::Negotiating, NOW).is_ok());
        }

        #[test]
        fn test_terms_agreement_snapshots_terms() {
            let mut bond =
                create_test_bond(BondStatus::HolderSelection, Some(holder()), complete_terms());
            let transition =
                apply_status_change(&mut bond, &issuer(), BondStatus::TermsAgreement, NOW).unwrap();
            assert_eq!(transition.final_terms, Some(complete_terms()));
            assert_eq!(bond.updated_at, NOW);

            let transition =
                apply_status_change(&mut bond, &issuer(), BondStatus::BondReselling, NOW).unwrap();
            assert_eq!(transition.final_terms, None);
        }

        #[test]
        fn test_contract_signed_requires_signed_terms_agreement() {
            let mut bond =
                create_test_bond(BondStatus::TermsAgreement, Some(holder()), complete_terms());
            let err = apply_status_change(&mut bond, &issuer(), BondStatus::ContractSigned, NOW)
                .unwrap_err();
            assert_eq!(err, bond_err(BondError::SignaturesMissing));

            bond.signoff.issuer_signed = true;
            let err = apply_status_change(&mut bond, &issuer(), BondStatus::ContractSigned, NOW)
                .unwrap_err();
            assert_eq!(err, bond_err(BondError::SignaturesMissing));

            bond.signoff.holder_signed = true;
            assert!(
                apply_status_change(&mut bond, &issuer(), BondStatus::ContractSigned, NOW).is_ok()
            );
        }

        #[test]
        fn test_signoff_from_other_status_does_not_sign_contract() {
            // Both parties signed HolderSelection, which is not TermsAgreement.
            let mut bond =
                create_test_bond(BondStatus::HolderSelection, Some(holder()), complete_terms());
            bond.signoff = both_signed();
            let err = apply_status_change(&mut bond, &issuer(), BondStatus::ContractSigned, NOW)
                .unwrap_err();
            assert_eq!(err, bond_err(BondError::SignaturesMissing));
        }

        #[test]
        fn test_resolved_dispute_cannot_jump_to_contract_signed() {
            let mut bond =
                create_test_bond(BondStatus::BondInDispute, Some(holder()), complete_terms());
            bond.signoff = both_signed();
            let err = apply_status_change(&mut bond, &issuer(), BondStatus::ContractSigned, NOW)
                .unwrap_err();
            assert_eq!(err, bond_err(BondError::SignaturesMissing));
        }

        #[test]
        fn test_failed_change_leaves_bond_untouched() {
            let mut bond =
                create_test_bond(BondStatus::TermsAgreement, Some(holder()), complete_terms());
            bond.signoff.issuer_signed = true;
            bond.updated_at = 5;
            assert!(
                apply_status_change(&mut bond, &issuer(), BondStatus::ContractSigned, NOW).is_err()
            );
            assert_eq!(bond.status, BondStatus::TermsAgreement);
            assert!(bond.signoff.issuer_signed);
            assert_eq!(bond.updated_at, 5);
        }
    }

    mod terms_update_tests {
        use super::*;

        #[test]
        fn test_only_issuer_updates_terms() {
            let mut bond = create_test_bond(BondStatus::Negotiating, Some(holder()), BondTerms::default());
            let err = apply_terms_update(&mut bond, &stranger(), complete_terms(), NOW).unwrap_err();
            assert_eq!(err, bond_err(BondError::Unauthorized));
            let err = apply_terms_update(&mut bond, &holder(), complete_terms(), NOW).unwrap_err();
            assert_eq!(err, bond_err(BondError::Unauthorized));
            assert_eq!(bond.terms, BondTerms::default());
        }

        #[test]
        fn test_editable_statuses() {
            for status in [
                BondStatus::Negotiating,
                BondStatus::HolderSelection,
                BondStatus::TermsAgreement,
            ] {
                let mut bond = create_test_bond(status, Some(holder()), BondTerms::default());
                let update = apply_terms_update(&mut bond, &issuer(), complete_terms(), NOW).unwrap();
                assert_eq!(update.terms, complete_terms());
                assert_eq!(bond.terms, complete_terms());
            }
        }

        #[test]
        fn test_partial_terms_are_accepted() {
            let mut bond = create_test_bond(BondStatus::HolderSelection, Some(holder()), BondTerms::default());
            let mut terms = complete_terms();
            terms.coupon_rate = 0;
            assert!(apply_terms_update(&mut bond, &issuer(), terms, NOW).is_ok());
            assert_eq!(bond.terms.coupon_rate, 0);
        }

        #[test]
        fn test_frozen_statuses() {
            let cases = [
                (BondStatus::BondInDispute, BondError::DisputePending),
                (BondStatus::ContractSigned, BondError::EditingDisabled),
                (BondStatus::BondReselling, BondError::EditingDisabled),
                (BondStatus::BondFinalised, BondError::Finalized),
            ];
            for (status, expected) in cases {
                let mut bond = create_test_bond(status, Some(holder()), BondTerms::default());
                let err = apply_terms_update(&mut bond, &issuer(), complete_terms(), NOW).unwrap_err();
                assert_eq!(err, bond_err(expected));
                assert_eq!(bond.terms, BondTerms::default());
            }
        }

        #[test]
        fn test_changing_agreed_terms_drops_signoff() {
            let mut bond =
                create_test_bond(BondStatus::TermsAgreement, Some(holder()), complete_terms());
            bond.signoff = both_signed();

            // Same terms: sign-offs stay valid.
            let update = apply_terms_update(&mut bond, &issuer(), complete_terms(), NOW).unwrap();
            assert!(!update.signoff_cleared);
            assert!(bond.signoff.is_complete());

            let mut revised = complete_terms();
            revised.principal = 50_000;
            let update = apply_terms_update(&mut bond, &issuer(), revised, NOW).unwrap();
            assert!(update.signoff_cleared);
            assert_eq!(bond.signoff, SignatureSet::default());
        }

        #[test]
        fn test_agreed_terms_edit_refreshes_snapshot() {
            let mut bond =
                create_test_bond(BondStatus::TermsAgreement, Some(holder()), complete_terms());

            let update = apply_terms_update(&mut bond, &issuer(), complete_terms(), NOW).unwrap();
            assert_eq!(update.final_terms, None);

            let mut revised = complete_terms();
            revised.coupon_rate = 5;
            let update = apply_terms_update(&mut bond, &issuer(), revised, NOW).unwrap();
            assert_eq!(update.final_terms, Some(revised));
        }

        #[test]
        fn test_edits_before_agreement_have_no_snapshot() {
            for status in [BondStatus::Negotiating, BondStatus::HolderSelection] {
                let mut bond = create_test_bond(status, None, BondTerms::default());
                let update =
                    apply_terms_update(&mut bond, &issuer(), complete_terms(), NOW).unwrap();
                assert_eq!(update.final_terms, None);
            }
        }
    }

    mod holder_assignment_tests {
        use super::*;

        #[test]
        fn test_holder_set_only_during_holder_selection() {
            for status in BondStatus::ALL {
                if status == BondStatus::HolderSelection {
                    continue;
                }
                let mut bond = create_test_bond(status, None, complete_terms());
                let err = apply_holder_assignment(&mut bond, &issuer(), holder(), NOW).unwrap_err();
                assert_eq!(err, bond_err(BondError::WrongStage));
                assert_eq!(bond.holder, None);
            }
        }

        #[test]
        fn test_only_issuer_sets_holder() {
            let mut bond = create_test_bond(BondStatus::HolderSelection, None, complete_terms());
            let err = apply_holder_assignment(&mut bond, &holder(), holder(), NOW).unwrap_err();
            assert_eq!(err, bond_err(BondError::Unauthorized));
        }

        #[test]
        fn test_issuer_cannot_hold_own_bond() {
            let mut bond = create_test_bond(BondStatus::HolderSelection, None, complete_terms());
            let err = apply_holder_assignment(&mut bond, &issuer(), issuer(), NOW).unwrap_err();
            assert_eq!(err, bond_err(BondError::SelfDealing));
        }

        #[test]
        fn test_default_pubkey_rejected() {
            let mut bond = create_test_bond(BondStatus::HolderSelection, None, complete_terms());
            let err = apply_holder_assignment(&mut bond, &issuer(), Pubkey::default(), NOW)
                .unwrap_err();
            assert_eq!(err, bond_err(BondError::InvalidHolder));
        }

        #[test]
        fn test_holder_recorded_exactly() {
            let mut bond = create_test_bond(BondStatus::HolderSelection, None, complete_terms());
            let change = apply_holder_assignment(&mut bond, &issuer(), holder(), NOW).unwrap();
            assert_eq!(change.holder, holder());
            assert_eq!(bond.holder, Some(holder()));
        }

        #[test]
        fn test_holder_assigned_only_once() {
            let mut bond =
                create_test_bond(BondStatus::HolderSelection, Some(holder()), complete_terms());
            bond.signoff.holder_signed = true;

            for candidate in [stranger(), holder()] {
                let err =
                    apply_holder_assignment(&mut bond, &issuer(), candidate, NOW).unwrap_err();
                assert_eq!(err, bond_err(BondError::WrongStage));
            }
            assert_eq!(bond.holder, Some(holder()));
            assert!(bond.signoff.holder_signed);
        }
    }
}
