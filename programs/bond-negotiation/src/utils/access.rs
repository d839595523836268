//! Caller classification against a bond

use anchor_lang::prelude::*;

use crate::errors::BondError;
use crate::state::{Bond, BondStatus};

/// Standing of a caller with respect to one bond.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Role {
    /// Creator of the bond
    Issuer,
    /// Counterparty selected during HolderSelection
    Holder,
    /// Any other account while the bond is still Negotiating
    PotentialHolder,
    /// No standing on this bond
    Outsider,
}

impl Role {
    /// Issuer or assigned holder
    pub fn is_party(self) -> bool {
        matches!(self, Role::Issuer | Role::Holder)
    }
}

/// Classify `caller` against `bond`.
///
/// The open pool of prospective holders only has standing while the bond
/// is `Negotiating`, even if a holder was assigned in an earlier cycle.
pub fn role_of(bond: &Bond, caller: &Pubkey) -> Role {
    if bond.issuer == *caller {
        Role::Issuer
    } else if bond.holder.as_ref() == Some(caller) {
        Role::Holder
    } else if bond.status == BondStatus::Negotiating {
        Role::PotentialHolder
    } else {
        Role::Outsider
    }
}

pub fn require_issuer(bond: &Bond, caller: &Pubkey) -> Result<()> {
    require!(
        role_of(bond, caller) == Role::Issuer,
        BondError::Unauthorized
    );
    Ok(())
}

/// Issuer or assigned holder; returns the resolved role.
pub fn require_party(bond: &Bond, caller: &Pubkey) -> Result<Role> {
    let role = role_of(bond, caller);
    require!(role.is_party(), BondError::Unauthorized);
    Ok(role)
}
