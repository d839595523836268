//! Create a new bond negotiation

use crate::errors::BondError;
use crate::events::BondCreated;
use crate::state::{
    Bond, BondRegistry, BondSecureDetails, BondStatus, BondTerms, SignatureSet,
};
use anchor_lang::prelude::*;

#[derive(Accounts)]
pub struct CreateBond<'info> {
    #[account(
        mut,
        seeds = [b"registry"],
        bump = registry.bump
    )]
    pub registry: Account<'info, BondRegistry>,

    #[account(
        init,
        payer = issuer,
        space = Bond::SIZE,
        seeds = [b"bond", registry.total_bonds.to_le_bytes().as_ref()],
        bump
    )]
    pub bond: Account<'info, Bond>,

    #[account(
        init,
        payer = issuer,
        space = BondSecureDetails::SIZE,
        seeds = [b"secure", bond.key().as_ref()],
        bump
    )]
    pub secure_details: Account<'info, BondSecureDetails>,

    #[account(mut)]
    pub issuer: Signer<'info>,

    pub system_program: Program<'info, System>,
}

/// Returns the id of the new bond.
pub fn handler(ctx: Context<CreateBond>) -> Result<u64> {
    let clock = Clock::get()?;
    let registry = &mut ctx.accounts.registry;
    let bond_id = registry.total_bonds;
    registry.total_bonds = bond_id
        .checked_add(1)
        .ok_or(BondError::ArithmeticOverflow)?;

    let bond_key = ctx.accounts.bond.key();
    let bond = &mut ctx.accounts.bond;
    bond.bond_id = bond_id;
    bond.issuer = ctx.accounts.issuer.key();
    bond.holder = None;
    bond.status = BondStatus::Negotiating;
    bond.terms = BondTerms::default();
    bond.signoff = SignatureSet::default();
    bond.message_count = 0;
    bond.created_at = clock.unix_timestamp;
    bond.updated_at = clock.unix_timestamp;
    bond.bump = ctx.bumps.bond;

    let details = &mut ctx.accounts.secure_details;
    details.bond = bond_key;
    details.updated_at = clock.unix_timestamp;
    details.bump = ctx.bumps.secure_details;

    emit!(BondCreated {
        bond_id,
        bond: bond_key,
        issuer: bond.issuer,
        timestamp: clock.unix_timestamp,
    });

    Ok(bond_id)
}
