//! Move a bond through its lifecycle

use crate::errors::BondError;
use crate::events::{BondStatusChanged, BondUnderDispute, FinalBondTerms};
use crate::instructions::lifecycle_helpers::apply_status_change;
use crate::state::{Bond, BondStatus};
use anchor_lang::prelude::*;

#[derive(Accounts)]
pub struct RequestStatusChange<'info> {
    #[account(
        mut,
        seeds = [b"bond", bond.bond_id.to_le_bytes().as_ref()],
        bump = bond.bump
    )]
    pub bond: Account<'info, Bond>,

    pub sender: Signer<'info>,
}

pub fn handler(ctx: Context<RequestStatusChange>, status: u8) -> Result<()> {
    let target = BondStatus::from_u8(status).ok_or(BondError::InvalidStatus)?;

    let bond = &mut ctx.accounts.bond;
    let sender = ctx.accounts.sender.key();
    let clock = Clock::get()?;

    let transition = apply_status_change(bond, &sender, target, clock.unix_timestamp)?;

    msg!(
        "Bond {} status {:?} -> {:?}",
        bond.bond_id,
        transition.previous,
        transition.current
    );

    emit!(BondStatusChanged {
        bond_id: bond.bond_id,
        sender,
        previous_status: transition.previous.as_u8(),
        status: transition.current.as_u8(),
        timestamp: clock.unix_timestamp,
    });

    if let Some(terms) = transition.final_terms {
        emit!(FinalBondTerms {
            bond_id: bond.bond_id,
            sender,
            terms,
            timestamp: clock.unix_timestamp,
        });
    }

    if transition.entered_dispute() {
        // A dispute cannot be entered without a holder
        let holder = bond.holder.ok_or(BondError::MissingHolder)?;
        emit!(BondUnderDispute {
            bond_id: bond.bond_id,
            sender,
            holder,
            timestamp: clock.unix_timestamp,
        });
    }

    Ok(())
}
