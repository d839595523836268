//! Sign off the bond's current status

use crate::events::{BondDisputeResolved, StatusSigned};
use crate::instructions::signoff_helpers::apply_signoff;
use crate::state::Bond;
use anchor_lang::prelude::*;

#[derive(Accounts)]
pub struct SignStatus<'info> {
    #[account(
        mut,
        seeds = [b"bond", bond.bond_id.to_le_bytes().as_ref()],
        bump = bond.bump
    )]
    pub bond: Account<'info, Bond>,

    pub sender: Signer<'info>,
}

pub fn handler(ctx: Context<SignStatus>) -> Result<()> {
    let bond = &mut ctx.accounts.bond;
    let sender = ctx.accounts.sender.key();
    let clock = Clock::get()?;

    let outcome = apply_signoff(bond, &sender, clock.unix_timestamp)?;

    emit!(StatusSigned {
        bond_id: bond.bond_id,
        sender,
        status: outcome.status.as_u8(),
        timestamp: clock.unix_timestamp,
    });

    if outcome.dispute_resolved {
        msg!("Bond {} dispute resolved by both parties", bond.bond_id);
        emit!(BondDisputeResolved {
            bond_id: bond.bond_id,
            sender,
            timestamp: clock.unix_timestamp,
        });
    }

    Ok(())
}
