//! Select the holder during HolderSelection

use crate::events::HolderAssigned;
use crate::instructions::lifecycle_helpers::apply_holder_assignment;
use crate::state::Bond;
use anchor_lang::prelude::*;

#[derive(Accounts)]
pub struct SetHolder<'info> {
    #[account(
        mut,
        seeds = [b"bond", bond.bond_id.to_le_bytes().as_ref()],
        bump = bond.bump
    )]
    pub bond: Account<'info, Bond>,

    pub sender: Signer<'info>,
}

pub fn handler(ctx: Context<SetHolder>, holder: Pubkey) -> Result<()> {
    let bond = &mut ctx.accounts.bond;
    let sender = ctx.accounts.sender.key();
    let clock = Clock::get()?;

    let change = apply_holder_assignment(bond, &sender, holder, clock.unix_timestamp)?;

    emit!(HolderAssigned {
        bond_id: bond.bond_id,
        sender,
        holder: change.holder,
        timestamp: clock.unix_timestamp,
    });

    Ok(())
}
