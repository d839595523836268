//! Read the latest confidential details of a bond

use crate::instructions::chat_helpers::read_secure_details;
use crate::state::{Bond, BondSecureDetails, SecureDetails};
use anchor_lang::prelude::*;

#[derive(Accounts)]
pub struct GetSecureDetails<'info> {
    #[account(
        seeds = [b"bond", bond.bond_id.to_le_bytes().as_ref()],
        bump = bond.bump
    )]
    pub bond: Account<'info, Bond>,

    #[account(
        seeds = [b"secure", bond.key().as_ref()],
        bump = secure_details.bump,
        has_one = bond
    )]
    pub secure_details: Account<'info, BondSecureDetails>,

    pub sender: Signer<'info>,
}

/// Returned to the caller as program return data.
pub fn handler(ctx: Context<GetSecureDetails>) -> Result<SecureDetails> {
    read_secure_details(
        &ctx.accounts.bond,
        &ctx.accounts.secure_details,
        &ctx.accounts.sender.key(),
    )
}
