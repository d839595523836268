//! Initialize the bond registry

use crate::events::RegistryInitialized;
use crate::state::BondRegistry;
use crate::utils::validation::validate_payload_limit;
use anchor_lang::prelude::*;

#[derive(Accounts)]
pub struct InitializeRegistry<'info> {
    #[account(
        init,
        payer = authority,
        space = BondRegistry::SIZE,
        seeds = [b"registry"],
        bump
    )]
    pub registry: Account<'info, BondRegistry>,

    #[account(mut)]
    pub authority: Signer<'info>,

    pub system_program: Program<'info, System>,
}

pub fn handler(ctx: Context<InitializeRegistry>, max_payload_len: u16) -> Result<()> {
    validate_payload_limit(max_payload_len)?;

    let registry = &mut ctx.accounts.registry;
    registry.authority = ctx.accounts.authority.key();
    registry.total_bonds = 0;
    registry.max_payload_len = max_payload_len;
    registry.bump = ctx.bumps.registry;
    registry._reserved = [0u8; 8];

    msg!(
        "Bond registry initialised, payload limit {} bytes",
        max_payload_len
    );

    emit!(RegistryInitialized {
        authority: registry.authority,
        max_payload_len,
        timestamp: Clock::get()?.unix_timestamp,
    });

    Ok(())
}
