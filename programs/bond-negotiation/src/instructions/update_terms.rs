//! Update the bond body terms

use crate::events::{BondTermsUpdated, FinalBondTerms};
use crate::instructions::lifecycle_helpers::apply_terms_update;
use crate::state::{Bond, BondTerms};
use anchor_lang::prelude::*;

#[derive(Accounts)]
pub struct UpdateTerms<'info> {
    #[account(
        mut,
        seeds = [b"bond", bond.bond_id.to_le_bytes().as_ref()],
        bump = bond.bump
    )]
    pub bond: Account<'info, Bond>,

    pub sender: Signer<'info>,
}

pub fn handler(
    ctx: Context<UpdateTerms>,
    principal: u64,
    coupon_rate: u16,
    coupon_date: u32,
    maturity_date: i64,
    currency: u8,
) -> Result<()> {
    let bond = &mut ctx.accounts.bond;
    let sender = ctx.accounts.sender.key();
    let clock = Clock::get()?;

    let terms = BondTerms {
        principal,
        coupon_rate,
        coupon_date,
        maturity_date,
        currency,
    };
    let update = apply_terms_update(bond, &sender, terms, clock.unix_timestamp)?;

    if update.signoff_cleared {
        msg!("Bond {} terms changed, sign-offs cleared", bond.bond_id);
    }

    emit!(BondTermsUpdated {
        bond_id: bond.bond_id,
        sender,
        terms: update.terms,
        timestamp: clock.unix_timestamp,
    });

    if let Some(terms) = update.final_terms {
        emit!(FinalBondTerms {
            bond_id: bond.bond_id,
            sender,
            terms,
            timestamp: clock.unix_timestamp,
        });
    }

    Ok(())
}
