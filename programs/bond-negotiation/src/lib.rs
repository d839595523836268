#![allow(unexpected_cfgs)]
//! Bond Negotiation Program
//!
//! On-chain negotiation of a bond issuance between an issuer and a single
//! holder. Each bond walks a fixed lifecycle, records dual sign-offs for
//! disputes and terms agreement, and keeps an append-only chat log whose
//! confidential entries land in a secure store readable only by the parties.

use anchor_lang::prelude::*;

declare_id!("Bnd9xV1tQw3kD8fJc5RZpLr2sHhYmE4uNaGTo7WqK6Pz");

pub mod errors;
pub mod events;
pub mod instructions;
pub mod state;
pub mod utils;

use instructions::*;
use state::SecureDetails;

#[program]
pub mod bond_negotiation {
    use super::*;

    /// Create the singleton registry that allocates bond ids.
    ///
    /// # Arguments
    /// * `ctx` - Context with the registry PDA and paying authority
    /// * `max_payload_len` - Byte limit for chat and secure-detail payloads
    pub fn initialize_registry(ctx: Context<InitializeRegistry>, max_payload_len: u16) -> Result<()> {
        instructions::initialize_registry::handler(ctx, max_payload_len)
    }

    /// Open a new bond in `Negotiating` with the signer as issuer.
    /// Returns the allocated bond id.
    pub fn create_bond(ctx: Context<CreateBond>) -> Result<u64> {
        instructions::create_bond::handler(ctx)
    }

    /// Replace the bond body terms. Issuer only, up to `TermsAgreement`.
    ///
    /// # Arguments
    /// * `principal` - Face value
    /// * `coupon_rate` - Coupon rate as agreed off-chain
    /// * `coupon_date` - Coupon schedule marker
    /// * `maturity_date` - Unix timestamp of maturity
    /// * `currency` - Currency code
    pub fn update_terms(
        ctx: Context<UpdateTerms>,
        principal: u64,
        coupon_rate: u16,
        coupon_date: u32,
        maturity_date: i64,
        currency: u8,
    ) -> Result<()> {
        instructions::update_terms::handler(
            ctx,
            principal,
            coupon_rate,
            coupon_date,
            maturity_date,
            currency,
        )
    }

    /// Move the bond to `status` (see `BondStatus` for values).
    /// Issuer only. Clears any sign-offs recorded against the old status.
    pub fn request_status_change(ctx: Context<RequestStatusChange>, status: u8) -> Result<()> {
        instructions::request_status_change::handler(ctx, status)
    }

    /// Select the holder. Issuer only, once, during `HolderSelection`.
    pub fn set_holder(ctx: Context<SetHolder>, holder: Pubkey) -> Result<()> {
        instructions::set_holder::handler(ctx, holder)
    }

    /// Record the signer's sign-off against the current status.
    pub fn sign_status(ctx: Context<SignStatus>) -> Result<()> {
        instructions::sign_status::handler(ctx)
    }

    /// Append a message to the bond's chat log.
    ///
    /// # Arguments
    /// * `message_type` - 0=chat, 1=intro, 2=security, 3=appendix
    /// * `payload` - Message body, bounded by the registry payload limit
    pub fn add_message(ctx: Context<AddMessage>, message_type: u8, payload: String) -> Result<()> {
        instructions::add_message::handler(ctx, message_type, payload)
    }

    /// Return the latest security and appendix details to the issuer or holder.
    pub fn get_secure_details(ctx: Context<GetSecureDetails>) -> Result<SecureDetails> {
        instructions::get_secure_details::handler(ctx)
    }
}
