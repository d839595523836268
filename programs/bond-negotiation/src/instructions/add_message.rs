//! Append a message to a bond's chat log

use crate::errors::BondError;
use crate::events::{BondMotivation, NewChatMessage, SecureDetailRecorded};
use crate::instructions::chat_helpers::apply_message;
use crate::state::{Bond, BondRegistry, BondSecureDetails, ChatMessage, MessageType};
use anchor_lang::prelude::*;

#[derive(Accounts)]
pub struct AddMessage<'info> {
    #[account(
        seeds = [b"registry"],
        bump = registry.bump
    )]
    pub registry: Account<'info, BondRegistry>,

    #[account(
        mut,
        seeds = [b"bond", bond.bond_id.to_le_bytes().as_ref()],
        bump = bond.bump
    )]
    pub bond: Account<'info, Bond>,

    #[account(
        mut,
        seeds = [b"secure", bond.key().as_ref()],
        bump = secure_details.bump,
        has_one = bond
    )]
    pub secure_details: Account<'info, BondSecureDetails>,

    #[account(
        init,
        payer = sender,
        space = ChatMessage::SIZE,
        seeds = [
            b"message",
            bond.key().as_ref(),
            bond.message_count.to_le_bytes().as_ref()
        ],
        bump
    )]
    pub message: Account<'info, ChatMessage>,

    #[account(mut)]
    pub sender: Signer<'info>,

    pub system_program: Program<'info, System>,
}

pub fn handler(ctx: Context<AddMessage>, message_type: u8, payload: String) -> Result<()> {
    let message_type = MessageType::from_u8(message_type).ok_or(BondError::InvalidMessageType)?;

    let max_payload_len = ctx.accounts.registry.max_payload_len;
    let bond_key = ctx.accounts.bond.key();
    let sender = ctx.accounts.sender.key();
    let clock = Clock::get()?;

    let bond = &mut ctx.accounts.bond;
    let record = apply_message(
        bond,
        &mut ctx.accounts.secure_details,
        &sender,
        message_type,
        &payload,
        max_payload_len,
        clock.unix_timestamp,
    )?;

    let message = &mut ctx.accounts.message;
    message.bond = bond_key;
    message.bond_id = bond.bond_id;
    message.index = record.index;
    message.author = sender;
    message.message_type = record.message_type;
    message.recorded_status = record.recorded_status;
    message.created_at = clock.unix_timestamp;
    message.bump = ctx.bumps.message;

    if message_type.is_confidential() {
        // Only the secure store holds confidential content
        emit!(SecureDetailRecorded {
            bond_id: bond.bond_id,
            sender,
            message_type: message_type.as_u8(),
            message_index: record.index,
            timestamp: clock.unix_timestamp,
        });
        if message_type == MessageType::Intro {
            emit!(BondMotivation {
                bond_id: bond.bond_id,
                sender,
                message_index: record.index,
                message: payload,
                timestamp: clock.unix_timestamp,
            });
        }
    } else {
        message.payload = payload.clone();
        emit!(NewChatMessage {
            bond_id: bond.bond_id,
            sender,
            message_index: record.index,
            message: payload,
            timestamp: clock.unix_timestamp,
        });
    }

    Ok(())
}
