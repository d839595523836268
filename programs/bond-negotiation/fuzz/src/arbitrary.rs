//! Arbitrary input generators for fuzz testing
//!
//! Generates random but valid inputs for testing bond instructions.

use anchor_lang::prelude::Pubkey;
use bond_negotiation::state::{BondTerms, MAX_PAYLOAD_LEN};
use proptest::prelude::*;

/// Arbitrary 32-byte identifier (pubkey bytes)
pub fn arb_id() -> impl Strategy<Value = [u8; 32]> {
    prop::array::uniform32(any::<u8>())
}

/// Callers taking part in a simulated negotiation.
///
/// `Holder` is only the bond holder once the issuer has selected that key;
/// until then it behaves like any other prospect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Actor {
    Issuer,
    Holder,
    Prospect,
    Stranger,
}

impl Actor {
    pub const ALL: [Actor; 4] = [Actor::Issuer, Actor::Holder, Actor::Prospect, Actor::Stranger];

    pub fn key(self) -> Pubkey {
        match self {
            Actor::Issuer => Pubkey::new_from_array([1; 32]),
            Actor::Holder => Pubkey::new_from_array([2; 32]),
            Actor::Prospect => Pubkey::new_from_array([3; 32]),
            Actor::Stranger => Pubkey::new_from_array([4; 32]),
        }
    }
}

pub fn arb_actor() -> impl Strategy<Value = Actor> {
    prop_oneof![
        // The issuer drives most transitions
        3 => Just(Actor::Issuer),
        2 => Just(Actor::Holder),
        1 => Just(Actor::Prospect),
        1 => Just(Actor::Stranger),
    ]
}

/// Arbitrary status code, mostly valid with some out-of-range values
pub fn arb_status_code() -> impl Strategy<Value = u8> {
    prop_oneof![
        9 => 0u8..=6u8,
        1 => 7u8..=u8::MAX,
    ]
}

/// Arbitrary message type code, mostly valid with some out-of-range values
pub fn arb_message_type_code() -> impl Strategy<Value = u8> {
    prop_oneof![
        9 => 0u8..=3u8,
        1 => 4u8..=u8::MAX,
    ]
}

/// Arbitrary terms, either complete or with unset fields
pub fn arb_terms() -> impl Strategy<Value = BondTerms> {
    prop_oneof![
        // Complete terms
        3 => (1u64..=u64::MAX, 1u16..=u16::MAX, 1u32..=u32::MAX, 1i64..=i64::MAX, 1u8..=u8::MAX)
            .prop_map(|(principal, coupon_rate, coupon_date, maturity_date, currency)| {
                BondTerms {
                    principal,
                    coupon_rate,
                    coupon_date,
                    maturity_date,
                    currency,
                }
            }),
        // Any combination, zeros included
        1 => (
            prop_oneof![Just(0u64), any::<u64>()],
            prop_oneof![Just(0u16), any::<u16>()],
            prop_oneof![Just(0u32), any::<u32>()],
            prop_oneof![Just(0i64), any::<i64>()],
            prop_oneof![Just(0u8), any::<u8>()],
        )
            .prop_map(|(principal, coupon_rate, coupon_date, maturity_date, currency)| {
                BondTerms {
                    principal,
                    coupon_rate,
                    coupon_date,
                    maturity_date,
                    currency,
                }
            }),
    ]
}

/// Arbitrary payload: empty, typical, multi-byte, or over the storage limit
pub fn arb_payload() -> impl Strategy<Value = String> {
    prop_oneof![
        1 => Just(String::new()),
        6 => "[a-zA-Z0-9 .,]{1,64}",
        1 => "[éü€]{1,32}",
        1 => Just("x".repeat(MAX_PAYLOAD_LEN)),
        1 => Just("x".repeat(MAX_PAYLOAD_LEN + 1)),
    ]
}

/// One instruction against a bond
#[derive(Debug, Clone)]
pub enum BondAction {
    UpdateTerms(BondTerms),
    RequestStatusChange(u8),
    SetHolder(Actor),
    Sign,
    AddMessage { message_type: u8, payload: String },
    ReadSecureDetails,
}

pub fn arb_action() -> impl Strategy<Value = BondAction> {
    prop_oneof![
        2 => arb_terms().prop_map(BondAction::UpdateTerms),
        4 => arb_status_code().prop_map(BondAction::RequestStatusChange),
        2 => arb_actor().prop_map(BondAction::SetHolder),
        3 => Just(BondAction::Sign),
        3 => (arb_message_type_code(), arb_payload())
            .prop_map(|(message_type, payload)| BondAction::AddMessage { message_type, payload }),
        1 => Just(BondAction::ReadSecureDetails),
    ]
}

/// An action together with the caller submitting it
#[derive(Debug, Clone)]
pub struct ActionInput {
    pub actor: Actor,
    pub action: BondAction,
}

impl Arbitrary for ActionInput {
    type Parameters = ();
    type Strategy = BoxedStrategy<Self>;

    fn arbitrary_with(_: Self::Parameters) -> Self::Strategy {
        (arb_actor(), arb_action())
            .prop_map(|(actor, action)| ActionInput { actor, action })
            .boxed()
    }
}

/// Input for whole-negotiation fuzz testing
#[derive(Debug, Clone)]
pub struct NegotiationInput {
    pub max_payload_len: u16,
    pub steps: Vec<ActionInput>,
}

impl Arbitrary for NegotiationInput {
    type Parameters = ();
    type Strategy = BoxedStrategy<Self>;

    fn arbitrary_with(_: Self::Parameters) -> Self::Strategy {
        (
            prop_oneof![Just(MAX_PAYLOAD_LEN as u16), 1u16..=MAX_PAYLOAD_LEN as u16],
            prop::collection::vec(any::<ActionInput>(), 1..48),
        )
            .prop_map(|(max_payload_len, steps)| NegotiationInput {
                max_payload_len,
                steps,
            })
            .boxed()
    }
}
