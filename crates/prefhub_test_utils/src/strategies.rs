//! Proptest strategies for cards and card tokens.

use prefhub_core::{Card, Rank, Suit};
use proptest::prelude::*;

/// Any rank.
pub fn arb_rank() -> impl Strategy<Value = Rank> {
    proptest::sample::select(Rank::ALL.to_vec())
}

/// Any suit.
pub fn arb_suit() -> impl Strategy<Value = Suit> {
    proptest::sample::select(Suit::ALL.to_vec())
}

/// Any of the 32 cards.
pub fn arb_card() -> impl Strategy<Value = Card> {
    (arb_rank(), arb_suit()).prop_map(|(rank, suit)| Card::new(rank, suit))
}

/// A well-formed `RANK_SUIT` token.
pub fn arb_valid_token() -> impl Strategy<Value = String> {
    arb_card().prop_map(|card| card.token())
}

/// A token that does not have exactly two non-empty parts.
///
/// Covers: no separator, two or more separators, and an empty rank or suit.
pub fn arb_misshapen_token() -> impl Strategy<Value = String> {
    prop_oneof![
        "[A-Z0-9]{0,12}",
        "[A-Z0-9]{0,6}_[A-Z]{0,6}_[A-Z_]{0,6}",
        "_[A-Z]{0,8}",
        "[A-Z0-9]{0,8}_",
    ]
}

/// A two-part token whose parts are not rank/suit names.
///
/// Suit names are at least five letters, so a three-letter suit part is
/// never valid.
pub fn arb_unknown_name_token() -> impl Strategy<Value = String> {
    "[A-Z0-9]{1,8}_[A-Z]{1,3}"
}

/// A discard list of valid tokens.
pub fn arb_discard(max_len: usize) -> impl Strategy<Value = Vec<String>> {
    proptest::collection::vec(arb_valid_token(), 0..max_len)
}
