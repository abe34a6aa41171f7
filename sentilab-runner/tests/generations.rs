//! Property tests for the per-family validity token.

use proptest::prelude::*;

use sentilab_core::DataError;
use sentilab_runner::{FamilyKind, Outcome, QueryFamily};

proptest! {
    /// However many keys are selected and in whatever order their fetches
    /// complete, exactly one completion lands and it belongs to the last key.
    #[test]
    fn only_the_last_selected_key_applies(
        keys in prop::collection::vec(0u8..6, 1..12),
        order_seed in prop::collection::vec(any::<u32>(), 12),
        fail_mask in prop::collection::vec(any::<bool>(), 12),
    ) {
        let mut family: QueryFamily<u8, u8> = QueryFamily::new(FamilyKind::Price);
        let tickets: Vec<_> = keys.iter().filter_map(|k| family.select(*k)).collect();
        prop_assume!(!tickets.is_empty());
        let last_key = tickets[tickets.len() - 1].key;

        let mut order: Vec<usize> = (0..tickets.len()).collect();
        order.sort_by_key(|i| order_seed[*i]);

        let mut landed = Vec::new();
        for i in order {
            let ticket = tickets[i].clone();
            let key = ticket.key;
            let result = if fail_mask[i] {
                Err(DataError::Network(format!("key {key}")))
            } else {
                Ok(key)
            };
            match family.complete(ticket, result) {
                Outcome::Discarded => {}
                _ => landed.push(key),
            }
        }

        prop_assert_eq!(landed, vec![last_key]);
        let state = family.state();
        prop_assert_eq!(state.key, Some(last_key));
        prop_assert!(!state.loading);
        prop_assert!(state.result.is_some() ^ state.error.is_some());
    }
}
