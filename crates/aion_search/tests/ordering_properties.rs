//! Property tests for hash/equality consistency and total ordering of
//! clock-derivation contexts and canonical exception-state sets.

mod common;

use aion_search::{
    ClkInfo, ClkInfoParts, ClockEdgeId, ClockUncertainties, ExceptionId, ExceptionKind,
    ExceptionStatePool, ExceptionStates, MatcherState, PathApIndex, PathRef, PinId, RiseFall,
    VertexId,
};
use common::{init_test_logging, staged, TestNetwork};
use proptest::prelude::*;
use std::cmp::Ordering;

// ============================================================================
// Arbitrary Generators
// ============================================================================

fn arb_time() -> impl Strategy<Value = f64> {
    prop_oneof![Just(0.0), Just(1e-15), Just(-1e-15), Just(1e-10), Just(2.5e-10)]
}

fn arb_uncertainties() -> impl Strategy<Value = Option<ClockUncertainties>> {
    proptest::option::of(
        (
            proptest::option::of(arb_time()),
            proptest::option::of(arb_time()),
        )
            .prop_map(|(min, max)| ClockUncertainties::new(min, max)),
    )
}

fn arb_parts() -> impl Strategy<Value = ClkInfoParts> {
    let identity = (
        proptest::option::of((0u32..3).prop_map(ClockEdgeId::from_raw)),
        proptest::option::of((0u32..3).prop_map(PinId::from_raw)),
        proptest::option::of((0u32..2).prop_map(PinId::from_raw)),
        (0u32..2).prop_map(PathApIndex::from_raw),
        proptest::option::of(
            (0u32..3, 0u32..2).prop_map(|(v, t)| PathRef::new(VertexId::from_raw(v), t)),
        ),
    );
    let timing = (
        any::<bool>(),
        any::<bool>(),
        proptest::option::of(prop_oneof![Just(RiseFall::Rise), Just(RiseFall::Fall)]),
        arb_time(),
        arb_time(),
        arb_uncertainties(),
    );
    (identity, timing).prop_map(
        |(
            (clk_edge, clk_src, gen_clk_src, path_ap_index, crpr_clk_path),
            (is_propagated, is_gen_clk_src_path, pulse_clk_sense, insertion, latency, uncertainties),
        )| ClkInfoParts {
            clk_edge,
            clk_src,
            is_propagated,
            gen_clk_src,
            is_gen_clk_src_path,
            pulse_clk_sense,
            insertion,
            latency,
            uncertainties,
            path_ap_index,
            crpr_clk_path,
        },
    )
}

fn arb_state() -> impl Strategy<Value = MatcherState> {
    (
        0u32..6,
        prop_oneof![
            Just(ExceptionKind::FalsePath),
            Just(ExceptionKind::Multicycle),
            Just(ExceptionKind::Filter),
            Just(ExceptionKind::Loop),
        ],
        0u32..2,
    )
        .prop_map(|(id, kind, index)| MatcherState::new(ExceptionId::from_raw(id), kind, index))
}

fn arb_states() -> impl Strategy<Value = Vec<MatcherState>> {
    proptest::collection::vec(arb_state(), 0..5)
}

// ============================================================================
// Clock-derivation context
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn clk_info_equal_implies_same_hash(a in arb_parts(), b in arb_parts(), crpr in any::<bool>()) {
        init_test_logging();
        let network = TestNetwork::with_crpr(crpr);
        let a = ClkInfo::new(a, &network);
        let b = ClkInfo::new(b, &network);
        if a.equal(&b, &network) {
            prop_assert_eq!(a.hash(), b.hash());
        }
    }

    #[test]
    fn clk_info_compare_agrees_with_equal(a in arb_parts(), b in arb_parts(), crpr in any::<bool>()) {
        let network = TestNetwork::with_crpr(crpr);
        let a = ClkInfo::new(a, &network);
        let b = ClkInfo::new(b, &network);
        prop_assert_eq!(a.equal(&b, &network), a.compare(&b, &network) == Ordering::Equal);
    }

    #[test]
    fn clk_info_compare_is_reflexive(a in arb_parts(), crpr in any::<bool>()) {
        let network = TestNetwork::with_crpr(crpr);
        let a = ClkInfo::new(a, &network);
        prop_assert_eq!(a.compare(&a, &network), Ordering::Equal);
        prop_assert!(a.equal(&a, &network));
    }

    #[test]
    fn clk_info_compare_is_antisymmetric(a in arb_parts(), b in arb_parts(), crpr in any::<bool>()) {
        let network = TestNetwork::with_crpr(crpr);
        let a = ClkInfo::new(a, &network);
        let b = ClkInfo::new(b, &network);
        prop_assert_eq!(a.compare(&b, &network), b.compare(&a, &network).reverse());
    }

    #[test]
    fn clk_info_compare_is_transitive(
        a in arb_parts(),
        b in arb_parts(),
        c in arb_parts(),
        crpr in any::<bool>(),
    ) {
        let network = TestNetwork::with_crpr(crpr);
        let mut infos = [
            ClkInfo::new(a, &network),
            ClkInfo::new(b, &network),
            ClkInfo::new(c, &network),
        ];
        infos.sort_by(|x, y| x.compare(y, &network));
        prop_assert_ne!(infos[0].compare(&infos[1], &network), Ordering::Greater);
        prop_assert_ne!(infos[1].compare(&infos[2], &network), Ordering::Greater);
        prop_assert_ne!(infos[0].compare(&infos[2], &network), Ordering::Greater);
    }
}

// ============================================================================
// Staging sets and canonical handles
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn staging_flags_match_rescan(states in arb_states()) {
        let staging = staged(&states);
        let scanned_loop = staging.iter().any(|s| s.kind == ExceptionKind::Loop);
        let scanned_filter = staging.iter().any(|s| s.kind == ExceptionKind::Filter);
        prop_assert_eq!(staging.has_loop_path(), scanned_loop);
        prop_assert_eq!(staging.has_filter_path(), scanned_filter);
    }

    #[test]
    fn promotion_ignores_insert_order(
        (states, shuffled) in arb_states()
            .prop_flat_map(|v| (Just(v.clone()), Just(v).prop_shuffle())),
    ) {
        let pool = ExceptionStatePool::new();
        let a = pool.promote(staged(&states));
        let b = pool.promote(staged(&shuffled));
        prop_assert!(a == b);
        prop_assert_eq!(a.hash_value(), b.hash_value());
        prop_assert!(pool.len() <= 1);
    }

    #[test]
    fn handle_identity_matches_content(a in arb_states(), b in arb_states()) {
        let pool = ExceptionStatePool::new();
        let x = pool.promote(staged(&a));
        let y = pool.promote(staged(&b));
        prop_assert_eq!(x == y, x.content_eq(&y));
        prop_assert_eq!(x == y, x.compare(&y) == Ordering::Equal);
        if x == y {
            prop_assert_eq!(x.hash_value(), y.hash_value());
        }
    }

    #[test]
    fn handle_compare_is_a_total_order(a in arb_states(), b in arb_states(), c in arb_states()) {
        let pool = ExceptionStatePool::new();
        let mut sets = [
            pool.promote(staged(&a)),
            pool.promote(staged(&b)),
            pool.promote(staged(&c)),
        ];
        for x in &sets {
            prop_assert_eq!(x.compare(x), Ordering::Equal);
            for y in &sets {
                prop_assert_eq!(x.compare(y), y.compare(x).reverse());
            }
        }
        sets.sort_by(|x, y| x.compare(y));
        prop_assert_ne!(sets[0].compare(&sets[2]), Ordering::Greater);
    }

    #[test]
    fn pool_holds_exactly_live_entries(groups in proptest::collection::vec(arb_states(), 1..8)) {
        let pool = ExceptionStatePool::new();
        let mut handles: Vec<_> = groups.iter().map(|g| pool.promote(staged(g))).collect();
        let distinct = {
            let mut shapes: Vec<Vec<MatcherState>> = handles
                .iter()
                .filter(|h| !h.is_empty())
                .map(|h| h.iter().copied().collect())
                .collect();
            shapes.sort();
            shapes.dedup();
            shapes.len()
        };
        prop_assert_eq!(pool.len(), distinct);
        handles.clear();
        prop_assert!(pool.is_empty());
        let empty: ExceptionStates<MatcherState> = ExceptionStates::new();
        prop_assert!(pool.promote(empty).is_empty());
    }
}
