//! Property-based tests for phase derivation and action resolution

use proptest::prelude::*;
use duel::{
    ActionAvailabilityResolver, ActionKind, Address, GamePhase, GamePhaseDeriver, GameStateSnapshot,
    Move, MoveCommitment, Stake, ViewerRole,
};

/// Snapshots that respect the contract's invariants
fn arb_consistent_snapshot() -> impl Strategy<Value = GameStateSnapshot> {
    (
        prop_oneof![Just(0u128), 1u128..=u128::from(u64::MAX)],
        any::<[u8; 20]>().prop_filter("non-zero player 1", |b| b != &[0u8; 20]),
        prop_oneof![Just([0u8; 20]), any::<[u8; 20]>()],
        0u8..=5,
        0u64..100_000,
        1_600_000_000u64..1_800_000_000,
    )
        .prop_map(|(stake, p1, p2, mv, timeout, last_action)| {
            // A move can only exist once somebody holds the player 2 slot
            let mv = if p2 == [0u8; 20] { 0 } else { mv };
            GameStateSnapshot::new(
                Stake::from_wei(stake),
                Address::new(p1),
                Address::new(p2),
                MoveCommitment::default(),
                mv,
                timeout,
                last_action,
            )
        })
}

fn arb_now() -> impl Strategy<Value = u64> {
    1_600_000_000u64..1_900_000_000
}

fn arb_phase() -> impl Strategy<Value = GamePhase> {
    let arb_move = (1u8..=5).prop_map(|c| Move::from_code(c).unwrap());
    let arb_stake = (1u128..=u128::MAX).prop_map(Stake::from_wei);
    prop_oneof![
        (arb_stake.clone(), any::<u64>()).prop_map(|(stake, remaining)| GamePhase::AwaitingPlayer2 { stake, remaining }),
        (arb_move.clone(), any::<u64>()).prop_map(|(player2_move, remaining)| GamePhase::AwaitingPlayer1Reveal { player2_move, remaining }),
        arb_stake.clone().prop_map(|stake| GamePhase::TimedOutAwaitingPlayer1Claim { stake }),
        (arb_stake, arb_move.clone()).prop_map(|(stake, player2_move)| GamePhase::TimedOutAwaitingPlayer2Claim { stake, player2_move }),
        Just(GamePhase::SettledNoPlayer2),
        arb_move.prop_map(|player2_move| GamePhase::SettledAmbiguous { player2_move }),
    ]
}

fn arb_role() -> impl Strategy<Value = ViewerRole> {
    prop::sample::select(ViewerRole::ALL.to_vec())
}

/// Independent restatement of the phase table, one predicate per row
fn matching_rows(snapshot: &GameStateSnapshot, now: u64) -> Vec<&'static str> {
    let stake = snapshot.stake().wei();
    let moved = snapshot.player2_move_code() != 0;
    let timed_out = i128::from(now) - i128::from(snapshot.last_action()) >= i128::from(snapshot.timeout());

    let rows = [
        ("awaiting_player2", stake > 0 && !moved && !timed_out),
        ("awaiting_player1_reveal", stake > 0 && moved && !timed_out),
        ("timed_out_awaiting_player1_claim", timed_out && stake > 0 && !moved),
        ("timed_out_awaiting_player2_claim", timed_out && stake > 0 && moved),
        ("settled_no_player2", stake == 0 && !moved),
        ("settled_ambiguous", stake == 0 && moved),
    ];

    rows.iter().filter(|(_, holds)| *holds).map(|(name, _)| *name).collect()
}

proptest! {
    #[test]
    fn prop_derive_is_deterministic(snapshot in arb_consistent_snapshot(), now in arb_now()) {
        let first = GamePhaseDeriver::derive(&snapshot, now).unwrap();
        let second = GamePhaseDeriver::derive(&snapshot.clone(), now).unwrap();
        prop_assert_eq!(first, second);
        prop_assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }

    #[test]
    fn prop_exactly_one_phase_row_holds(snapshot in arb_consistent_snapshot(), now in arb_now()) {
        let rows = matching_rows(&snapshot, now);
        prop_assert_eq!(rows.len(), 1);

        let phase = GamePhaseDeriver::derive(&snapshot, now).unwrap();
        prop_assert_eq!(phase.name(), rows[0]);
    }

    #[test]
    fn prop_settled_iff_stake_is_zero(snapshot in arb_consistent_snapshot(), now in arb_now()) {
        let phase = GamePhaseDeriver::derive(&snapshot, now).unwrap();
        prop_assert_eq!(phase.is_settled(), snapshot.stake().is_zero());
    }

    #[test]
    fn prop_provisional_snapshots_never_derive(snapshot in arb_consistent_snapshot(), now in arb_now()) {
        let result = GamePhaseDeriver::derive(&snapshot.into_provisional(), now);
        prop_assert!(result.unwrap_err().is_inconsistent_state());
    }

    #[test]
    fn prop_resolver_is_pure(phase in arb_phase(), role in arb_role()) {
        let first = ActionAvailabilityResolver::resolve(&phase, role);
        let second = ActionAvailabilityResolver::resolve(&phase, role);
        prop_assert_eq!(first, second);
    }

    #[test]
    fn prop_resolved_actions_fit_phase(phase in arb_phase(), role in arb_role()) {
        let actions = ActionAvailabilityResolver::resolve(&phase, role);

        prop_assert!(actions.contains(&ActionKind::ViewStatus));
        prop_assert!(actions.is_consistent_with(&phase));
        prop_assert!(actions.transactional().count() <= 1);

        if phase.is_settled() {
            prop_assert_eq!(actions.len(), 1);
        }
    }

    #[test]
    fn prop_only_owner_may_claim(phase in arb_phase()) {
        for role in ViewerRole::ALL {
            let actions = ActionAvailabilityResolver::resolve(&phase, role);
            if actions.contains(&ActionKind::ClaimTimeoutRefund) || actions.contains(&ActionKind::Reveal) {
                prop_assert_eq!(role, ViewerRole::Player1);
            }
            if actions.contains(&ActionKind::ClaimTimeoutStake) {
                prop_assert_eq!(role, ViewerRole::Player2);
            }
        }
    }
}

/// Every phase shape crossed with every role
#[test]
fn test_resolver_table_is_exhaustive() {
    let stake = Stake::from_wei(42);
    let phases = [
        GamePhase::AwaitingPlayer2 { stake, remaining: 1 },
        GamePhase::AwaitingPlayer1Reveal { player2_move: Move::Rock, remaining: 1 },
        GamePhase::TimedOutAwaitingPlayer1Claim { stake },
        GamePhase::TimedOutAwaitingPlayer2Claim { stake, player2_move: Move::Rock },
        GamePhase::SettledNoPlayer2,
        GamePhase::SettledAmbiguous { player2_move: Move::Rock },
    ];

    let expected = |phase: &GamePhase, role: ViewerRole| -> Option<ActionKind> {
        match (phase, role) {
            (GamePhase::AwaitingPlayer2 { .. }, ViewerRole::Spectator | ViewerRole::Player2) => Some(ActionKind::Join { stake }),
            (GamePhase::AwaitingPlayer1Reveal { .. }, ViewerRole::Player1) => Some(ActionKind::Reveal),
            (GamePhase::TimedOutAwaitingPlayer1Claim { .. }, ViewerRole::Player1) => Some(ActionKind::ClaimTimeoutRefund),
            (GamePhase::TimedOutAwaitingPlayer2Claim { .. }, ViewerRole::Player2) => Some(ActionKind::ClaimTimeoutStake),
            _ => None,
        }
    };

    for phase in &phases {
        for role in ViewerRole::ALL {
            let actions = ActionAvailabilityResolver::resolve(phase, role);
            let offered: Vec<ActionKind> = actions.transactional().copied().collect();
            assert_eq!(offered, expected(phase, role).into_iter().collect::<Vec<_>>(), "phase {phase} role {role}");
            assert!(actions.is_consistent_with(phase));
        }
    }
}
