//! Reference scenarios for phase derivation and action resolution

use duel::{
    ActionAvailabilityResolver, ActionKind, Address, GamePhase, GamePhaseDeriver, Move, Stake,
    TimeoutCalculator, ViewerRole,
};
use crate::mocks::fixtures::{SnapshotBuilder, ALICE, BOB, CAROL, T};

fn transactional(phase: &GamePhase, role: ViewerRole) -> Vec<ActionKind> {
    ActionAvailabilityResolver::resolve(phase, role).transactional().copied().collect()
}

#[test]
fn test_scenario_a_awaiting_player2() {
    let snapshot = SnapshotBuilder::new().player2(Address::ZERO).stake(1000).timeout(600).build();

    let phase = GamePhaseDeriver::derive(&snapshot, T + 100).unwrap();

    assert_eq!(phase, GamePhase::AwaitingPlayer2 { stake: Stake::from_wei(1000), remaining: 500 });
    assert_eq!(TimeoutCalculator::remaining(600, T, T + 100), 500);
    assert_eq!(phase.remaining(), 500);
}

#[test]
fn test_scenario_b_awaiting_player1_reveal() {
    let snapshot = SnapshotBuilder::new().player2_move(2).build();

    let phase = GamePhaseDeriver::derive(&snapshot, T + 10).unwrap();

    assert!(matches!(phase, GamePhase::AwaitingPlayer1Reveal { player2_move: Move::Paper, .. }));
    assert_eq!(transactional(&phase, ViewerRole::Player1), vec![ActionKind::Reveal]);
}

#[test]
fn test_scenario_c_timed_out_awaiting_player1_claim() {
    let snapshot = SnapshotBuilder::new().player2_move(0).timeout(600).build();

    let phase = GamePhaseDeriver::derive(&snapshot, T + 700).unwrap();

    assert_eq!(phase, GamePhase::TimedOutAwaitingPlayer1Claim { stake: Stake::from_wei(1000) });
    assert_eq!(TimeoutCalculator::remaining(600, T, T + 700), 0);
    assert_eq!(transactional(&phase, ViewerRole::Player1), vec![ActionKind::ClaimTimeoutRefund]);
}

#[test]
fn test_scenario_d_settled_ambiguous() {
    let snapshot = SnapshotBuilder::new().player2_move(2).stake(0).build();

    for now in [T + 600, T + 601, T + 86_400] {
        let phase = GamePhaseDeriver::derive(&snapshot, now).unwrap();
        assert_eq!(phase, GamePhase::SettledAmbiguous { player2_move: Move::Paper });

        for role in [ViewerRole::Player1, ViewerRole::Player2] {
            let actions = ActionAvailabilityResolver::resolve(&phase, role);
            assert_eq!(actions.transactional().count(), 0);
            assert!(actions.contains(&ActionKind::ViewStatus));
        }
    }
}

#[test]
fn test_scenario_e_absent_viewer_is_spectator() {
    let now_and_snapshots = [
        (T + 100, SnapshotBuilder::new().build()),
        (T + 10, SnapshotBuilder::new().player2_move(1).build()),
        (T + 700, SnapshotBuilder::new().build()),
        (T + 700, SnapshotBuilder::new().player2_move(4).build()),
        (T, SnapshotBuilder::new().stake(0).build()),
        (T, SnapshotBuilder::new().stake(0).player2_move(3).build()),
    ];

    for (now, snapshot) in now_and_snapshots {
        assert_eq!(ViewerRole::identify(None, &snapshot), ViewerRole::Spectator);

        let phase = GamePhaseDeriver::derive(&snapshot, now).unwrap();
        let actions = ActionAvailabilityResolver::resolve(&phase, ViewerRole::Spectator);

        assert!(actions.contains(&ActionKind::ViewStatus));
        match phase {
            GamePhase::AwaitingPlayer2 { stake, .. } => {
                assert_eq!(actions.len(), 2);
                assert!(actions.contains(&ActionKind::Join { stake }));
            }
            _ => assert_eq!(actions.len(), 1, "phase {phase}"),
        }
    }
}

#[test]
fn test_timed_out_player2_claim_belongs_to_player2() {
    let snapshot = SnapshotBuilder::new().player2_move(5).build();
    let phase = GamePhaseDeriver::derive(&snapshot, T + 600).unwrap();

    assert_eq!(ViewerRole::identify(Some(BOB), &snapshot), ViewerRole::Player2);
    assert_eq!(transactional(&phase, ViewerRole::Player2), vec![ActionKind::ClaimTimeoutStake]);
    assert!(transactional(&phase, ViewerRole::Player1).is_empty());
    assert!(transactional(&phase, ViewerRole::Spectator).is_empty());
}

#[test]
fn test_reveal_races_timeout_at_boundary() {
    let snapshot = SnapshotBuilder::new().player2_move(1).build();

    let before = GamePhaseDeriver::derive(&snapshot, T + 599).unwrap();
    let at = GamePhaseDeriver::derive(&snapshot, T + 600).unwrap();

    assert_eq!(transactional(&before, ViewerRole::Player1), vec![ActionKind::Reveal]);
    assert!(transactional(&at, ViewerRole::Player1).is_empty());
    assert_eq!(transactional(&at, ViewerRole::Player2), vec![ActionKind::ClaimTimeoutStake]);
}

#[test]
fn test_outsider_viewer_is_spectator() {
    let snapshot = SnapshotBuilder::new().build();
    assert_eq!(ViewerRole::identify(Some(CAROL), &snapshot), ViewerRole::Spectator);
    assert_eq!(ViewerRole::identify(Some(ALICE), &snapshot), ViewerRole::Player1);
}

#[test]
fn test_zero_timeout_with_clock_behind_chain_is_still_open() {
    let snapshot = SnapshotBuilder::new().timeout(0).build();

    let phase = GamePhaseDeriver::derive(&snapshot, T - 30).unwrap();

    assert_eq!(phase, GamePhase::AwaitingPlayer2 { stake: Stake::from_wei(1000), remaining: 30 });
    assert_eq!(transactional(&phase, ViewerRole::Player2), vec![ActionKind::Join { stake: Stake::from_wei(1000) }]);

    let at_last_action = GamePhaseDeriver::derive(&snapshot, T).unwrap();
    assert_eq!(at_last_action, GamePhase::TimedOutAwaitingPlayer1Claim { stake: Stake::from_wei(1000) });
}
