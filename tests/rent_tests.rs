//! Rent through the public API, including rent charged on landing.

use rust_monopoly::board::SquareId;
use rust_monopoly::core::{GameConfig, GameEvent, GameState, PlayerId};
use rust_monopoly::dice::ScriptedDice;
use rust_monopoly::input::ScriptedDecisions;
use rust_monopoly::rules::{Holdings, RentCalculator, TurnEngine};

const P0: PlayerId = PlayerId(0);
const P1: PlayerId = PlayerId(1);

const ST_CHARLES: SquareId = SquareId(11);
const STATES: SquareId = SquareId(13);
const VIRGINIA: SquareId = SquareId(14);
const RAILROADS: [SquareId; 4] = [SquareId(5), SquareId(15), SquareId(25), SquareId(35)];
const ELECTRIC: SquareId = SquareId(12);
const WATER: SquareId = SquareId(28);
const BOARDWALK: SquareId = SquareId(39);

fn state() -> GameState {
    GameState::with_defaults(GameConfig::new(2)).unwrap()
}

#[test]
fn test_monopoly_doubles_bare_rent() {
    let mut state = state();
    state.transfer_square(ST_CHARLES, Some(P1)).unwrap();
    state.transfer_square(STATES, Some(P1)).unwrap();

    assert_eq!(RentCalculator::rent(state.board(), ST_CHARLES, 7), 10);

    state.transfer_square(VIRGINIA, Some(P1)).unwrap();
    assert_eq!(RentCalculator::rent(state.board(), ST_CHARLES, 7), 20);
}

#[test]
fn test_houses_use_rent_table() {
    let mut state = state();
    for sq in [ST_CHARLES, STATES, VIRGINIA] {
        state.transfer_square(sq, Some(P1)).unwrap();
    }
    Holdings::build_houses(&mut state, P1, ST_CHARLES, 2).unwrap();

    assert_eq!(RentCalculator::rent(state.board(), ST_CHARLES, 7), 150);

    Holdings::build_houses(&mut state, P1, ST_CHARLES, 3).unwrap();
    assert_eq!(RentCalculator::rent(state.board(), ST_CHARLES, 7), 750);
}

#[test]
fn test_railroad_escalation() {
    let mut state = state();
    let mut expected = Vec::new();
    for &rr in &RAILROADS {
        state.transfer_square(rr, Some(P1)).unwrap();
        expected.push(RentCalculator::rent(state.board(), RAILROADS[0], 7));
    }
    assert_eq!(expected, vec![25, 50, 100, 200]);
}

#[test]
fn test_utility_multiplier() {
    let mut state = state();
    state.transfer_square(ELECTRIC, Some(P1)).unwrap();
    assert_eq!(RentCalculator::rent(state.board(), ELECTRIC, 7), 28);

    state.transfer_square(WATER, Some(P1)).unwrap();
    assert_eq!(RentCalculator::rent(state.board(), ELECTRIC, 7), 70);
}

#[test]
fn test_unowned_square_has_no_rent() {
    let state = state();
    assert_eq!(RentCalculator::rent(state.board(), BOARDWALK, 7), 0);
}

#[test]
fn test_landing_pays_rent_to_owner() {
    let mut state = state();
    state.transfer_square(BOARDWALK, Some(P1)).unwrap();
    state.player_mut(P0).set_position(SquareId::new(36));
    let mut dice = ScriptedDice::from_pairs(&[(1, 2)]).unwrap();
    let mut decisions = ScriptedDecisions::new();

    TurnEngine::movement_phase(&mut state, &mut dice, &mut decisions, P0).unwrap();

    assert_eq!(state.player(P0).cash(), 1450);
    assert_eq!(state.player(P1).cash(), 1550);
    assert!(state.events().contains(&GameEvent::RentPaid {
        payer: P0,
        owner: P1,
        square: BOARDWALK,
        amount: 50,
    }));
}

#[test]
fn test_landing_on_mortgaged_square_is_free() {
    let mut state = state();
    state.transfer_square(BOARDWALK, Some(P1)).unwrap();
    Holdings::mortgage(&mut state, P1, BOARDWALK).unwrap();
    let p1_cash = state.player(P1).cash();
    state.player_mut(P0).set_position(SquareId::new(36));
    let mut dice = ScriptedDice::from_pairs(&[(1, 2)]).unwrap();
    let mut decisions = ScriptedDecisions::new();

    TurnEngine::movement_phase(&mut state, &mut dice, &mut decisions, P0).unwrap();

    assert_eq!(state.player(P0).cash(), 1500);
    assert_eq!(state.player(P1).cash(), p1_cash);
    assert!(!state
        .events()
        .iter()
        .any(|e| matches!(e, GameEvent::RentPaid { .. } | GameEvent::Paid { .. })));
}

#[test]
fn test_utility_rent_uses_landing_roll() {
    let mut state = state();
    state.transfer_square(ELECTRIC, Some(P1)).unwrap();
    state.player_mut(P0).set_position(SquareId::new(7));
    let mut dice = ScriptedDice::from_pairs(&[(2, 3)]).unwrap();
    let mut decisions = ScriptedDecisions::new();

    TurnEngine::movement_phase(&mut state, &mut dice, &mut decisions, P0).unwrap();

    assert_eq!(state.player(P0).cash(), 1480);
}
