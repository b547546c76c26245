//! Property-based tests for the dialogue state machine
//!
//! These tests verify key invariants hold across all possible inputs.

use super::event::{Choice, Command};
use super::transition::*;
use super::*;
use crate::forecast::ForecastDays;
use proptest::prelude::*;

// ============================================================================
// Arbitrary Generators
// ============================================================================

fn arb_city() -> impl Strategy<Value = String> {
    "[A-Za-z][A-Za-z \\-]{0,20}"
}

fn arb_days() -> impl Strategy<Value = ForecastDays> {
    prop_oneof![Just(ForecastDays::Three), Just(ForecastDays::Five)]
}

fn arb_choice() -> impl Strategy<Value = Choice> {
    prop_oneof![
        Just(Choice::AddMidpoints),
        Just(Choice::SkipMidpoints),
        arb_days().prop_map(Choice::ForecastDays),
    ]
}

fn arb_command() -> impl Strategy<Value = Command> {
    prop_oneof![
        Just(Command::Start),
        Just(Command::Help),
        Just(Command::Weather),
    ]
}

fn arb_event() -> impl Strategy<Value = Event> {
    prop_oneof![
        arb_command().prop_map(Event::Command),
        "[A-Za-z ,]{0,30}".prop_map(|text| Event::Text { text }),
        arb_choice().prop_map(Event::Choice),
    ]
}

fn arb_state() -> impl Strategy<Value = DialogState> {
    prop_oneof![
        Just(DialogState::Idle),
        Just(DialogState::AwaitingStartCity),
        arb_city().prop_map(|start_city| DialogState::AwaitingEndCity { start_city }),
        (arb_city(), arb_city()).prop_map(|(start_city, end_city)| {
            DialogState::AwaitingMidpoints {
                start_city,
                end_city,
            }
        }),
        (
            arb_city(),
            arb_city(),
            proptest::collection::vec(arb_city(), 0..4)
        )
            .prop_map(|(start_city, end_city, midpoints)| {
                DialogState::AwaitingForecastLength {
                    start_city,
                    end_city,
                    midpoints,
                }
            }),
    ]
}

/// How the user supplies intermediate stops in a valid dialogue
#[derive(Debug, Clone)]
enum MidpointInput {
    Skip,
    Typed(Vec<String>),
    AddThenTyped(Vec<String>),
}

fn arb_midpoint_input() -> impl Strategy<Value = MidpointInput> {
    let cities = || proptest::collection::vec(arb_city(), 1..4);
    prop_oneof![
        Just(MidpointInput::Skip),
        cities().prop_map(MidpointInput::Typed),
        cities().prop_map(MidpointInput::AddThenTyped),
    ]
}

fn state_order(state: &DialogState) -> u8 {
    match state {
        DialogState::Idle => 0,
        DialogState::AwaitingStartCity => 1,
        DialogState::AwaitingEndCity { .. } => 2,
        DialogState::AwaitingMidpoints { .. } => 3,
        DialogState::AwaitingForecastLength { .. } => 4,
    }
}

// ============================================================================
// Property Tests
// ============================================================================

proptest! {
    // Invariant 1: a valid dialogue visits the states strictly in order and
    // ends in Idle with a GenerateForecast for the collected route
    #[test]
    fn prop_valid_dialogue_visits_states_in_order(
        start in arb_city(),
        end in arb_city(),
        midpoints in arb_midpoint_input(),
        days in arb_days(),
    ) {
        let mut events = vec![
            Event::Command(Command::Weather),
            Event::Text { text: start.clone() },
            Event::Text { text: end.clone() },
        ];
        let expected_midpoints = match &midpoints {
            MidpointInput::Skip => {
                events.push(Event::Choice(Choice::SkipMidpoints));
                vec![]
            }
            MidpointInput::Typed(cities) => {
                events.push(Event::Text { text: cities.join(",") });
                cities.iter().map(|c| c.trim().to_string()).filter(|c| !c.is_empty()).collect()
            }
            MidpointInput::AddThenTyped(cities) => {
                events.push(Event::Choice(Choice::AddMidpoints));
                events.push(Event::Text { text: cities.join(", ") });
                cities.iter().map(|c| c.trim().to_string()).filter(|c| !c.is_empty()).collect()
            }
        };
        events.push(Event::Choice(Choice::ForecastDays(days)));

        let mut state = DialogState::Idle;
        let mut visited = vec![state_order(&state)];
        let mut effects_log: Vec<Vec<Effect>> = Vec::new();
        for event in events {
            let result = transition(&state, event);
            prop_assert!(result.is_ok(), "Valid dialogue rejected: {:?}", result);
            let result = result.unwrap();
            state = result.new_state;
            if visited.last() != Some(&state_order(&state)) {
                visited.push(state_order(&state));
            }
            effects_log.push(result.effects);
        }

        prop_assert_eq!(visited, vec![0, 1, 2, 3, 4, 0]);

        let mut expected_route = vec![start];
        expected_route.extend(expected_midpoints);
        expected_route.push(end);
        let last_effects = effects_log.last().map(Vec::as_slice).unwrap_or_default();
        match last_effects {
            [Effect::GenerateForecast { route, days: chosen }] => {
                prop_assert_eq!(route.cities(), expected_route.as_slice());
                prop_assert_eq!(*chosen, days);
            }
            other => prop_assert!(false, "Expected GenerateForecast, got {:?}", other),
        }
    }

    // Invariant 2: /weather always restarts the query
    #[test]
    fn prop_weather_command_always_restarts(state in arb_state()) {
        let result = transition(&state, Event::Command(Command::Weather));
        prop_assert!(result.is_ok());
        prop_assert_eq!(result.unwrap().new_state, DialogState::AwaitingStartCity);
    }

    // Invariant 3: no transition moves backwards except a restart or the
    // final reset to Idle
    #[test]
    fn prop_no_back_transitions(state in arb_state(), event in arb_event()) {
        let is_restart = matches!(event, Event::Command(Command::Weather));
        if let Ok(result) = transition(&state, event) {
            let from = state_order(&state);
            let to = state_order(&result.new_state);
            prop_assert!(
                is_restart || to == 0 || to >= from,
                "Moved backwards: {:?} -> {:?}",
                state,
                result.new_state
            );
            if from > 0 && to == 0 {
                prop_assert!(
                    result.effects.iter().any(|e| matches!(e, Effect::GenerateForecast { .. })),
                    "Reset to Idle without generating a forecast"
                );
            }
        }
    }

    // Invariant 4: every accepted input produces at least one reply
    #[test]
    fn prop_accepted_inputs_reply(state in arb_state(), event in arb_event()) {
        if let Ok(result) = transition(&state, event) {
            prop_assert!(!result.effects.is_empty());
        }
    }

    // Invariant 5: midpoint parsing never yields blank entries and keeps order
    #[test]
    fn prop_parse_midpoints_clean(cities in proptest::collection::vec("[A-Za-z]{1,10}", 0..6), pad in " {0,3}") {
        let text = cities
            .iter()
            .map(|c| format!("{pad}{c}{pad}"))
            .collect::<Vec<_>>()
            .join(&format!(",{pad},"));
        let parsed = parse_midpoints(&text);
        prop_assert_eq!(parsed, cities);
    }
}
