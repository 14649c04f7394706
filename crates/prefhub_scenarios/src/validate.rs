//! Offline checks for scenario files.
//!
//! Catches the mistakes that would otherwise only show up mid-run against a
//! live server: unknown actions or players, missing move fields and card
//! tokens that do not parse.

use std::collections::HashSet;
use std::fmt;

use prefhub_core::Card;

use crate::moves::{Move, MoveAction};
use crate::scenario::{DeckSetup, ScenarioStore};

/// A problem found in a scenario file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationIssue {
    /// Test the problem is in.
    pub test: String,
    /// Where in the test, e.g. `misere, move 2` or `deck.prikup`.
    pub location: String,
    /// What is wrong.
    pub message: String,
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}]: {}", self.test, self.location, self.message)
    }
}

/// Check every test in `store`.
pub fn validate_store(store: &ScenarioStore) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();

    for (name, test) in store.tests() {
        let mut report = |location: String, message: String| {
            issues.push(ValidationIssue {
                test: name.to_string(),
                location,
                message,
            });
        };

        if let Some(deck) = &test.deck {
            check_deck(deck, &mut report);
        }

        for scenario in &test.scenarios {
            for (index, spec) in scenario.moves.iter().enumerate() {
                let location = format!("{}, move {}", scenario.name, index + 1);
                match Move::try_from(spec) {
                    Ok(mv) => {
                        if let Err(e) = check_cards(&mv.action) {
                            report(location, e.to_string());
                        }
                    }
                    Err(e) => report(location, e.to_string()),
                }
            }
        }
    }

    tracing::debug!(tests = store.len(), issues = issues.len(), "Validated scenarios");
    issues
}

fn check_cards(action: &MoveAction) -> Result<(), prefhub_core::CardFormatError> {
    match action {
        MoveAction::Bid { .. } => Ok(()),
        MoveAction::TakePrikup { discard } => Card::parse_tokens(discard).map(|_| ()),
        MoveAction::PlayCard { card } => Card::parse_token(card).map(|_| ()),
    }
}

fn check_deck(deck: &DeckSetup, report: &mut impl FnMut(String, String)) {
    let mut seen = HashSet::new();
    for (label, tokens) in deck.hands() {
        for token in tokens {
            match Card::parse_token(token) {
                Ok(card) => {
                    if !seen.insert(card) {
                        report(format!("deck.{label}"), format!("Duplicate card {token}"));
                    }
                }
                Err(e) => report(format!("deck.{label}"), e.to_string()),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use prefhub_test_utils::fixtures::SCENARIOS_JSON;

    #[test]
    fn test_fixture_issues() {
        let store = ScenarioStore::from_json_str(SCENARIOS_JSON).unwrap();
        let issues = validate_store(&store);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].test, "unknown-action");
        assert_eq!(issues[0].location, "bad-action, move 2");
        assert!(issues[0].message.contains("shuffle"));
    }

    #[test]
    fn test_bad_card_tokens() {
        let json = r#"{"tests":{"t":{
            "game":"g",
            "deck":{"playerWest":["ACE_SPADES","ACE_SPADES"],"prikup":["JOKER"]},
            "scenarios":[{"name":"s","moves":[
                {"action":"playCard","player":"playerWest","card":"ONE_SPADES"},
                {"action":"takePrikup","player":"playerSouth","discard":["TEN_HEARTS","TEN_CUPS"]},
                {"action":"bid","player":"playerEast"}
            ]}]
        }}}"#;
        let store = ScenarioStore::from_json_str(json).unwrap();
        let issues = validate_store(&store);
        let locations: Vec<_> = issues.iter().map(|i| i.location.as_str()).collect();
        assert_eq!(
            locations,
            vec![
                "deck.playerWest",
                "deck.prikup",
                "s, move 1",
                "s, move 2",
                "s, move 3"
            ]
        );
        assert!(issues[0].message.contains("Duplicate"));
    }

    #[test]
    fn test_clean_file() {
        let json = r#"{"tests":{"t":{"game":"g","scenarios":[{"name":"s","moves":[
            {"action":"bid","player":"playerSouth","contract":"PASS"}
        ]}]}}}"#;
        let store = ScenarioStore::from_json_str(json).unwrap();
        assert!(validate_store(&store).is_empty());
    }
}
