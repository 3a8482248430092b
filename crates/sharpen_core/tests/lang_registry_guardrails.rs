use std::collections::HashMap;

use sharpen_core::lang::keywords::{self, KeywordCategory, KeywordId, Reservation};
use sharpen_core::lang::operators::{self, Associativity, OperatorId};
use sharpen_core::lang::punctuation;
use sharpen_core::lang::registry::Since;

#[test]
fn keywords_spellings_unique_and_resolvable() {
    let mut seen: HashMap<&'static str, KeywordId> = HashMap::new();

    for info in keywords::KEYWORDS {
        assert_eq!(
            keywords::from_str(info.canonical),
            Some(info.id),
            "keyword canonical spelling not resolvable: {}",
            info.canonical
        );
        assert_eq!(
            keywords::as_str(info.id),
            info.canonical,
            "keyword as_str mismatch for {:?}",
            info.id
        );

        if let Some(prev) = seen.insert(info.canonical, info.id) {
            panic!(
                "duplicate keyword spelling {:?}: {:?} and {:?}",
                info.canonical, prev, info.id
            );
        }
    }
}

#[test]
fn contextual_keywords_are_not_reserved() {
    for info in keywords::KEYWORDS {
        match info.reservation {
            Reservation::Reserved => assert_eq!(keywords::reserved_from_str(info.canonical), Some(info.id)),
            Reservation::Contextual => assert_eq!(
                keywords::reserved_from_str(info.canonical),
                None,
                "contextual keyword {:?} must lex as an identifier",
                info.canonical
            ),
        }
    }
}

#[test]
fn predefined_types_are_reserved_only() {
    assert!(keywords::is_predefined_type(KeywordId::Int));
    assert!(keywords::is_predefined_type(KeywordId::Void));
    assert!(!keywords::is_predefined_type(KeywordId::Var));
    assert!(!keywords::is_predefined_type(KeywordId::Dynamic));
    assert_eq!(keywords::category(KeywordId::Dynamic), KeywordCategory::PredefinedType);
}

#[test]
fn operators_spellings_unique_and_resolvable() {
    let mut seen: HashMap<&'static str, OperatorId> = HashMap::new();
    for info in operators::OPERATORS {
        assert_eq!(operators::from_str(info.spelling), Some(info.id));
        if let Some(prev) = seen.insert(info.spelling, info.id) {
            panic!("duplicate operator spelling {:?}: {:?} and {:?}", info.spelling, prev, info.id);
        }
    }
}

#[test]
fn binary_precedence_ladder_matches_language_order() {
    let ladder = [
        OperatorId::Eq,
        OperatorId::QuestionQuestion,
        OperatorId::PipePipe,
        OperatorId::AmpAmp,
        OperatorId::Pipe,
        OperatorId::Caret,
        OperatorId::Amp,
        OperatorId::EqEq,
        OperatorId::Lt,
        OperatorId::Shl,
        OperatorId::Plus,
        OperatorId::Star,
        OperatorId::DotDot,
    ];
    for pair in ladder.windows(2) {
        let lo = operators::info_for(pair[0]).precedence;
        let hi = operators::info_for(pair[1]).precedence;
        assert!(lo < hi, "{:?} should bind looser than {:?}", pair[0], pair[1]);
    }
    assert_eq!(operators::info_for(OperatorId::QuestionQuestion).associativity, Associativity::Right);
    assert!(operators::is_assignment(OperatorId::QuestionQuestionEq));
    assert!(!operators::is_assignment(OperatorId::EqEq));
}

#[test]
fn punctuation_spellings_unique_and_resolvable() {
    let mut seen: HashMap<&'static str, punctuation::PunctuationId> = HashMap::new();
    for info in punctuation::PUNCTUATION {
        assert_eq!(punctuation::from_str(info.canonical), Some(info.id));
        assert!(operators::from_str(info.canonical).is_none(), "{:?} is also an operator", info.canonical);
        if let Some(prev) = seen.insert(info.canonical, info.id) {
            panic!("duplicate punctuation {:?}: {:?} and {:?}", info.canonical, prev, info.id);
        }
    }
}

#[test]
fn since_versions_are_plausible() {
    let first = Since(1, 0);
    let latest = Since(12, 0);
    let all = keywords::KEYWORDS
        .iter()
        .map(|i| (i.canonical, i.since))
        .chain(operators::OPERATORS.iter().map(|i| (i.spelling, i.since)))
        .chain(punctuation::PUNCTUATION.iter().map(|i| (i.canonical, i.since)));
    for (spelling, since) in all {
        assert!(first <= since && since <= latest, "{spelling:?} claims {since}");
    }
    // Every reserved word shipped with the first release.
    for info in keywords::KEYWORDS.iter().filter(|i| i.reservation == Reservation::Reserved) {
        assert_eq!(info.since, first, "{:?}", info.canonical);
    }
    assert_eq!(keywords::info_for(KeywordId::Async).since.to_string(), "C# 5.0");
    assert_eq!(operators::info_for(OperatorId::DotDot).since, Since(8, 0));
}
