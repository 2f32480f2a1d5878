use std::collections::HashMap;

use adorad_core::lang::{attributes, keywords, operators, punctuation};

#[test]
fn keywords_spellings_unique_and_resolvable() {
    let mut seen: HashMap<&'static str, keywords::KeywordId> = HashMap::new();

    for info in keywords::KEYWORDS {
        assert_eq!(
            keywords::from_str(info.canonical),
            Some(info.id),
            "keyword spelling not resolvable: {}",
            info.canonical
        );
        if let Some(prev) = seen.insert(info.canonical, info.id) {
            panic!("duplicate keyword spelling {:?}: {:?} and {:?}", info.canonical, prev, info.id);
        }
    }
}

#[test]
fn operators_spellings_unique_and_resolvable() {
    let mut seen: HashMap<&'static str, operators::OperatorId> = HashMap::new();

    for info in operators::OPERATORS {
        assert_eq!(operators::from_str(info.spelling), Some(info.id));
        assert_eq!(operators::as_str(info.id), info.spelling);
        if let Some(prev) = seen.insert(info.spelling, info.id) {
            panic!("duplicate operator spelling {:?}: {:?} and {:?}", info.spelling, prev, info.id);
        }
    }
}

#[test]
fn punctuation_does_not_shadow_operators() {
    for info in punctuation::PUNCTUATION {
        assert_eq!(punctuation::from_str(info.canonical), Some(info.id));
        assert!(
            operators::from_str(info.canonical).is_none(),
            "punctuation {:?} is also an operator spelling",
            info.canonical
        );
    }
}

#[test]
fn attributes_are_not_keywords() {
    for info in attributes::ATTRIBUTES {
        assert_eq!(attributes::from_str(info.canonical), Some(info.id));
        assert!(keywords::from_str(info.canonical).is_none());
    }
}
