use super::*;

#[test]
fn test_all_has_21_buckets_in_index_order() {
    assert_eq!(AgeGroup::ALL.len(), 21);
    for (i, group) in AgeGroup::ALL.iter().enumerate() {
        assert_eq!(group.index(), i);
        assert_eq!(AgeGroup::from_index(i), Some(*group));
    }
    assert_eq!(AgeGroup::ALL[0].label(), "0-4");
    assert_eq!(AgeGroup::ALL[20].label(), "100 & over");
    assert_eq!(AgeGroup::from_index(21), None);
}

#[test]
fn test_ordering_is_not_lexical() {
    assert!(AgeGroup::Age5To9 < AgeGroup::Age10To14);
    assert!(AgeGroup::Age95To99 < AgeGroup::Age100AndOver);

    let mut labels: Vec<AgeGroup> = vec![
        AgeGroup::Age100AndOver,
        AgeGroup::Age10To14,
        AgeGroup::Age5To9,
        AgeGroup::Age0To4,
    ];
    labels.sort();
    assert_eq!(
        labels,
        vec![
            AgeGroup::Age0To4,
            AgeGroup::Age5To9,
            AgeGroup::Age10To14,
            AgeGroup::Age100AndOver
        ]
    );
}

#[test]
fn test_parse_spaced_and_compact_labels() {
    assert_eq!(AgeGroup::parse("0 - 4").unwrap(), AgeGroup::Age0To4);
    assert_eq!(AgeGroup::parse("0-4").unwrap(), AgeGroup::Age0To4);
    assert_eq!(AgeGroup::parse(" 95 - 99 ").unwrap(), AgeGroup::Age95To99);
    assert_eq!(AgeGroup::parse("40\u{2013}44").unwrap(), AgeGroup::Age40To44);
}

#[test]
fn test_parse_open_ended_spellings() {
    for label in ["100 & over", "100&over", "100 and over", "100+", "100 And Over"] {
        assert_eq!(
            AgeGroup::parse(label).unwrap(),
            AgeGroup::Age100AndOver,
            "label {label}"
        );
    }
}

#[test]
fn test_parse_rejects_unknown_labels() {
    for label in ["", "banana", "0-5", "3-7", "110-114", "90 & over", "4-0"] {
        let err = AgeGroup::parse(label).unwrap_err();
        assert!(
            matches!(err, CoreError::UnknownAgeGroup { ref value } if value == label),
            "label {label}: {err}"
        );
    }
}

#[test]
fn test_canonical_parse_rejects_constituent_buckets() {
    assert!(AgeGroup::parse("100-104").is_err());
    assert!(AgeGroup::parse("105 & over").is_err());
}

#[test]
fn test_raw_label_recognises_constituent_buckets() {
    assert_eq!(
        RawAgeLabel::parse("100 - 104").unwrap(),
        RawAgeLabel::Over100Part(Over100Part::From100To104)
    );
    assert_eq!(
        RawAgeLabel::parse("105 and over").unwrap(),
        RawAgeLabel::Over100Part(Over100Part::From105)
    );
    assert_eq!(
        RawAgeLabel::parse("105 & over").unwrap(),
        RawAgeLabel::Over100Part(Over100Part::From105)
    );
    assert_eq!(
        RawAgeLabel::parse("15 - 19").unwrap(),
        RawAgeLabel::Canonical(AgeGroup::Age15To19)
    );
}

#[test]
fn test_serde_uses_canonical_label() {
    let yaml = serde_yaml::to_string(&AgeGroup::Age100AndOver).unwrap();
    assert_eq!(yaml.trim().trim_matches(|c| c == '\'' || c == '"'), "100 & over");
    let parsed: AgeGroup = serde_yaml::from_str("\"5 - 9\"").unwrap();
    assert_eq!(parsed, AgeGroup::Age5To9);
}
