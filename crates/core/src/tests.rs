use super::*;

#[test]
fn tag_names_are_trimmed_but_keep_case() {
    assert_eq!(normalize_tag_name("  Ethics ").unwrap(), "Ethics");
    assert_eq!(normalize_tag_name("   ").unwrap_err(), TagNameError::Empty);
    assert_eq!(
        normalize_tag_name("bad\u{0007}tag").unwrap_err(),
        TagNameError::ContainsControl
    );
    let long = "x".repeat(MAX_TAG_NAME_CHARS + 1);
    assert_eq!(normalize_tag_name(&long).unwrap_err(), TagNameError::TooLong);
}

#[test]
fn tag_list_parsing_skips_blanks_and_repeats() {
    let names = parse_tag_list("alpha, , beta,alpha ,Alpha").unwrap();
    assert_eq!(names, vec!["alpha", "beta", "Alpha"]);
    assert!(parse_tag_list("").unwrap().is_empty());
    assert!(parse_tag_list(" , ,").unwrap().is_empty());
    assert_eq!(join_tag_names(&names), "alpha, beta, Alpha");
}

#[test]
fn entry_kind_discriminators() {
    assert_eq!(EntryKind::from_discriminator(None), EntryKind::DrivingQuestion);
    assert_eq!(
        EntryKind::from_discriminator(Some("Inferred")),
        EntryKind::DrivingQuestion
    );
    assert_eq!(EntryKind::from_discriminator(Some("term")), EntryKind::KeyTerm);
    for kind in EntryKind::ALL {
        assert_eq!(
            EntryKind::from_anchor_item_type(kind.anchor_item_type()),
            Some(kind)
        );
    }
    assert_eq!(EntryKind::DrivingQuestion.display_prefix(), "Dq");
    assert_eq!(EntryKind::Proposition.display_prefix(), "Proposition");
}

#[test]
fn driving_question_label_must_not_shadow_other_kinds() {
    let payload = EntryPayload::DrivingQuestion(DrivingQuestion {
        question_text: "Why?".to_string(),
        label: Some("term".to_string()),
        ..DrivingQuestion::default()
    });
    assert_eq!(payload.validate().unwrap_err(), EntryError::ReservedLabel);

    let payload = EntryPayload::DrivingQuestion(DrivingQuestion {
        question_text: "Why?".to_string(),
        label: Some("Inferred".to_string()),
        ..DrivingQuestion::default()
    });
    assert!(payload.validate().is_ok());
}

#[test]
fn virtual_summary_is_prefixed_and_capped() {
    assert_eq!(
        virtual_anchor_summary(EntryKind::DrivingQuestion, "What is justice?"),
        "Dq: What is justice?"
    );
    assert_eq!(virtual_anchor_summary(EntryKind::DrivingQuestion, ""), "Dq: ");
    assert_eq!(
        virtual_anchor_summary(EntryKind::KeyTerm, " spaced "),
        "Term:  spaced "
    );

    let long = "a".repeat(120);
    let summary = virtual_anchor_summary(EntryKind::Theory, &long);
    assert_eq!(summary.chars().count(), ANCHOR_SUMMARY_MAX_CHARS + 3);
    assert!(summary.starts_with("Theory: aaa"));
    assert!(summary.ends_with("..."));

    let exact = "b".repeat(ANCHOR_SUMMARY_MAX_CHARS);
    assert_eq!(truncate_summary(&exact), exact);
}

#[test]
fn whitelisted_fields_round_trip_by_column() {
    for field in ProjectTextField::ALL {
        assert_eq!(ProjectTextField::from_column(field.column()), Some(field));
    }
    for field in ReadingTextField::ALL {
        assert_eq!(ReadingTextField::from_column(field.column()), Some(field));
    }
    assert_eq!(ReadingTextField::from_column("title; DROP TABLE readings"), None);
}

#[test]
fn display_order_appends_after_max() {
    assert_eq!(next_display_order(None), 0);
    assert_eq!(next_display_order(Some(0)), 1);
    assert_eq!(next_display_order(Some(7)), 8);
}

#[test]
fn doc_id_names_kind_and_row() {
    assert_eq!(
        virtual_anchor_doc_id(EntryKind::KeyTerm, EntryId::new(12)),
        "term_12"
    );
}

#[test]
fn instruction_columns_are_whitelisted() {
    assert!(is_instruction_column("thesis_instr"));
    assert!(is_instruction_column("reading_rules_html"));
    assert!(!is_instruction_column("project_id"));
}
