//! Category sequencing, format-dependent visibility, completion and progress.

use tournament_wizard::wizard::{
    tournament_catalogue, CategoryProgress, ConfigurationError, FieldDefinition, WizardDraft,
};
use tournament_wizard::{keys, Category, FieldType, FieldValue, FormData, Sequencer, TournamentFormat};

fn draft(entries: &[(&str, FieldValue)]) -> WizardDraft {
    WizardDraft::from_form_data(
        entries
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect::<FormData>(),
    )
}

fn with_format(format: TournamentFormat) -> WizardDraft {
    draft(&[(keys::FORMAT, FieldValue::text(format.as_str()))])
}

fn visible_rules(sequencer: &Sequencer, draft: &WizardDraft) -> Vec<String> {
    sequencer
        .visible_fields(Category::Rules, draft)
        .map(|f| f.key().to_string())
        .collect()
}

#[test]
fn standard_catalogue_is_well_formed() {
    let sequencer = Sequencer::new(tournament_catalogue()).unwrap();
    assert_eq!(sequencer.categories(), Category::ALL.to_vec());
    assert_eq!(sequencer.first(), Some(Category::BasicInformation));
    assert_eq!(sequencer.next(Category::Mode), Some(Category::Rules));
    assert_eq!(sequencer.next(Category::Rules), None);
    assert_eq!(sequencer.previous(Category::BasicInformation), None);
    assert_eq!(
        sequencer.field(keys::HAS_THIRD_PLACE).map(|(c, _)| c),
        Some(Category::Rules)
    );
}

#[test]
fn rules_fields_follow_the_selected_format() {
    let sequencer = Sequencer::tournament();

    assert_eq!(visible_rules(&sequencer, &WizardDraft::new()), vec![keys::LEGS]);
    assert_eq!(
        visible_rules(&sequencer, &with_format(TournamentFormat::League)),
        vec![
            keys::LEGS,
            keys::POINTS_FOR_WIN,
            keys::POINTS_FOR_DRAW,
            keys::POINTS_FOR_LOSS,
            keys::TIE_BREAKERS
        ]
    );
    assert_eq!(
        visible_rules(&sequencer, &with_format(TournamentFormat::GroupKnockout)).len(),
        9
    );
    assert_eq!(
        visible_rules(&sequencer, &with_format(TournamentFormat::Knockout)),
        vec![keys::LEGS, keys::HAS_THIRD_PLACE]
    );
}

#[test]
fn unrecognized_format_shows_only_always_visible_fields() {
    let sequencer = Sequencer::tournament();
    let draft = draft(&[(keys::FORMAT, FieldValue::text("SWISS"))]);
    assert_eq!(visible_rules(&sequencer, &draft), vec![keys::LEGS]);
}

#[test]
fn completion_tracks_the_draft() {
    let sequencer = Sequencer::tournament();
    let mut entries = vec![(keys::NUMBER_OF_PARTICIPANTS, FieldValue::Number(8.0))];
    assert!(!sequencer.is_completed(Category::Teams, &draft(&entries)));

    entries.push((keys::FIELDS, FieldValue::Number(2.0)));
    assert!(sequencer.is_completed(Category::Teams, &draft(&entries)));

    entries[0].1 = FieldValue::Number(1.0);
    assert!(!sequencer.is_completed(Category::Teams, &draft(&entries)));
    assert_eq!(
        sequencer
            .failures(Category::Teams, &draft(&entries))
            .into_iter()
            .map(|(key, result)| (key, result.message_key))
            .collect::<Vec<_>>(),
        vec![(
            keys::NUMBER_OF_PARTICIPANTS.to_string(),
            Some("validation.min".to_string())
        )]
    );
}

#[test]
fn progress_counts_the_valid_prefix() {
    let sequencer = Sequencer::tournament();

    assert_eq!(
        sequencer.progress_for(Category::Teams, &WizardDraft::new()),
        CategoryProgress { current: 0, total: 2 }
    );
    // A valid second field does not count while the first is missing.
    let only_fields = draft(&[(keys::FIELDS, FieldValue::Number(2.0))]);
    assert_eq!(
        sequencer.progress_for(Category::Teams, &only_fields),
        CategoryProgress { current: 0, total: 2 }
    );
    let only_participants = draft(&[(keys::NUMBER_OF_PARTICIPANTS, FieldValue::Number(8.0))]);
    assert_eq!(
        sequencer.progress_for(Category::Teams, &only_participants),
        CategoryProgress { current: 1, total: 2 }
    );
    // Optional, empty fields are valid.
    assert_eq!(
        sequencer.progress_for(Category::BasicInformation, &draft(&[(keys::NAME, FieldValue::text("Cup"))])),
        CategoryProgress { current: 2, total: 2 }
    );
}

#[test]
fn malformed_catalogues_are_rejected() {
    assert_eq!(Sequencer::new(vec![]).err(), Some(ConfigurationError::NoCategories));
    assert_eq!(
        Sequencer::new(vec![(Category::Teams, vec![])]).err(),
        Some(ConfigurationError::EmptyCategory(Category::Teams))
    );
    assert_eq!(
        Sequencer::new(vec![(
            Category::Rules,
            vec![FieldDefinition::new("points", FieldType::Number)
                .visible_for(&[TournamentFormat::League])]
        )])
        .err(),
        Some(ConfigurationError::NoAlwaysVisibleField(Category::Rules))
    );
    assert_eq!(
        Sequencer::new(vec![(
            Category::BasicInformation,
            vec![
                FieldDefinition::new("name", FieldType::Text),
                FieldDefinition::new("name", FieldType::Text),
            ]
        )])
        .err(),
        Some(ConfigurationError::DuplicateKey {
            category: Category::BasicInformation,
            key: "name".into()
        })
    );
}
