use aicompare::ModelDatabase;
use aicompare::recommend::{
    Answers, Budget, ContextNeeds, Deployment, Priority, RawAnswers, UseCase, recommend,
};
use aicompare::wizard::Wizard;

fn names(results: &[aicompare::ScoredCandidate]) -> Vec<&str> {
    results.iter().map(|c| c.name.as_str()).collect()
}

#[test]
fn free_local_coding_keeps_only_open_models() {
    let db = ModelDatabase::embedded();
    let answers = Answers::new(
        UseCase::Coding,
        Budget::Free,
        Priority::Quality,
        ContextNeeds::Medium,
        Deployment::Local,
    );
    let results = recommend(db.get_all_models(), &answers);

    assert_eq!(
        names(&results),
        vec!["DeepSeek Coder V2", "Llama 3.1 70B", "Llama 3.1 8B", "Mixtral 8x7B"]
    );
    assert!(results.iter().all(|c| c.model.is_free()));
    assert!(results[0].reasons.contains(&"Excellent coding capabilities".to_string()));
    assert!(results[0].reasons.contains(&"Completely free to use".to_string()));
}

#[test]
fn premium_cloud_analysis_ranks_hosted_models() {
    let db = ModelDatabase::embedded();
    let answers = Answers::new(
        UseCase::Analysis,
        Budget::High,
        Priority::Quality,
        ContextNeeds::Large,
        Deployment::Cloud,
    );
    let results = recommend(db.get_all_models(), &answers);

    assert_eq!(
        names(&results),
        vec![
            "Claude 3.5 Sonnet",
            "GPT-4o",
            "GPT-4",
            "Gemini 1.5 Pro",
            "Mistral Large 2"
        ]
    );
    for pair in results.windows(2) {
        assert!(pair[0].score >= pair[1].score);
    }
}

#[test]
fn raw_answers_from_json_match_typed_answers() {
    let raw: RawAnswers = serde_json::from_str(
        r#"{"useCase":"chat","budget":"low","priority":"speed","contextNeeds":"small","deployment":"either"}"#,
    )
    .unwrap();
    let typed = Answers::new(
        UseCase::Chat,
        Budget::Low,
        Priority::Speed,
        ContextNeeds::Small,
        Deployment::Either,
    );
    assert_eq!(Answers::from_raw(&raw), typed);

    let db = ModelDatabase::embedded();
    assert_eq!(
        recommend(db.get_all_models(), &Answers::from_raw(&raw)),
        recommend(db.get_all_models(), &typed)
    );
}

#[test]
fn wizard_produces_same_results_as_direct_call() {
    let db = ModelDatabase::embedded();
    let mut wizard = Wizard::new();
    for value in ["writing", "medium", "balance", "large", "either"] {
        wizard.answer(value, db.get_all_models());
    }
    let direct = recommend(
        db.get_all_models(),
        &Answers::new(
            UseCase::Writing,
            Budget::Medium,
            Priority::Balance,
            ContextNeeds::Large,
            Deployment::Either,
        ),
    );
    assert_eq!(wizard.results(), direct.as_slice());
}
