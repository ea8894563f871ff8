use prep_core::model::{Category, DifficultyTier, Part, Question, QuestionDraft, QuestionId};
use prep_core::time::fixed_now;
use services::{AppServices, Clock, QuestionCatalog, StepOutcome};

fn build_question(id: u64, category: Category, difficulty: DifficultyTier) -> Question {
    QuestionDraft {
        prompt: format!("Prompt {id}"),
        options: vec![
            "alpha".to_string(),
            "bravo".to_string(),
            "charlie".to_string(),
            "delta".to_string(),
        ],
        correct_option: (id % 4) as usize,
        category,
        explanation: format!("Explanation {id}"),
        difficulty,
        part: Part::Part5,
    }
    .validate(QuestionId::new(id))
    .unwrap()
}

fn build_catalog() -> QuestionCatalog {
    let mut questions = Vec::new();
    for id in 0..8 {
        questions.push(build_question(id, Category::Grammar, DifficultyTier::Intermediate));
    }
    for id in 8..12 {
        questions.push(build_question(id, Category::Reading, DifficultyTier::Advanced));
    }
    QuestionCatalog::new(questions)
}

#[tokio::test]
async fn full_sitting_updates_stats_once() {
    let app = AppServices::in_memory(Clock::fixed(fixed_now()), build_catalog());
    let quiz = app.quiz();

    let mut session = quiz.start(Some(Category::Grammar));
    assert_eq!(session.len(), 8);

    // Answer every question correctly and walk forward to the merged finish.
    let snapshot = loop {
        let correct = session.current_question().unwrap().correct_option();
        session.select_answer(correct).unwrap();
        match quiz.advance(&mut session).await.unwrap() {
            StepOutcome::Advanced => {}
            StepOutcome::Finished(snapshot) => break snapshot,
        }
    };

    assert_eq!(snapshot.score, 8);
    assert_eq!(snapshot.percentage, 100);
    assert_eq!(snapshot.estimated_score, 950);
    assert!(snapshot.target_reached);

    // Finishing again is a no-op on the stats store.
    let again = quiz.finish(&mut session).await.unwrap();
    assert_eq!(again, snapshot);

    let stats = app.stats().overview().await.unwrap();
    assert_eq!(stats.total_sessions(), 1);
    assert_eq!(stats.best_percentage(), 100);

    let history = app
        .stats()
        .category_history(Category::Grammar, 10)
        .await
        .unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].percentage, 100);
}

#[tokio::test]
async fn early_finish_and_restart_count_as_separate_sittings() {
    let app = AppServices::in_memory(Clock::fixed(fixed_now()), build_catalog());
    let quiz = app.quiz();

    let mut session = quiz.start(None);
    assert_eq!(session.len(), 12);

    // Bail out after a single answer; the rest counts as incorrect.
    let correct = session.current_question().unwrap().correct_option();
    session.select_answer(correct).unwrap();
    let snapshot = quiz.finish(&mut session).await.unwrap();
    assert_eq!(snapshot.score, 1);
    assert_eq!(snapshot.percentage, 8);

    quiz.restart(&mut session);
    assert!(!session.is_complete());
    assert_eq!(session.len(), 12);

    quiz.finish(&mut session).await.unwrap();

    let stats = app.stats().overview().await.unwrap();
    assert_eq!(stats.total_sessions(), 2);
    assert_eq!(stats.best_percentage(), 8);

    // Unfiltered sittings never touch category history.
    for category in Category::ALL {
        let history = app.stats().category_history(category, 10).await.unwrap();
        assert!(history.is_empty());
    }
}
