use rand::rng;
use rand::seq::SliceRandom;

use prep_core::model::{Category, DifficultyTier, Question};

/// Immutable in-memory question bank with randomized filtered retrieval.
///
/// The bank is supplied fully validated at construction; every read that
/// filters it returns a fresh uniform permutation, so repeated sessions over
/// the same filter see different question orders.
pub struct QuestionCatalog {
    questions: Vec<Question>,
}

impl QuestionCatalog {
    #[must_use]
    pub fn new(questions: Vec<Question>) -> Self {
        Self { questions }
    }

    /// The full catalog in authored order.
    #[must_use]
    pub fn all(&self) -> &[Question] {
        &self.questions
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.questions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    /// Questions matching `category`, shuffled. `None` means the whole catalog.
    ///
    /// An empty match yields an empty vec, never an error.
    #[must_use]
    pub fn by_category(&self, category: Option<Category>) -> Vec<Question> {
        let matched = self
            .questions
            .iter()
            .filter(|q| category.is_none_or(|c| q.category() == c))
            .cloned()
            .collect();
        shuffled(matched)
    }

    /// Questions matching `difficulty`, shuffled.
    #[must_use]
    pub fn by_difficulty(&self, difficulty: DifficultyTier) -> Vec<Question> {
        let matched = self
            .questions
            .iter()
            .filter(|q| q.difficulty() == difficulty)
            .cloned()
            .collect();
        shuffled(matched)
    }
}

fn shuffled(mut questions: Vec<Question>) -> Vec<Question> {
    let mut rng = rng();
    questions.as_mut_slice().shuffle(&mut rng);
    questions
}
