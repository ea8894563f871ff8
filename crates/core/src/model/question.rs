use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::ids::QuestionId;

/// Fixed number of answer options per question.
pub const OPTION_COUNT: usize = 4;

//
// ─── TAG ENUMS ─────────────────────────────────────────────────────────────────
//

/// Topical section a question belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Grammar,
    Vocabulary,
    Reading,
    BusinessEnglish,
}

impl Category {
    /// All categories, in display order.
    pub const ALL: [Category; 4] = [
        Category::Grammar,
        Category::Vocabulary,
        Category::Reading,
        Category::BusinessEnglish,
    ];

    /// Stable identifier used in persistence.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Grammar => "grammar",
            Category::Vocabulary => "vocabulary",
            Category::Reading => "reading",
            Category::BusinessEnglish => "business_english",
        }
    }

    /// Full display label.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Category::Grammar => "Grammar",
            Category::Vocabulary => "Vocabulary",
            Category::Reading => "Reading",
            Category::BusinessEnglish => "Business English",
        }
    }

    /// Compact label for tight layouts.
    #[must_use]
    pub fn short_name(&self) -> &'static str {
        match self {
            Category::Grammar => "Grammar",
            Category::Vocabulary => "Vocab",
            Category::Reading => "Reading",
            Category::BusinessEnglish => "Business",
        }
    }

    /// Parse the persisted identifier back into a category.
    #[must_use]
    pub fn from_persisted(s: &str) -> Option<Self> {
        Category::ALL.into_iter().find(|c| c.as_str() == s)
    }
}

/// Proficiency level a question targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DifficultyTier {
    Intermediate,
    UpperIntermediate,
    Advanced,
}

impl DifficultyTier {
    /// All tiers, easiest first.
    pub const ALL: [DifficultyTier; 3] = [
        DifficultyTier::Intermediate,
        DifficultyTier::UpperIntermediate,
        DifficultyTier::Advanced,
    ];

    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            DifficultyTier::Intermediate => "Intermediate",
            DifficultyTier::UpperIntermediate => "Upper-Intermediate",
            DifficultyTier::Advanced => "Advanced",
        }
    }

    /// Scaled-score band a learner at this tier typically reaches.
    #[must_use]
    pub fn target_band(&self) -> &'static str {
        match self {
            DifficultyTier::Intermediate => "600-750",
            DifficultyTier::UpperIntermediate => "750-850",
            DifficultyTier::Advanced => "850+",
        }
    }
}

/// Exam part a question is formatted after. Provenance tag only, never scored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Part {
    Part5,
    Part6,
    Part7,
}

impl Part {
    pub const ALL: [Part; 3] = [Part::Part5, Part::Part6, Part::Part7];

    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Part::Part5 => "Part 5 - Incomplete Sentences",
            Part::Part6 => "Part 6 - Text Completion",
            Part::Part7 => "Part 7 - Reading Comprehension",
        }
    }

    #[must_use]
    pub fn short_name(&self) -> &'static str {
        match self {
            Part::Part5 => "Part 5",
            Part::Part6 => "Part 6",
            Part::Part7 => "Part 7",
        }
    }
}

//
// ─── QUESTION ──────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuestionError {
    #[error("prompt must not be blank")]
    BlankPrompt,

    #[error("expected {OPTION_COUNT} options, got {len}")]
    WrongOptionCount { len: usize },

    #[error("option {index} must not be blank")]
    BlankOption { index: usize },

    #[error("correct option index {index} is out of range")]
    CorrectOptionOutOfRange { index: usize },
}

/// Unvalidated question input, e.g. from an authored content file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionDraft {
    pub prompt: String,
    pub options: Vec<String>,
    pub correct_option: usize,
    pub category: Category,
    pub explanation: String,
    pub difficulty: DifficultyTier,
    pub part: Part,
}

impl QuestionDraft {
    /// Validate the draft and assign it an identity.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError` when the prompt or an option is blank, the
    /// option count is not exactly `OPTION_COUNT`, or the correct index is
    /// out of range.
    pub fn validate(self, id: QuestionId) -> Result<Question, QuestionError> {
        if self.prompt.trim().is_empty() {
            return Err(QuestionError::BlankPrompt);
        }

        let len = self.options.len();
        let options: [String; OPTION_COUNT] = self
            .options
            .try_into()
            .map_err(|_| QuestionError::WrongOptionCount { len })?;

        if let Some(index) = options.iter().position(|o| o.trim().is_empty()) {
            return Err(QuestionError::BlankOption { index });
        }

        if self.correct_option >= OPTION_COUNT {
            return Err(QuestionError::CorrectOptionOutOfRange {
                index: self.correct_option,
            });
        }

        Ok(Question {
            id,
            prompt: self.prompt,
            options,
            correct_option: self.correct_option,
            category: self.category,
            explanation: self.explanation,
            difficulty: self.difficulty,
            part: self.part,
        })
    }
}

/// A validated multiple-choice question. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    id: QuestionId,
    prompt: String,
    options: [String; OPTION_COUNT],
    correct_option: usize,
    category: Category,
    explanation: String,
    difficulty: DifficultyTier,
    part: Part,
}

impl Question {
    #[must_use]
    pub fn id(&self) -> QuestionId {
        self.id
    }

    #[must_use]
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    #[must_use]
    pub fn options(&self) -> &[String; OPTION_COUNT] {
        &self.options
    }

    #[must_use]
    pub fn correct_option(&self) -> usize {
        self.correct_option
    }

    #[must_use]
    pub fn category(&self) -> Category {
        self.category
    }

    /// Explanation shown during review. May be empty.
    #[must_use]
    pub fn explanation(&self) -> &str {
        &self.explanation
    }

    #[must_use]
    pub fn difficulty(&self) -> DifficultyTier {
        self.difficulty
    }

    #[must_use]
    pub fn part(&self) -> Part {
        self.part
    }

    /// Whether the given option index is the correct answer.
    #[must_use]
    pub fn is_correct(&self, option: usize) -> bool {
        option == self.correct_option
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
