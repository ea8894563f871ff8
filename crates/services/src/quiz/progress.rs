/// Aggregated view of session progress, useful for UI.
#[derive(Debug, Clone, PartialEq)]
pub struct QuizProgress {
    pub total: usize,
    pub answered: usize,
    pub current: usize,
    /// Position through the session as `(current + 1) / total`; 0 when empty.
    pub fraction: f64,
    pub is_complete: bool,
}
