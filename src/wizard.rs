use crate::models::AiModel;
use crate::recommend::{
    self, Answers, Budget, ContextNeeds, Deployment, Priority, RawAnswers, ScoredCandidate,
    UseCase,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Question {
    UseCase,
    Budget,
    Priority,
    ContextNeeds,
    Deployment,
}

impl Question {
    pub const ALL: [Question; 5] = [
        Question::UseCase,
        Question::Budget,
        Question::Priority,
        Question::ContextNeeds,
        Question::Deployment,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            Question::UseCase => "What will you primarily use the AI for?",
            Question::Budget => "What's your budget?",
            Question::Priority => "What matters most to you?",
            Question::ContextNeeds => "How much context do you need?",
            Question::Deployment => "Where will you deploy?",
        }
    }

    /// `(value, label)` pairs in menu order.
    pub fn options(&self) -> Vec<(&'static str, &'static str)> {
        fn pairs<T: Copy>(
            all: &[T],
            value: fn(&T) -> &'static str,
            label: fn(&T) -> &'static str,
        ) -> Vec<(&'static str, &'static str)> {
            all.iter().map(|v| (value(v), label(v))).collect()
        }

        match self {
            Question::UseCase => pairs(UseCase::ALL, UseCase::value, UseCase::label),
            Question::Budget => pairs(Budget::ALL, Budget::value, Budget::label),
            Question::Priority => pairs(Priority::ALL, Priority::value, Priority::label),
            Question::ContextNeeds => {
                pairs(ContextNeeds::ALL, ContextNeeds::value, ContextNeeds::label)
            }
            Question::Deployment => pairs(Deployment::ALL, Deployment::value, Deployment::label),
        }
    }

    /// The stored answer for this question; empty if unanswered.
    pub fn answer_for<'a>(&self, raw: &'a RawAnswers) -> &'a str {
        match self {
            Question::UseCase => &raw.use_case,
            Question::Budget => &raw.budget,
            Question::Priority => &raw.priority,
            Question::ContextNeeds => &raw.context_needs,
            Question::Deployment => &raw.deployment,
        }
    }

    fn slot<'a>(&self, raw: &'a mut RawAnswers) -> &'a mut String {
        match self {
            Question::UseCase => &mut raw.use_case,
            Question::Budget => &mut raw.budget,
            Question::Priority => &mut raw.priority,
            Question::ContextNeeds => &mut raw.context_needs,
            Question::Deployment => &mut raw.deployment,
        }
    }
}

/// Five questions answered in order, then a terminal results state.
///
/// Results are recomputed from scratch whenever the last question is
/// answered, so stepping back and changing an earlier answer needs no
/// bookkeeping beyond overwriting it.
#[derive(Debug, Clone, Default)]
pub struct Wizard {
    step: usize,
    answers: RawAnswers,
    results: Vec<ScoredCandidate>,
}

impl Wizard {
    pub fn new() -> Self {
        Self::default()
    }

    /// `None` once every question has been answered.
    pub fn current_question(&self) -> Option<Question> {
        Question::ALL.get(self.step).copied()
    }

    pub fn step(&self) -> usize {
        self.step
    }

    pub fn is_complete(&self) -> bool {
        self.step >= Question::ALL.len()
    }

    pub fn answers(&self) -> &RawAnswers {
        &self.answers
    }

    pub fn results(&self) -> &[ScoredCandidate] {
        &self.results
    }

    /// Record `value` for the current question and move forward. Answering
    /// the last question scores `models`. No-op once complete.
    pub fn answer(&mut self, value: &str, models: &[AiModel]) {
        let Some(question) = self.current_question() else {
            return;
        };
        *question.slot(&mut self.answers) = value.to_string();
        self.step += 1;

        if self.is_complete() {
            self.results = recommend::recommend(models, &Answers::from_raw(&self.answers));
        }
    }

    /// Return to the previous question. Leaving the results state discards
    /// them.
    pub fn back(&mut self) {
        if self.step == 0 {
            return;
        }
        self.step -= 1;
        self.results.clear();
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ModelCategory;
    use crate::models::tests::test_model;

    fn catalog() -> Vec<AiModel> {
        vec![
            test_model("Open", ModelCategory::OpenSource, 0.0),
            test_model("Hosted", ModelCategory::Proprietary, 3.0),
        ]
    }

    #[test]
    fn test_linear_flow_to_results() {
        let models = catalog();
        let mut wizard = Wizard::new();
        assert_eq!(wizard.current_question(), Some(Question::UseCase));

        for value in ["coding", "free", "quality", "medium"] {
            wizard.answer(value, &models);
            assert!(!wizard.is_complete());
        }
        assert_eq!(wizard.current_question(), Some(Question::Deployment));
        wizard.answer("local", &models);

        assert!(wizard.is_complete());
        assert_eq!(wizard.current_question(), None);
        let names: Vec<_> = wizard.results().iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Open"]);
        assert_eq!(wizard.answers().budget, "free");
    }

    #[test]
    fn test_back_then_change_answer_rescores() {
        let models = catalog();
        let mut wizard = Wizard::new();
        for value in ["coding", "free", "quality", "medium", "cloud"] {
            wizard.answer(value, &models);
        }
        assert_eq!(wizard.results().len(), 1);

        // Back to deployment, then back to priority and budget
        wizard.back();
        assert!(wizard.results().is_empty());
        wizard.back();
        wizard.back();
        assert_eq!(wizard.current_question(), Some(Question::Budget));

        for value in ["low", "quality", "medium", "cloud"] {
            wizard.answer(value, &models);
        }
        assert!(wizard.is_complete());
        assert_eq!(wizard.results().len(), 2);
        assert_eq!(wizard.results()[0].name, "Hosted");
    }

    #[test]
    fn test_answer_after_complete_is_ignored() {
        let models = catalog();
        let mut wizard = Wizard::new();
        for value in ["chat", "high", "balance", "small", "either"] {
            wizard.answer(value, &models);
        }
        let before = wizard.results().to_vec();
        wizard.answer("coding", &models);
        assert_eq!(wizard.results(), before.as_slice());
        assert_eq!(wizard.answers().use_case, "chat");
    }

    #[test]
    fn test_reset_and_back_at_start() {
        let mut wizard = Wizard::new();
        wizard.back();
        assert_eq!(wizard.step(), 0);
        wizard.answer("chat", &[]);
        wizard.reset();
        assert_eq!(wizard.step(), 0);
        assert_eq!(wizard.answers(), &RawAnswers::default());
    }

    #[test]
    fn test_answer_for_reads_each_slot() {
        let models = catalog();
        let mut wizard = Wizard::new();
        assert_eq!(Question::UseCase.answer_for(wizard.answers()), "");

        for value in ["analysis", "medium", "speed", "large", "either"] {
            wizard.answer(value, &models);
        }
        let got: Vec<_> = Question::ALL
            .iter()
            .map(|q| q.answer_for(wizard.answers()))
            .collect();
        assert_eq!(got, vec!["analysis", "medium", "speed", "large", "either"]);
    }

    #[test]
    fn test_every_question_has_options() {
        for q in Question::ALL {
            assert!(q.options().len() >= 3, "{:?}", q);
        }
    }
}
