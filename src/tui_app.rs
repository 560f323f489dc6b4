use aicompare::models::AiModel;
use aicompare::recommend::ScoredCandidate;
use aicompare::saved::{FileStore, SavedComparisons};
use aicompare::wizard::{Question, Wizard};

pub struct App {
    pub should_quit: bool,
    pub wizard: Wizard,
    pub models: Vec<AiModel>,
    /// Highlighted option on a question, or highlighted result on the
    /// results screen.
    pub cursor: usize,
    pub status: Option<String>,
    saved: Option<SavedComparisons<FileStore>>,
}

impl App {
    pub fn new(models: Vec<AiModel>, store: Option<FileStore>) -> Self {
        App {
            should_quit: false,
            wizard: Wizard::new(),
            models,
            cursor: 0,
            status: None,
            saved: store.map(SavedComparisons::new),
        }
    }

    pub fn question(&self) -> Option<Question> {
        self.wizard.current_question()
    }

    pub fn results(&self) -> &[ScoredCandidate] {
        self.wizard.results()
    }

    pub fn selected_result(&self) -> Option<&ScoredCandidate> {
        self.results().get(self.cursor)
    }

    fn row_count(&self) -> usize {
        match self.question() {
            Some(q) => q.options().len(),
            None => self.results().len(),
        }
    }

    pub fn move_up(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_down(&mut self) {
        let rows = self.row_count();
        if rows > 0 && self.cursor + 1 < rows {
            self.cursor += 1;
        }
    }

    /// Answer the current question with the highlighted option.
    pub fn select(&mut self) {
        let Some(question) = self.question() else {
            return;
        };
        let options = question.options();
        let Some((value, _)) = options.get(self.cursor) else {
            return;
        };
        self.wizard.answer(value, &self.models);
        self.status = None;
        self.cursor = 0;
    }

    /// Answer by 1-based option number.
    pub fn select_number(&mut self, n: usize) {
        let Some(question) = self.question() else {
            return;
        };
        if n >= 1 && n <= question.options().len() {
            self.cursor = n - 1;
            self.select();
        }
    }

    pub fn back(&mut self) {
        self.wizard.back();
        self.status = None;
        self.cursor = self.previous_answer_index().unwrap_or(0);
    }

    pub fn reset(&mut self) {
        self.wizard.reset();
        self.status = None;
        self.cursor = 0;
    }

    /// Store the recommended model names as a comparison named after the
    /// current time.
    pub fn save_results(&mut self) {
        if !self.wizard.is_complete() || self.results().is_empty() {
            return;
        }
        let names: Vec<String> = self.results().iter().map(|c| c.name.clone()).collect();
        let name = format!(
            "recommendation {}",
            chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
        );

        self.status = Some(match self.saved.as_mut() {
            Some(saved) => match saved.save(&name, names) {
                Ok(entry) => format!("Saved as '{}'", entry.name),
                Err(e) => {
                    tracing::warn!(error = %e, "failed to save comparison");
                    format!("Save failed: {}", e)
                }
            },
            None => "No data directory; set store_path to save".to_string(),
        });
    }

    /// Position of the stored answer for the current question, so stepping
    /// back highlights what was chosen before.
    fn previous_answer_index(&self) -> Option<usize> {
        let question = self.question()?;
        let answer = question.answer_for(self.wizard.answers());
        question.options().iter().position(|(v, _)| *v == answer)
    }
}
