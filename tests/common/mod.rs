// Allow dead_code because these helpers are used across different test files
// which are compiled separately
#![allow(dead_code)]

use anyhow::Result;
use tally::application::{Presenter, RenderModel};
use tally::{Kind, LedgerService};

/// Presenter that records everything it is asked to show.
#[derive(Default)]
pub struct RecordingPresenter {
    pub renders: Vec<RenderModel>,
    pub notices: Vec<String>,
    pub questions: Vec<String>,
    /// Answers handed out in order; an exhausted queue answers no
    pub answers: Vec<bool>,
}

impl RecordingPresenter {
    pub fn answering(answers: &[bool]) -> Self {
        Self {
            answers: answers.to_vec(),
            ..Self::default()
        }
    }

    pub fn last_render(&self) -> &RenderModel {
        self.renders.last().expect("nothing was rendered")
    }
}

impl Presenter for RecordingPresenter {
    fn render(&mut self, model: &RenderModel) -> Result<()> {
        self.renders.push(model.clone());
        Ok(())
    }

    fn notify(&mut self, message: &str) -> Result<()> {
        self.notices.push(message.to_string());
        Ok(())
    }

    fn confirm(&mut self, question: &str) -> Result<bool> {
        self.questions.push(question.to_string());
        if self.answers.is_empty() {
            Ok(false)
        } else {
            Ok(self.answers.remove(0))
        }
    }
}

/// Test fixture: a ledger with one salary and two expenses
pub struct StandardLedger;

impl StandardLedger {
    /// Salary 1000.00, rent 400.00, groceries 85.50
    pub fn create() -> Result<LedgerService> {
        let mut service = LedgerService::new();
        service.add("1000", Kind::Income, Some("Salary".into()))?;
        service.add("400", Kind::Expense, Some("Rent".into()))?;
        service.add("85.50", Kind::Expense, Some("Groceries".into()))?;
        Ok(service)
    }
}
