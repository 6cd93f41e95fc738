use serde::Serialize;

use super::scoring::ScoreResult;

/// Editable notice sent to participants once a date is chosen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Announcement {
    pub subject: String,
    pub body: String,
}

impl Announcement {
    /// Draft the notice from the winning date and its score.
    pub fn for_result(result: &ScoreResult) -> Self {
        let date = result.best_date.format("%Y-%m-%d (%a)");

        let subject = "[Confirmed] Team party date".to_string();
        let body = format!(
            "Hello everyone,\n\n\
             Thank you for answering the scheduling poll.\n\
             After weighing every response, the party date has been decided.\n\n\
             [Selected date]\n\
             {date} (score {score})\n\n\
             We hope to see you there.\n\n\
             The organizer",
            score = result.best_score,
        );

        Self { subject, body }
    }

    pub fn render(&self) -> String {
        format!("Subject: {}\n\n{}", self.subject, self.body)
    }
}
