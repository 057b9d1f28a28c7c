use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::AppError;
use crate::services::query_router::{self, Intent, NEED_MORE_DATA};
use crate::services::sheet::{analyze, parse_spreadsheet, Analysis, Grid};

/// One uploaded file and everything derived from it.
#[derive(Debug, Clone, Serialize)]
pub struct Dataset {
    pub file_name: String,
    pub file_size: usize,
    #[serde(skip)]
    pub grid: Grid,
    pub analysis: Analysis,
    pub uploaded_at: DateTime<Utc>,
}

impl Dataset {
    /// Parse and analyze an upload. Nothing is installed on failure.
    pub fn from_upload(file_name: &str, data: &[u8], max_file_size: usize) -> Result<Self, AppError> {
        if data.len() > max_file_size {
            tracing::warn!(
                "Rejected {}: {} bytes exceeds limit of {}",
                file_name,
                data.len(),
                max_file_size
            );
            return Err(AppError::InvalidInput(format!(
                "File is too large ({:.2} MB, limit {:.2} MB)",
                data.len() as f64 / 1024.0 / 1024.0,
                max_file_size as f64 / 1024.0 / 1024.0
            )));
        }

        let grid = parse_spreadsheet(data, file_name)?;
        Ok(Self::from_grid(file_name, data.len(), grid))
    }

    pub fn from_grid(file_name: &str, file_size: usize, grid: Grid) -> Self {
        let analysis = analyze(&grid);
        Self {
            file_name: file_name.to_string(),
            file_size,
            grid,
            analysis,
            uploaded_at: Utc::now(),
        }
    }

    pub fn answer(&self, question: &str) -> (Intent, String) {
        query_router::route_question(
            question,
            &self.grid,
            &self.analysis.summary,
            &self.analysis.profiles,
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChatMessage {
    pub id: u64,
    pub role: ChatRole,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub intent: Option<Intent>,
    pub timestamp: DateTime<Utc>,
}

/// Append-only conversation history.
#[derive(Debug, Default, Clone, Serialize)]
pub struct ChatLog {
    messages: Vec<ChatMessage>,
    #[serde(skip)]
    next_id: u64,
}

impl ChatLog {
    pub fn push(&mut self, role: ChatRole, content: String, intent: Option<Intent>) -> &ChatMessage {
        self.next_id += 1;
        self.messages.push(ChatMessage {
            id: self.next_id,
            role,
            content,
            intent,
            timestamp: Utc::now(),
        });
        &self.messages[self.messages.len() - 1]
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

/// The current dataset plus its chat. A new upload replaces both.
#[derive(Debug, Default)]
pub struct Workspace {
    dataset: Option<Dataset>,
    chat: ChatLog,
}

impl Workspace {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn dataset(&self) -> Option<&Dataset> {
        self.dataset.as_ref()
    }

    pub fn chat(&self) -> &ChatLog {
        &self.chat
    }

    /// Swap in a fresh dataset and restart the chat with a greeting.
    pub fn install(&mut self, dataset: Dataset) -> &Dataset {
        tracing::info!("Installing dataset {}", dataset.file_name);
        let mut chat = ChatLog::default();
        chat.push(ChatRole::Assistant, query_router::greeting(&dataset.file_name), None);
        self.chat = chat;
        self.dataset.insert(dataset)
    }

    pub fn reset(&mut self) {
        tracing::info!("Resetting workspace");
        self.dataset = None;
        self.chat = ChatLog::default();
    }

    /// Record the question and the answer, returning the answer message.
    pub fn ask(&mut self, question: &str) -> Result<ChatMessage, AppError> {
        let question = question.trim();
        if question.is_empty() {
            return Err(AppError::InvalidInput("Question must not be empty".to_string()));
        }

        let (intent, answer) = match &self.dataset {
            Some(dataset) => dataset.answer(question),
            None => (Intent::NeedMoreData, NEED_MORE_DATA.to_string()),
        };
        self.chat.push(ChatRole::User, question.to_string(), None);
        Ok(self.chat.push(ChatRole::Assistant, answer, Some(intent)).clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCORES: &[u8] = b"Name,Score\nA,10\nB,20\nC,30\n";

    #[test]
    fn upload_builds_full_analysis() {
        let dataset = Dataset::from_upload("scores.csv", SCORES, 1024).unwrap();
        assert_eq!(dataset.file_size, SCORES.len());
        assert_eq!(dataset.analysis.summary.total_rows, 3);
        assert_eq!(dataset.analysis.profiles[0].sum, 60.0);
        assert_eq!(dataset.analysis.charts.row_series.len(), 3);
    }

    #[test]
    fn oversized_upload_is_rejected() {
        let err = Dataset::from_upload("scores.csv", SCORES, 4).unwrap_err();
        assert!(matches!(err, AppError::InvalidInput(_)));
    }

    #[test]
    fn install_restarts_chat_with_greeting() {
        let mut workspace = Workspace::new();
        workspace.install(Dataset::from_upload("a.csv", SCORES, 1024).unwrap());
        workspace.ask("summary").unwrap();
        assert_eq!(workspace.chat().len(), 3);

        workspace.install(Dataset::from_upload("b.csv", SCORES, 1024).unwrap());
        let messages = workspace.chat().messages();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].role, ChatRole::Assistant);
        assert!(messages[0].content.contains("\"b.csv\""));
    }

    #[test]
    fn ask_appends_question_and_answer() {
        let mut workspace = Workspace::new();
        workspace.install(Dataset::from_upload("a.csv", SCORES, 1024).unwrap());
        let reply = workspace.ask("  What is the average?  ").unwrap();

        assert_eq!(reply.intent, Some(Intent::Average));
        assert!(reply.content.contains("**Score**: 20.00"));
        let messages = workspace.chat().messages();
        assert_eq!(messages[1].role, ChatRole::User);
        assert_eq!(messages[1].content, "What is the average?");
        assert!(messages[1].id < messages[2].id);
    }

    #[test]
    fn ask_without_dataset_needs_more_data() {
        let mut workspace = Workspace::new();
        let reply = workspace.ask("summary").unwrap();
        assert_eq!(reply.content, NEED_MORE_DATA);
    }

    #[test]
    fn blank_question_is_rejected() {
        let mut workspace = Workspace::new();
        assert!(matches!(workspace.ask("   "), Err(AppError::InvalidInput(_))));
        assert!(workspace.chat().is_empty());
    }

    #[test]
    fn reset_clears_everything() {
        let mut workspace = Workspace::new();
        workspace.install(Dataset::from_upload("a.csv", SCORES, 1024).unwrap());
        workspace.reset();
        assert!(workspace.dataset().is_none());
        assert!(workspace.chat().is_empty());
    }
}
