//! Faculty assistant chatbot and teacher-notes generator

use campus_api::CampusClient;
use campus_core::{config_error, validation_error, CampusResult};
use std::sync::Arc;
use tracing::debug;

/// Suggested questions offered before the user types anything
pub const SUGGESTED_QUESTIONS: [&str; 5] = [
    "How do I generate a faculty timetable?",
    "How can I view class occupancy?",
    "How do I create muster sheets?",
    "How to calculate faculty workload?",
    "How to export reports in PDF/Excel?",
];

pub const NO_RESPONSE: &str = "No response";
pub const NO_NOTES: &str = "No notes generated.";

/// Prompt restricting answers to the class management domain
pub fn faculty_prompt(question: &str) -> String {
    format!(
        r#"You are an expert assistant for a web app called
"Automated Faculty & Class Management System with Muster Generation".

Response Rules:
1. Only answer questions related to: colleges, faculty management, class management, attendance tracking, muster generation, or features of this system.
2. Always respond in a clean structured format:
   - Start with a short one-line summary in bold.
   - Then provide a clear point-wise answer (using bullet points).
   - If steps are involved, use numbered steps.
   - Keep it simple and professional.
3. If the user asks anything unrelated, reply:
   "I can only help with questions related to the Automated Faculty & Class Management System with Muster Generation."

Now, here is the user's question:
{question}
"#
    )
}

/// Prompt asking for exam-oriented, bullet-only teacher notes
pub fn notes_prompt(topic: &str) -> String {
    format!(
        r#"You are a teacher assistant. Generate teacher notes for the topic: "{topic}".

Rules:
1. Provide a clear, concise, point-wise response only.
2. Each main point should start with a bullet (•).
3. Include exam-oriented points where relevant.
4. Do NOT add greetings, summaries, explanations, or unrelated text.
5. Use numbered steps only if there are processes or sequences to explain.
6. Keep it simple and easy for teachers to understand.

Return only the notes in the above format. Do NOT use any extra * or markdown symbols.
"#
    )
}

fn bulletize(text: &str) -> String {
    text.split(". ")
        .flat_map(|sentence| sentence.split('\n'))
        .map(str::trim)
        .filter(|point| !point.is_empty())
        .map(|point| format!("• {}", point))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Chat replies not already dash-bulleted become one `• ` point per sentence or line
pub fn normalize_reply(reply: &str) -> String {
    if reply.starts_with('-') {
        reply.to_string()
    } else {
        bulletize(reply)
    }
}

/// Notes lose every `*`, then get bulleted unless they already are
pub fn normalize_notes(notes: &str) -> String {
    let stripped = notes.replace('*', "");
    let stripped = stripped.trim();
    if stripped.starts_with('•') {
        stripped.to_string()
    } else {
        bulletize(stripped)
    }
}

pub struct Assistant {
    client: Arc<CampusClient>,
    enabled: bool,
}

impl Assistant {
    pub fn new(client: Arc<CampusClient>, enabled: bool) -> Self {
        Self { client, enabled }
    }

    fn ensure_enabled(&self) -> CampusResult<()> {
        if self.enabled {
            Ok(())
        } else {
            Err(config_error!("The assistant is disabled", "assistant"))
        }
    }

    pub async fn ask(&self, question: &str) -> CampusResult<String> {
        self.ensure_enabled()?;
        if question.trim().is_empty() {
            return Err(validation_error!("Please enter a question", "question", "assistant"));
        }

        let reply = self.client.generate(&faculty_prompt(question.trim())).await?;
        debug!(answered = reply.is_some(), "Assistant replied");
        Ok(normalize_reply(reply.as_deref().unwrap_or(NO_RESPONSE)))
    }

    pub async fn notes(&self, topic: &str) -> CampusResult<String> {
        self.ensure_enabled()?;
        if topic.trim().is_empty() {
            return Err(validation_error!("Please enter a topic", "topic", "assistant"));
        }

        let notes = self.client.generate(&notes_prompt(topic.trim())).await?;
        Ok(normalize_notes(notes.as_deref().unwrap_or(NO_NOTES)))
    }
}
