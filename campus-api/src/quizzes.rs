//! Quiz generation and retrieval

use crate::client::CampusClient;
use campus_core::{malformed_response_error, validation_error, CampusResult};
use serde::{Deserialize, Serialize};
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuizLevel {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl std::str::FromStr for QuizLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "easy" => Ok(QuizLevel::Easy),
            "medium" => Ok(QuizLevel::Medium),
            "hard" => Ok(QuizLevel::Hard),
            _ => Err(format!("Unknown quiz level: {}", s)),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct QuizGenerateRequest {
    pub topic: String,
    pub level: QuizLevel,
    /// Sent as text, the way the generation form submits it
    pub semester: String,
}

#[derive(Debug, Deserialize)]
struct RawQuiz {
    question: String,
    #[serde(default)]
    option1: Option<String>,
    #[serde(default)]
    option2: Option<String>,
    #[serde(default)]
    option3: Option<String>,
    #[serde(default)]
    option4: Option<String>,
    answer: String,
}

#[derive(Debug, Deserialize)]
struct QuizEnvelope {
    status: String,
    #[serde(default)]
    count: Option<usize>,
    quizzes: Vec<RawQuiz>,
}

/// A question with its non-empty options in order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizQuestion {
    pub question: String,
    pub options: Vec<String>,
    pub answer: String,
}

impl From<RawQuiz> for QuizQuestion {
    fn from(raw: RawQuiz) -> Self {
        let options = [raw.option1, raw.option2, raw.option3, raw.option4]
            .into_iter()
            .flatten()
            .filter(|option| !option.is_empty())
            .collect();

        Self {
            question: raw.question,
            options,
            answer: raw.answer,
        }
    }
}

impl CampusClient {
    /// `POST generate-quiz/`
    pub async fn generate_quiz(
        &self,
        request: &QuizGenerateRequest,
    ) -> CampusResult<serde_json::Value> {
        if request.topic.trim().is_empty() {
            return Err(validation_error!("Please enter a topic", "topic", "quizzes"));
        }
        self.send_json(
            reqwest::Method::POST,
            "generate-quiz/",
            request,
            "generate_quiz",
        )
        .await
    }

    /// `GET api/quiz/?topic=`
    pub async fn fetch_quizzes(&self, topic: &str) -> CampusResult<Vec<QuizQuestion>> {
        let topic = topic.trim();
        if topic.is_empty() {
            return Err(validation_error!("Please enter a topic", "topic", "quizzes"));
        }

        let envelope: QuizEnvelope = self
            .get_json("api/quiz/", &[("topic", topic.to_string())], "fetch_quizzes")
            .await?;

        if envelope.status != "success" {
            return Err(malformed_response_error!(
                format!("quiz response status '{}'", envelope.status),
                "quizzes"
            ));
        }

        info!(
            topic,
            count = envelope.count.unwrap_or(envelope.quizzes.len()),
            "Loaded quizzes"
        );
        Ok(envelope.quizzes.into_iter().map(QuizQuestion::from).collect())
    }
}
