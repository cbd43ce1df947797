//! Quiz attempt

use campus_api::{CampusClient, QuizQuestion};
use campus_core::{validation_error, with_cancellation, CampusResult, CancellationToken};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default)]
pub struct QuizAttempt {
    pub topic: String,
    questions: Vec<QuizQuestion>,
    answers: BTreeMap<usize, String>,
}

impl QuizAttempt {
    pub fn new(topic: impl Into<String>, questions: Vec<QuizQuestion>) -> Self {
        Self {
            topic: topic.into(),
            questions,
            answers: BTreeMap::new(),
        }
    }

    /// Fetch the questions for `topic`; `Cancelled` once `token` fires
    pub async fn load(
        client: &CampusClient,
        topic: &str,
        token: &CancellationToken,
    ) -> CampusResult<Self> {
        let questions = with_cancellation(token, "load_quiz", client.fetch_quizzes(topic)).await?;
        Ok(Self::new(topic.trim(), questions))
    }

    pub fn questions(&self) -> &[QuizQuestion] {
        &self.questions
    }

    pub fn answer(&self, index: usize) -> Option<&str> {
        self.answers.get(&index).map(String::as_str)
    }

    /// Pick `option` for question `index`; replaces any earlier pick
    pub fn select(&mut self, index: usize, option: &str) -> CampusResult<()> {
        let question = self.questions.get(index).ok_or_else(|| {
            validation_error!(
                format!("There is no question {}", index + 1),
                "question",
                "quiz"
            )
        })?;

        if !question.options.iter().any(|o| o == option) {
            return Err(validation_error!(
                format!("'{}' is not an option for question {}", option, index + 1),
                "answer",
                "quiz"
            ));
        }

        self.answers.insert(index, option.to_string());
        Ok(())
    }

    pub fn is_complete(&self) -> bool {
        self.answers.len() == self.questions.len()
    }

    /// Number of correct answers; every question must be answered first
    pub fn submit(&self) -> CampusResult<usize> {
        if !self.is_complete() {
            return Err(validation_error!(
                "Please answer all questions before submitting",
                "answers",
                "quiz"
            ));
        }

        Ok(self
            .questions
            .iter()
            .enumerate()
            .filter(|(i, q)| self.answers.get(i) == Some(&q.answer))
            .count())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn question(text: &str, options: &[&str], answer: &str) -> QuizQuestion {
        QuizQuestion {
            question: text.to_string(),
            options: options.iter().map(|o| o.to_string()).collect(),
            answer: answer.to_string(),
        }
    }

    fn attempt() -> QuizAttempt {
        QuizAttempt::new(
            "Graphs",
            vec![
                question("BFS uses?", &["Queue", "Stack"], "Queue"),
                question("DFS uses?", &["Queue", "Stack"], "Stack"),
                question("Dijkstra needs?", &["Heap", "Trie"], "Heap"),
            ],
        )
    }

    #[test]
    fn test_submit_requires_every_answer() {
        let mut quiz = attempt();
        quiz.select(0, "Queue").unwrap();
        quiz.select(1, "Queue").unwrap();
        assert!(quiz.submit().is_err());

        quiz.select(2, "Heap").unwrap();
        assert_eq!(quiz.submit().unwrap(), 2);

        quiz.select(1, "Stack").unwrap();
        assert_eq!(quiz.submit().unwrap(), 3);
    }

    #[test]
    fn test_select_rejects_unknown_question_or_option() {
        let mut quiz = attempt();
        assert!(quiz.select(5, "Queue").is_err());
        assert!(quiz.select(0, "Deque").is_err());
        assert_eq!(quiz.answer(0), None);
    }

    #[test]
    fn test_empty_quiz_scores_zero() {
        assert_eq!(QuizAttempt::default().submit().unwrap(), 0);
    }
}
