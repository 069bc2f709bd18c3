use async_trait::async_trait;
use rand::Rng;
use reqwest::Client;
use serde::Deserialize;
use trivia_core::model::Question;

use crate::config::DEFAULT_API_URL;
use crate::error::QuestionSourceError;

/// Anything that can hand out one fixed batch of questions per call.
#[async_trait]
pub trait QuestionSource: Send + Sync {
    /// Fetch `count` questions.
    ///
    /// # Errors
    ///
    /// Returns `QuestionSourceError::SourceUnavailable` when the source cannot
    /// be reached and `QuestionSourceError::SourceRejected` when it refuses.
    async fn fetch_batch(&self, count: u32) -> Result<Vec<Question>, QuestionSourceError>;
}

/// Open Trivia DB style HTTP client.
#[derive(Clone)]
pub struct OpenTdbClient {
    client: Client,
    api_url: String,
}

impl Default for OpenTdbClient {
    fn default() -> Self {
        Self::new(DEFAULT_API_URL)
    }
}

impl OpenTdbClient {
    #[must_use]
    pub fn new(api_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_url: api_url.into(),
        }
    }
}

#[async_trait]
impl QuestionSource for OpenTdbClient {
    async fn fetch_batch(&self, count: u32) -> Result<Vec<Question>, QuestionSourceError> {
        log::info!("fetching {count} questions from {}", self.api_url);

        let response = self
            .client
            .get(&self.api_url)
            .query(&[("amount", count)])
            .send()
            .await?;

        // Rejections (rate limits included) carry a response code even on non-2xx replies.
        let status = response.status();
        let body: TriviaResponse = match response.json().await {
            Ok(body) => body,
            Err(_) if !status.is_success() => return Err(QuestionSourceError::HttpStatus(status)),
            Err(err) => return Err(err.into()),
        };
        if body.response_code == 0 && !status.is_success() {
            return Err(QuestionSourceError::HttpStatus(status));
        }

        let questions = {
            let mut rng = rand::rng();
            normalize_response(body, &mut rng)?
        };
        log::info!("received {} questions", questions.len());
        Ok(questions)
    }
}

/// Wire shape of the trivia API response.
#[derive(Debug, Deserialize)]
pub struct TriviaResponse {
    pub response_code: i64,
    #[serde(default)]
    pub results: Vec<TriviaItem>,
}

/// One raw, HTML-entity-encoded trivia item.
#[derive(Debug, Deserialize)]
pub struct TriviaItem {
    pub question: String,
    pub correct_answer: String,
    #[serde(default)]
    pub incorrect_answers: Vec<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub difficulty: Option<String>,
}

impl TriviaItem {
    /// Decode every text field and shuffle the answers into a `Question`.
    pub fn into_question<R: Rng + ?Sized>(self, rng: &mut R) -> Question {
        let incorrect = self
            .incorrect_answers
            .iter()
            .map(|answer| decode_entities(answer))
            .collect();
        Question::new(
            decode_entities(&self.question),
            decode_entities(&self.correct_answer),
            incorrect,
            rng,
        )
        .with_category(self.category.as_deref().map(decode_entities))
        .with_difficulty(self.difficulty)
    }
}

/// Turn a wire response into questions, rejecting any non-zero response code.
///
/// # Errors
///
/// Returns `QuestionSourceError::SourceRejected` with the upstream code.
pub fn normalize_response<R: Rng + ?Sized>(
    response: TriviaResponse,
    rng: &mut R,
) -> Result<Vec<Question>, QuestionSourceError> {
    if response.response_code != 0 {
        log::warn!(
            "question service answered with response code {}",
            response.response_code
        );
        return Err(QuestionSourceError::SourceRejected {
            code: response.response_code,
        });
    }

    Ok(response
        .results
        .into_iter()
        .map(|item| item.into_question(&mut *rng))
        .collect())
}

/// Decode HTML entities (`&quot;`, `&#039;`, `&eacute;`, ...) to plain text.
#[must_use]
pub fn decode_entities(raw: &str) -> String {
    html_escape::decode_html_entities(raw).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::task::JoinHandle;

    /// Answer one HTTP request with `status` and `body`; the handle yields the raw request.
    async fn serve_once(status: &'static str, body: &'static str) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = vec![0u8; 4096];
            let read = socket.read(&mut buf).await.unwrap();
            let reply = format!(
                "HTTP/1.1 {status}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
                body.len()
            );
            socket.write_all(reply.as_bytes()).await.unwrap();
            let _ = socket.shutdown().await;
            String::from_utf8_lossy(&buf[..read]).into_owned()
        });
        (format!("http://{addr}/api.php"), handle)
    }

    const SAMPLE: &str = r#"{
        "response_code": 0,
        "results": [
            {
                "type": "multiple",
                "difficulty": "medium",
                "category": "Entertainment: Video Games",
                "question": "Which character says &quot;It&#039;s-a me&quot;?",
                "correct_answer": "Mario",
                "incorrect_answers": ["Luigi", "Wario", "Pok&eacute;mon"]
            },
            {
                "type": "boolean",
                "difficulty": "easy",
                "category": "Science &amp; Nature",
                "question": "Water boils at 100&#176;C at sea level.",
                "correct_answer": "True",
                "incorrect_answers": ["False"]
            }
        ]
    }"#;

    #[test]
    fn decodes_common_entities() {
        assert_eq!(decode_entities("Tom &amp; Jerry"), "Tom & Jerry");
        assert_eq!(decode_entities("&quot;Hi&quot;"), "\"Hi\"");
        assert_eq!(decode_entities("It&#039;s"), "It's");
        assert_eq!(decode_entities("Pok&eacute;mon"), "Pokémon");
        assert_eq!(decode_entities("plain"), "plain");
    }

    #[test]
    fn normalizes_sample_response() {
        let response: TriviaResponse = serde_json::from_str(SAMPLE).unwrap();
        let mut rng = StdRng::seed_from_u64(5);

        let questions = normalize_response(response, &mut rng).unwrap();

        assert_eq!(questions.len(), 2);
        let first = &questions[0];
        assert_eq!(first.prompt(), "Which character says \"It's-a me\"?");
        assert_eq!(first.correct_answer(), "Mario");
        assert_eq!(first.difficulty(), Some("medium"));
        assert!(first.answers().iter().any(|a| a == "Pokémon"));

        let second = &questions[1];
        assert_eq!(second.prompt(), "Water boils at 100°C at sea level.");
        assert_eq!(second.category(), Some("Science & Nature"));
        assert_eq!(second.answers().len(), 2);
    }

    #[test]
    fn shuffled_answers_keep_the_multiset() {
        let mut rng = StdRng::seed_from_u64(99);
        for _ in 0..20 {
            let response: TriviaResponse = serde_json::from_str(SAMPLE).unwrap();
            for question in normalize_response(response, &mut rng).unwrap() {
                let mut answers = question.answers().to_vec();
                answers.sort();
                let mut expected: Vec<String> = match question.correct_answer() {
                    "Mario" => vec!["Luigi".into(), "Wario".into(), "Pokémon".into()],
                    _ => vec!["False".into()],
                };
                expected.push(question.correct_answer().to_string());
                expected.sort();
                assert_eq!(answers, expected);
            }
        }
    }

    #[test]
    fn non_zero_response_code_is_rejected() {
        let response: TriviaResponse =
            serde_json::from_str(r#"{"response_code": 1, "results": []}"#).unwrap();
        let err = normalize_response(response, &mut StdRng::seed_from_u64(0)).unwrap_err();
        assert!(matches!(err, QuestionSourceError::SourceRejected { code: 1 }));
    }

    #[test]
    fn missing_results_decode_as_empty_batch() {
        let response: TriviaResponse = serde_json::from_str(r#"{"response_code": 0}"#).unwrap();
        let questions = normalize_response(response, &mut StdRng::seed_from_u64(0)).unwrap();
        assert!(questions.is_empty());
    }

    #[tokio::test]
    async fn unreachable_host_is_source_unavailable() {
        let client = OpenTdbClient::new("http://127.0.0.1:9/api.php");
        let err = client.fetch_batch(1).await.unwrap_err();
        assert!(matches!(err, QuestionSourceError::SourceUnavailable(_)));
    }

    #[tokio::test]
    async fn fetch_batch_requests_amount_and_decodes_questions() {
        let (url, server) = serve_once("200 OK", SAMPLE).await;
        let client = OpenTdbClient::new(url);

        let questions = client.fetch_batch(2).await.unwrap();

        assert_eq!(questions.len(), 2);
        assert_eq!(questions[0].correct_answer(), "Mario");
        assert_eq!(questions[1].category(), Some("Science & Nature"));
        let request = server.await.unwrap();
        assert!(request.starts_with("GET /api.php?amount=2 "));
    }

    #[tokio::test]
    async fn rate_limited_reply_is_rejected_with_its_code() {
        let (url, _server) =
            serve_once("429 Too Many Requests", r#"{"response_code":5,"results":[]}"#).await;
        let client = OpenTdbClient::new(url);

        let err = client.fetch_batch(10).await.unwrap_err();
        assert!(matches!(err, QuestionSourceError::SourceRejected { code: 5 }));
    }

    #[tokio::test]
    async fn error_status_without_trivia_body_reports_status() {
        let (url, _server) = serve_once("503 Service Unavailable", "down for maintenance").await;
        let client = OpenTdbClient::new(url);

        let err = client.fetch_batch(10).await.unwrap_err();
        assert!(matches!(
            err,
            QuestionSourceError::HttpStatus(status) if status.as_u16() == 503
        ));
    }
}
