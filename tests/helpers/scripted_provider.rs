// ABOUTME: Scripted LlmProvider replaying a fixed sequence of replies and failures
// ABOUTME: Records every request so tests can assert prompts and sampling parameters

use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use agreement_studio::errors::{AppError, ErrorCode};
use agreement_studio::llm::{ChatRequest, ChatResponse, LlmProvider};
use async_trait::async_trait;

/// One scripted provider outcome
#[derive(Debug, Clone)]
pub enum Step {
    /// Successful completion with this text
    Reply(String),
    /// Successful completion with blank text
    Blank,
    /// Failure with this code
    Fail(ErrorCode),
    /// Never answers within any sane timeout
    Hang,
}

/// Provider that replays `Step`s in order, then repeats its last step
pub struct ScriptedProvider {
    steps: Mutex<VecDeque<Step>>,
    last: Mutex<Option<Step>>,
    requests: Mutex<Vec<ChatRequest>>,
}

impl ScriptedProvider {
    /// Replay `steps` in order
    pub fn new(steps: Vec<Step>) -> Self {
        Self {
            steps: Mutex::new(steps.into()),
            last: Mutex::new(None),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Always answer with `text`
    pub fn always(text: &str) -> Self {
        Self::new(vec![Step::Reply(text.to_owned())])
    }

    /// Always fail
    pub fn failing() -> Self {
        Self::new(vec![Step::Fail(ErrorCode::ExternalServiceUnavailable)])
    }

    /// Number of calls made so far
    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    /// Every request received, oldest first
    pub fn requests(&self) -> Vec<ChatRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// Prompt text of the most recent request
    pub fn last_prompt(&self) -> String {
        let requests = self.requests.lock().unwrap();
        let request = requests.last().expect("no request recorded");
        request
            .messages
            .iter()
            .map(|m| m.content.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn next_step(&self) -> Step {
        let mut steps = self.steps.lock().unwrap();
        let mut last = self.last.lock().unwrap();
        if let Some(step) = steps.pop_front() {
            *last = Some(step.clone());
            step
        } else {
            last.clone()
                .unwrap_or(Step::Fail(ErrorCode::ExternalServiceUnavailable))
        }
    }
}

#[async_trait]
impl LlmProvider for ScriptedProvider {
    fn name(&self) -> &'static str {
        "scripted"
    }

    fn display_name(&self) -> &'static str {
        "Scripted Test Provider"
    }

    fn default_model(&self) -> &'static str {
        "scripted-model"
    }

    async fn complete(&self, request: &ChatRequest) -> Result<ChatResponse, AppError> {
        self.requests.lock().unwrap().push(request.clone());

        let content = match self.next_step() {
            Step::Reply(text) => text,
            Step::Blank => "   ".to_owned(),
            Step::Fail(code) => return Err(AppError::new(code, "scripted failure")),
            Step::Hang => {
                tokio::time::sleep(Duration::from_secs(3600)).await;
                String::new()
            }
        };

        Ok(ChatResponse {
            content,
            model: self.default_model().to_owned(),
            usage: None,
            finish_reason: Some("STOP".to_owned()),
        })
    }
}
