//! Scripted `GenerativeModel` double for pipeline tests.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use super::{GenerativeModel, InlineImage, LlmError};

/// What the model does on its next call.
pub enum Reply {
    Text(String),
    Fail(u16, String),
    Panic(String),
}

impl Reply {
    pub fn text(s: impl Into<String>) -> Self {
        Reply::Text(s.into())
    }
}

/// Pops one scripted reply per call. Text calls and image calls have separate queues.
/// An exhausted queue answers with an API error.
#[derive(Default)]
pub struct ScriptedModel {
    text_replies: Mutex<VecDeque<Reply>>,
    image_replies: Mutex<VecDeque<Reply>>,
    text_calls: AtomicUsize,
    image_calls: AtomicUsize,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_text(self, reply: Reply) -> Self {
        self.text_replies.lock().unwrap().push_back(reply);
        self
    }

    pub fn on_image(self, reply: Reply) -> Self {
        self.image_replies.lock().unwrap().push_back(reply);
        self
    }

    pub fn text_calls(&self) -> usize {
        self.text_calls.load(Ordering::SeqCst)
    }

    pub fn image_calls(&self) -> usize {
        self.image_calls.load(Ordering::SeqCst)
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }

    fn answer(queue: &Mutex<VecDeque<Reply>>) -> Result<String, LlmError> {
        // Lock is released before a scripted panic so the mutex is never poisoned.
        let next = queue.lock().unwrap().pop_front();
        match next {
            Some(Reply::Text(text)) => Ok(text),
            Some(Reply::Fail(status, message)) => Err(LlmError::Api { status, message }),
            Some(Reply::Panic(message)) => panic!("{message}"),
            None => Err(LlmError::Api {
                status: 500,
                message: "no scripted reply".to_string(),
            }),
        }
    }
}

#[async_trait]
impl GenerativeModel for ScriptedModel {
    async fn generate_text(&self, prompt: &str) -> Result<String, LlmError> {
        self.text_calls.fetch_add(1, Ordering::SeqCst);
        self.prompts.lock().unwrap().push(prompt.to_string());
        Self::answer(&self.text_replies)
    }

    async fn generate_with_image(
        &self,
        prompt: &str,
        _image: &InlineImage,
    ) -> Result<String, LlmError> {
        self.image_calls.fetch_add(1, Ordering::SeqCst);
        self.prompts.lock().unwrap().push(prompt.to_string());
        Self::answer(&self.image_replies)
    }
}
