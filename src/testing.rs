//! Deterministic collaborators for unit tests.

use crate::embedding::Embedder;
use crate::error::{PlotRagError, Result};
use crate::generation::Generator;
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// Bag-of-words embedder: each lowercase word is hashed into one dimension.
pub struct KeywordEmbedder {
    dimensions: usize,
    calls: AtomicUsize,
    fail: bool,
}

impl KeywordEmbedder {
    /// Fail every call, like an unreachable endpoint.
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    /// Number of texts embedded so far.
    pub fn embedded(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn check(&self) -> Result<()> {
        if self.fail {
            return Err(PlotRagError::OpenAI("connection refused".to_string()));
        }
        Ok(())
    }

    fn vectorize(&self, text: &str) -> Vec<f32> {
        let mut vector = vec![0.0; self.dimensions];
        for word in text.split(|c: char| !c.is_alphanumeric()).filter(|w| !w.is_empty()) {
            // FNV-1a
            let hash = word
                .to_lowercase()
                .bytes()
                .fold(0xcbf29ce484222325u64, |h, b| (h ^ b as u64).wrapping_mul(0x100000001b3));
            vector[(hash % self.dimensions as u64) as usize] += 1.0;
        }
        vector
    }
}

impl Default for KeywordEmbedder {
    fn default() -> Self {
        Self {
            dimensions: 256,
            calls: AtomicUsize::new(0),
            fail: false,
        }
    }
}

#[async_trait]
impl Embedder for KeywordEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        self.check()?;
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.vectorize(text))
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        self.check()?;
        self.calls.fetch_add(texts.len(), Ordering::SeqCst);
        Ok(texts.iter().map(|t| self.vectorize(t)).collect())
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }
}

/// Generator that replays a fixed reply and records every prompt it receives.
pub struct ScriptedGenerator {
    reply: Option<String>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedGenerator {
    /// Always answer with `reply`.
    pub fn replying(reply: &str) -> Self {
        Self {
            reply: Some(reply.to_string()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Fail every call, like an unreachable endpoint.
    pub fn failing() -> Self {
        Self {
            reply: None,
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Prompts received so far.
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl Generator for ScriptedGenerator {
    async fn generate(&self, prompt: &str) -> Result<String> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.reply
            .clone()
            .ok_or_else(|| PlotRagError::OpenAI("connection refused".to_string()))
    }

    fn model(&self) -> &str {
        "scripted"
    }
}
