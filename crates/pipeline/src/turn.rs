//! Turn orchestration: one question in, a stream of answer events out.
//!
//! `handle()` returns an `mpsc::Receiver` that a background task populates —
//! the caller simply reads from it. Per turn: check shortcuts, read the
//! transcript and gather evidence concurrently, render the prompt, then relay
//! token chunks as they arrive. History is written exactly once, and only
//! after the answer streamed to completion; a failed or abandoned turn leaves
//! the transcript untouched.

use std::sync::Arc;
use tokio::sync::{Mutex, mpsc};
use tracing::{debug, error, info};

use standin_core::event::TurnEvent;
use standin_core::generator::{GenerationRequest, Generator};

use crate::aggregator::ContextAggregator;
use crate::history::ChatHistory;
use crate::prompt::PromptTemplate;
use crate::shortcuts::ShortcutTable;

/// The answer pipeline for a single conversation.
///
/// Cheap to clone via `Arc`; all turns share one rolling history.
pub struct TurnPipeline {
    generator: Arc<dyn Generator>,
    aggregator: Arc<ContextAggregator>,
    history: Arc<Mutex<ChatHistory>>,
    template: PromptTemplate,
    shortcuts: ShortcutTable,
    temperature: f32,
    max_tokens: Option<u32>,
}

impl TurnPipeline {
    pub fn new(
        generator: Arc<dyn Generator>,
        aggregator: ContextAggregator,
        template: PromptTemplate,
        max_history: usize,
    ) -> Self {
        Self {
            generator,
            aggregator: Arc::new(aggregator),
            history: Arc::new(Mutex::new(ChatHistory::new(max_history))),
            template,
            shortcuts: ShortcutTable::default(),
            temperature: 0.5,
            max_tokens: None,
        }
    }

    pub fn with_shortcuts(mut self, shortcuts: ShortcutTable) -> Self {
        self.shortcuts = shortcuts;
        self
    }

    pub fn with_sampling(mut self, temperature: f32, max_tokens: Option<u32>) -> Self {
        self.temperature = temperature;
        self.max_tokens = max_tokens;
        self
    }

    /// Run one turn. The caller must keep reading the receiver; dropping it
    /// cancels the turn (no history write, no further work).
    pub fn handle(&self, question: impl Into<String>) -> mpsc::Receiver<TurnEvent> {
        let (tx, rx) = mpsc::channel::<TurnEvent>(128);

        let question = question.into();
        let generator = Arc::clone(&self.generator);
        let aggregator = Arc::clone(&self.aggregator);
        let history = Arc::clone(&self.history);
        let template = self.template.clone();
        let shortcuts = self.shortcuts.clone();
        let temperature = self.temperature;
        let max_tokens = self.max_tokens;

        tokio::spawn(async move {
            // Shortcuts bypass retrieval and generation entirely.
            if let Some(answer) = shortcuts.lookup(&question) {
                debug!("Shortcut hit, answering without generation");
                let answer = answer.to_string();
                if tx
                    .send(TurnEvent::Chunk {
                        content: answer.clone(),
                    })
                    .await
                    .is_err()
                {
                    return;
                }
                history.lock().await.record(&question, &answer);
                return;
            }

            // Transcript read and evidence gathering are independent.
            let (transcript, context) = tokio::join!(
                async { history.lock().await.transcript() },
                aggregator.gather(&question),
            );

            let prompt = template.render(&transcript, &context, &question);

            let request = GenerationRequest {
                prompt,
                temperature,
                max_tokens,
            };

            let mut stream_rx = match generator.stream(request).await {
                Ok(rx) => rx,
                Err(e) => {
                    error!(error = %e, "Failed to open generation stream");
                    let _ = tx
                        .send(TurnEvent::Error {
                            message: e.to_string(),
                        })
                        .await;
                    return;
                }
            };

            let mut answer = String::new();

            while let Some(chunk_result) = stream_rx.recv().await {
                match chunk_result {
                    Ok(chunk) => {
                        if let Some(ref text) = chunk.text
                            && !text.is_empty()
                        {
                            answer.push_str(text);
                            if tx
                                .send(TurnEvent::Chunk {
                                    content: text.clone(),
                                })
                                .await
                                .is_err()
                            {
                                debug!("Client went away mid-stream, abandoning turn");
                                return;
                            }
                        }
                        if chunk.done {
                            break;
                        }
                    }
                    Err(e) => {
                        error!(error = %e, "Generation stream failed mid-turn");
                        let _ = tx
                            .send(TurnEvent::Error {
                                message: e.to_string(),
                            })
                            .await;
                        return;
                    }
                }
            }

            info!(answer_len = answer.len(), "Turn completed");
            history.lock().await.record(&question, &answer);
        });

        rx
    }
}
