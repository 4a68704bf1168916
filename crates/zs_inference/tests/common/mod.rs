#![allow(dead_code)]

use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use async_trait::async_trait;
use zs_core::{CompletionModel, Result};
use zs_inference::prompts::excerpt_of;
use zs_inference::{ClientConfig, ReductionConfig, ReductionEngine, RetryPolicy, SummaryClient};

type Respond = Box<dyn Fn(&str) -> Result<String> + Send + Sync>;
type Delay = Box<dyn Fn(&str) -> Duration + Send + Sync>;

/// Completion backend driven by closures that counts calls and tracks how
/// many requests were in flight at once.
pub struct MockModel {
    respond: Respond,
    delay: Delay,
    calls: AtomicUsize,
    in_flight: AtomicUsize,
    peak: AtomicUsize,
}

impl fmt::Debug for MockModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MockModel")
            .field("calls", &self.calls())
            .finish()
    }
}

impl MockModel {
    pub fn new(respond: impl Fn(&str) -> Result<String> + Send + Sync + 'static) -> Self {
        Self {
            respond: Box::new(respond),
            delay: Box::new(|_| Duration::ZERO),
            calls: AtomicUsize::new(0),
            in_flight: AtomicUsize::new(0),
            peak: AtomicUsize::new(0),
        }
    }

    pub fn replying(text: &str) -> Self {
        let text = text.to_string();
        Self::new(move |_| Ok(text.clone()))
    }

    /// Answers with the excerpt it was given.
    pub fn echo() -> Self {
        Self::new(|prompt| Ok(excerpt_of(prompt).to_string()))
    }

    pub fn with_delay(mut self, delay: impl Fn(&str) -> Duration + Send + Sync + 'static) -> Self {
        self.delay = Box::new(delay);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn peak_in_flight(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CompletionModel for MockModel {
    fn name(&self) -> &str {
        "mock"
    }

    async fn complete(&self, prompt: &str, _timeout: Duration) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);

        let delay = (self.delay)(prompt);
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        let result = (self.respond)(prompt);

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        result
    }
}

pub fn engine(model: Arc<MockModel>, config: ReductionConfig) -> ReductionEngine {
    let client = SummaryClient::new(
        model,
        ClientConfig {
            request_timeout: Duration::from_secs(5),
            retry: RetryPolicy::halving(2),
        },
    );
    ReductionEngine::new(client, config)
}

/// First digit after the first `marker` in `text`.
pub fn first_marker(text: &str) -> Option<u32> {
    let start = text.find("marker")? + "marker".len();
    text[start..].chars().next()?.to_digit(10)
}

/// `count` segments of exactly `width` chars, segment `i` starting with `marker{i}`.
pub fn marked_text(count: usize, width: usize) -> String {
    (0..count)
        .map(|i| {
            let mut segment = format!("marker{} filler text", i);
            while segment.len() < width {
                segment.push(' ');
            }
            segment
        })
        .collect()
}
