use futures::future::join_all;
use futures::stream::{FuturesUnordered, StreamExt};
use std::sync::Arc;
use tokio::sync::Semaphore;
use tracing::{error, info};
use crate::chunker::{split_into_chunks, DEFAULT_CHUNK_COUNT};
use crate::client::SummaryClient;
use crate::error::SummaryError;
use crate::logging::Logger;
use crate::prompts::PromptTemplate;
use crate::sanitize::sanitize_response;

pub const DEFAULT_MAX_CONCURRENCY: usize = 8;
pub const DEFAULT_MERGE_FALLBACK_CHARS: usize = 500;

/// Returned by [`ReductionEngine::reduce`] when no chunk produced a usable summary.
pub const NO_USABLE_SUMMARIES_MESSAGE: &str = "[Error: unable to generate summary from the article]";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReductionConfig {
    pub chunk_count: usize,
    pub max_concurrency: usize,
    /// Chars of raw pair text kept when a merge yields nothing usable.
    pub merge_fallback_chars: usize,
}

impl Default for ReductionConfig {
    fn default() -> Self {
        Self {
            chunk_count: DEFAULT_CHUNK_COUNT,
            max_concurrency: DEFAULT_MAX_CONCURRENCY,
            merge_fallback_chars: DEFAULT_MERGE_FALLBACK_CHARS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReductionOutcome {
    Completed,
    NoUsableSummaries,
    SynthesisFailed(SummaryError),
}

/// Result of one run: every summary level plus the final text.
#[derive(Debug, Clone)]
pub struct Reduction {
    pub levels: Vec<Vec<String>>,
    pub summary: String,
    pub outcome: ReductionOutcome,
}

impl Reduction {
    pub fn merge_rounds(&self) -> usize {
        self.levels.len().saturating_sub(1)
    }

    pub fn is_completed(&self) -> bool {
        self.outcome == ReductionOutcome::Completed
    }
}

/// Neighbouring summaries joined left to right; an odd tail stays alone.
pub fn pair_up(level: &[String]) -> Vec<String> {
    level.chunks(2).map(|pair| pair.join("\n\n")).collect()
}

pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}

pub fn synthesis_failure_message(err: &SummaryError) -> String {
    format!("[Error during detailed summary: {}]", err.kind())
}

/// Map-reduce summarizer: parallel chunk summaries, pairwise merges down to
/// at most two, then one detailed synthesis pass.
pub struct ReductionEngine {
    client: Arc<SummaryClient>,
    config: ReductionConfig,
    semaphore: Arc<Semaphore>,
}

impl ReductionEngine {
    pub fn new(client: SummaryClient, config: ReductionConfig) -> Self {
        Self {
            client: Arc::new(client),
            semaphore: Arc::new(Semaphore::new(config.max_concurrency.max(1))),
            config,
        }
    }

    pub fn config(&self) -> &ReductionConfig {
        &self.config
    }

    /// Final summary text. Never fails: errors come back as `[Error ...]` strings.
    pub async fn reduce(&self, text: &str) -> String {
        self.run(text).await.summary
    }

    pub async fn run(&self, text: &str) -> Reduction {
        let first_level = self.summarize_chunks(text).await;
        if first_level.is_empty() {
            error!("❌ No valid summaries obtained from chunks");
            return Reduction {
                levels: vec![first_level],
                summary: NO_USABLE_SUMMARIES_MESSAGE.to_string(),
                outcome: ReductionOutcome::NoUsableSummaries,
            };
        }
        info!("✅ Level 1 summaries completed ({}). Merging into fewer summaries", first_level.len());

        let mut levels = vec![first_level];
        loop {
            let current = &levels[levels.len() - 1];
            if current.len() <= 2 {
                break;
            }
            let round = levels.len();
            let merged = self.merge_level(round, current).await;
            levels.push(merged);
        }

        let last = &levels[levels.len() - 1];
        let final_input = last.join("\n\n");
        let logger = Logger::new().with_prefix("[final]".to_string());
        logger.info(&format!("🧩 Synthesizing detailed summary from {} parts", last.len()));

        match self
            .client
            .summarize_logged(PromptTemplate::DetailedSummary, &final_input, &logger)
            .await
        {
            Ok(summary) => {
                logger.info("✨ Detailed final summary ready");
                Reduction {
                    levels,
                    summary,
                    outcome: ReductionOutcome::Completed,
                }
            }
            Err(err) => {
                logger.error(&format!("Detailed summary failed: {}", err));
                Reduction {
                    levels,
                    summary: synthesis_failure_message(&err),
                    outcome: ReductionOutcome::SynthesisFailed(err),
                }
            }
        }
    }

    async fn summarize_chunks(&self, text: &str) -> Vec<String> {
        let chunks = split_into_chunks(text, self.config.chunk_count);
        let total = chunks.len();
        info!("⚙️ Splitting text into {} chunks for parallel summarization", total);

        let mut pending = FuturesUnordered::new();
        for chunk in chunks {
            let index = chunk.index;
            let text = chunk.text.to_string();
            let client = self.client.clone();
            let semaphore = self.semaphore.clone();
            let logger = Logger::new().with_prefix(format!("[chunk {}/{}]", index + 1, total));

            let handle = tokio::spawn(async move {
                let _permit = semaphore
                    .acquire_owned()
                    .await
                    .map_err(|e| SummaryError::Backend(e.to_string()))?;
                client
                    .summarize_logged(PromptTemplate::ChunkSummary, &text, &logger)
                    .await
            });
            pending.push(async move { (index, handle.await) });
        }

        // Completion order is arbitrary; results go back into their chunk slot.
        let mut slots = vec![String::new(); total];
        while let Some((index, joined)) = pending.next().await {
            let logger = Logger::new().with_prefix(format!("[chunk {}/{}]", index + 1, total));
            let sanitized = match joined {
                Ok(response) => sanitize_response(&response),
                Err(e) => {
                    logger.error(&format!("Summarization task failed: {}", e));
                    String::new()
                }
            };
            if sanitized.is_empty() {
                logger.warn("No usable summary for this chunk");
            } else {
                logger.info(&format!("Level 1 summary (sanitized): {}", sanitized));
            }
            slots[index] = sanitized;
        }

        slots.into_iter().filter(|s| !s.is_empty()).collect()
    }

    async fn merge_level(&self, round: usize, level: &[String]) -> Vec<String> {
        let pairs = pair_up(level);
        let total = pairs.len();
        info!("🔗 Merge round {}: {} summaries into {}", round, level.len(), total);

        let merges = pairs.into_iter().enumerate().map(|(i, combined)| {
            let logger = Logger::new()
                .with_prefix(format!("[merge {}]", round))
                .with_prefix(format!("[pair {}/{}]", i + 1, total));
            async move {
                let response = match self.semaphore.acquire().await {
                    Ok(_permit) => {
                        self.client
                            .summarize_logged(PromptTemplate::ChunkSummary, &combined, &logger)
                            .await
                    }
                    Err(e) => Err(SummaryError::Backend(e.to_string())),
                };
                let sanitized = sanitize_response(&response);
                if sanitized.is_empty() {
                    logger.warn("Merge gave no usable summary, keeping truncated text");
                    truncate_chars(&combined, self.config.merge_fallback_chars)
                } else {
                    logger.info(&format!("Merged summary part: {}", sanitized));
                    sanitized
                }
            }
        });

        join_all(merges).await
    }
}
