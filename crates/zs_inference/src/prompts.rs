#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptTemplate {
    /// Short factual summary of one excerpt; used for chunks and merges.
    ChunkSummary,
    /// Expanded, list-formatted summary of the merged summaries.
    DetailedSummary,
}

const CHUNK_SUMMARY_PREAMBLE: &str =
    "Summarize this part of an encyclopedia article briefly, clearly, and factually. Use key points:";

const DETAILED_SUMMARY_PREAMBLE: &str = "You are an expert assistant. \
Please provide a detailed and expanded summary of the following text. \
Make it about 20 lines long, structured as clear bullet points or numbered points, \
including key facts, explanations, and insights. \
The tone should be factual, comprehensive, and easy to understand.";

impl PromptTemplate {
    pub fn preamble(&self) -> &'static str {
        match self {
            PromptTemplate::ChunkSummary => CHUNK_SUMMARY_PREAMBLE,
            PromptTemplate::DetailedSummary => DETAILED_SUMMARY_PREAMBLE,
        }
    }

    pub fn render(&self, excerpt: &str) -> String {
        format!("{}\n\n{}", self.preamble(), excerpt)
    }
}

/// The excerpt part of a prompt built by [`PromptTemplate::render`].
pub fn excerpt_of(prompt: &str) -> &str {
    prompt.split_once("\n\n").map_or(prompt, |(_, excerpt)| excerpt)
}
