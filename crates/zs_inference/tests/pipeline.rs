mod common;

use std::sync::Arc;
use std::time::Duration;
use rand::Rng;
use zs_core::Error;
use zs_inference::prelude::*;
use zs_inference::prompts::PromptTemplate;
use zs_inference::reduce::NO_USABLE_SUMMARIES_MESSAGE;
use zs_inference::sanitize::is_error_marker;
use common::{engine, first_marker, marked_text, MockModel};

fn article(len: usize) -> String {
    "lorem ipsum dolor sit amet ".chars().cycle().take(len).collect()
}

#[tokio::test]
async fn test_end_to_end_halves_each_round() {
    let model = Arc::new(MockModel::replying("Point one. Point two."));
    let engine = engine(model.clone(), ReductionConfig::default());

    let reduction = engine.run(&article(800)).await;

    let sizes: Vec<usize> = reduction.levels.iter().map(Vec::len).collect();
    assert_eq!(sizes, vec![8, 4, 2]);
    assert!(reduction.levels[0].iter().all(|s| s == "Point one Point two"));
    assert_eq!(model.calls(), 8 + 4 + 2 + 1);

    assert_eq!(reduction.outcome, ReductionOutcome::Completed);
    assert_eq!(reduction.summary, "Point one. Point two.");
    assert!(!is_error_marker(&reduction.summary));
}

#[tokio::test]
async fn test_all_chunks_failing_reports_no_usable_summaries() {
    let model = Arc::new(MockModel::new(|_| Err(Error::Inference("503 Service Unavailable".to_string()))));
    let engine = engine(model.clone(), ReductionConfig::default());

    let reduction = engine.run(&article(800)).await;

    assert_eq!(reduction.summary, NO_USABLE_SUMMARIES_MESSAGE);
    assert_eq!(reduction.outcome, ReductionOutcome::NoUsableSummaries);
    assert_eq!(model.calls(), 8);
}

#[tokio::test]
async fn test_timeouts_are_retried_per_chunk() {
    let model = Arc::new(MockModel::new(|_| Err(Error::Timeout(Duration::from_secs(5)))));
    let engine = engine(model.clone(), ReductionConfig::default());

    let summary = engine.reduce(&article(800)).await;

    assert_eq!(summary, NO_USABLE_SUMMARIES_MESSAGE);
    assert_eq!(model.calls(), 8 * 3);
}

#[tokio::test]
async fn test_order_survives_reversed_completion() {
    let model = Arc::new(MockModel::echo().with_delay(|prompt| {
        let marker = first_marker(prompt).unwrap_or(0) as u64;
        Duration::from_millis((10 - marker) * 5)
    }));
    let engine = engine(model, ReductionConfig::default());

    let reduction = engine.run(&marked_text(8, 50)).await;

    for (i, summary) in reduction.levels[0].iter().enumerate() {
        assert!(summary.starts_with(&format!("marker{}", i)), "slot {}: {}", i, summary);
    }
    let positions: Vec<usize> = (0..8)
        .map(|i| reduction.summary.find(&format!("marker{}", i)).unwrap())
        .collect();
    assert!(positions.windows(2).all(|w| w[0] < w[1]), "{}", reduction.summary);
}

#[tokio::test]
async fn test_order_survives_random_completion() {
    let model = Arc::new(MockModel::echo().with_delay(|_| {
        let millis = rand::thread_rng().gen_range(0..20);
        Duration::from_millis(millis)
    }));
    let engine = engine(
        model,
        ReductionConfig {
            chunk_count: 6,
            ..ReductionConfig::default()
        },
    );

    for _ in 0..3 {
        let reduction = engine.run(&marked_text(6, 40)).await;
        let markers: Vec<u32> = reduction.levels[0].iter().filter_map(|s| first_marker(s)).collect();
        assert_eq!(markers, vec![0, 1, 2, 3, 4, 5]);
    }
}

#[tokio::test]
async fn test_concurrency_is_capped() {
    let model = Arc::new(MockModel::replying("A short factual summary.").with_delay(|_| Duration::from_millis(20)));
    let engine = engine(
        model.clone(),
        ReductionConfig {
            max_concurrency: 3,
            ..ReductionConfig::default()
        },
    );

    let reduction = engine.run(&article(800)).await;

    assert!(reduction.is_completed());
    assert!(model.peak_in_flight() <= 3, "peak {}", model.peak_in_flight());
    assert!(model.peak_in_flight() >= 1);
}

#[tokio::test]
async fn test_synthesis_failure_returns_tagged_text() {
    let model = Arc::new(MockModel::new(|prompt| {
        if prompt.starts_with(PromptTemplate::DetailedSummary.preamble()) {
            Err(Error::Inference("500 Internal Server Error".to_string()))
        } else {
            Ok("Intermediate summary text.".to_string())
        }
    }));
    let engine = engine(model, ReductionConfig::default());

    let reduction = engine.run(&article(800)).await;

    assert!(is_error_marker(&reduction.summary), "{}", reduction.summary);
    assert!(reduction.summary.contains("detailed summary"));
    assert!(matches!(
        reduction.outcome,
        ReductionOutcome::SynthesisFailed(SummaryError::Backend(_))
    ));
    assert_eq!(reduction.levels.last().map(Vec::len), Some(2));
}

#[tokio::test]
async fn test_merge_fallback_is_bounded() {
    let long = "sentence about history ".repeat(30);
    let model = Arc::new(MockModel::new(move |prompt| {
        if prompt.starts_with(PromptTemplate::ChunkSummary.preamble()) && prompt.len() > 600 {
            Ok(String::new())
        } else {
            Ok(long.clone())
        }
    }));
    let engine = engine(model, ReductionConfig::default());

    let reduction = engine.run(&article(800)).await;

    for level in &reduction.levels[1..] {
        for summary in level {
            assert!(summary.chars().count() <= 500);
        }
    }
    assert!(reduction.is_completed());
}

#[tokio::test]
async fn test_text_shorter_than_chunk_count_skips_empty_chunks() {
    let model = Arc::new(MockModel::replying("Tiny but valid summary."));
    let engine = engine(model.clone(), ReductionConfig::default());

    let reduction = engine.run("abc").await;

    // Seven empty chunks never reach the backend; the last one holds "abc".
    assert_eq!(reduction.levels, vec![vec!["Tiny but valid summary".to_string()]]);
    assert_eq!(model.calls(), 2);
    assert!(reduction.is_completed());
}

#[tokio::test]
async fn test_dummy_backend_end_to_end() {
    let model = create_model(&InferenceConfig {
        kind: ModelKind::Dummy,
        ..InferenceConfig::default()
    })
    .await
    .unwrap();
    let engine = ReductionEngine::new(SummaryClient::new(model, ClientConfig::default()), ReductionConfig::default());

    let summary = engine.reduce(&article(2000)).await;

    assert!(!summary.is_empty());
    assert!(!is_error_marker(&summary));
}
