//! Benchmarks for weight recomputation and ranking
//!
//! Run with: cargo bench --package learning

use catalog::{MediaType, genres};
use chrono::{Duration, TimeZone, Utc};
use criterion::{Criterion, black_box, criterion_group, criterion_main};
use learning::{
    FeedbackTarget, FeedbackValue, LearningConfig, MovieAttributes, PreferenceLearningState,
    RankingConfig, ScoringInput, rank_with_diversity, recompute_weights,
};
use profiler::{Industry, ReleaseEra, ThematicTag};

const GENRES: [u32; 6] = [
    genres::ACTION,
    genres::DRAMA,
    genres::COMEDY,
    genres::THRILLER,
    genres::ROMANCE,
    genres::HORROR,
];
const LANGUAGES: [(&str, Industry); 4] = [
    ("te", Industry::Tollywood),
    ("ta", Industry::Kollywood),
    ("ko", Industry::Korean),
    ("en", Industry::Hollywood),
];
const ERAS: [ReleaseEra; 4] = [
    ReleaseEra::Nineties,
    ReleaseEra::TwoThousands,
    ReleaseEra::TwentyTens,
    ReleaseEra::Recent,
];

fn attributes(i: usize) -> MovieAttributes {
    let (language, industry) = LANGUAGES[i % LANGUAGES.len()];
    MovieAttributes {
        genre_ids: vec![GENRES[i % GENRES.len()], GENRES[(i / 3) % GENRES.len()]],
        language: language.to_string(),
        industry,
        era: ERAS[i % ERAS.len()],
        themes: if i % 2 == 0 { vec![ThematicTag::Revenge] } else { vec![] },
        narrative_scale: None,
        audience_type: None,
    }
}

fn build_state(records: usize) -> PreferenceLearningState {
    let now = Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap();
    let mut state = PreferenceLearningState::default();
    for i in 0..records {
        let feedback = if i % 3 == 0 { FeedbackValue::Dislike } else { FeedbackValue::Like };
        state.record_feedback(
            FeedbackTarget {
                media_id: i as u64,
                media_type: MediaType::Movie,
                attributes: attributes(i),
            },
            feedback,
            None,
            now - Duration::days(i as i64),
        );
    }
    state
}

fn bench_recompute_weights(c: &mut Criterion) {
    let state = build_state(500);
    let config = LearningConfig::default();
    let now = Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap();

    c.bench_function("recompute_weights_500", |b| {
        b.iter(|| {
            let weights = recompute_weights(black_box(state.history()), &config, now);
            black_box(weights)
        })
    });
}

fn bench_rank_with_diversity(c: &mut Criterion) {
    let state = build_state(50);
    let ranking = RankingConfig::default();

    c.bench_function("rank_with_diversity_200", |b| {
        b.iter(|| {
            let candidates: Vec<ScoringInput> = (0..200)
                .map(|i| ScoringInput {
                    attributes: attributes(i * 7),
                    reference_score: (i % 100) as f64,
                })
                .collect();
            black_box(rank_with_diversity(black_box(candidates), &state, &ranking))
        })
    });
}

criterion_group!(benches, bench_recompute_weights, bench_rank_with_diversity);
criterion_main!(benches);
