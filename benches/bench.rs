// Criterion benchmarks for Mentor Match

use std::collections::HashSet;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use mentor_match::core::scoring::score_components;
use mentor_match::jaccard_similarity;
use mentor_match::models::{MatchCriteria, MentorProfile, MentorType, ProgramStage};
use mentor_match::Matcher;

const SKILLS: [&str; 8] = ["React", "Node.js", "MongoDB", "Rust", "Go", "Python", "Sales", "Finance"];

fn create_mentor(id: usize) -> MentorProfile {
    let mentor_type = match id % 3 {
        0 => MentorType::Technical,
        1 => MentorType::Industry,
        _ => MentorType::Investor,
    };

    MentorProfile {
        mentor_id: format!("mentor_{}", id),
        name: format!("Mentor {}", id),
        email: None,
        mentor_type,
        expertise: (0..3).map(|k| SKILLS[(id + k) % SKILLS.len()].to_string()).collect(),
        company: Some(if id % 4 == 0 { "Fintech Labs" } else { "Tech Corp" }.to_string()),
        position: None,
        bio: None,
        timezone: Some(format!("UTC{:+}", (id % 12) as i32 - 6)),
        rating: Some(3.0 + (id % 5) as f64 * 0.5),
        sessions_completed: (id % 40) as u32,
        profile_image: None,
    }
}

fn create_criteria() -> MatchCriteria {
    let mut criteria = MatchCriteria::for_participant("participant_1")
        .with_required_skills(["React", "Node.js", "MongoDB"]);
    criteria.current_stage = ProgramStage::Development;
    criteria.preferred_industry = Some("fintech".to_string());
    criteria.participant_timezone = Some("UTC+3".to_string());
    criteria.min_rating = 3.5;
    criteria
}

fn bench_similarity(c: &mut Criterion) {
    let a = ["React", "Node.js", "MongoDB", "GraphQL"];
    let b = ["react", "Vue", "MongoDB"];

    c.bench_function("jaccard_similarity", |bench| {
        bench.iter(|| jaccard_similarity(black_box(&a), black_box(&b)));
    });
}

fn bench_components(c: &mut Criterion) {
    let mentor = create_mentor(7);
    let criteria = create_criteria();

    c.bench_function("score_components", |bench| {
        bench.iter(|| score_components(black_box(&mentor), black_box(&criteria)));
    });
}

fn bench_ranking(c: &mut Criterion) {
    let matcher = Matcher::with_default_config();
    let criteria = create_criteria();
    let history: HashSet<String> = (0..10).map(|i| format!("mentor_{}", i * 7)).collect();

    let mut group = c.benchmark_group("ranking");

    for candidate_count in [10, 100, 1000, 10000].iter() {
        let candidates: Vec<MentorProfile> = (0..*candidate_count).map(create_mentor).collect();

        group.bench_with_input(
            BenchmarkId::from_parameter(candidate_count),
            &candidates,
            |bench, candidates| {
                bench.iter(|| matcher.rank(black_box(&criteria), candidates.clone(), black_box(&history)));
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_similarity, bench_components, bench_ranking);
criterion_main!(benches);
