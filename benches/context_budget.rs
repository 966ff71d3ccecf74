//! Benchmarks the hot path of prompt assembly: per-class budget allotment
//! and `build_context` over a realistic multi-file, multi-turn input.

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use obot::context::{BuildContextInput, ContextManager};
use obot::domain::{ContextSectionKind, ConversationTurn};

fn synthetic_turns(n: usize) -> Vec<ConversationTurn> {
    (0..n)
        .map(|i| ConversationTurn {
            role: if i % 2 == 0 { "user".to_string() } else { "assistant".to_string() },
            content: format!("turn {i}: {}", "lorem ipsum dolor sit amet ".repeat(8)),
            timestamp: chrono::Utc::now(),
        })
        .collect()
}

fn synthetic_files(n: usize) -> Vec<(String, String)> {
    (0..n)
        .map(|i| {
            let body: String =
                (0..200).map(|l| format!("let line_{i}_{l} = {l};\n")).collect::<Vec<_>>().join("");
            (format!("src/module_{i}.rs"), format!("use std::fmt;\n\n{body}"))
        })
        .collect()
}

fn bench_allotment(c: &mut Criterion) {
    let budget = obot::context::Budget::new(16_000);
    c.bench_function("budget_allotment_all_classes", |b| {
        b.iter(|| {
            for kind in ContextSectionKind::ALL {
                black_box(budget.allotment(kind));
            }
        })
    });
}

fn bench_build_context(c: &mut Criterion) {
    let manager = ContextManager::new(8_192);
    let history = synthetic_turns(40);
    let files = synthetic_files(6);

    c.bench_function("build_context_six_files_forty_turns", |b| {
        b.iter(|| {
            let input = BuildContextInput {
                system_prompt: "You are a careful Rust engineer.",
                project_rules: "never use unwrap in library code",
                task_description: "add retry logic to the backend client",
                selected_files: &files,
                history: &history,
                memory_patterns: &[],
                current_file: Some("src/module_0.rs"),
            };
            black_box(manager.build_context(&input));
        })
    });
}

criterion_group!(benches, bench_allotment, bench_build_context);
criterion_main!(benches);
