use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use mentionkit_core::editor::Editor;
use mentionkit_core::html::{parse_html, serialize_html, AllowListSanitizer, Sanitizer};
use mentionkit_core::mapper::locate;
use mentionkit_core::sync::ManualClock;
use mentionkit_core::EditorConfig;

/// Markup with `count` formatted paragraphs, each holding a mention
fn sample_html(count: usize) -> String {
    (0..count)
        .map(|i| {
            format!(
                r#"<p><strong>Line {}</strong> thanks <span class="mention" data-username="user{}">@user{}</span> for <em>the review</em></p>"#,
                i, i, i
            )
        })
        .collect()
}

fn editor() -> Editor {
    Editor::with_clock(EditorConfig::default(), (), ManualClock::new()).unwrap()
}

/// Benchmark sequential typing (simulates real user typing)
fn bench_sequential_typing(c: &mut Criterion) {
    let mut group = c.benchmark_group("editor_sequential_typing");

    for size in [10, 100, 1000].iter() {
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, &size| {
            b.iter(|| {
                let mut editor = editor();
                for _ in 0..size {
                    editor.insert_text("a").unwrap();
                }
                black_box(editor.document().len());
            });
        });
    }

    group.finish();
}

/// Benchmark typing a query and replacing it with a mention
fn bench_mention_flow(c: &mut Criterion) {
    c.bench_function("editor_mention_flow", |b| {
        b.iter(|| {
            let mut editor = editor();
            editor.insert_text("Thanks @al").unwrap();
            let trigger = editor.active_mention_query().cloned().unwrap();
            black_box(
                editor
                    .insert_mention("alice", trigger.anchor.offset, trigger.cursor)
                    .unwrap(),
            );
        });
    });
}

/// Benchmark HTML ingestion
fn bench_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("html_parse");

    for count in [1, 10, 100].iter() {
        let html = sample_html(*count);
        group.bench_with_input(BenchmarkId::from_parameter(count), &html, |b, html| {
            b.iter(|| black_box(parse_html(html)));
        });
    }

    group.finish();
}

/// Benchmark the serialize + sanitize output path
fn bench_serialize_sanitize(c: &mut Criterion) {
    let doc = parse_html(&sample_html(100));
    let sanitizer = AllowListSanitizer::new();

    c.bench_function("serialize_sanitize_100", |b| {
        b.iter(|| black_box(sanitizer.sanitize(&serialize_html(&doc))));
    });
}

/// Benchmark offset resolution across a long document
fn bench_locate(c: &mut Criterion) {
    let doc = parse_html(&sample_html(100));
    let len = doc.len();

    c.bench_function("mapper_locate_100", |b| {
        b.iter(|| {
            for offset in (0..len).step_by(97) {
                black_box(locate(&doc, offset));
            }
        });
    });
}

criterion_group!(
    benches,
    bench_sequential_typing,
    bench_mention_flow,
    bench_parse,
    bench_serialize_sanitize,
    bench_locate
);
criterion_main!(benches);
