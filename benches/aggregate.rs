//! 统计聚合性能基准测试

use std::hint::black_box;

use chrono::{Duration, FixedOffset, Utc};
use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use visitlog::analytics::compute_analytics;
use visitlog::storage::PageViewEvent;
use visitlog::tracking::{classify_browser, classify_device};

const PAGES: [&str; 6] = ["/", "/about", "/classes", "/schedule", "/gallery", "/contact"];
const USER_AGENTS: [&str; 4] = [
    "Mozilla/5.0 (iPhone; CPU iPhone OS 17_0 like Mac OS X) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.0 Mobile/15E148 Safari/604.1",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36 Edg/120.0.0.0",
    "Mozilla/5.0 (iPad; CPU OS 17_0 like Mac OS X) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.0 Safari/604.1",
];

/// 生成 n 条事件，按 created_at 倒序，跨度约 60 天
fn synthetic_events(n: usize) -> Vec<PageViewEvent> {
    let now = Utc::now();
    (0..n)
        .map(|i| {
            let ua = USER_AGENTS[i % USER_AGENTS.len()];
            PageViewEvent {
                id: (n - i) as i64,
                page_path: PAGES[i % PAGES.len()].to_string(),
                visitor_id: Some(format!("visitor-{}", i % 97)),
                user_agent: Some(ua.to_string()),
                referrer: None,
                device_type: Some(classify_device(Some(ua)).to_string()),
                browser: Some(classify_browser(Some(ua)).to_string()),
                country: None,
                city: None,
                created_at: now - Duration::minutes((i * 60 * 24 * 60 / n.max(1)) as i64),
            }
        })
        .collect()
}

fn bench_compute_analytics(c: &mut Criterion) {
    let mut group = c.benchmark_group("aggregate/compute_analytics");
    let now = Utc::now().with_timezone(&FixedOffset::east_opt(0).unwrap());

    for size in [100usize, 1_000, 10_000] {
        let events = synthetic_events(size);
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &events, |b, events| {
            b.iter(|| compute_analytics(black_box(events), now));
        });
    }

    group.finish();
}

fn bench_classify(c: &mut Criterion) {
    let mut group = c.benchmark_group("aggregate/classify");
    group.throughput(Throughput::Elements(USER_AGENTS.len() as u64));

    group.bench_function("device_and_browser", |b| {
        b.iter(|| {
            for ua in USER_AGENTS {
                black_box(classify_device(Some(black_box(ua))));
                black_box(classify_browser(Some(black_box(ua))));
            }
        });
    });

    group.finish();
}

criterion_group!(benches, bench_compute_analytics, bench_classify);
criterion_main!(benches);
