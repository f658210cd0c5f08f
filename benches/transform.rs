//! Benchmarks for content transformation and thumbnail resolution.
//!
//! Run with: `cargo bench`

use criterion::{
    black_box, criterion_group, criterion_main, BenchmarkId, Criterion,
    Throughput,
};
use quillpost::{resolve_thumbnail, transform, ContentTransformer};

const ARTICLE: &str = "# Trip report
## Day one
We arrived **late** but *happy*. <u>Never again</u> will we take the night bus.
- packed light
- forgot the charger
1. breakfast
2. museum
> The best view in town.
https://www.youtube.com/watch?v=dQw4w9WgXcQ
https://drive.google.com/file/d/1AbCdEfGhIjK/view?usp=sharing
https://drive.google.com/file/d/1ZyXwVuT/view clip.mp4
https://www.instagram.com/p/C1a2B3c4D5e/
https://vimeo.com/76979871
https://cdn.example.com/photos/sunset.jpg?w=1200
";

const MEDIA_URLS: [&str; 4] = [
    "https://youtu.be/dQw4w9WgXcQ",
    "https://drive.google.com/open?id=1AbCdEfGhIjK",
    "https://cdn.example.com/cover.webp",
    "https://example.com/not-media",
];

fn bench_transform(c: &mut Criterion) {
    let mut group = c.benchmark_group("transform");
    for copies in [1_usize, 10, 100] {
        let input = ARTICLE.repeat(copies);
        group.throughput(Throughput::Bytes(input.len() as u64));
        group.bench_with_input(
            BenchmarkId::from_parameter(copies),
            &input,
            |b, input| b.iter(|| transform(black_box(input))),
        );
    }
    group.finish();

    c.bench_function("transform_fresh_pipeline", |b| {
        b.iter(|| {
            ContentTransformer::try_new()
                .map(|t| t.transform(black_box(ARTICLE)))
        })
    });
}

fn bench_thumbnail(c: &mut Criterion) {
    c.bench_function("resolve_thumbnail", |b| {
        b.iter(|| {
            for url in MEDIA_URLS {
                let _ = black_box(resolve_thumbnail(black_box(Some(url))));
            }
        })
    });
}

criterion_group!(benches, bench_transform, bench_thumbnail);
criterion_main!(benches);
