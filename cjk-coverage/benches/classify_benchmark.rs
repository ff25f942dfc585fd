use cjk_coverage::{classify, query, Catalogue, FontCharacterSet};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

struct FontShape {
    name: &'static str,
    /// Every `stride`th code point of the unified ideographs and Extension B.
    stride: u32,
}

impl std::fmt::Display for FontShape {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}

fn font(shape: &FontShape) -> FontCharacterSet {
    FontCharacterSet::from_code_points(
        (0x4E00..=0x9FFF)
            .chain(0x20000..=0x2A6DF)
            .step_by(shape.stride as usize),
    )
}

const SHAPES: [FontShape; 3] = [
    FontShape { name: "pan-cjk", stride: 1 },
    FontShape { name: "regional", stride: 3 },
    FontShape { name: "sparse", stride: 97 },
];

pub fn classify_benchmark(c: &mut Criterion) {
    let catalogue = Catalogue::load();
    for shape in &SHAPES {
        let font = font(shape);
        c.bench_with_input(BenchmarkId::new("classify", shape), &font, |b, font| {
            b.iter(|| classify(black_box(&catalogue), black_box(font)))
        });
    }
}

pub fn missing_benchmark(c: &mut Criterion) {
    let catalogue = Catalogue::load();
    let Some(gbk) = catalogue.table("gbk") else {
        return;
    };
    for shape in &SHAPES {
        let font = font(shape);
        c.bench_with_input(BenchmarkId::new("missing_gbk", shape), &font, |b, font| {
            b.iter(|| query::missing(gbk, black_box(font)))
        });
    }
}

criterion_group!(benches, classify_benchmark, missing_benchmark);
criterion_main!(benches);
