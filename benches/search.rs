use criterion::{Criterion, black_box, criterion_group, criterion_main};
use waymark::catalog::{ItemKind, Waypoint};
use waymark::distance::{Position, StaticResolver, rank_by_distance};
use waymark::search::{search, strip_markup};

/// Build a synthetic catalog large enough to exercise the parallel path
fn synthetic_catalog(size: usize) -> Vec<Waypoint> {
    (0..size)
        .map(|i| Waypoint {
            name: format!("Waypoint {i:05}"),
            kind: ItemKind::default(),
            display_name: format!("&a&lWaypoint &7{i:05}"),
            lore: vec![
                format!("&7Sector {}", i % 64),
                "&8Maintained by the survey team".to_string(),
            ],
            destination_id: format!("wp_{i:05}"),
            performed: (i % 100) as u32,
            category: format!("sector-{}", i % 8),
            skull_owner: None,
            banner: None,
        })
        .collect()
}

fn bench_search(c: &mut Criterion) {
    let catalog = synthetic_catalog(10_000);

    c.bench_function("search_single_term", |b| {
        b.iter(|| search(black_box(&catalog), black_box("sector 42")))
    });

    c.bench_function("search_multi_term", |b| {
        b.iter(|| search(black_box(&catalog), black_box("waypoint survey 003")))
    });

    c.bench_function("search_no_match", |b| {
        b.iter(|| search(black_box(&catalog), black_box("nonexistent")))
    });
}

fn bench_strip_markup(c: &mut Criterion) {
    c.bench_function("strip_markup", |b| {
        b.iter(|| strip_markup(black_box("&a&lWaypoint &7042 &8- &ddeep &5mines&r")))
    });
}

fn bench_rank_by_distance(c: &mut Criterion) {
    let catalog = synthetic_catalog(10_000);
    let mut resolver = StaticResolver::new();
    for (i, w) in catalog.iter().enumerate() {
        resolver.insert(
            w.destination_id.clone(),
            Position::new((i as f64) * 13.0, 64.0, (i as f64) * -7.0),
        );
    }

    c.bench_function("rank_by_distance", |b| {
        b.iter(|| {
            rank_by_distance(
                black_box(&catalog),
                Some(Position::new(0.0, 0.0, 0.0)),
                Some(&resolver),
            )
        })
    });
}

criterion_group!(benches, bench_search, bench_strip_markup, bench_rank_by_distance);
criterion_main!(benches);
