// Criterion benchmarks for Glide Search

use chrono::{DateTime, Duration, TimeZone, Utc};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use glide_search::core::{
    distance::{calculate_bounding_box, haversine_distance},
    filters::{filter_candidates, segment_intersects_route},
    Matcher, RideSource,
};
use glide_search::models::{GeoPoint, RideOffer, SearchRequest};
use glide_search::services::RideIndex;
use tokio_util::sync::CancellationToken;

fn desired() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 14, 8, 0, 0).unwrap()
}

fn create_request() -> SearchRequest {
    SearchRequest::with_defaults(
        GeoPoint::new(12.90, 77.60),
        GeoPoint::new(12.95, 77.65),
        desired(),
    )
    .unwrap()
}

fn create_ride(id: usize) -> RideOffer {
    let lat_offset = (id as f64 * 0.0007) % 0.2;
    let lon_offset = (id as f64 * 0.0011) % 0.2;
    let start = GeoPoint::new(12.85 + lat_offset, 77.55 + lon_offset);
    let end = GeoPoint::new(12.93 + lat_offset / 2.0, 77.63 + lon_offset / 2.0);

    RideOffer {
        ride_id: format!("ride-{}", id),
        driver_id: format!("driver-{}", id % 97),
        driver_name: format!("Driver {}", id),
        seats_available: (id % 4) as u32,
        fare: 80.0 + (id % 50) as f64,
        polyline: None,
        start_point: start,
        end_point: end,
        route: vec![
            start,
            GeoPoint::new(12.93, 77.60),
            GeoPoint::new(12.92, 77.64),
            end,
        ],
        departure_time: desired() + Duration::minutes((id % 180) as i64 - 90),
    }
}

fn bench_haversine_distance(c: &mut Criterion) {
    c.bench_function("haversine_distance", |b| {
        b.iter(|| {
            haversine_distance(
                black_box(12.90),
                black_box(77.60),
                black_box(12.95),
                black_box(77.65),
            )
        });
    });
}

fn bench_bounding_box(c: &mut Criterion) {
    c.bench_function("bounding_box_calculation", |b| {
        b.iter(|| calculate_bounding_box(black_box(12.90), black_box(77.60), black_box(5.0)));
    });
}

fn bench_route_intersection(c: &mut Criterion) {
    let route: Vec<GeoPoint> = (0..200)
        .map(|i| GeoPoint::new(12.80 + i as f64 * 0.001, 77.70 - i as f64 * 0.0005))
        .collect();
    let pickup = GeoPoint::new(12.90, 77.60);
    let drop = GeoPoint::new(12.95, 77.65);

    c.bench_function("route_intersection_200_points", |b| {
        b.iter(|| segment_intersects_route(black_box(&pickup), black_box(&drop), black_box(&route)));
    });
}

fn bench_search(c: &mut Criterion) {
    let matcher = Matcher::new();
    let request = create_request();

    let mut group = c.benchmark_group("search");

    for ride_count in [100, 1_000, 10_000].iter() {
        let index = RideIndex::new();
        for i in 0..*ride_count {
            index.upsert(create_ride(i));
        }

        group.bench_with_input(BenchmarkId::new("index_search", ride_count), ride_count, |b, _| {
            b.iter(|| {
                matcher.search(
                    black_box(&request),
                    black_box(&index),
                    &CancellationToken::new(),
                )
            });
        });
    }

    group.finish();
}

fn bench_filter_and_rank(c: &mut Criterion) {
    let matcher = Matcher::new();
    let request = create_request();
    let rides: Vec<RideOffer> = (0..1_000).map(create_ride).collect();

    c.bench_function("linear_scan_1000_rides", |b| {
        b.iter(|| {
            let filter = filter_candidates(black_box(&request));
            let candidates = rides.candidates(&filter);
            black_box(matcher.rank_matches(&request, &candidates))
        });
    });
}

criterion_group!(
    benches,
    bench_haversine_distance,
    bench_bounding_box,
    bench_route_intersection,
    bench_search,
    bench_filter_and_rank
);

criterion_main!(benches);
