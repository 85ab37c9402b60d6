use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::{seq::SliceRandom, thread_rng, Rng};
use hotel_desk::persistence;
use hotel_desk::{compute_total, BookingStore, Hotel, RandomSuffix, RoomType};

const GUESTS: [(&str, &str); 6] = [
    ("John", "Smith"),
    ("Anna", "Berg"),
    ("Thabo", "Nkosi"),
    ("Maria", "Lopez"),
    ("Jo", "Li"),
    ("Pieter", "van Wyk"),
];

fn filled_store(count: usize) -> BookingStore {
    let mut rng = thread_rng();
    let mut suffixes = RandomSuffix::new();
    let mut store = BookingStore::new();
    for _ in 0..count {
        let (name, surname) = GUESTS.choose(&mut rng).unwrap();
        let hotel = *Hotel::ALL.choose(&mut rng).unwrap();
        let room = *RoomType::ALL.choose(&mut rng).unwrap();
        store.create(
            name,
            surname,
            hotel,
            rng.gen_range(1..15),
            rng.gen_range(1..4),
            rng.gen_range(0..4),
            room,
            &mut suffixes,
        );
    }
    store
}

pub fn pricing_benchmark(c: &mut Criterion) {
    c.bench_function("compute_total", |b| {
        b.iter(|| {
            for room in RoomType::ALL {
                black_box(compute_total(black_box(7), black_box(2), black_box(3), room));
            }
        })
    });
}

// Id generation gets slower as more guests share the same name prefix
pub fn create_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("booking_store_create");

    for count in [10, 100, 500].iter() {
        group.bench_with_input(BenchmarkId::from_parameter(count), count, |b, &count| {
            b.iter(|| black_box(filled_store(count).len()));
        });
    }

    group.finish();
}

pub fn persistence_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("save_load_cycle");
    let dir = std::env::temp_dir().join(format!("hotel-desk-bench-{}", rand::random::<u64>()));

    for count in [10, 100, 500].iter() {
        let store = filled_store(*count);
        let path = dir.join(format!("bookings-{}.csv", count));
        group.bench_with_input(BenchmarkId::from_parameter(count), count, |b, _| {
            b.iter(|| {
                persistence::save(store.all(), &path).unwrap();
                black_box(persistence::load(&path).unwrap().bookings.len())
            });
        });
    }

    group.finish();
}

criterion_group!(benches, pricing_benchmark, create_benchmark, persistence_benchmark);
criterion_main!(benches);
