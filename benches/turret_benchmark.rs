//! Benchmarks for the per-frame turret math.

use bevy::prelude::*;
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::rngs::StdRng;
use rand::SeedableRng;
use rotary_turret::systems::aim::aim_step;
use rotary_turret::systems::score::scramble_text;
use rotary_turret::types::{RotateDirection, WeaponSlot};

fn benchmark_aim_step(c: &mut Criterion) {
    let min = Vec2::new(-4.0, -2.0);
    let max = Vec2::new(4.0, 3.0);

    let mut group = c.benchmark_group("Aim Step");

    for input_count in [60, 600, 6000].iter() {
        let deltas: Vec<Vec2> = (0..*input_count)
            .map(|i| Vec2::new((i as f32 * 0.7).sin() * 40.0, (i as f32 * 1.3).cos() * 25.0))
            .collect();

        group.bench_with_input(
            BenchmarkId::from_parameter(input_count),
            input_count,
            |b, &_count| {
                b.iter(|| {
                    deltas
                        .iter()
                        .fold(Vec2::ZERO, |position, delta| aim_step(position, *delta, 0.01, min, max))
                });
            },
        );
    }

    group.finish();
}

fn benchmark_slot_ring(c: &mut Criterion) {
    c.bench_function("Slot Ring Walk", |b| {
        b.iter(|| {
            let mut slot = WeaponSlot::DEFAULT;
            for i in 0..1000 {
                let direction = if i % 3 == 0 {
                    RotateDirection::Left
                } else {
                    RotateDirection::Right
                };
                slot = slot.next(direction);
            }
            slot
        });
    });

    c.bench_function("Slot From Rotation", |b| {
        let rotation = Quat::from_rotation_y(WeaponSlot::Pinky.yaw_radians());
        b.iter(|| WeaponSlot::from_rotation(rotation));
    });
}

fn benchmark_score_scramble(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(12345);

    c.bench_function("Score Scramble", |b| {
        b.iter(|| scramble_text("1234567890", 0.4, &mut rng));
    });
}

criterion_group!(benches, benchmark_aim_step, benchmark_slot_ring, benchmark_score_scramble);
criterion_main!(benches);
