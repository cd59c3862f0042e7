use criterion::{black_box, criterion_group, criterion_main, Criterion};
use emberfall_core::{PlayerInput, SimConfig, Simulation};
use glam::Vec2;
use strata::{Aabb, TerrainQuery, TileGrid};

fn arena_terrain() -> TileGrid {
    // 64x64 tiles of 16 units with a floor along the bottom row
    let mut terrain = TileGrid::new(64, 64, 16.0);
    terrain.fill_row(63);
    terrain
}

fn populated_sim(enemies: usize) -> Simulation {
    let mut sim = Simulation::new(SimConfig::default(), arena_terrain()).unwrap();
    let floor = 63.0 * 16.0 - 50.0;
    sim.spawn_player(Vec2::new(480.0, floor));
    for i in 0..enemies {
        let x = 40.0 + i as f32 * 45.0;
        sim.spawn_enemy(Vec2::new(x, floor));
    }
    sim
}

fn bench_idle_step(c: &mut Criterion) {
    let mut sim = populated_sim(20);
    let input = PlayerInput::default();
    let mut now = 0;

    c.bench_function("idle_step_20_enemies", |b| {
        b.iter(|| {
            now += 16;
            black_box(sim.step(black_box(now), &input));
        })
    });
}

fn bench_attack_step(c: &mut Criterion) {
    let mut sim = populated_sim(20);
    let input = PlayerInput {
        attack: true,
        ..PlayerInput::default()
    };
    let mut now = 0;

    c.bench_function("attack_step_20_enemies", |b| {
        b.iter(|| {
            now += 16;
            black_box(sim.step(black_box(now), &input));
        })
    });
}

fn bench_solid_query(c: &mut Criterion) {
    let terrain = arena_terrain();
    let region = Aabb::new(Vec2::new(100.0, 950.0), Vec2::new(400.0, 1010.0));

    c.bench_function("any_solid_in", |b| {
        b.iter(|| black_box(terrain.any_solid_in(black_box(&region))))
    });
}

criterion_group!(benches, bench_idle_step, bench_attack_step, bench_solid_query);
criterion_main!(benches);
