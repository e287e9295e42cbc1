use criterion::{BatchSize, Criterion, criterion_group, criterion_main};
use sld_graph::{Cell, Graph};
use std::hint::black_box;

/// Chained busbar sections, each carrying a handful of feeders, with a flat
/// coupler between neighboring sections and a tie spanning every fourth
/// pair. Shapes like this dominate real stations.
fn synthetic_station(sections: usize, feeders_per_section: usize) -> Graph {
    let mut g = Graph::new();
    for s in 0..sections {
        let bus = format!("bbs{s:03}");
        g.add_bus(&bus);
        for f in 0..feeders_per_section {
            g.add_cell(
                format!("feeder{s:03}_{f}"),
                Cell::extern_cell(&[bus.as_str()]).with_feeder(format!("load{s:03}_{f}")),
            );
        }
        if s > 0 {
            let prev = format!("bbs{:03}", s - 1);
            g.add_cell(
                format!("coupler{s:03}"),
                Cell::intern(&[prev.as_str()], &[bus.as_str()]),
            );
            if s % 4 == 0 {
                g.add_cell(
                    format!("tie{s:03}"),
                    Cell::extern_cell(&[prev.as_str(), bus.as_str()]),
                );
            }
        }
    }
    g
}

fn bench_layout(c: &mut Criterion) {
    let mut group = c.benchmark_group("layout");
    for &sections in &[4usize, 16, 64] {
        let station = synthetic_station(sections, 8);
        group.bench_function(format!("sections_{sections}"), |b| {
            b.iter_batched(
                || station.clone(),
                |mut g| {
                    sld_layout::layout(&mut g).unwrap();
                    black_box(g)
                },
                BatchSize::SmallInput,
            )
        });
    }
    group.finish();
}

criterion_group!(benches, bench_layout);
criterion_main!(benches);
