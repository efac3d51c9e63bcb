use chokepoint::graph::VertexId;
use chokepoint::tree::{Lca, Tree};
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand::Rng;
use static_init::dynamic;

#[dynamic]
static VERTEX_SIZE: usize = std::env::var("VERTEX_SIZE")
    .unwrap_or("10000".to_string())
    .parse()
    .unwrap();

criterion_group!(benches, lca_queries);
criterion_main!(benches);

fn random_tree(n: usize) -> Tree {
    let mut rng = rand::thread_rng();
    let mut parent = vec![None];
    for i in 1..n {
        parent.push(Some(VertexId::new(rng.gen_range(0..i))));
    }
    Tree::from_parent_map(VertexId::new(0), parent).unwrap()
}

fn lca_queries(c: &mut Criterion) {
    let n = *VERTEX_SIZE;
    println!("VERTEX_SIZE: {}", n);
    let tree = random_tree(n);
    let mut lca = Lca::new(&tree);
    let weights: Vec<f64> = (0..n).map(|i| (i % 13) as f64 + 0.5).collect();
    lca.set_edge_weights(&weights).unwrap();

    let mut rng = rand::thread_rng();
    let queries: Vec<(VertexId, VertexId)> = (0..1024)
        .map(|_| {
            (
                VertexId::new(rng.gen_range(0..n)),
                VertexId::new(rng.gen_range(0..n)),
            )
        })
        .collect();

    c.bench_function("lca/dist_1024", |b| {
        b.iter(|| {
            let mut acc = 0.0;
            for &(u, v) in &queries {
                acc += lca.dist(black_box(u), black_box(v));
            }
            acc
        })
    });
    c.bench_function("lca/reweight", |b| {
        b.iter(|| lca.set_edge_weights(black_box(&weights)).unwrap())
    });
}
