//! Benchmarks for tree materialization.
//!
//! These benchmarks measure planning the destination layout of a commit
//! folder and writing it to disk, the two steps every vendored dependency
//! goes through.

use apideps::materialize::{copy_subtree, plan};
use apideps::tree::{FileMode, Tree};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use tempfile::TempDir;

/// Creates a tree with `num_files` spread over folders of 100 files.
fn create_flat_tree(num_files: usize) -> Tree {
    let mut tree = Tree::new();
    for i in 0..num_files {
        let path = format!("openapi/module{}/file{}.yaml", i / 100, i);
        let content = format!("# File {}\nopenapi: 3.0.0\n", i);
        tree.insert(&path, content, FileMode::Regular);
    }
    tree
}

/// Creates a tree with files on every level of a deep directory structure.
fn create_deep_tree(depth: usize, files_per_level: usize) -> Tree {
    fn add_level(tree: &mut Tree, prefix: &str, depth: usize, files: usize, count: &mut usize) {
        for i in 0..files {
            let path = format!("{}/file{}.yaml", prefix, i);
            tree.insert(&path, format!("# File {}\n", count), FileMode::Regular);
            *count += 1;
        }
        if depth > 0 {
            for i in 0..3 {
                let new_prefix = format!("{}/level{}", prefix, i);
                add_level(tree, &new_prefix, depth - 1, files, count);
            }
        }
    }

    let mut tree = Tree::new();
    let mut count = 0;
    add_level(&mut tree, "openapi", depth, files_per_level, &mut count);
    tree
}

fn bench_plan(c: &mut Criterion) {
    let mut group = c.benchmark_group("materialize_plan");

    for size in [100, 500, 1000] {
        let tree = create_flat_tree(size);
        let subtree = tree.subtree("openapi");
        group.bench_with_input(BenchmarkId::new("flat", size), &subtree, |b, tree| {
            b.iter(|| plan(black_box(tree)))
        });
    }

    for depth in [2, 3, 4] {
        let tree = create_deep_tree(depth, 5);
        let subtree = tree.subtree("openapi");
        group.bench_with_input(BenchmarkId::new("deep", depth), &subtree, |b, tree| {
            b.iter(|| plan(black_box(tree)))
        });
    }

    group.finish();
}

fn bench_copy_subtree(c: &mut Criterion) {
    let mut group = c.benchmark_group("materialize_copy");
    group.sample_size(10);

    for size in [10, 100] {
        let mut tree = create_flat_tree(size);
        tree.insert("openapi/api.yaml", "openapi: 3.0.0\n", FileMode::Regular);
        group.bench_with_input(BenchmarkId::new("flat", size), &tree, |b, tree| {
            b.iter(|| {
                let target = TempDir::new().unwrap();
                copy_subtree(tree, black_box("openapi"), target.path()).unwrap()
            })
        });
    }

    let tree = create_deep_tree(3, 2);
    group.bench_function("deep", |b| {
        b.iter(|| {
            let target = TempDir::new().unwrap();
            copy_subtree(&tree, black_box("openapi"), target.path()).unwrap()
        })
    });

    group.finish();
}

criterion_group!(benches, bench_plan, bench_copy_subtree);
criterion_main!(benches);
