use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use mediatree::tree::build_tree;
use mediatree::types::TreeOptions;
use std::fs;
use std::hint::black_box;
use std::path::Path;
use tempfile::TempDir;
use tokio_util::sync::CancellationToken;

fn create_test_tree(depth: usize, files_per_dir: usize, dirs_per_level: usize) -> TempDir {
    let temp_dir = TempDir::new().unwrap();

    fn create_level(
        path: &Path,
        current_depth: usize,
        max_depth: usize,
        files_per_dir: usize,
        dirs_per_level: usize,
    ) {
        if current_depth >= max_depth {
            return;
        }

        for i in 0..files_per_dir {
            fs::write(path.join(format!("file_{}.mp4", i)), format!("frame {}", i)).unwrap();
        }

        for i in 0..dirs_per_level {
            let dir_path = path.join(format!("dir_{}", i));
            fs::create_dir(&dir_path).unwrap();
            create_level(&dir_path, current_depth + 1, max_depth, files_per_dir, dirs_per_level);
        }
    }

    create_level(temp_dir.path(), 0, depth, files_per_dir, dirs_per_level);
    temp_dir
}

fn benchmark_tree_sizes(c: &mut Criterion) {
    let mut group = c.benchmark_group("build_tree");
    group.sample_size(20);

    for (depth, files, dirs) in [(3, 10, 3), (4, 20, 4), (6, 5, 3)] {
        let temp_dir = create_test_tree(depth, files, dirs);
        let options = TreeOptions::default();
        let cancel = CancellationToken::new();
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("d{}_f{}_s{}", depth, files, dirs)),
            &temp_dir,
            |b, dir| b.iter(|| build_tree(black_box(dir.path()), &options, &cancel).unwrap()),
        );
    }

    group.finish();
}

fn benchmark_unsorted(c: &mut Criterion) {
    let temp_dir = create_test_tree(4, 20, 4);
    let options = TreeOptions { sort_entries: false, ..TreeOptions::default() };
    let cancel = CancellationToken::new();

    c.bench_function("build_tree_unsorted", |b| {
        b.iter(|| build_tree(black_box(temp_dir.path()), &options, &cancel).unwrap())
    });
}

criterion_group!(benches, benchmark_tree_sizes, benchmark_unsorted);
criterion_main!(benches);
