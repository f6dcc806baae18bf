//! Benchmarks for page tree operations.

use std::sync::Arc;

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use trellis_site::{PageDefaults, PageManager, PageTree};
use trellis_store::{MemoryStore, Page, PageId, SiteId};

/// Create a page list with specified depth and breadth.
fn create_pages(depth: usize, breadth: usize) -> Vec<Page> {
    fn create_level(
        pages: &mut Vec<Page>,
        parent: Option<PageId>,
        current_depth: usize,
        max_depth: usize,
        breadth: usize,
    ) {
        if current_depth > max_depth {
            return;
        }

        let id = PageId(pages.len() as u64 + 1);
        pages.push(Page {
            id: Some(id),
            site: Some(SiteId(1)),
            parent,
            name: format!("Level {current_depth} page {}", id.0),
            ..Page::default()
        });

        for _ in 0..breadth {
            create_level(pages, Some(id), current_depth + 1, max_depth, breadth);
        }
    }

    let mut pages = Vec::new();
    create_level(&mut pages, None, 0, depth, breadth);
    pages
}

fn bench_from_pages(c: &mut Criterion) {
    let mut group = c.benchmark_group("page_tree_build");

    for (depth, breadth) in [(3, 5), (5, 3), (2, 30)] {
        let pages = create_pages(depth, breadth);
        group.bench_with_input(
            BenchmarkId::new("from_pages", format!("d{depth}_b{breadth}")),
            &pages,
            |b, pages| b.iter(|| PageTree::from_pages(pages.clone()).unwrap()),
        );
    }

    group.finish();
}

fn bench_fix_url(c: &mut Criterion) {
    let manager = PageManager::new(Arc::new(MemoryStore::new()), PageDefaults::default());
    let mut group = c.benchmark_group("page_tree_fix_url");

    for (depth, breadth) in [(3, 5), (5, 3)] {
        let tree = PageTree::from_pages(create_pages(depth, breadth)).unwrap();
        group.bench_with_input(
            BenchmarkId::new("fix_url", format!("d{depth}_b{breadth}")),
            &tree,
            |b, tree| {
                b.iter(|| {
                    let mut tree = tree.clone();
                    let root = tree.roots()[0];
                    manager.fix_url(&mut tree, root)
                });
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_from_pages, bench_fix_url);
criterion_main!(benches);
