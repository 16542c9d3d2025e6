use criterion::{black_box, criterion_group, criterion_main, Criterion};
use mindloom_document::{Document, Node, NodeId};
use mindloom_layout::{layout_document, LayoutConfig};

fn attach(doc: &mut Document, parent: &NodeId, child: Node) -> NodeId {
    let id = child.id.clone();
    let child = child.with_parent(parent.as_str());
    doc.nodes.get_mut(parent).unwrap().children.push(id.clone());
    doc.nodes.insert(id.clone(), child);
    id
}

fn root(doc: &mut Document, node: Node) -> NodeId {
    let id = node.id.clone();
    doc.roots.push(id.clone());
    doc.nodes.insert(id.clone(), node);
    id
}

/// Balanced tree: breadth^depth leaves
fn balanced_tree(breadth: usize, depth: usize) -> Document {
    let mut doc = Document::new();
    let root_id = root(
        &mut doc,
        Node::text("n-0", "root").at(0.0, 0.0).with_size(120.0, 40.0),
    );

    let mut frontier = vec![root_id];
    let mut counter = 1usize;
    for _ in 0..depth {
        let mut next = Vec::new();
        for parent in &frontier {
            for _ in 0..breadth {
                let id = format!("n-{}", counter);
                counter += 1;
                next.push(attach(
                    &mut doc,
                    parent,
                    Node::text(id.as_str(), "topic").with_size(100.0, 40.0),
                ));
            }
        }
        frontier = next;
    }
    doc
}

/// Single chain of `len` nodes (worst case for traversal depth)
fn deep_chain(len: usize) -> Document {
    let mut doc = Document::new();
    let mut current = root(
        &mut doc,
        Node::text("c-0", "root").at(0.0, 0.0).with_size(100.0, 40.0),
    );
    for i in 1..len {
        let id = format!("c-{}", i);
        current = attach(
            &mut doc,
            &current,
            Node::text(id.as_str(), "link").with_size(100.0, 40.0),
        );
    }
    doc
}

fn layout_balanced_tree(c: &mut Criterion) {
    let doc = balanced_tree(4, 5); // 1365 nodes
    let config = LayoutConfig::default();

    c.bench_function("layout_balanced_tree_4x5", |b| {
        b.iter(|| layout_document(black_box(&doc), &config))
    });
}

fn layout_deep_chain(c: &mut Criterion) {
    let doc = deep_chain(2000);
    let config = LayoutConfig::default();

    c.bench_function("layout_deep_chain_2000", |b| {
        b.iter(|| layout_document(black_box(&doc), &config))
    });
}

fn layout_wide_fan(c: &mut Criterion) {
    let mut doc = Document::new();
    let root_id = root(
        &mut doc,
        Node::text("w-0", "hub").at(0.0, 0.0).with_size(120.0, 40.0),
    );
    for i in 1..=1000 {
        let id = format!("w-{}", i);
        attach(
            &mut doc,
            &root_id,
            Node::text(id.as_str(), "spoke").with_size(100.0, 40.0),
        );
    }
    let config = LayoutConfig::default();

    c.bench_function("layout_wide_fan_1000", |b| {
        b.iter(|| layout_document(black_box(&doc), &config))
    });
}

criterion_group!(
    benches,
    layout_balanced_tree,
    layout_deep_chain,
    layout_wide_fan
);
criterion_main!(benches);
