//! Lazily-built, petgraph-backed import graph over a project's source
//! files, used to walk upstream (who imports me) and downstream (what do I
//! import) from a crash site.

use std::collections::{HashMap, HashSet, VecDeque};
use std::fs;
use std::path::{Path, PathBuf};

use faultline_core::types::Language;
use petgraph::graph::{DiGraph, NodeIndex};

use crate::import_resolver::resolve_imports;
use crate::treesitter::detect_language;

/// Default traversal depth for `upstream`/`downstream` when the caller
/// doesn't need a different bound.
pub const DEFAULT_TRAVERSAL_DEPTH: usize = 2;

pub struct DependencyGraph {
    root: PathBuf,
    graph: DiGraph<PathBuf, ()>,
    nodes: HashMap<PathBuf, NodeIndex>,
    resolved: HashSet<PathBuf>,
}

impl DependencyGraph {
    pub fn new(root: &Path) -> Self {
        Self {
            root: root.to_path_buf(),
            graph: DiGraph::new(),
            nodes: HashMap::new(),
            resolved: HashSet::new(),
        }
    }

    fn node_for(&mut self, path: &Path) -> NodeIndex {
        let key = path.to_path_buf();
        if let Some(&idx) = self.nodes.get(&key) {
            return idx;
        }
        let idx = self.graph.add_node(key.clone());
        self.nodes.insert(key, idx);
        idx
    }

    /// Parses `file`'s imports on first touch and adds an edge `file ->
    /// target` for every import that resolved to a project-local file.
    /// A no-op on every call after the first for a given file, so repeated
    /// traversal never re-reads the same source.
    fn ensure_resolved(&mut self, file: &Path) {
        if self.resolved.contains(file) {
            return;
        }
        self.resolved.insert(file.to_path_buf());

        let abs = self.root.join(file);
        let Ok(source) = fs::read_to_string(&abs) else {
            return;
        };
        let Some(language) = language_of(file) else {
            return;
        };

        let from = self.node_for(file);
        for import in resolve_imports(language, &self.root, file, &source) {
            let Some(target) = import.resolved_target else {
                continue;
            };
            let target_path = PathBuf::from(target)
                .strip_prefix(&self.root)
                .map(|p| p.to_path_buf())
                .unwrap_or_else(|_| PathBuf::from(&import.source_file));
            let to = self.node_for(&target_path);
            self.graph.update_edge(from, to, ());
        }
    }

    /// Files that `file` imports, directly or transitively, up to `depth`
    /// hops. Ordered by BFS distance, then path, with cycles broken by a
    /// visited set.
    pub fn downstream(&mut self, file: &Path, depth: usize) -> Vec<PathBuf> {
        self.traverse(file, depth, petgraph::Direction::Outgoing)
    }

    /// Files that import `file`, directly or transitively, up to `depth`
    /// hops.
    pub fn upstream(&mut self, file: &Path, depth: usize) -> Vec<PathBuf> {
        self.traverse(file, depth, petgraph::Direction::Incoming)
    }

    fn traverse(&mut self, file: &Path, depth: usize, direction: petgraph::Direction) -> Vec<PathBuf> {
        self.ensure_resolved(file);
        let start = self.node_for(file);

        let mut visited = HashSet::new();
        visited.insert(start);
        let mut frontier = VecDeque::new();
        frontier.push_back((start, 0usize));
        let mut ordered = Vec::new();

        while let Some((node, dist)) = frontier.pop_front() {
            if dist >= depth {
                continue;
            }
            let path = self.graph[node].clone();
            self.ensure_resolved(&path);

            let mut neighbors: Vec<NodeIndex> = self.graph.neighbors_directed(node, direction).collect();
            neighbors.sort_by_key(|n| self.graph[*n].clone());
            for next in neighbors {
                if visited.insert(next) {
                    ordered.push((dist + 1, self.graph[next].clone()));
                    frontier.push_back((next, dist + 1));
                }
            }
        }

        ordered.sort_by(|a, b| a.0.cmp(&b.0).then_with(|| a.1.cmp(&b.1)));
        ordered.into_iter().map(|(_, p)| p).collect()
    }
}

fn language_of(path: &Path) -> Option<Language> {
    detect_language(path)
}
