//! Counting of `#fragment` references, to catch amplification attacks.
//!
//! The SVG version of the billion laughs attack looks like this:
//!
//! ```xml
//! <g id="a"><rect/><rect/> ... ten of them ... </g>
//! <g id="b"><use href="#a"/><use href="#a"/> ... ten of them ... </g>
//! <g id="c"><use href="#b"/><use href="#b"/> ... ten of them ... </g>
//! ...
//! ```
//!
//! Each group is only a few hundred bytes, but the renderer has to draw ten times
//! as many objects for each group as for the previous one.
//!
//! We track this while streaming the document, without ever expanding references.
//! Every element with an `id` opens an id-scope, represented by a node in a
//! [`ReferenceGraph`] whose parent is the enclosing id-scope.  Each node has a
//! *cost*: the number of objects that drawing it once would draw through
//! references.  A reference to `#t` draws `t` once, so it costs the cost of `t`, or 1
//! if `t` costs nothing by itself; that amount is added to the scope the reference
//! is made from and to every scope that encloses it.  So in the example, `b` costs
//! 10, `c` costs 100, and so on, no matter how deeply the references inside each
//! group are wrapped.  Containment alone never multiplies anything.
//!
//! As soon as any scope costs more than the configured maximum, the document is
//! rejected.  References made outside of any id-scope are not bounded, since
//! nothing can reference them again.
//!
//! A reference to an id that has not been declared yet can only be counted as 1
//! while the document is streamed, so [`ReferenceGraph::finish`] computes the exact
//! costs once the whole document has been seen.  A cycle of references cannot be
//! drawn and is rejected at that point.  References to an element that encloses the
//! reference, like `<g id="a"><a href="#a"/></g>`, are links back into the same
//! subtree and count as 1.

use std::collections::HashMap;

use crate::error::{ImplementationLimit, ValidationError};

/// Index of a node in a [`ReferenceGraph`].
pub type NodeIndex = usize;

type IdIndex = usize;

struct ReferenceNode {
    parent: Option<NodeIndex>,
    id: Option<IdIndex>,
    depth: usize,
    cost: u64,
    children: Vec<NodeIndex>,

    /// Identifiers referenced from directly inside this scope, with how many times.
    references: Vec<(IdIndex, u64)>,

    /// References from directly inside this scope to an enclosing declaration.
    links: u64,
}

#[derive(Default)]
struct Identifier {
    definitions: Vec<NodeIndex>,

    /// How many times the identifier has been referenced.
    count: u64,

    /// Highest cost among the definitions.
    cost: u64,
}

impl Identifier {
    fn weight(&self) -> u64 {
        self.cost.max(1)
    }
}

#[derive(Copy, Clone, PartialEq, Eq)]
enum Mark {
    Unvisited,
    Active,
    Done(u64),
}

#[derive(Copy, Clone)]
enum Vertex {
    Scope(NodeIndex),
    Id(IdIndex),
}

/// Per-document graph of id-scopes and the references between them.
///
/// Nodes live in an arena and refer to their parents by index, so the whole graph is
/// freed at once when validation of a document finishes.
pub struct ReferenceGraph {
    nodes: Vec<ReferenceNode>,
    identifiers: Vec<Identifier>,
    ids: HashMap<String, IdIndex>,
    max_references: u64,
    max_depth: usize,
    peak: u64,
}

impl ReferenceGraph {
    pub fn new(max_references: u64, max_depth: usize) -> ReferenceGraph {
        ReferenceGraph {
            nodes: vec![ReferenceNode {
                parent: None,
                id: None,
                depth: 0,
                cost: 0,
                children: Vec::new(),
                references: Vec::new(),
                links: 0,
            }],
            identifiers: Vec::new(),
            ids: HashMap::new(),
            max_references,
            max_depth,
            peak: 0,
        }
    }

    /// The document scope, active outside of any element with an `id`.
    pub fn root(&self) -> NodeIndex {
        0
    }

    /// Declares `id` inside `scope`, and returns the node for the new scope.
    ///
    /// Every declaration gets its own node.  A reference to an id that is declared
    /// more than once weighs as much as its most expensive declaration.
    pub fn declare(&mut self, scope: NodeIndex, id: &str) -> Result<NodeIndex, ValidationError> {
        let depth = self.nodes[scope].depth + 1;
        if depth > self.max_depth {
            return Err(ValidationError::LimitExceeded(
                ImplementationLimit::MaximumNestingDepthExceeded,
            ));
        }

        let id = self.identifier(id);
        let index = self.nodes.len();

        self.nodes.push(ReferenceNode {
            parent: Some(scope),
            id: Some(id),
            depth,
            cost: 0,
            children: Vec::new(),
            references: Vec::new(),
            links: 0,
        });
        self.nodes[scope].children.push(index);
        self.identifiers[id].definitions.push(index);

        Ok(index)
    }

    /// Records a reference to `#id` made from `scope`.
    ///
    /// Returns the resulting cost of the outermost scope that encloses the reference,
    /// or [`ValidationError::TooManyReferences`] if that is over the maximum.
    pub fn reference(&mut self, scope: NodeIndex, id: &str) -> Result<u64, ValidationError> {
        let target = self.identifier(id);
        self.identifiers[target].count += 1;

        if self.encloses(scope, target) {
            self.nodes[scope].links += 1;
            self.add_cost(scope, 1);
            return self.check(self.outermost_cost(scope, 1));
        }

        let weight = self.identifiers[target].weight();

        let references = &mut self.nodes[scope].references;
        match references.last_mut() {
            Some((last, n)) if *last == target => *n += 1,
            _ => references.push((target, 1)),
        }

        self.add_cost(scope, weight);
        self.check(self.outermost_cost(scope, weight))
    }

    /// Computes the exact cost of every scope, now that all ids are known.
    ///
    /// Returns the highest cost, or an error if any scope is over the maximum or the
    /// references form a cycle.
    pub fn finish(&mut self) -> Result<u64, ValidationError> {
        let mut scopes = vec![Mark::Unvisited; self.nodes.len()];
        let mut ids = vec![Mark::Unvisited; self.identifiers.len()];
        let mut highest = 0;

        for start in 1..self.nodes.len() {
            if scopes[start] != Mark::Unvisited {
                continue;
            }

            scopes[start] = Mark::Active;
            let mut stack = vec![(Vertex::Scope(start), self.dependencies(Vertex::Scope(start)))];

            while let Some((vertex, deps)) = stack.last_mut() {
                if let Some(dep) = deps.pop() {
                    let mark = match dep {
                        Vertex::Scope(i) => &mut scopes[i],
                        Vertex::Id(i) => &mut ids[i],
                    };

                    match *mark {
                        Mark::Unvisited => {
                            *mark = Mark::Active;
                            let deps = self.dependencies(dep);
                            stack.push((dep, deps));
                        }

                        Mark::Active => {
                            return Err(ValidationError::TooManyReferences {
                                max: self.max_references,
                                found: u64::MAX,
                            });
                        }

                        Mark::Done(_) => (),
                    }

                    continue;
                }

                let vertex = *vertex;
                stack.pop();

                match vertex {
                    Vertex::Scope(i) => {
                        let cost = self.exact_cost(i, &scopes, &ids);
                        scopes[i] = Mark::Done(cost);
                        highest = highest.max(cost);
                        self.check(cost)?;
                    }

                    Vertex::Id(i) => {
                        let cost = self.identifiers[i]
                            .definitions
                            .iter()
                            .map(|&d| done(scopes[d]))
                            .max()
                            .unwrap_or(0);
                        ids[i] = Mark::Done(cost.max(1));
                    }
                }
            }
        }

        Ok(highest)
    }

    /// Number of objects that drawing `node` once draws through references.
    pub fn cost(&self, node: NodeIndex) -> u64 {
        self.nodes[node].cost
    }

    /// Highest cost seen so far.
    pub fn peak(&self) -> u64 {
        self.peak
    }

    /// How many times `id` has been referenced, if it has been declared or referenced.
    pub fn count(&self, id: &str) -> Option<u64> {
        self.ids.get(id).map(|&index| self.identifiers[index].count)
    }

    /// What a reference to `id` costs at this point.
    pub fn weight(&self, id: &str) -> u64 {
        self.ids
            .get(id)
            .map(|&index| self.identifiers[index].weight())
            .unwrap_or(1)
    }

    fn identifier(&mut self, id: &str) -> IdIndex {
        if let Some(&index) = self.ids.get(id) {
            return index;
        }

        let index = self.identifiers.len();
        self.identifiers.push(Identifier::default());
        self.ids.insert(id.to_string(), index);
        index
    }

    /// Whether `scope` is, or is inside, a declaration of `target`.
    fn encloses(&self, scope: NodeIndex, target: IdIndex) -> bool {
        let mut current = Some(scope);

        while let Some(index) = current {
            let node = &self.nodes[index];
            if node.id == Some(target) {
                return true;
            }
            current = node.parent;
        }

        false
    }

    fn add_cost(&mut self, scope: NodeIndex, amount: u64) {
        let mut current = Some(scope);

        while let Some(index) = current {
            let node = &mut self.nodes[index];
            node.cost = node.cost.saturating_add(amount);

            let (id, cost, parent) = (node.id, node.cost, node.parent);
            if let Some(id) = id {
                let identifier = &mut self.identifiers[id];
                identifier.cost = identifier.cost.max(cost);
            }

            current = parent;
        }
    }

    /// The cost of the scope just below the root on the way up from `scope`, or
    /// `fallback` if `scope` is the root.
    fn outermost_cost(&self, scope: NodeIndex, fallback: u64) -> u64 {
        let mut cost = fallback;
        let mut current = scope;

        while let Some(parent) = self.nodes[current].parent {
            cost = self.nodes[current].cost;
            current = parent;
        }

        cost
    }

    fn check(&mut self, cost: u64) -> Result<u64, ValidationError> {
        self.peak = self.peak.max(cost);

        if cost > self.max_references {
            return Err(ValidationError::TooManyReferences {
                max: self.max_references,
                found: cost,
            });
        }

        Ok(cost)
    }

    fn dependencies(&self, vertex: Vertex) -> Vec<Vertex> {
        match vertex {
            Vertex::Scope(i) => {
                let node = &self.nodes[i];
                node.children
                    .iter()
                    .map(|&c| Vertex::Scope(c))
                    .chain(node.references.iter().map(|&(id, _)| Vertex::Id(id)))
                    .collect()
            }

            Vertex::Id(i) => self.identifiers[i]
                .definitions
                .iter()
                .map(|&d| Vertex::Scope(d))
                .collect(),
        }
    }

    fn exact_cost(&self, index: NodeIndex, scopes: &[Mark], ids: &[Mark]) -> u64 {
        let node = &self.nodes[index];

        let children = node
            .children
            .iter()
            .fold(node.links, |acc, &c| acc.saturating_add(done(scopes[c])));

        node.references.iter().fold(children, |acc, &(id, n)| {
            acc.saturating_add(n.saturating_mul(done(ids[id]).max(1)))
        })
    }
}

fn done(mark: Mark) -> u64 {
    match mark {
        Mark::Done(cost) => cost,
        _ => 0,
    }
}
