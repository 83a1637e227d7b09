//! Persistent identities for emergent creatures.
//!
//! Every canonical signature ever observed becomes a label in a disjoint-set
//! forest. A set is one identity: its members are the phases (distinct
//! shapes) the creature has shown, and its root carries the identity's id.
//! Observing a known signature resolves to its set's id; an unknown one opens
//! a new set with a fresh id. [`EntityTracker::associate_patterns`] unions
//! two sets when an oscillator's intermediate phase cannot be linked
//! automatically.
//!
//! An identity alive in one step and absent in the next is added to the dead
//! set and stays there even if the shape later reappears, so `entities_died`
//! counts identities that died at least once.

use c4life_data::{CanonicalSignature, EntityId, TrackedIdentity, TrackerStats};
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// Union-find over label indices with union by rank and path halving.
#[derive(Debug, Clone, Default)]
struct DisjointSets {
    parent: Vec<usize>,
    rank: Vec<u8>,
}

impl DisjointSets {
    fn make_set(&mut self) -> usize {
        let idx = self.parent.len();
        self.parent.push(idx);
        self.rank.push(0);
        idx
    }

    /// Adds a label directly under an existing root.
    fn attach(&mut self, root: usize) -> usize {
        let idx = self.parent.len();
        self.parent.push(root);
        self.rank.push(0);
        if self.rank[root] == 0 {
            self.rank[root] = 1;
        }
        idx
    }

    fn find(&self, mut x: usize) -> usize {
        while self.parent[x] != x {
            x = self.parent[x];
        }
        x
    }

    fn find_mut(&mut self, mut x: usize) -> usize {
        while self.parent[x] != x {
            self.parent[x] = self.parent[self.parent[x]];
            x = self.parent[x];
        }
        x
    }

    /// Returns `(new_root, absorbed_root)`, or `None` when already joined.
    fn union(&mut self, a: usize, b: usize) -> Option<(usize, usize)> {
        let ra = self.find_mut(a);
        let rb = self.find_mut(b);
        if ra == rb {
            return None;
        }
        let (root, child) = if self.rank[ra] >= self.rank[rb] {
            (ra, rb)
        } else {
            (rb, ra)
        };
        self.parent[child] = root;
        if self.rank[root] == self.rank[child] {
            self.rank[root] += 1;
        }
        Some((root, child))
    }
}

/// What one call to [`EntityTracker::observe`] decided.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Observation {
    /// Identity of each input signature, in input order.
    pub assigned: Vec<EntityId>,
    /// Identities created this step.
    pub born: Vec<EntityId>,
    /// Identities alive last step and absent now.
    pub died: Vec<EntityId>,
}

#[derive(Debug, Clone)]
pub struct EntityTracker {
    labels: HashMap<CanonicalSignature, usize>,
    signatures: Vec<CanonicalSignature>,
    sets: DisjointSets,
    /// Identity id per label; authoritative only at roots.
    ids: Vec<EntityId>,
    next_id: u64,
    identity_count: usize,
    alive: BTreeSet<EntityId>,
    dead: BTreeSet<EntityId>,
}

impl Default for EntityTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl EntityTracker {
    pub fn new() -> Self {
        Self {
            labels: HashMap::new(),
            signatures: Vec::new(),
            sets: DisjointSets::default(),
            ids: Vec::new(),
            next_id: 1,
            identity_count: 0,
            alive: BTreeSet::new(),
            dead: BTreeSet::new(),
        }
    }

    fn allocate_id(&mut self) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id += 1;
        self.identity_count += 1;
        id
    }

    fn new_identity(&mut self, signature: &CanonicalSignature) -> (usize, EntityId) {
        let id = self.allocate_id();
        let label = self.sets.make_set();
        self.labels.insert(signature.clone(), label);
        self.signatures.push(signature.clone());
        self.ids.push(id);
        (label, id)
    }

    fn add_phase(&mut self, signature: &CanonicalSignature, root: usize) -> usize {
        let label = self.sets.attach(root);
        self.labels.insert(signature.clone(), label);
        self.signatures.push(signature.clone());
        self.ids.push(self.ids[root]);
        label
    }

    /// Records one step's worth of entity signatures.
    pub fn observe(&mut self, signatures: &[CanonicalSignature]) -> Observation {
        let mut observation = Observation::default();
        let mut current = BTreeSet::new();

        for signature in signatures {
            let id = match self.labels.get(signature) {
                Some(&label) => {
                    let root = self.sets.find_mut(label);
                    self.ids[root]
                }
                None => {
                    let (_, id) = self.new_identity(signature);
                    tracing::debug!(%id, %signature, "New identity");
                    observation.born.push(id);
                    id
                }
            };
            current.insert(id);
            observation.assigned.push(id);
        }

        for &id in self.alive.difference(&current) {
            tracing::debug!(%id, "Identity died");
            observation.died.push(id);
            self.dead.insert(id);
        }
        self.alive = current;

        observation
    }

    /// Declares two signatures to be phases of the same creature.
    ///
    /// Unknown signatures are registered as phases of the other one's
    /// identity; if both are unknown a single new identity holds them. When
    /// two existing identities merge, the older (smaller) id survives.
    pub fn associate_patterns(
        &mut self,
        a: &CanonicalSignature,
        b: &CanonicalSignature,
    ) -> EntityId {
        let label_a = self.labels.get(a).copied();
        let label_b = self.labels.get(b).copied();

        match (label_a, label_b) {
            (Some(la), Some(lb)) => self.merge(la, lb),
            (Some(known), None) => {
                let root = self.sets.find_mut(known);
                self.add_phase(b, root);
                self.ids[root]
            }
            (None, Some(known)) => {
                let root = self.sets.find_mut(known);
                self.add_phase(a, root);
                self.ids[root]
            }
            (None, None) => {
                let (label, id) = self.new_identity(a);
                if a != b {
                    self.add_phase(b, label);
                }
                id
            }
        }
    }

    fn merge(&mut self, a: usize, b: usize) -> EntityId {
        let Some((root, absorbed)) = self.sets.union(a, b) else {
            let root = self.sets.find_mut(a);
            return self.ids[root];
        };

        let (keep, drop) = if self.ids[root] <= self.ids[absorbed] {
            (self.ids[root], self.ids[absorbed])
        } else {
            (self.ids[absorbed], self.ids[root])
        };
        self.ids[root] = keep;
        self.identity_count -= 1;

        if self.alive.remove(&drop) {
            self.alive.insert(keep);
        }
        if self.dead.remove(&drop) {
            self.dead.insert(keep);
        }
        tracing::debug!(%keep, %drop, "Merged identities");
        keep
    }

    /// Current id of a signature, if it was ever seen.
    pub fn id_of(&self, signature: &CanonicalSignature) -> Option<EntityId> {
        let label = *self.labels.get(signature)?;
        Some(self.ids[self.sets.find(label)])
    }

    pub fn is_alive(&self, id: EntityId) -> bool {
        self.alive.contains(&id)
    }

    pub fn has_died(&self, id: EntityId) -> bool {
        self.dead.contains(&id)
    }

    /// All identities with their phases, ordered by id.
    pub fn identities(&self) -> Vec<TrackedIdentity> {
        let mut grouped: BTreeMap<EntityId, BTreeSet<CanonicalSignature>> = BTreeMap::new();
        for (label, signature) in self.signatures.iter().enumerate() {
            let id = self.ids[self.sets.find(label)];
            grouped.entry(id).or_default().insert(signature.clone());
        }
        grouped
            .into_iter()
            .map(|(id, phases)| TrackedIdentity { id, phases })
            .collect()
    }

    pub fn identity(&self, id: EntityId) -> Option<TrackedIdentity> {
        self.identities().into_iter().find(|t| t.id == id)
    }

    pub fn stats(&self) -> TrackerStats {
        TrackerStats {
            total_entities: self.identity_count,
            unique_patterns: self.labels.len(),
            entities_alive: self.alive.len(),
            entities_died: self.dead.len(),
        }
    }

    /// Forgets everything; the next identity is numbered 1 again.
    pub fn reset(&mut self) {
        *self = Self::new();
    }
}
