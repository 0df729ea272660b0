use crate::bounding_volume::Aabb;
use crate::math::{Point, Real, Vector};
use crate::shape::NodeKind;

/// Geometric description of one contact between two geometries.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct Contact {
    /// The kind of the first geometry.
    pub kind1: NodeKind,
    /// The kind of the second geometry.
    pub kind2: NodeKind,
    /// The index of the primitive of the first geometry involved in the
    /// contact; `None` when the operand has no indexed primitives.
    pub primitive1: Option<u32>,
    /// The index of the primitive of the second geometry involved in the
    /// contact.
    pub primitive2: Option<u32>,
    /// The contact position, in world space.
    pub position: Point<Real>,
    /// The contact normal, pointing from the first geometry toward the
    /// second.
    pub normal: Vector<Real>,
    /// The penetration depth along the normal.
    pub penetration_depth: Real,
}

impl Contact {
    /// This contact with its operands swapped: indices exchanged and the
    /// normal reversed.
    pub fn flipped(mut self) -> Contact {
        core::mem::swap(&mut self.kind1, &mut self.kind2);
        core::mem::swap(&mut self.primitive1, &mut self.primitive2);
        self.normal = -self.normal;
        self
    }
}

/// A region contributing to the cost of traversing space, reported for
/// penalty-based collision response.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct CostSource {
    /// The axis-aligned region the cost applies to, in world space.
    pub aabb: Aabb,
    /// The cost density of the region.
    pub cost_density: Real,
    /// The integral of the density over the region.
    pub total_cost: Real,
}

impl CostSource {
    /// Creates a cost source over the given region.
    pub fn new(aabb: Aabb, cost_density: Real) -> CostSource {
        CostSource {
            aabb,
            cost_density,
            total_cost: cost_density * aabb.volume(),
        }
    }
}

/// The output of a collision query.
#[derive(Clone, Debug, Default)]
pub struct CollisionResult {
    contacts: Vec<Contact>,
    cost_sources: Vec<CostSource>,
    /// The warm-start direction updated by the narrow phase, to be fed
    /// back into the next request when caching is enabled.
    pub cached_gjk_guess: Vector<Real>,
}

impl CollisionResult {
    /// Creates an empty result.
    pub fn new() -> Self {
        CollisionResult {
            contacts: Vec::new(),
            cost_sources: Vec::new(),
            cached_gjk_guess: Vector::x(),
        }
    }

    /// Creates an empty result with room for `num_max_contacts` contacts.
    /// Effectively unbounded caps fall back to growth on demand.
    pub fn with_capacity(num_max_contacts: usize) -> Self {
        let mut result = Self::new();
        result.contacts.reserve(num_max_contacts.min(1024));
        result
    }

    /// Whether at least one contact was found.
    #[inline]
    pub fn is_collision(&self) -> bool {
        !self.contacts.is_empty()
    }

    /// The number of contacts found so far.
    #[inline]
    pub fn num_contacts(&self) -> usize {
        self.contacts.len()
    }

    /// The contacts, in the order the leaf tests produced them.
    #[inline]
    pub fn contacts(&self) -> &[Contact] {
        &self.contacts
    }

    /// The cost sources found so far.
    #[inline]
    pub fn cost_sources(&self) -> &[CostSource] {
        &self.cost_sources
    }

    /// Appends a contact. Callers enforce `num_max_contacts` before
    /// producing the contact, so this never drops anything.
    #[inline]
    pub fn add_contact(&mut self, contact: Contact) {
        self.contacts.push(contact);
    }

    /// Records a cost source, keeping at most `num_max_cost_sources`
    /// entries; when full, the smallest total cost is evicted first.
    pub fn add_cost_source(&mut self, cost_source: CostSource, num_max_cost_sources: usize) {
        if num_max_cost_sources == 0 {
            return;
        }

        if self.cost_sources.len() < num_max_cost_sources {
            self.cost_sources.push(cost_source);
            return;
        }

        let (min_id, min) = self
            .cost_sources
            .iter()
            .enumerate()
            .min_by(|(_, a), (_, b)| {
                a.total_cost
                    .partial_cmp(&b.total_cost)
                    .unwrap_or(core::cmp::Ordering::Equal)
            })
            .expect("cost source set cannot be empty here");

        if cost_source.total_cost > min.total_cost {
            self.cost_sources[min_id] = cost_source;
        }
    }
}
