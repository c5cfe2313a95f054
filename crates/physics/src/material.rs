use rapier2d::prelude::*;

/// Surface kind carried in each collider's `user_data`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SurfaceMaterial {
    Default,
    Ground,
    Character,
    Box,
    Star,
}

impl SurfaceMaterial {
    pub(crate) fn to_user_data(self) -> u128 {
        match self {
            Self::Default => 0,
            Self::Ground => 1,
            Self::Character => 2,
            Self::Box => 3,
            Self::Star => 4,
        }
    }

    pub(crate) fn from_user_data(data: u128) -> Self {
        match data {
            1 => Self::Ground,
            2 => Self::Character,
            3 => Self::Box,
            4 => Self::Star,
            _ => Self::Default,
        }
    }
}

/// Friction between two specific materials. Order of `a` and `b` is irrelevant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContactMaterial {
    pub a: SurfaceMaterial,
    pub b: SurfaceMaterial,
    pub friction: f32,
}

/// Pairwise friction lookup with a fallback for unlisted pairs.
#[derive(Debug, Clone)]
pub struct MaterialTable {
    default_friction: f32,
    pairs: Vec<ContactMaterial>,
}

impl Default for MaterialTable {
    /// Frictionless character against ground and crates, crates grip the
    /// ground at 0.6, everything else at 1.
    fn default() -> Self {
        let mut table = Self::new(1.0);
        table.add(SurfaceMaterial::Ground, SurfaceMaterial::Character, 0.0);
        table.add(SurfaceMaterial::Box, SurfaceMaterial::Character, 0.0);
        table.add(SurfaceMaterial::Box, SurfaceMaterial::Ground, 0.6);
        table
    }
}

impl MaterialTable {
    pub fn new(default_friction: f32) -> Self {
        Self {
            default_friction,
            pairs: Vec::new(),
        }
    }

    pub fn add(&mut self, a: SurfaceMaterial, b: SurfaceMaterial, friction: f32) {
        self.pairs.retain(|m| !same_pair(m, a, b));
        self.pairs.push(ContactMaterial { a, b, friction });
    }

    pub fn friction(&self, a: SurfaceMaterial, b: SurfaceMaterial) -> f32 {
        self.pairs
            .iter()
            .find(|m| same_pair(m, a, b))
            .map(|m| m.friction)
            .unwrap_or(self.default_friction)
    }
}

fn same_pair(m: &ContactMaterial, a: SurfaceMaterial, b: SurfaceMaterial) -> bool {
    (m.a == a && m.b == b) || (m.a == b && m.b == a)
}

/// Physics hook that rewrites solver-contact friction from the table.
pub(crate) struct MaterialHooks {
    pub table: MaterialTable,
}

impl PhysicsHooks for MaterialHooks {
    fn modify_solver_contacts(&self, context: &mut ContactModificationContext) {
        let material_of = |handle: ColliderHandle| {
            context
                .colliders
                .get(handle)
                .map(|c| SurfaceMaterial::from_user_data(c.user_data))
                .unwrap_or(SurfaceMaterial::Default)
        };
        let friction = self
            .table
            .friction(material_of(context.collider1), material_of(context.collider2));
        for contact in context.solver_contacts.iter_mut() {
            contact.friction = friction;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_table_pairs() {
        let t = MaterialTable::default();
        assert_eq!(t.friction(SurfaceMaterial::Ground, SurfaceMaterial::Character), 0.0);
        assert_eq!(t.friction(SurfaceMaterial::Character, SurfaceMaterial::Ground), 0.0);
        assert_eq!(t.friction(SurfaceMaterial::Character, SurfaceMaterial::Box), 0.0);
        assert_eq!(t.friction(SurfaceMaterial::Ground, SurfaceMaterial::Box), 0.6);
        assert_eq!(t.friction(SurfaceMaterial::Star, SurfaceMaterial::Character), 1.0);
        assert_eq!(t.friction(SurfaceMaterial::Default, SurfaceMaterial::Ground), 1.0);
    }

    #[test]
    fn add_replaces_existing_pair() {
        let mut t = MaterialTable::new(0.5);
        t.add(SurfaceMaterial::Box, SurfaceMaterial::Star, 0.2);
        t.add(SurfaceMaterial::Star, SurfaceMaterial::Box, 0.9);
        assert_eq!(t.friction(SurfaceMaterial::Box, SurfaceMaterial::Star), 0.9);
        assert_eq!(t.friction(SurfaceMaterial::Box, SurfaceMaterial::Box), 0.5);
    }

    #[test]
    fn user_data_round_trip() {
        for m in [
            SurfaceMaterial::Default,
            SurfaceMaterial::Ground,
            SurfaceMaterial::Character,
            SurfaceMaterial::Box,
            SurfaceMaterial::Star,
        ] {
            assert_eq!(SurfaceMaterial::from_user_data(m.to_user_data()), m);
        }
    }
}
