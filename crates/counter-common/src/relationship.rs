/// The relationship between two counter contexts as determined by
/// `counter_core::context::diff`: a closed enumeration, no other values
/// are produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContextRelationship {
    Equal,
    GreaterThan,
    LessThan,
    Disjoint,
}

impl ContextRelationship {
    /// The relationship as seen from the other side of the comparison,
    /// i.e. `diff(a, b).flip() == diff(b, a)`.
    pub fn flip(self) -> Self {
        match self {
            ContextRelationship::Equal => ContextRelationship::Equal,
            ContextRelationship::GreaterThan => ContextRelationship::LessThan,
            ContextRelationship::LessThan => ContextRelationship::GreaterThan,
            ContextRelationship::Disjoint => ContextRelationship::Disjoint,
        }
    }
}
