//! Dense ids handed out by the model builder.

macro_rules! dense_id {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        #[repr(transparent)]
        pub struct $name(u32);

        impl $name {
            pub const fn new(raw: u32) -> Self {
                Self(raw)
            }

            /// Id for the slot at `index`; the builder never exceeds `u32::MAX` rows or columns.
            pub fn from_index(index: usize) -> Self {
                Self(index as u32)
            }

            pub fn inner(self) -> u32 {
                self.0
            }

            pub fn index(self) -> usize {
                self.0 as usize
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

dense_id!(
    /// Column of a model, in insertion order.
    VariableId
);
dense_id!(
    /// Row of a model, in insertion order.
    ConstraintId
);

#[cfg(test)]
mod tests {
    use super::{ConstraintId, VariableId};

    #[test]
    fn ids_index_dense_storage() {
        let id = VariableId::from_index(7);
        assert_eq!(id, VariableId::new(7));
        assert_eq!(id.index(), 7);
        assert!(VariableId::new(2) < id);
    }

    #[test]
    fn constraint_id_displays_raw_value() {
        assert_eq!(ConstraintId::new(11).to_string(), "11");
    }
}
