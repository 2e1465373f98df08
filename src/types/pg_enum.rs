use std::any::TypeId;
use std::fmt;
use std::hash::{Hash, Hasher};

/// A Rust enum whose members are stored in a native PostgreSQL ENUM column.
///
/// Members are bound by label, never by ordinal, so reordering or appending
/// variants does not change what already-stored rows decode to. Implement it
/// with [`pg_enum!`](crate::pg_enum) rather than by hand.
pub trait PgEnum: Copy + Eq + fmt::Debug + Send + Sync + 'static {
    /// Every member, in declaration order
    const VARIANTS: &'static [Self];

    /// Label stored in the database for this member
    fn label(&self) -> &'static str;

    /// Position of this member within `VARIANTS`
    fn ordinal(&self) -> usize;

    /// Name of the family in logs and errors; identity is [`FamilyId`]
    fn family() -> &'static str {
        std::any::type_name::<Self>()
    }

    fn labels() -> Vec<&'static str> {
        Self::VARIANTS.iter().map(|v| v.label()).collect()
    }
}

/// Identity of an enum family.
///
/// Equality and hashing use the Rust `TypeId` only; type names are not
/// guaranteed unique, so the name is carried for messages.
#[derive(Debug, Clone, Copy)]
pub struct FamilyId {
    id: TypeId,
    name: &'static str,
}

impl FamilyId {
    pub fn of<E: PgEnum>() -> Self {
        FamilyId {
            id: TypeId::of::<E>(),
            name: E::family(),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl PartialEq for FamilyId {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for FamilyId {}

impl Hash for FamilyId {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Display for FamilyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// Object-safe view of an enum member, used where the family is only known
/// at runtime.
pub trait EnumMember: fmt::Debug + Send + Sync {
    fn family_id(&self) -> FamilyId;
    fn member_label(&self) -> &'static str;
}

impl<E: PgEnum> EnumMember for E {
    fn family_id(&self) -> FamilyId {
        FamilyId::of::<E>()
    }

    fn member_label(&self) -> &'static str {
        self.label()
    }
}

/// Declare a fieldless enum together with its [`PgEnum`] implementation.
///
/// Labels default to the variant name; `Variant = "label"` overrides one.
/// The enum derives `Debug, Clone, Copy, PartialEq, Eq, Hash`.
///
/// ```
/// pgenum::pg_enum! {
///     pub enum PostStatus {
///         Pending = "PENDING",
///         Approved = "APPROVED",
///         Spam = "SPAM",
///     }
/// }
///
/// use pgenum::PgEnum;
/// assert_eq!(PostStatus::Approved.label(), "APPROVED");
/// assert_eq!(PostStatus::Approved.ordinal(), 1);
/// ```
#[macro_export]
macro_rules! pg_enum {
    (@label $variant:ident) => {
        stringify!($variant)
    };
    (@label $variant:ident, $label:literal) => {
        $label
    };
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident $(= $label:literal)? ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        $vis enum $name {
            $( $(#[$vmeta])* $variant ),+
        }

        impl $crate::types::PgEnum for $name {
            const VARIANTS: &'static [Self] = &[$( $name::$variant ),+];

            fn label(&self) -> &'static str {
                match self {
                    $( $name::$variant => $crate::pg_enum!(@label $variant $(, $label)?) ),+
                }
            }

            fn ordinal(&self) -> usize {
                *self as usize
            }
        }
    };
}
