use crate::error::{PgEnumError, Result};
use crate::types::{FamilyId, NativeTypeName, PgEnum, quote_literal};
use std::collections::HashMap;

/// Static metadata for one enum family: its ordered labels and the native
/// column type it binds to.
///
/// Built once at registration and shared read-only by every codec call.
#[derive(Debug, Clone)]
pub struct EnumDescriptor {
    family: FamilyId,
    type_name: NativeTypeName,
    type_oid: Option<u32>,
    labels: Vec<&'static str>,
    ordinals: HashMap<&'static str, usize>,
}

impl EnumDescriptor {
    /// Describe `E` bound to `type_name`
    pub fn for_enum<E: PgEnum>(type_name: NativeTypeName) -> Result<Self> {
        Self::new(FamilyId::of::<E>(), type_name, E::labels())
    }

    pub(crate) fn new(
        family: FamilyId,
        type_name: NativeTypeName,
        labels: Vec<&'static str>,
    ) -> Result<Self> {
        if labels.is_empty() {
            return Err(PgEnumError::InvalidDescriptor {
                family: family.name(),
                reason: "an enum family needs at least one member".to_string(),
            });
        }

        let mut ordinals = HashMap::with_capacity(labels.len());
        for (ordinal, label) in labels.iter().enumerate() {
            if label.is_empty() {
                return Err(PgEnumError::InvalidDescriptor {
                    family: family.name(),
                    reason: format!("member {ordinal} has an empty label"),
                });
            }
            if ordinals.insert(*label, ordinal).is_some() {
                return Err(PgEnumError::InvalidDescriptor {
                    family: family.name(),
                    reason: format!("label \"{label}\" is used by more than one member"),
                });
            }
        }

        Ok(EnumDescriptor {
            family,
            type_name,
            type_oid: None,
            labels,
            ordinals,
        })
    }

    /// Attach the OID the server assigned to the enum type
    pub fn with_type_oid(mut self, type_oid: u32) -> Self {
        self.type_oid = Some(type_oid);
        self
    }

    pub(crate) fn with_type_name(mut self, type_name: NativeTypeName) -> Self {
        self.type_name = type_name;
        self
    }

    /// Family name, for messages
    pub fn family(&self) -> &'static str {
        self.family.name()
    }

    pub fn family_id(&self) -> FamilyId {
        self.family
    }

    pub fn type_name(&self) -> &NativeTypeName {
        &self.type_name
    }

    pub fn type_oid(&self) -> Option<u32> {
        self.type_oid
    }

    pub fn labels(&self) -> &[&'static str] {
        &self.labels
    }

    /// Exact, case-sensitive label lookup
    pub fn ordinal_of(&self, label: &str) -> Option<usize> {
        self.ordinals.get(label).copied()
    }

    pub fn label_at(&self, ordinal: usize) -> Option<&'static str> {
        self.labels.get(ordinal).copied()
    }

    pub fn contains(&self, label: &str) -> bool {
        self.ordinals.contains_key(label)
    }

    /// `CREATE TYPE ... AS ENUM (...)` for this family's labels
    pub fn create_type_sql(&self) -> String {
        let labels = self
            .labels
            .iter()
            .map(|label| quote_literal(label))
            .collect::<Vec<_>>()
            .join(", ");
        format!("CREATE TYPE {} AS ENUM ({})", self.type_name, labels)
    }

    pub fn drop_type_sql(&self) -> String {
        format!("DROP TYPE IF EXISTS {} CASCADE", self.type_name)
    }
}
