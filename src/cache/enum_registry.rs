use crate::catalog::{EnumCatalog, verify_labels};
use crate::codec::{EncodedValue, RawValue, decode_ordinal, encode_member};
use crate::config::{CONFIG, Config};
use crate::error::{PgEnumError, Result};
use crate::metadata::EnumDescriptor;
use crate::types::{EnumMember, FamilyId, NativeTypeName, PgEnum};
use once_cell::sync::Lazy;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Thread-safe registry of enum family descriptors.
///
/// Each family is written once and read-only afterwards. Descriptors are
/// fully built before they are published, so readers never see a partial one.
pub struct EnumRegistry {
    /// Map from family to its descriptor
    families: RwLock<HashMap<FamilyId, Arc<EnumDescriptor>>>,
    default_schema: String,
    verify_catalog: bool,
}

impl EnumRegistry {
    pub fn new() -> Self {
        Self::with_config(&Config::default())
    }

    pub fn with_config(config: &Config) -> Self {
        EnumRegistry {
            families: RwLock::new(HashMap::with_capacity(config.registry_capacity)),
            default_schema: config.default_schema.clone(),
            verify_catalog: config.verify_catalog,
        }
    }

    pub fn default_schema(&self) -> &str {
        &self.default_schema
    }

    /// Parse a type name and qualify it with the default schema
    pub fn resolve_type_name(&self, type_name: &str) -> Result<NativeTypeName> {
        Ok(NativeTypeName::parse(type_name)?.qualified(&self.default_schema))
    }

    /// Register `E` as bound to the native type `type_name`.
    ///
    /// Registering the same binding again is a no-op returning the existing
    /// descriptor; binding the family to a different type fails. A binding
    /// carrying a type OID only matches an existing one with the same OID.
    pub fn register<E: PgEnum>(&self, type_name: &str) -> Result<Arc<EnumDescriptor>> {
        let type_name = self.resolve_type_name(type_name)?;
        self.register_descriptor(EnumDescriptor::for_enum::<E>(type_name)?)
    }

    /// Register a prebuilt descriptor
    pub fn register_descriptor(&self, descriptor: EnumDescriptor) -> Result<Arc<EnumDescriptor>> {
        let qualified = descriptor.type_name().clone().qualified(&self.default_schema);
        let descriptor = descriptor.with_type_name(qualified);

        // Fast path: already registered
        if let Some(existing) = self.families.read().get(&descriptor.family_id()) {
            return Self::check_same_binding(existing, &descriptor);
        }

        let mut families = self.families.write();
        if let Some(existing) = families.get(&descriptor.family_id()) {
            return Self::check_same_binding(existing, &descriptor);
        }

        info!(
            "Registered enum {} as {} ({} labels)",
            descriptor.family(),
            descriptor.type_name(),
            descriptor.labels().len()
        );
        let descriptor = Arc::new(descriptor);
        families.insert(descriptor.family_id(), Arc::clone(&descriptor));
        Ok(descriptor)
    }

    fn check_same_binding(
        existing: &Arc<EnumDescriptor>,
        requested: &EnumDescriptor,
    ) -> Result<Arc<EnumDescriptor>> {
        let same_oid = requested
            .type_oid()
            .is_none_or(|oid| existing.type_oid() == Some(oid));

        if existing.type_name() == requested.type_name() && same_oid {
            debug!("Enum {} is already registered as {}", existing.family(), existing.type_name());
            Ok(Arc::clone(existing))
        } else {
            let family = existing.family();
            let (existing, requested) = (Self::binding(existing), Self::binding(requested));
            warn!("Refusing to rebind enum {} from {} to {}", family, existing, requested);
            Err(PgEnumError::ConflictingRegistration {
                family,
                existing,
                requested,
            })
        }
    }

    // Type name, plus the OID when known
    fn binding(descriptor: &EnumDescriptor) -> String {
        match descriptor.type_oid() {
            Some(oid) => format!("{} (oid {})", descriptor.type_name(), oid),
            None => descriptor.type_name().to_string(),
        }
    }

    /// Register `E` after checking its labels against the server's enum type.
    ///
    /// The server's type OID is recorded on the descriptor. If the family is
    /// already registered without that OID, this fails with
    /// `ConflictingRegistration` rather than hand back a descriptor lacking it.
    /// With catalog verification disabled, missing labels are only logged.
    pub async fn register_verified<E, C>(&self, catalog: &C, type_name: &str) -> Result<Arc<EnumDescriptor>>
    where
        E: PgEnum,
        C: EnumCatalog + ?Sized,
    {
        let type_name = self.resolve_type_name(type_name)?;
        let mut descriptor = EnumDescriptor::for_enum::<E>(type_name)?;

        match catalog.load_enum(descriptor.type_name()).await? {
            Some(server) => {
                match verify_labels(&descriptor, &server.labels) {
                    Ok(()) => {}
                    Err(e) if self.verify_catalog => return Err(e),
                    Err(e) => warn!("Registering {} despite catalog mismatch: {}", descriptor.family(), e),
                }
                descriptor = descriptor.with_type_oid(server.type_oid);
            }
            None if self.verify_catalog => {
                return Err(PgEnumError::SchemaMismatch {
                    type_name: descriptor.type_name().to_string(),
                    missing: descriptor.labels().iter().map(|l| l.to_string()).collect(),
                });
            }
            None => warn!("Enum type {} not found in catalog", descriptor.type_name()),
        }

        self.register_descriptor(descriptor)
    }

    pub fn get<E: PgEnum>(&self) -> Result<Arc<EnumDescriptor>> {
        self.get_by_family(FamilyId::of::<E>())
    }

    pub fn get_by_family(&self, family: FamilyId) -> Result<Arc<EnumDescriptor>> {
        self.families
            .read()
            .get(&family)
            .cloned()
            .ok_or_else(|| PgEnumError::UnregisteredFamily {
                family: family.name().to_string(),
            })
    }

    pub fn is_registered<E: PgEnum>(&self) -> bool {
        self.families.read().contains_key(&FamilyId::of::<E>())
    }

    /// Families bound to the given native type
    pub fn find_by_type_name(&self, type_name: &NativeTypeName) -> Vec<Arc<EnumDescriptor>> {
        self.families
            .read()
            .values()
            .filter(|d| d.type_name().same_type(type_name))
            .cloned()
            .collect()
    }

    /// Decode against a family known only at runtime; yields the member label
    pub fn decode(&self, family: FamilyId, raw: &RawValue) -> Result<Option<&'static str>> {
        let descriptor = self.get_by_family(family)?;
        Ok(decode_ordinal(&descriptor, raw)?.and_then(|ordinal| descriptor.label_at(ordinal)))
    }

    /// Encode a member of a family known only at runtime
    pub fn encode(&self, family: FamilyId, value: Option<&dyn EnumMember>) -> Result<EncodedValue> {
        let descriptor = self.get_by_family(family)?;
        encode_member(&descriptor, value)
    }

    pub fn len(&self) -> usize {
        self.families.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.families.read().is_empty()
    }
}

impl Default for EnumRegistry {
    fn default() -> Self {
        Self::new()
    }
}

// Global enum registry instance
static GLOBAL_ENUM_REGISTRY: Lazy<EnumRegistry> = Lazy::new(|| EnumRegistry::with_config(&CONFIG));

/// Get the global enum registry
pub fn global_registry() -> &'static EnumRegistry {
    &GLOBAL_ENUM_REGISTRY
}
