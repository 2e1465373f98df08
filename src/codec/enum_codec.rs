use super::{ColumnCodec, EncodedValue, RawValue};
use crate::cache::{EnumRegistry, global_registry};
use crate::error::{PgEnumError, Result};
use crate::metadata::EnumDescriptor;
use crate::types::{EnumMember, NativeTypeName, PgEnum};
use std::marker::PhantomData;
use std::sync::Arc;
use tracing::{debug, trace};

/// Resolve a raw column value to the ordinal of the matching member.
///
/// Lookup is exact and case-sensitive. `Ok(None)` means SQL NULL.
pub fn decode_ordinal(descriptor: &EnumDescriptor, raw: &RawValue) -> Result<Option<usize>> {
    let label = match raw {
        RawValue::Null => return Ok(None),
        RawValue::Text(label) => label.as_str(),
        RawValue::Object(object) => {
            if !object.type_name.same_type(descriptor.type_name()) {
                return Err(PgEnumError::UnsupportedRawType {
                    family: descriptor.family(),
                    found: raw.describe(),
                });
            }
            match object.value.as_deref() {
                Some(label) => label,
                None => return Ok(None),
            }
        }
        RawValue::Other { .. } => {
            return Err(PgEnumError::UnsupportedRawType {
                family: descriptor.family(),
                found: raw.describe(),
            });
        }
    };

    match descriptor.ordinal_of(label) {
        Some(ordinal) => {
            trace!("Decoded {:?} as member {} of {}", label, ordinal, descriptor.family());
            Ok(Some(ordinal))
        }
        None => {
            debug!("Label {:?} is not a member of {} ({})", label, descriptor.family(), descriptor.type_name());
            Err(PgEnumError::UnknownEnumLabel {
                family: descriptor.family(),
                type_name: descriptor.type_name().to_string(),
                label: label.to_string(),
            })
        }
    }
}

/// Tag a member (or NULL) with the family's native type
pub fn encode_member(descriptor: &EnumDescriptor, value: Option<&dyn EnumMember>) -> Result<EncodedValue> {
    let label = match value {
        None => None,
        Some(member) => {
            let label = member.member_label();
            if member.family_id() != descriptor.family_id() || !descriptor.contains(label) {
                return Err(PgEnumError::UnboundValue {
                    family: descriptor.family(),
                    value_family: member.family_id().name(),
                    label: label.to_string(),
                });
            }
            Some(label)
        }
    };

    Ok(EncodedValue::new(
        descriptor.type_name().clone(),
        descriptor.type_oid(),
        label,
    ))
}

/// Column codec for one enum family
pub struct EnumColumnCodec<E: PgEnum> {
    descriptor: Arc<EnumDescriptor>,
    _family: PhantomData<fn() -> E>,
}

impl<E: PgEnum> EnumColumnCodec<E> {
    /// Codec for `E` as registered in `registry`
    pub fn new(registry: &EnumRegistry) -> Result<Self> {
        Ok(EnumColumnCodec {
            descriptor: registry.get::<E>()?,
            _family: PhantomData,
        })
    }

    /// Codec for `E` as registered in the process-wide registry
    pub fn global() -> Result<Self> {
        Self::new(global_registry())
    }

    pub fn descriptor(&self) -> &EnumDescriptor {
        &self.descriptor
    }
}

impl<E: PgEnum> Clone for EnumColumnCodec<E> {
    fn clone(&self) -> Self {
        EnumColumnCodec {
            descriptor: Arc::clone(&self.descriptor),
            _family: PhantomData,
        }
    }
}

impl<E: PgEnum> ColumnCodec for EnumColumnCodec<E> {
    type Value = E;

    fn sql_type(&self) -> &NativeTypeName {
        self.descriptor.type_name()
    }

    fn decode(&self, raw: &RawValue) -> Result<Option<E>> {
        let Some(ordinal) = decode_ordinal(&self.descriptor, raw)? else {
            return Ok(None);
        };
        // Registry descriptors for E are built from E::VARIANTS in order
        match E::VARIANTS.get(ordinal) {
            Some(member) => Ok(Some(*member)),
            None => Err(PgEnumError::UnknownEnumLabel {
                family: E::family(),
                type_name: self.descriptor.type_name().to_string(),
                label: self.descriptor.label_at(ordinal).unwrap_or_default().to_string(),
            }),
        }
    }

    fn encode(&self, value: Option<&E>) -> Result<EncodedValue> {
        encode_member(&self.descriptor, value.map(|v| v as &dyn EnumMember))
    }
}
