//! Transaction envelope handed to the remote signer.
//!
//! The signer never sees the full runtime metadata. It gets the encoded payload plus
//! just enough type information to decode and display it:
//!
//! ```text
//! extrinsic = call ++ extra ++ additional_signed
//! metadata  = { ty: Compact<u32>, version: u8, signed_extensions: [{ identifier, ty, additional_signed }] }
//! types     = [(Compact<u32> id, Type)]  every type reachable from the call and the extensions
//! ```
//!
//! Type ids are the runtime's own ids so offsets the signer derives match the node's.

use std::collections::BTreeMap;

use parity_scale_codec::{Compact, Encode};
use scale_info::form::PortableForm;
use scale_info::{PortableRegistry, Type, TypeDef};
use thiserror::Error;

use crate::blockchain::rpc::{RuntimeContext, SigningPayload};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EnvelopeError {
    #[error("type {0} is referenced but missing from the runtime registry")]
    MissingType(u32),
}

/// Collects the closure of types reachable from a set of roots.
pub struct TypeRegistryBuilder<'a> {
    source: &'a PortableRegistry,
    types: BTreeMap<u32, Type<PortableForm>>,
}

impl<'a> TypeRegistryBuilder<'a> {
    pub fn new(source: &'a PortableRegistry) -> Self {
        Self {
            source,
            types: BTreeMap::new(),
        }
    }

    /// Record `root` and everything it references. Returns `root`'s id.
    pub fn add(&mut self, root: u32) -> Result<u32, EnvelopeError> {
        let mut pending = vec![root];
        while let Some(id) = pending.pop() {
            if self.types.contains_key(&id) {
                continue;
            }
            let ty = self
                .source
                .resolve(id)
                .ok_or(EnvelopeError::MissingType(id))?;
            pending.extend(referenced_types(ty));
            self.types.insert(id, ty.clone());
        }
        Ok(root)
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    pub fn contains(&self, id: u32) -> bool {
        self.types.contains_key(&id)
    }

    /// Encoded as a sequence of portable types, ordered by id.
    pub fn encode(&self) -> Vec<u8> {
        let entries: Vec<(Compact<u32>, &Type<PortableForm>)> = self
            .types
            .iter()
            .map(|(id, ty)| (Compact(*id), ty))
            .collect();
        entries.encode()
    }
}

fn referenced_types(ty: &Type<PortableForm>) -> Vec<u32> {
    let mut ids: Vec<u32> = ty
        .type_params
        .iter()
        .filter_map(|param| param.ty.as_ref().map(|t| t.id))
        .collect();

    match &ty.type_def {
        TypeDef::Composite(composite) => {
            ids.extend(composite.fields.iter().map(|f| f.ty.id));
        }
        TypeDef::Variant(variant) => {
            ids.extend(
                variant
                    .variants
                    .iter()
                    .flat_map(|v| v.fields.iter().map(|f| f.ty.id)),
            );
        }
        TypeDef::Sequence(seq) => ids.push(seq.type_param.id),
        TypeDef::Array(array) => ids.push(array.type_param.id),
        TypeDef::Tuple(tuple) => ids.extend(tuple.fields.iter().map(|t| t.id)),
        TypeDef::Primitive(_) => {}
        TypeDef::Compact(compact) => ids.push(compact.type_param.id),
        TypeDef::BitSequence(bits) => {
            ids.push(bits.bit_store_type.id);
            ids.push(bits.bit_order_type.id);
        }
    }
    ids
}

/// Signed extension entry of the extrinsic metadata.
#[derive(Debug, Clone, PartialEq, Eq, Encode)]
pub struct SignedExtensionMetadata {
    pub identifier: String,
    #[codec(compact)]
    pub ty: u32,
    #[codec(compact)]
    pub additional_signed: u32,
}

/// Extrinsic metadata as the signer expects it.
#[derive(Debug, Clone, PartialEq, Eq, Encode)]
pub struct ExtrinsicMetadata {
    #[codec(compact)]
    pub ty: u32,
    pub version: u8,
    pub signed_extensions: Vec<SignedExtensionMetadata>,
}

/// The three blobs sent with a sign request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionEnvelope {
    pub extrinsic: Vec<u8>,
    pub metadata: Vec<u8>,
    pub types: Vec<u8>,
}

impl TransactionEnvelope {
    pub fn build(
        payload: &SigningPayload,
        runtime: &RuntimeContext,
    ) -> Result<Self, EnvelopeError> {
        let mut registry = TypeRegistryBuilder::new(&runtime.types);
        let call_type = registry.add(runtime.call_type)?;

        let signed_extensions = runtime
            .signed_extensions
            .iter()
            .map(|ext| {
                Ok(SignedExtensionMetadata {
                    identifier: ext.identifier.clone(),
                    ty: registry.add(ext.ty)?,
                    additional_signed: registry.add(ext.additional_signed)?,
                })
            })
            .collect::<Result<Vec<_>, EnvelopeError>>()?;

        let metadata = ExtrinsicMetadata {
            ty: call_type,
            version: runtime.extrinsic_version,
            signed_extensions,
        };

        tracing::debug!(
            types = registry.len(),
            extensions = metadata.signed_extensions.len(),
            "Transaction envelope built"
        );

        Ok(Self {
            extrinsic: payload.encode(),
            metadata: metadata.encode(),
            types: registry.encode(),
        })
    }
}
