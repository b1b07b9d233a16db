// Copyright (c) 2024-2025 Scanstore Contributors
// SPDX-License-Identifier: Apache-2.0
//
//! Common interface of every persisted catalog entity

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::borrow::Cow;

use super::error::CatalogResult;
use super::paths::{DescriptorKey, DescriptorKind};

/// An in-memory view over exactly one serializable descriptor payload
///
/// Implementors are built either fresh by a caller or from a payload read
/// back from storage. `from_descriptor` is the only way in from storage and
/// must reject payloads that break the type's structural invariants.
pub trait Metadata: Sized {
    /// The serialized payload type
    type Descriptor: Serialize + DeserializeOwned + Clone;

    /// Entity kind, fixed per type
    const KIND: DescriptorKind;

    /// Where this entity is stored, or `None` while it has no id yet
    fn descriptor_key(&self) -> Option<DescriptorKey>;

    /// The payload to persist
    fn descriptor(&self) -> Cow<'_, Self::Descriptor>;

    /// Build a validated view over a loaded payload
    fn from_descriptor(descriptor: Self::Descriptor) -> CatalogResult<Self>;
}
