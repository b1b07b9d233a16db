// Copyright (c) 2024-2025 Scanstore Contributors
// SPDX-License-Identifier: Apache-2.0
//
//! Descriptor framing
//!
//! Every stored descriptor is laid out as:
//!
//! ```text
//! +-------+--------+-----------------+-----------+
//! | magic | format | crc32 (LE, u32) | payload   |
//! | SSD1  | 1 byte | of payload      | ...       |
//! +-------+--------+-----------------+-----------+
//! ```
//!
//! The format byte is honored on read, so a database may mix bincode and
//! JSON descriptors.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use super::error::{CatalogError, CatalogResult};

const MAGIC: &[u8; 4] = b"SSD1";
const HEADER_LEN: usize = MAGIC.len() + 1 + 4;

/// Payload encoding for newly written descriptors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DescriptorFormat {
    /// Compact binary encoding
    #[default]
    Bincode,
    /// Human-readable, useful when inspecting a database by hand
    Json,
}

impl DescriptorFormat {
    fn tag(self) -> u8 {
        match self {
            DescriptorFormat::Bincode => 0,
            DescriptorFormat::Json => 1,
        }
    }

    fn from_tag(tag: u8) -> Option<Self> {
        match tag {
            0 => Some(DescriptorFormat::Bincode),
            1 => Some(DescriptorFormat::Json),
            _ => None,
        }
    }
}

impl std::str::FromStr for DescriptorFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "bincode" | "binary" => Ok(DescriptorFormat::Bincode),
            "json" => Ok(DescriptorFormat::Json),
            _ => Err(format!(
                "Unknown descriptor format: {}. Valid options: bincode, json",
                s
            )),
        }
    }
}

impl std::fmt::Display for DescriptorFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DescriptorFormat::Bincode => write!(f, "bincode"),
            DescriptorFormat::Json => write!(f, "json"),
        }
    }
}

/// Serialize `value` and wrap it in a checksummed frame
pub fn encode<T: Serialize>(format: DescriptorFormat, value: &T) -> CatalogResult<Vec<u8>> {
    let payload = match format {
        DescriptorFormat::Bincode => {
            bincode::serialize(value).map_err(|e| CatalogError::Serialization(e.to_string()))?
        }
        DescriptorFormat::Json => {
            serde_json::to_vec(value).map_err(|e| CatalogError::Serialization(e.to_string()))?
        }
    };

    let mut bytes = Vec::with_capacity(HEADER_LEN + payload.len());
    bytes.extend_from_slice(MAGIC);
    bytes.push(format.tag());
    bytes.extend_from_slice(&crc32fast::hash(&payload).to_le_bytes());
    bytes.extend_from_slice(&payload);
    Ok(bytes)
}

/// Verify the frame read from `path` and deserialize its payload
pub fn decode<T: DeserializeOwned>(path: &str, bytes: &[u8]) -> CatalogResult<T> {
    if bytes.len() < HEADER_LEN {
        return Err(CatalogError::corruption(
            path,
            format!("descriptor is {} bytes, shorter than its header", bytes.len()),
        ));
    }
    let (header, payload) = bytes.split_at(HEADER_LEN);

    if &header[..MAGIC.len()] != MAGIC {
        return Err(CatalogError::corruption(path, "bad descriptor magic"));
    }

    let format = DescriptorFormat::from_tag(header[MAGIC.len()]).ok_or_else(|| {
        CatalogError::corruption(
            path,
            format!("unknown descriptor format tag {}", header[MAGIC.len()]),
        )
    })?;

    let mut crc = [0u8; 4];
    crc.copy_from_slice(&header[MAGIC.len() + 1..]);
    let expected = u32::from_le_bytes(crc);
    let actual = crc32fast::hash(payload);
    if expected != actual {
        return Err(CatalogError::corruption(
            path,
            format!("checksum mismatch: stored {:08x}, computed {:08x}", expected, actual),
        ));
    }

    match format {
        DescriptorFormat::Bincode => bincode::deserialize(payload)
            .map_err(|e| CatalogError::corruption(path, format!("undecodable payload: {}", e))),
        DescriptorFormat::Json => serde_json::from_slice(payload)
            .map_err(|e| CatalogError::corruption(path, format!("undecodable payload: {}", e))),
    }
}
