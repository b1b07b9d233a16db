// Copyright (c) 2024-2025 Scanstore Contributors
// SPDX-License-Identifier: Apache-2.0
//
//! Per-item shape descriptors
//!
//! An item is one stored unit of a column: a video, or a group of images
//! sharing a format. Item descriptors are read-only once built. Their
//! parallel arrays are validated on construction; a mismatch is reported,
//! never truncated.

use serde::{Deserialize, Serialize};
use std::borrow::Cow;

use super::error::{CatalogError, CatalogResult};
use super::metadata::Metadata;
use super::paths::{DescriptorKey, DescriptorKind};
use super::{ColumnId, ItemId, TableId};

/// Serialized form of a video item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoDescriptor {
    pub table_id: TableId,
    pub column_id: ColumnId,
    pub item_id: ItemId,
    pub frames: i32,
    pub width: i32,
    pub height: i32,
    /// Frame index of every keyframe, strictly increasing
    pub keyframe_positions: Vec<i64>,
    /// Byte offset of every keyframe in the encoded stream
    pub keyframe_byte_offsets: Vec<i64>,
}

fn check_video(d: &VideoDescriptor) -> Result<(), String> {
    if d.frames < 0 || d.width < 0 || d.height < 0 {
        return Err(format!(
            "negative video shape (frames {}, width {}, height {})",
            d.frames, d.width, d.height
        ));
    }
    if d.keyframe_positions.len() != d.keyframe_byte_offsets.len() {
        return Err(format!(
            "{} keyframe positions but {} keyframe byte offsets",
            d.keyframe_positions.len(),
            d.keyframe_byte_offsets.len()
        ));
    }
    if let Some(first) = d.keyframe_positions.first() {
        if *first < 0 {
            return Err(format!("negative keyframe position {}", first));
        }
    }
    if let Some(pair) = d
        .keyframe_positions
        .windows(2)
        .find(|pair| pair[0] >= pair[1])
    {
        return Err(format!(
            "keyframe positions not strictly increasing ({} then {})",
            pair[0], pair[1]
        ));
    }
    if let Some(offset) = d.keyframe_byte_offsets.iter().find(|o| **o < 0) {
        return Err(format!("negative keyframe byte offset {}", offset));
    }
    Ok(())
}

/// Shape of one stored video
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoMetadata {
    descriptor: VideoDescriptor,
}

impl VideoMetadata {
    pub fn new(descriptor: VideoDescriptor) -> CatalogResult<Self> {
        check_video(&descriptor).map_err(CatalogError::InvalidOperation)?;
        Ok(Self { descriptor })
    }

    pub fn table_id(&self) -> TableId {
        self.descriptor.table_id
    }

    pub fn column_id(&self) -> ColumnId {
        self.descriptor.column_id
    }

    pub fn item_id(&self) -> ItemId {
        self.descriptor.item_id
    }

    pub fn frames(&self) -> i32 {
        self.descriptor.frames
    }

    pub fn width(&self) -> i32 {
        self.descriptor.width
    }

    pub fn height(&self) -> i32 {
        self.descriptor.height
    }

    pub fn keyframe_positions(&self) -> &[i64] {
        &self.descriptor.keyframe_positions
    }

    pub fn keyframe_byte_offsets(&self) -> &[i64] {
        &self.descriptor.keyframe_byte_offsets
    }

    /// Last keyframe at or before `frame`, as (position, byte offset)
    ///
    /// This is where a decoder has to start to reach `frame`.
    pub fn keyframe_before(&self, frame: i64) -> Option<(i64, i64)> {
        let positions = self.keyframe_positions();
        let index = positions.partition_point(|p| *p <= frame);
        if index == 0 {
            return None;
        }
        Some((positions[index - 1], self.keyframe_byte_offsets()[index - 1]))
    }
}

impl Metadata for VideoMetadata {
    type Descriptor = VideoDescriptor;
    const KIND: DescriptorKind = DescriptorKind::Video;

    fn descriptor_key(&self) -> Option<DescriptorKey> {
        Some(DescriptorKey::Video {
            table_id: self.descriptor.table_id,
            column_id: self.descriptor.column_id,
            item_id: self.descriptor.item_id,
        })
    }

    fn descriptor(&self) -> Cow<'_, VideoDescriptor> {
        Cow::Borrowed(&self.descriptor)
    }

    fn from_descriptor(descriptor: VideoDescriptor) -> CatalogResult<Self> {
        check_video(&descriptor).map_err(|reason| CatalogError::corruption("", reason))?;
        Ok(Self { descriptor })
    }
}

/// Compression used for every image in a group
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ImageEncodingType {
    Png,
    Jpeg,
    Bmp,
    Raw,
}

/// Pixel layout shared by every image in a group
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ImageColorSpace {
    Gray,
    Rgb,
    Rgba,
}

/// Serialized form of an image format group
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageFormatGroupDescriptor {
    pub table_id: TableId,
    pub column_id: ColumnId,
    pub item_id: ItemId,
    pub num_images: i32,
    pub width: i32,
    pub height: i32,
    pub encoding_type: ImageEncodingType,
    pub color_space: ImageColorSpace,
    /// Encoded size of every image, one per image
    pub compressed_sizes: Vec<i64>,
}

fn check_image_group(d: &ImageFormatGroupDescriptor) -> Result<(), String> {
    if d.num_images < 0 || d.width < 0 || d.height < 0 {
        return Err(format!(
            "negative image group shape (images {}, width {}, height {})",
            d.num_images, d.width, d.height
        ));
    }
    if d.compressed_sizes.len() != d.num_images as usize {
        return Err(format!(
            "{} images but {} compressed sizes",
            d.num_images,
            d.compressed_sizes.len()
        ));
    }
    if let Some(size) = d.compressed_sizes.iter().find(|s| **s < 0) {
        return Err(format!("negative compressed size {}", size));
    }
    if d.compressed_sizes
        .iter()
        .try_fold(0i64, |total, size| total.checked_add(*size))
        .is_none()
    {
        return Err("compressed sizes overflow the group total".to_string());
    }
    Ok(())
}

/// Shape of one group of identically formatted images
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageFormatGroupMetadata {
    descriptor: ImageFormatGroupDescriptor,
}

impl ImageFormatGroupMetadata {
    pub fn new(descriptor: ImageFormatGroupDescriptor) -> CatalogResult<Self> {
        check_image_group(&descriptor).map_err(CatalogError::InvalidOperation)?;
        Ok(Self { descriptor })
    }

    pub fn table_id(&self) -> TableId {
        self.descriptor.table_id
    }

    pub fn column_id(&self) -> ColumnId {
        self.descriptor.column_id
    }

    pub fn item_id(&self) -> ItemId {
        self.descriptor.item_id
    }

    pub fn num_images(&self) -> i32 {
        self.descriptor.num_images
    }

    pub fn width(&self) -> i32 {
        self.descriptor.width
    }

    pub fn height(&self) -> i32 {
        self.descriptor.height
    }

    pub fn encoding_type(&self) -> ImageEncodingType {
        self.descriptor.encoding_type
    }

    pub fn color_space(&self) -> ImageColorSpace {
        self.descriptor.color_space
    }

    pub fn compressed_sizes(&self) -> &[i64] {
        &self.descriptor.compressed_sizes
    }

    /// Total encoded bytes of the group; construction guarantees it fits in i64
    pub fn total_compressed_size(&self) -> i64 {
        self.descriptor.compressed_sizes.iter().sum()
    }
}

impl Metadata for ImageFormatGroupMetadata {
    type Descriptor = ImageFormatGroupDescriptor;
    const KIND: DescriptorKind = DescriptorKind::ImageFormatGroup;

    fn descriptor_key(&self) -> Option<DescriptorKey> {
        Some(DescriptorKey::ImageFormatGroup {
            table_id: self.descriptor.table_id,
            column_id: self.descriptor.column_id,
            item_id: self.descriptor.item_id,
        })
    }

    fn descriptor(&self) -> Cow<'_, ImageFormatGroupDescriptor> {
        Cow::Borrowed(&self.descriptor)
    }

    fn from_descriptor(descriptor: ImageFormatGroupDescriptor) -> CatalogResult<Self> {
        check_image_group(&descriptor).map_err(|reason| CatalogError::corruption("", reason))?;
        Ok(Self { descriptor })
    }
}
