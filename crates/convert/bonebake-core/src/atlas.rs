//! Atlas slicing: packed sprite records to named top-left-origin rectangles.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::data::{AtlasDoc, SpriteRecord, Vec2};
use crate::error::AtlasError;

/// Pixel rectangle with a top-left origin.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PixelRect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SpriteSlice {
    pub name: String,
    pub rect: PixelRect,
    /// Packer offset of the sprite's anchor, pixels.
    pub pivot: Vec2,
}

impl SpriteSlice {
    /// Cut one record out of a sheet `sheet_height` pixels tall, flipping y.
    pub fn from_record(sheet_height: i32, record: &SpriteRecord) -> Self {
        Self {
            name: record.name.clone(),
            rect: PixelRect {
                x: record.x,
                y: sheet_height - record.y - record.height,
                width: record.width,
                height: record.height,
            },
            pivot: Vec2::new(record.offset_x, record.offset_y),
        }
    }
}

/// Slices keyed by sprite name in declaration order.
/// A repeated name replaces the earlier slice but keeps its position.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SliceTable {
    slices: IndexMap<String, SpriteSlice>,
}

impl SliceTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Slice every sprite record of an atlas document.
    pub fn from_doc(doc: &AtlasDoc) -> Self {
        let mut table = Self::new();
        for record in &doc.sprites {
            table.insert(SpriteSlice::from_record(doc.sheet_height, record));
        }
        log::debug!("sliced {} sprites from atlas", table.len());
        table
    }

    pub fn insert(&mut self, slice: SpriteSlice) {
        self.slices.insert(slice.name.clone(), slice);
    }

    pub fn lookup(&self, name: &str) -> Result<&SpriteSlice, AtlasError> {
        self.slices
            .get(name)
            .ok_or_else(|| AtlasError::MissingSlice(name.to_string()))
    }

    pub fn len(&self) -> usize {
        self.slices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slices.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SpriteSlice> {
        self.slices.values()
    }
}
