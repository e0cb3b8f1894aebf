//! Label schemes, per-pixel label masks, and coarse-label reduction.
//!
//! A [`LabelScheme`] fixes the model input resolution, the class count, and
//! the human-readable class names of a pretrained parsing model. The
//! `pascal` scheme additionally ships the built-in coarse table collapsing
//! body parts into background / body / limbs for rigging.

use crate::error::UnmappedLabelError;
use crate::image::GrayImageU8;
use serde::{Deserialize, Serialize};

/// Dataset/label scheme the segmentation model was trained on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LabelScheme {
    /// LIP: 20 fine-grained classes at 473×473.
    Lip,
    /// ATR: 18 clothing-centric classes at 512×512.
    Atr,
    /// PASCAL-Person-Part: 7 coarse body parts at 512×512.
    Pascal,
}

const LIP_NAMES: [&str; 20] = [
    "Background",
    "Hat",
    "Hair",
    "Glove",
    "Sunglasses",
    "Upper-clothes",
    "Dress",
    "Coat",
    "Socks",
    "Pants",
    "Jumpsuits",
    "Scarf",
    "Skirt",
    "Face",
    "Left-arm",
    "Right-arm",
    "Left-leg",
    "Right-leg",
    "Left-shoe",
    "Right-shoe",
];

const ATR_NAMES: [&str; 18] = [
    "Background",
    "Hat",
    "Hair",
    "Sunglasses",
    "Upper-clothes",
    "Skirt",
    "Pants",
    "Dress",
    "Belt",
    "Left-shoe",
    "Right-shoe",
    "Face",
    "Left-leg",
    "Right-leg",
    "Left-arm",
    "Right-arm",
    "Bag",
    "Scarf",
];

const PASCAL_NAMES: [&str; 7] = [
    "Background",
    "Head",
    "Torso",
    "Upper Arms",
    "Lower Arms",
    "Upper Legs",
    "Lower Legs",
];

// Head/torso/legs fuse into one body region; arms form their own category
// so limb boundaries survive the reduction.
const PASCAL_COARSE: [(u8, u8); 7] = [
    (0, 0),
    (1, 1),
    (2, 1),
    (3, 2),
    (4, 2),
    (5, 1),
    (6, 1),
];

impl LabelScheme {
    /// Model input resolution as `(height, width)`.
    pub fn input_size(self) -> (usize, usize) {
        match self {
            LabelScheme::Lip => (473, 473),
            LabelScheme::Atr => (512, 512),
            LabelScheme::Pascal => (512, 512),
        }
    }

    /// Number of classes the model predicts.
    pub fn num_classes(self) -> usize {
        self.class_names().len()
    }

    /// Human-readable class names, indexed by class id.
    pub fn class_names(self) -> &'static [&'static str] {
        match self {
            LabelScheme::Lip => &LIP_NAMES,
            LabelScheme::Atr => &ATR_NAMES,
            LabelScheme::Pascal => &PASCAL_NAMES,
        }
    }

    /// Built-in coarse-category table, if the scheme defines one.
    pub fn coarse_table(self) -> Option<RemapTable> {
        match self {
            LabelScheme::Pascal => Some(RemapTable::from_pairs(&PASCAL_COARSE)),
            _ => None,
        }
    }
}

/// Per-pixel class ids on some pixel grid. Values lie in
/// `[0, num_classes)` for the producing scheme, or in the reduced codomain
/// after [`reduce_labels`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LabelMask {
    width: usize,
    height: usize,
    data: Vec<u8>,
}

impl LabelMask {
    /// All-background mask of size `width × height`.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            data: vec![0; width * height],
        }
    }

    /// Wrap raw class ids; `data.len()` must equal `width * height`.
    pub fn from_raw(width: usize, height: usize, data: Vec<u8>) -> Option<Self> {
        (data.len() == width * height).then_some(Self {
            width,
            height,
            data,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> u8 {
        self.data[y * self.width + x]
    }

    #[inline]
    pub fn set(&mut self, x: usize, y: usize, label: u8) {
        self.data[y * self.width + x] = label;
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }

    /// Reinterpret the class ids as a grayscale image (for lossless
    /// persistence as a single-channel file).
    pub fn to_gray(&self) -> GrayImageU8 {
        GrayImageU8::from_raw(self.width, self.height, self.data.clone())
            .unwrap_or_else(|| unreachable!("mask buffer length is width * height"))
    }
}

/// Fine-to-coarse class id lookup table.
#[derive(Clone, Debug)]
pub struct RemapTable {
    map: Vec<Option<u8>>,
}

impl RemapTable {
    /// Build a table from `(source, target)` pairs.
    pub fn from_pairs(pairs: &[(u8, u8)]) -> Self {
        let max_src = pairs.iter().map(|&(s, _)| s as usize).max().unwrap_or(0);
        let mut map = vec![None; max_src + 1];
        for &(src, dst) in pairs {
            map[src as usize] = Some(dst);
        }
        Self { map }
    }

    /// Target id for `label`, or `None` when the table has no entry.
    #[inline]
    pub fn get(&self, label: u8) -> Option<u8> {
        self.map.get(label as usize).copied().flatten()
    }
}

/// Map every class id of `mask` through `table`. Pure and total over the
/// table's domain; an id without an entry is an error, never passed through.
pub fn reduce_labels(mask: &LabelMask, table: &RemapTable) -> Result<LabelMask, UnmappedLabelError> {
    let mut data = Vec::with_capacity(mask.data.len());
    for &label in &mask.data {
        match table.get(label) {
            Some(target) => data.push(target),
            None => return Err(UnmappedLabelError { label }),
        }
    }
    Ok(LabelMask {
        width: mask.width,
        height: mask.height,
        data,
    })
}
