//! Loadable constants and the per-class constant pool.

use std::fmt;

use ordered_float::OrderedFloat;
use rustc_hash::FxHashMap;

/// A value pushed by `ldc`, `ldc_w` or `ldc2_w`.
///
/// Floating-point values are wrapped in [`OrderedFloat`] so constants can
/// be hashed for deduplication. Negative literals reach the pool only
/// through explicit negation, so signed zeros never need separate entries.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Constant {
    Int(i32),
    Long(i64),
    Float(OrderedFloat<f32>),
    Double(OrderedFloat<f64>),
    String(String),
}

impl Constant {
    pub fn float(value: f32) -> Self {
        Constant::Float(OrderedFloat(value))
    }

    pub fn double(value: f64) -> Self {
        Constant::Double(OrderedFloat(value))
    }

    /// Long and double entries take two pool slots and load with `ldc2_w`.
    pub fn is_wide(&self) -> bool {
        matches!(self, Constant::Long(_) | Constant::Double(_))
    }
}

impl fmt::Display for Constant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Constant::Int(v) => write!(f, "{v}"),
            Constant::Long(v) => write!(f, "{v}L"),
            Constant::Float(v) => write!(f, "{}f", v.0),
            Constant::Double(v) => write!(f, "{}", v.0),
            Constant::String(s) => write!(f, "{s:?}"),
        }
    }
}

/// Class-level constant pool with deduplication.
///
/// Indices follow the class-file convention: the first entry is 1 and wide
/// entries consume two indices.
#[derive(Debug, Clone, Default)]
pub struct ConstantPool {
    constants: Vec<(u16, Constant)>,
    index: FxHashMap<Constant, u16>,
    next_index: u16,
}

impl ConstantPool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or get existing constant, returns its pool index.
    pub fn add(&mut self, constant: Constant) -> u16 {
        if let Some(&idx) = self.index.get(&constant) {
            return idx;
        }

        let idx = self.next_index.max(1);
        self.next_index = idx + if constant.is_wide() { 2 } else { 1 };
        self.index.insert(constant.clone(), idx);
        self.constants.push((idx, constant));
        idx
    }

    pub fn get(&self, index: u16) -> Option<&Constant> {
        self.constants
            .iter()
            .find(|(idx, _)| *idx == index)
            .map(|(_, constant)| constant)
    }

    /// Number of distinct constants.
    pub fn len(&self) -> usize {
        self.constants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.constants.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (u16, &Constant)> {
        self.constants.iter().map(|(idx, constant)| (*idx, constant))
    }
}
