// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Dynamic values stored in generated instances.
//!
//! Each value carries the default equality, hash code and string conversion
//! of its runtime type; generated types combine them field by field.

use crate::instance::Instance;
use crate::types::TypeHandle;
use chrono::{Datelike, NaiveDateTime};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

/// Ticks (100 ns units since 0001-01-01) at the Unix epoch.
const UNIX_EPOCH_TICKS: i64 = 621_355_968_000_000_000;
const TICKS_PER_SECOND: i64 = 10_000_000;
const NANOS_PER_TICK: u32 = 100;

/// Time-of-day part of rendered date-time values (`12:00:00 AM`).
const TIME_OF_DAY_FORMAT: &str = "%-I:%M:%S %p";

static NEXT_OBJECT_ID: AtomicU32 = AtomicU32::new(1);

#[derive(Debug)]
struct ObjectCell {
    id: u32,
}

/// A plain object: no fields, reference identity only.
#[derive(Clone)]
pub struct ObjectRef(Arc<ObjectCell>);

impl ObjectRef {
    /// Allocate a new object.
    #[must_use]
    pub fn new() -> Self {
        Self(Arc::new(ObjectCell {
            id: NEXT_OBJECT_ID.fetch_add(1, Ordering::Relaxed),
        }))
    }

    /// Returns `true` if both references denote the same object.
    #[must_use]
    pub fn ptr_eq(a: &Self, b: &Self) -> bool {
        Arc::ptr_eq(&a.0, &b.0)
    }

    /// Identity-derived hash code.
    #[must_use]
    pub fn hash_code(&self) -> i32 {
        self.0.id as i32
    }
}

impl Default for ObjectRef {
    fn default() -> Self {
        Self::new()
    }
}

impl PartialEq for ObjectRef {
    fn eq(&self, other: &Self) -> bool {
        Self::ptr_eq(self, other)
    }
}

impl Eq for ObjectRef {}

impl fmt::Debug for ObjectRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ObjectRef(#{})", self.0.id)
    }
}

impl fmt::Display for ObjectRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("System.Object")
    }
}

/// A dynamic value that can be stored in a generated instance.
#[derive(Debug, Clone)]
pub enum Value {
    Null,
    Bool(bool),
    Char(char),
    I32(i32),
    I64(i64),
    F64(f64),
    String(Arc<str>),
    DateTime(NaiveDateTime),
    Object(ObjectRef),
    Instance(Instance),
}

impl Value {
    /// Check if value is null.
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Runtime type of the value (`None` for null).
    #[must_use]
    pub fn runtime_type(&self) -> Option<TypeHandle> {
        match self {
            Self::Null => None,
            Self::Bool(_) => Some(TypeHandle::boolean()),
            Self::Char(_) => Some(TypeHandle::char()),
            Self::I32(_) => Some(TypeHandle::int32()),
            Self::I64(_) => Some(TypeHandle::int64()),
            Self::F64(_) => Some(TypeHandle::double()),
            Self::String(_) => Some(TypeHandle::string()),
            Self::DateTime(_) => Some(TypeHandle::date_time()),
            Self::Object(_) => Some(TypeHandle::object()),
            Self::Instance(instance) => Some(instance.type_handle().clone()),
        }
    }

    /// Full name of the runtime type, `null` for null.
    #[must_use]
    pub fn type_name(&self) -> String {
        self.runtime_type()
            .map_or_else(|| "null".to_string(), |ty| ty.full_name().to_string())
    }

    /// Default hash code of the runtime type.
    #[must_use]
    pub fn hash_code(&self) -> i32 {
        match self {
            Self::Null => 0,
            Self::Bool(v) => i32::from(*v),
            Self::Char(v) => {
                let unit = *v as u32 & 0xFFFF;
                (unit | (unit << 16)) as i32
            }
            Self::I32(v) => *v,
            Self::I64(v) => fold_i64(*v),
            Self::F64(v) => {
                if *v == 0.0 {
                    0
                } else if v.is_nan() {
                    fold_i64(f64::NAN.to_bits() as i64)
                } else {
                    fold_i64(v.to_bits() as i64)
                }
            }
            Self::String(v) => string_hash_code(v),
            Self::DateTime(v) => fold_i64(date_time_ticks(v)),
            Self::Object(v) => v.hash_code(),
            Self::Instance(v) => v.hash_code(),
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_char(&self) -> Option<char> {
        match self {
            Self::Char(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_i32(&self) -> Option<i32> {
        match self {
            Self::I32(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::I64(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::F64(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_date_time(&self) -> Option<NaiveDateTime> {
        match self {
            Self::DateTime(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&ObjectRef> {
        match self {
            Self::Object(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_instance(&self) -> Option<&Instance> {
        match self {
            Self::Instance(v) => Some(v),
            _ => None,
        }
    }
}

/// Low word XOR high word.
fn fold_i64(v: i64) -> i32 {
    (v as i32) ^ ((v >> 32) as i32)
}

/// Deterministic two-lane string hash over UTF-16 code units.
///
/// Even units feed the first lane and odd units the second; the lanes are
/// combined as `lane1 + lane2 * 1566083941`.
fn string_hash_code(s: &str) -> i32 {
    let units: Vec<u16> = s.encode_utf16().collect();
    let mut lane1: i32 = 5381;
    let mut lane2: i32 = lane1;
    for pair in units.chunks(2) {
        lane1 = (lane1 << 5).wrapping_add(lane1) ^ i32::from(pair[0]);
        if let Some(odd) = pair.get(1) {
            lane2 = (lane2 << 5).wrapping_add(lane2) ^ i32::from(*odd);
        }
    }
    lane1.wrapping_add(lane2.wrapping_mul(1_566_083_941))
}

/// 100 ns ticks since 0001-01-01T00:00:00.
///
/// Dates outside the ticks range (years past ~29000, or far before year 1)
/// wrap to 64 bits.
fn date_time_ticks(v: &NaiveDateTime) -> i64 {
    let utc = v.and_utc();
    let ticks = i128::from(utc.timestamp()) * i128::from(TICKS_PER_SECOND)
        + i128::from(utc.timestamp_subsec_nanos() / NANOS_PER_TICK)
        + i128::from(UNIX_EPOCH_TICKS);
    ticks as i64
}

/// Shortest round-trip digits; scientific (`1E+21`, `1E-05`) when the
/// decimal exponent is at least 15 or below -4.
fn write_f64(f: &mut fmt::Formatter<'_>, v: f64) -> fmt::Result {
    let scientific = format!("{:e}", v);
    let Some((mantissa, exponent)) = scientific.split_once('e') else {
        return write!(f, "{}", v);
    };
    let exponent: i32 = exponent.parse().map_err(|_| fmt::Error)?;
    if (-4..15).contains(&exponent) {
        write!(f, "{}", v)
    } else {
        let sign = if exponent < 0 { '-' } else { '+' };
        write!(f, "{}E{}{:02}", mantissa, sign, exponent.unsigned_abs())
    }
}

/// `M/D/YYYY h:mm:ss AM`, with the year written as a plain number outside
/// 0..=9999.
fn write_date_time(f: &mut fmt::Formatter<'_>, v: &NaiveDateTime) -> fmt::Result {
    write!(
        f,
        "{}/{}/{} {}",
        v.month(),
        v.day(),
        v.year(),
        v.format(TIME_OF_DAY_FORMAT)
    )
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Null, Self::Null) => true,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Char(a), Self::Char(b)) => a == b,
            (Self::I32(a), Self::I32(b)) => a == b,
            (Self::I64(a), Self::I64(b)) => a == b,
            (Self::F64(a), Self::F64(b)) => a == b || (a.is_nan() && b.is_nan()),
            (Self::String(a), Self::String(b)) => a == b,
            (Self::DateTime(a), Self::DateTime(b)) => a == b,
            (Self::Object(a), Self::Object(b)) => a == b,
            (Self::Instance(a), Self::Instance(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Value {}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_i32(self.hash_code());
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => Ok(()),
            Self::Bool(true) => f.write_str("True"),
            Self::Bool(false) => f.write_str("False"),
            Self::Char(v) => write!(f, "{}", v),
            Self::I32(v) => write!(f, "{}", v),
            Self::I64(v) => write!(f, "{}", v),
            Self::F64(v) if v.is_nan() => f.write_str("NaN"),
            Self::F64(v) if v.is_infinite() => {
                f.write_str(if *v > 0.0 { "Infinity" } else { "-Infinity" })
            }
            Self::F64(v) => write_f64(f, *v),
            Self::String(v) => f.write_str(v),
            Self::DateTime(v) => write_date_time(f, v),
            Self::Object(v) => write!(f, "{}", v),
            Self::Instance(v) => write!(f, "{}", v),
        }
    }
}

// Conversion traits
impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<char> for Value {
    fn from(v: char) -> Self {
        Self::Char(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Self::I32(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::I64(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::F64(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::String(v.into())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::String(v.into())
    }
}

impl From<NaiveDateTime> for Value {
    fn from(v: NaiveDateTime) -> Self {
        Self::DateTime(v)
    }
}

impl From<ObjectRef> for Value {
    fn from(v: ObjectRef) -> Self {
        Self::Object(v)
    }
}

impl From<Instance> for Value {
    fn from(v: Instance) -> Self {
        Self::Instance(v)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Self::Null, Into::into)
    }
}
