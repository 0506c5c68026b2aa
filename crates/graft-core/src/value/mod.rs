mod float;


pub use float::Float64;

use serde::{Deserialize, Serialize};

// Largest integer magnitude representable exactly in an f64.
const F64_SAFE_I64: i64 = 1i64 << 53;
const F64_SAFE_U64: u64 = 1u64 << 53;

///
/// Value
/// can be used in WHERE selectors and record payloads
///
/// Null → the column's value is SQL NULL.
/// Absence is modeled as key-not-present in a `Record`, never as a tag;
/// zero, empty string, and `false` are ordinary present values.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum Value {
    Bool(bool),
    Float64(Float64),
    Int(i64),
    Null,
    Text(String),
    Uint(u64),
}

impl Value {
    /// Build a float value, rejecting non-finite payloads.
    #[must_use]
    pub fn float(v: f64) -> Option<Self> {
        Float64::try_new(v).map(Self::Float64)
    }

    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    #[must_use]
    pub const fn as_text(&self) -> Option<&str> {
        if let Self::Text(s) = self {
            Some(s.as_str())
        } else {
            None
        }
    }

    // it's lossless within the 2^53 window; out-of-window integers
    // decline coercion rather than compare approximately
    #[expect(clippy::cast_precision_loss)]
    fn to_f64_lossless(&self) -> Option<f64> {
        match self {
            Self::Float64(f) => Some(f.get()),
            Self::Int(i) if (-F64_SAFE_I64..=F64_SAFE_I64).contains(i) => Some(*i as f64),
            Self::Uint(u) if *u <= F64_SAFE_U64 => Some(*u as f64),

            _ => None,
        }
    }

    /// Domain equality: same-variant equality, widened to numeric
    /// comparison across integer/float representations of one quantity.
    ///
    /// `Null` equals only `Null`; absence never reaches this comparison.
    #[must_use]
    pub fn domain_eq(&self, other: &Self) -> bool {
        if self == other {
            return true;
        }

        match (self.to_f64_lossless(), other.to_f64_lossless()) {
            (Some(a), Some(b)) => a == b,
            _ => false,
        }
    }
}

#[macro_export]
macro_rules! impl_from_for {
    ( $( $type:ty => $variant:ident ),* $(,)? ) => {
        $(
            impl From<$type> for Value {
                fn from(v: $type) -> Self {
                    Self::$variant(v.into())
                }
            }
        )*
    };
}

impl_from_for! {
    bool    => Bool,
    Float64 => Float64,
    i8      => Int,
    i16     => Int,
    i32     => Int,
    i64     => Int,
    &str    => Text,
    String  => Text,
    u8      => Uint,
    u16     => Uint,
    u32     => Uint,
    u64     => Uint,
}

impl From<()> for Value {
    fn from((): ()) -> Self {
        Self::Null
    }
}
