//! Conversion between plain field values and their URL string form.

/// The string form of a non-null field value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamValue {
    /// A single value (`k=v`)
    One(String),
    /// Several values (`k=v1&k=v2` in a query string)
    Many(Vec<String>),
}

impl ParamValue {
    /// Collapse into the text substituted into a path segment.
    ///
    /// Multiple values are joined with `,`.
    #[must_use]
    pub fn into_path_segment(self) -> String {
        match self {
            ParamValue::One(value) => value,
            ParamValue::Many(values) => values.join(","),
        }
    }
}

/// A type that can be bound to a plain (non-serde) path or query field.
///
/// Implementations exist for `String`, `bool`, `char`, the integer and float
/// primitives, `Option<T>` and `Vec<T>`. Implement it for your own types to use
/// them with [`crate::Field::path`] and [`crate::Field::query`].
///
/// Only `Option::None` is null. A null field is skipped when serializing and,
/// when its value is absent from a URL, makes the field required.
pub trait FieldValue: Sized {
    /// String form of the value, `None` when the value is null.
    fn to_param(&self) -> Option<ParamValue>;

    /// Parse a single (already percent-decoded) value.
    ///
    /// # Errors
    ///
    /// Returns a human readable reason when `raw` is not a valid value.
    fn from_param(raw: &str) -> Result<Self, String>;

    /// Whether the value counts as null.
    fn is_null(&self) -> bool {
        false
    }

    /// Whether a Boolean-kind field holding this value emits its flag.
    fn is_truthy(&self) -> bool {
        !self.is_null()
    }

    /// Build a value from a presence flag, for Boolean-kind fields.
    ///
    /// Types that cannot represent a flag return `None`.
    fn from_flag(_present: bool) -> Option<Self> {
        None
    }

    /// Whether this type may be declared with [`crate::ValueKind::Boolean`].
    fn accepts_flag() -> bool {
        false
    }
}

impl FieldValue for String {
    fn to_param(&self) -> Option<ParamValue> {
        Some(ParamValue::One(self.clone()))
    }

    fn from_param(raw: &str) -> Result<Self, String> {
        Ok(raw.to_string())
    }
}

impl FieldValue for bool {
    fn to_param(&self) -> Option<ParamValue> {
        Some(ParamValue::One(self.to_string()))
    }

    fn from_param(raw: &str) -> Result<Self, String> {
        raw.parse::<bool>().map_err(|e| e.to_string())
    }

    fn is_truthy(&self) -> bool {
        *self
    }

    fn from_flag(present: bool) -> Option<Self> {
        Some(present)
    }

    fn accepts_flag() -> bool {
        true
    }
}

macro_rules! impl_field_value_via_str {
    ($($ty:ty),* $(,)?) => {
        $(
            impl FieldValue for $ty {
                fn to_param(&self) -> Option<ParamValue> {
                    Some(ParamValue::One(self.to_string()))
                }

                fn from_param(raw: &str) -> Result<Self, String> {
                    raw.parse::<$ty>().map_err(|e| e.to_string())
                }
            }
        )*
    };
}

impl_field_value_via_str! {
    i8, i16, i32, i64, i128, isize,
    u8, u16, u32, u64, u128, usize,
    f32, f64, char,
}

impl<T: FieldValue> FieldValue for Option<T> {
    fn to_param(&self) -> Option<ParamValue> {
        self.as_ref().and_then(T::to_param)
    }

    fn from_param(raw: &str) -> Result<Self, String> {
        T::from_param(raw).map(Some)
    }

    fn is_null(&self) -> bool {
        self.as_ref().map_or(true, T::is_null)
    }

    fn is_truthy(&self) -> bool {
        self.as_ref().is_some_and(T::is_truthy)
    }

    fn from_flag(present: bool) -> Option<Self> {
        T::from_flag(present).map(Some)
    }

    fn accepts_flag() -> bool {
        T::accepts_flag()
    }
}

/// Lists render as repeated query keys. Parsing reads a single value only:
/// a URL carrying `k=a&k=b` yields a one-element list. Use a serde pair to
/// read every value of a repeated key.
///
/// An empty list renders nothing. On an `Option<Vec<T>>` field `Some(vec![])`
/// therefore does not round-trip: the URL carries no key, and parsing finds
/// the `None` default null and fails with a missing field. Keep such fields
/// as a plain `Vec<T>` when an empty list is a meaningful value.
impl<T: FieldValue> FieldValue for Vec<T> {
    fn to_param(&self) -> Option<ParamValue> {
        let values = self
            .iter()
            .filter_map(T::to_param)
            .flat_map(|param| match param {
                ParamValue::One(value) => vec![value],
                ParamValue::Many(values) => values,
            })
            .collect();
        Some(ParamValue::Many(values))
    }

    fn from_param(raw: &str) -> Result<Self, String> {
        T::from_param(raw).map(|value| vec![value])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_option_null_semantics() {
        assert!(None::<String>.is_null());
        assert!(!Some("x".to_string()).is_null());
        assert!(Some(None::<u32>).is_null());
        assert_eq!(None::<u32>.to_param(), None);
    }

    #[test]
    fn test_numbers_round_trip_through_strings() {
        assert_eq!(42u32.to_param(), Some(ParamValue::One("42".to_string())));
        assert_eq!(i64::from_param("-7"), Ok(-7));
        assert!(u8::from_param("300").is_err());
        assert_eq!(f64::from_param("1.5"), Ok(1.5));
    }

    #[test]
    fn test_bool_flag_support() {
        assert!(bool::accepts_flag());
        assert!(Option::<bool>::accepts_flag());
        assert!(!String::accepts_flag());
        assert_eq!(bool::from_flag(false), Some(false));
        assert_eq!(Option::<bool>::from_flag(true), Some(Some(true)));
        assert_eq!(String::from_flag(true), None);
        assert!(true.is_truthy());
        assert!(!false.is_truthy());
        assert!(!None::<bool>.is_truthy());
    }

    #[test]
    fn test_vec_renders_many_and_parses_one() {
        let values = vec!["a".to_string(), "b".to_string()];
        assert_eq!(
            values.to_param(),
            Some(ParamValue::Many(vec!["a".to_string(), "b".to_string()]))
        );
        assert_eq!(Vec::<u16>::from_param("5"), Ok(vec![5]));
    }

    #[test]
    fn test_path_segment_joins_lists() {
        let param = ParamValue::Many(vec!["1".to_string(), "2".to_string()]);
        assert_eq!(param.into_path_segment(), "1,2");
        assert_eq!(ParamValue::One("x".to_string()).into_path_segment(), "x");
    }
}
