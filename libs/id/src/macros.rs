//! Macros for defining typed ID types.

/// Macro to define a typed ID for a resource kind.
///
/// This generates a newtype wrapper around `u64` with:
/// - A `KIND` constant used in error messages
/// - `new()` and `value()` accessors
/// - `parse()` accepting a decimal string
/// - `Display` and `FromStr` implementations
/// - `Serialize` (as a number) and `Deserialize` (number or numeric string)
/// - `Ord`, `Hash`, and other standard traits
///
/// # Example
///
/// ```ignore
/// define_id!(PeriodId, "period");
///
/// let id = PeriodId::new(7);
/// let parsed: PeriodId = "7".parse()?;
/// ```
#[macro_export]
macro_rules! define_id {
    ($name:ident, $kind:literal) => {
        /// A typed ID for this resource kind.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub struct $name(u64);

        impl $name {
            /// The resource kind, used in error messages.
            pub const KIND: &'static str = $kind;

            /// Creates an ID from its numeric value.
            #[must_use]
            pub const fn new(value: u64) -> Self {
                Self(value)
            }

            /// Returns the numeric value.
            #[must_use]
            pub const fn value(&self) -> u64 {
                self.0
            }

            /// Parses an ID from a decimal string.
            pub fn parse(s: &str) -> Result<Self, $crate::IdError> {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    return Err($crate::IdError::Empty { kind: Self::KIND });
                }

                if let Ok(value) = trimmed.parse::<u64>() {
                    return Ok(Self(value));
                }

                match trimmed.parse::<i64>() {
                    Ok(value) => Err($crate::IdError::Negative {
                        kind: Self::KIND,
                        value,
                    }),
                    Err(_) => Err($crate::IdError::InvalidNumber {
                        kind: Self::KIND,
                        value: trimmed.to_string(),
                    }),
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl std::str::FromStr for $name {
            type Err = $crate::IdError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::parse(s)
            }
        }

        impl From<u64> for $name {
            fn from(value: u64) -> Self {
                Self(value)
            }
        }

        impl From<$name> for u64 {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl serde::Serialize for $name {
            fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
            where
                S: serde::Serializer,
            {
                serializer.serialize_u64(self.0)
            }
        }

        impl<'de> serde::Deserialize<'de> for $name {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: serde::Deserializer<'de>,
            {
                struct IdVisitor;

                impl<'de> serde::de::Visitor<'de> for IdVisitor {
                    type Value = $name;

                    fn expecting(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                        write!(f, "a non-negative integer {} ID", $name::KIND)
                    }

                    fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E>
                    where
                        E: serde::de::Error,
                    {
                        Ok($name(value))
                    }

                    fn visit_i64<E>(self, value: i64) -> Result<Self::Value, E>
                    where
                        E: serde::de::Error,
                    {
                        u64::try_from(value).map($name).map_err(|_| {
                            E::custom($crate::IdError::Negative {
                                kind: $name::KIND,
                                value,
                            })
                        })
                    }

                    fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
                    where
                        E: serde::de::Error,
                    {
                        $name::parse(value).map_err(E::custom)
                    }
                }

                deserializer.deserialize_any(IdVisitor)
            }
        }
    };
}
