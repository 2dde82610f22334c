// ---------------------------------------------------------------------------
// Macro: defines a closed identifier enum backed by fixed snake_case strings.
//
// Generates:
// - `ALL` (declaration order) and `as_str()`
// - `Display` (the string form) and `FromStr` (`UnknownIdError` on miss)
// - Serialize / Deserialize as the string form
// ---------------------------------------------------------------------------
macro_rules! define_id {
    (
        $(#[$meta:meta])*
        $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident => $str:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum $name {
            $( $(#[$vmeta])* $variant, )+
        }

        impl $name {
            /// Every variant, in declaration order.
            pub const ALL: &'static [Self] = &[ $( Self::$variant, )+ ];

            /// Returns the string representation.
            pub fn as_str(&self) -> &'static str {
                match self {
                    $( Self::$variant => $str, )+
                }
            }
        }

        impl ::std::fmt::Display for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl ::std::str::FromStr for $name {
            type Err = $crate::ids::UnknownIdError;

            fn from_str(s: &str) -> ::std::result::Result<Self, Self::Err> {
                match s {
                    $( $str => Ok(Self::$variant), )+
                    other => Err($crate::ids::UnknownIdError {
                        kind: stringify!($name),
                        value: other.to_owned(),
                    }),
                }
            }
        }

        impl ::serde::Serialize for $name {
            fn serialize<S: ::serde::Serializer>(&self, serializer: S) -> ::std::result::Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_str())
            }
        }

        impl<'de> ::serde::Deserialize<'de> for $name {
            fn deserialize<D: ::serde::Deserializer<'de>>(deserializer: D) -> ::std::result::Result<Self, D::Error> {
                let s = <::std::string::String as ::serde::Deserialize>::deserialize(deserializer)?;
                s.parse().map_err(::serde::de::Error::custom)
            }
        }
    };
}

// ---------------------------------------------------------------------------
// Macro: a per-kind field id enum whose variants are a subset of `FieldId`.
// ---------------------------------------------------------------------------
macro_rules! define_field_id_subset {
    (
        $(#[$meta:meta])*
        $name:ident {
            $( $variant:ident => $str:literal ),+ $(,)?
        }
    ) => {
        define_id! {
            $(#[$meta])*
            $name {
                $( $variant => $str ),+
            }
        }

        impl From<$name> for $crate::ids::FieldId {
            fn from(id: $name) -> Self {
                match id {
                    $( $name::$variant => $crate::ids::FieldId::$variant, )+
                }
            }
        }
    };
}
