/// Macro to implement `From<T>` for newtype wrappers around owned types.
#[macro_export]
macro_rules! impl_from_primitive {
    ($wrapper:ident, $primitive:ty) => {
        impl From<$primitive> for $wrapper {
            fn from(value: $primitive) -> Self {
                Self(value)
            }
        }

        impl From<$wrapper> for $primitive {
            fn from(wrapper: $wrapper) -> Self {
                wrapper.0
            }
        }
    };
}

/// Macro to implement `From<&str>` and `Display` for newtype wrappers around `String`.
#[macro_export]
macro_rules! impl_string_newtype {
    ($wrapper:ident) => {
        $crate::impl_from_primitive!($wrapper, String);

        impl From<&str> for $wrapper {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }

        impl std::fmt::Display for $wrapper {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl $wrapper {
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }
    };
}
