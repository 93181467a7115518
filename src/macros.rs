//! # Argument Macros
//!
//! ## args!
//!
//! Builds an [`Args`](crate::record::Args) list from `tag => value` pairs.
//! A value prefixed with `?` is an `Option` whose `None` means "not
//! supplied", so the field falls back to its default.
//!
//! ### Usage
//!
//! ```ignore
//! let email: Option<String> = None;
//! let args = args! {
//!     "id" => 7_i64,
//!     "name" => "Alice",
//!     "email" => ?email,
//! };
//!
//! // Expands to:
//! // Args::new()
//! //     .with("id", 7_i64)
//! //     .with("name", "Alice")
//! //     .with_optional("email", email)
//! ```

/// Builds an `Args` list from `tag => value` pairs.
#[macro_export]
macro_rules! args {
    (@push $args:ident;) => {};
    (@push $args:ident; $tag:expr => ? $value:expr $(, $($rest:tt)*)?) => {
        $args = $args.with_optional($tag, $value);
        $crate::args!(@push $args; $($($rest)*)?);
    };
    (@push $args:ident; $tag:expr => $value:expr $(, $($rest:tt)*)?) => {
        $args = $args.with($tag, $value);
        $crate::args!(@push $args; $($($rest)*)?);
    };
    ($($body:tt)*) => {{
        #[allow(unused_mut)]
        let mut args = $crate::record::Args::new();
        $crate::args!(@push args; $($body)*);
        args
    }};
}
