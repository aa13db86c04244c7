//! Request extractors that turn axum rejections into API errors.
//!
//! Each extractor is a drop-in replacement for its axum counterpart. Failures
//! surface as [`Error`] values so clients always receive the same error body.
//!
//! [`Error`]: crate::handler::Error

/// Declares a transparent newtype over the extracted value.
macro_rules! extractor_newtype {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[must_use]
        #[derive(Debug, Clone, Copy, Default, derive_more::Deref, derive_more::DerefMut, derive_more::From)]
        pub struct $name<T>(pub T);

        impl<T> $name<T> {
            #[inline]
            pub fn into_inner(self) -> T {
                self.0
            }
        }
    };
}

mod enhanced_json;
mod enhanced_path;
mod enhanced_query;
mod validated_json;

pub use self::enhanced_json::Json;
pub use self::enhanced_path::Path;
pub use self::enhanced_query::Query;
pub use self::validated_json::ValidateJson;

/// First line of a rejection message, cut to a loggable length.
pub(crate) fn first_line(message: &str) -> String {
    message.lines().next().unwrap_or_default().chars().take(160).collect()
}

/// The first identifier serde quoted in backticks, e.g. ``missing field `page` ``.
pub(crate) fn quoted_name(message: &str) -> Option<&str> {
    let (_, rest) = message.split_once('`')?;
    let (name, _) = rest.split_once('`')?;
    Some(name)
}
