// Boxing of collaborator errors into context variants
use crate::error::Error;

/// Anything that converts into the crate error can be boxed as a `source`.
pub trait IntoCloudshelfError {
    fn into_error(self) -> Error;
}

impl<E: Into<Error>> IntoCloudshelfError for E {
    fn into_error(self) -> Error {
        self.into()
    }
}

/// Map the error of a `Result` into `Error::$variant`, boxing it as `source`.
///
/// `wrap_err!(storage.quota().await, QuotaFailed {})?`
#[macro_export]
macro_rules! wrap_err {
    ($expr:expr, $variant:ident { $($field:ident : $value:expr),* $(,)? }) => {{
        $expr.map_err(|e| $crate::error::Error::$variant {
            $($field: $value,)*
            source: Box::new($crate::storage::utils::error::IntoCloudshelfError::into_error(e)),
        })
    }};
}
