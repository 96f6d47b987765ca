use thiserror::Error;

pub type LibraryResult<T = ()> = std::result::Result<T, LibraryError>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LibraryError {
    #[error("LIBRARY_MATH_ERROR")]
    MathOverflow,

    #[error("LIBRARY_CASTING_ERROR")]
    CastingFailure,

    #[error("LIBRARY_DIVISION_BY_ZERO: {0}")]
    DivisionByZero(&'static str),

    #[error("LIBRARY_ZERO_PRINCIPAL")]
    ZeroPrincipal,
}
