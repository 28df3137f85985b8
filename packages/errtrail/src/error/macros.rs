//! Macros for error creation and handling

/// Create an error from a format string, optionally with a code
///
/// ```
/// let err = errtrail::err!(code = "quota", "used {} of {}", 11, 10);
/// assert_eq!(err.code(), "quota");
/// assert_eq!(err.to_string(), "used 11 of 10");
/// ```
#[macro_export]
macro_rules! err {
    (code = $code:expr, $($arg:tt)+) => {
        $crate::error::Error::new(format!($($arg)+), &[$crate::error::with_code($code)])
    };
    ($($arg:tt)+) => {
        $crate::error::Error::new(format!($($arg)+), &[])
    };
}

/// Return early with an error built by [`err!`]
#[macro_export]
macro_rules! bail {
    ($($arg:tt)+) => {
        return Err($crate::err!($($arg)+).into())
    };
}

/// Return early with an error unless a condition holds
#[macro_export]
macro_rules! ensure {
    ($cond:expr, $($arg:tt)+) => {
        if !$cond {
            $crate::bail!($($arg)+);
        }
    };
}
