//! Convenience macros for error handling and propagation

/// Equivalent to `anyhow::bail!` but for `DrawError`
///
/// # Examples
///
/// ```rust
/// use sdraw_common::bail;
/// use sdraw_common::Result;
///
/// fn check_gridsize(gridsize: usize) -> Result<()> {
///     if gridsize == 0 {
///         bail!("gridsize must be positive, got {}", gridsize);
///     }
///     Ok(())
/// }
/// ```
#[macro_export]
macro_rules! bail {
    ($msg:literal $(,)?) => {
        return Err($crate::DrawError::new($msg))
    };
    ($err:expr $(,)?) => {
        return Err($crate::DrawError::new($err))
    };
    ($fmt:expr, $($arg:tt)*) => {
        return Err($crate::DrawError::new(format!($fmt, $($arg)*)))
    };
}

/// Check a condition and return a `DrawError::Validation` if it does not hold
///
/// # Examples
///
/// ```rust
/// use sdraw_common::ensure;
/// use sdraw_common::Result;
///
/// fn check_lengths(xs: &[f64], ys: &[f64]) -> Result<()> {
///     ensure!(xs.len() == ys.len(), "length mismatch: {} vs {}", xs.len(), ys.len());
///     Ok(())
/// }
/// ```
#[macro_export]
macro_rules! ensure {
    ($cond:expr, $msg:literal $(,)?) => {
        if !$cond {
            return Err($crate::DrawError::validation($msg));
        }
    };
    ($cond:expr, $err:expr $(,)?) => {
        if !$cond {
            return Err($crate::DrawError::validation($err));
        }
    };
    ($cond:expr, $fmt:expr, $($arg:tt)*) => {
        if !$cond {
            return Err($crate::DrawError::validation(format!($fmt, $($arg)*)));
        }
    };
}

/// Add context to an error while preserving the error chain
///
/// # Examples
///
/// ```rust
/// use sdraw_common::{with_context, Result};
///
/// fn read_config() -> Result<String> {
///     std::fs::read_to_string("sdraw.toml")
///         .map_err(|e| with_context!(e, "Failed to read configuration file"))
/// }
/// ```
#[macro_export]
macro_rules! with_context {
    ($err:expr, $msg:literal $(,)?) => {
        $crate::DrawError::with_source($msg, $err)
    };
    ($err:expr, $fmt:expr, $($arg:tt)*) => {
        $crate::DrawError::with_source(format!($fmt, $($arg)*), $err)
    };
}

/// Log a render error at the given level and return it
///
/// # Examples
///
/// ```rust
/// use sdraw_common::{log_and_bail, Result};
///
/// fn render(points: &[(f64, f64)]) -> Result<()> {
///     if points.is_empty() {
///         log_and_bail!(warn, "No data to render");
///     }
///     Ok(())
/// }
/// ```
#[macro_export]
macro_rules! log_and_bail {
    ($level:ident, $msg:literal $(,)?) => {{
        let error = $crate::DrawError::render($msg);
        tracing::$level!("{}", error);
        return Err(error);
    }};
    ($level:ident, $fmt:expr, $($arg:tt)*) => {{
        let message = format!($fmt, $($arg)*);
        let error = $crate::DrawError::render(message);
        tracing::$level!("{}", error);
        return Err(error);
    }};
}

#[cfg(test)]
mod tests {
    use crate::{DrawError, Result};

    #[test]
    fn test_bail_macro() {
        fn test_function() -> Result<()> {
            bail!("Test error message");
        }

        let error = test_function().unwrap_err();
        assert!(error.to_string().contains("Test error message"));
    }

    #[test]
    fn test_ensure_macro() {
        fn test_function(value: usize) -> Result<()> {
            ensure!(value > 0, "gridsize must be positive: {}", value);
            Ok(())
        }

        assert!(test_function(5).is_ok());

        let error = test_function(0).unwrap_err();
        assert!(matches!(error, DrawError::Validation { .. }));
        assert!(error.to_string().contains("gridsize must be positive"));
    }

    #[test]
    fn test_with_context_macro() {
        use std::io;

        let io_error = io::Error::new(io::ErrorKind::NotFound, "File not found");
        let contextual_error = with_context!(io_error, "Failed to read {}", "sdraw.toml");

        assert!(contextual_error.to_string().contains("Failed to read sdraw.toml"));
    }

    #[test]
    fn test_log_and_bail_macro() {
        fn test_function(empty: bool) -> Result<()> {
            if empty {
                log_and_bail!(warn, "No data to render after filtering {} points", 3);
            }
            Ok(())
        }

        assert!(test_function(false).is_ok());
        let error = test_function(true).unwrap_err();
        assert!(matches!(error, DrawError::Render { .. }));
    }
}
