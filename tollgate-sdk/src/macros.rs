/// Logging macro with explicit level selection.
///
/// Forwards to [`tracing`] macros. During unit tests it prints to `stdout`
/// instead, preserving the log level for context.
///
/// ```ignore
/// sdk_log!(debug, "POST {} -> {}", "/v1/articles", 200);
/// ```
macro_rules! sdk_log {
    ($level:ident, $($arg:tt)*) => {
        #[cfg(not(test))]
        tracing::$level!($($arg)*);
        #[cfg(test)]
        println!("[{}] {}", stringify!($level), format_args!($($arg)*));
    };
}

pub(crate) use sdk_log;
