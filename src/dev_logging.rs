// TRACE-TO-BASE LOGGING MACROS
#[macro_export]
#[cfg(feature = "show_trace")]
macro_rules! trace_log {
    ($($arg:tt)*) => {
        eprintln!($($arg)*);
    };
}

#[macro_export]
#[cfg(not(feature = "show_trace"))]
macro_rules! trace_log {
    ($($arg:tt)*) => {
        // Nothing
    };
}

// REDUCE LOGGING MACROS
#[macro_export]
#[cfg(feature = "show_reduce")]
macro_rules! reduce_log {
    ($($arg:tt)*) => {
        eprintln!($($arg)*);
    };
}

#[macro_export]
#[cfg(not(feature = "show_reduce"))]
macro_rules! reduce_log {
    ($($arg:tt)*) => {
        // Nothing
    };
}

// VAULT LOGGING MACROS
#[macro_export]
#[cfg(feature = "show_vault")]
macro_rules! vault_log {
    ($($arg:tt)*) => {
        eprintln!($($arg)*);
    };
}

#[macro_export]
#[cfg(not(feature = "show_vault"))]
macro_rules! vault_log {
    ($($arg:tt)*) => {
        // Nothing
    };
}
