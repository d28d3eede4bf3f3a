//! Runtime built-in module names.

/// Scheme prefix that always denotes a built-in (`node:fs`).
pub const BUILTIN_SCHEME: &str = "node:";

/// Core modules importable without a scheme prefix.
pub const BUILTIN_MODULES: &[&str] = &[
    "assert",
    "async_hooks",
    "buffer",
    "child_process",
    "cluster",
    "console",
    "constants",
    "crypto",
    "dgram",
    "diagnostics_channel",
    "dns",
    "domain",
    "events",
    "fs",
    "http",
    "http2",
    "https",
    "inspector",
    "module",
    "net",
    "os",
    "path",
    "perf_hooks",
    "process",
    "punycode",
    "querystring",
    "readline",
    "repl",
    "stream",
    "string_decoder",
    "sys",
    "timers",
    "tls",
    "trace_events",
    "tty",
    "url",
    "util",
    "v8",
    "vm",
    "wasi",
    "worker_threads",
    "zlib",
];

/// Whether a package name refers to a runtime built-in.
#[must_use]
pub fn is_builtin(package: &str) -> bool {
    package.starts_with(BUILTIN_SCHEME) || BUILTIN_MODULES.binary_search(&package).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_is_sorted_for_binary_search() {
        let mut sorted = BUILTIN_MODULES.to_vec();
        sorted.sort_unstable();
        assert_eq!(sorted, BUILTIN_MODULES);
    }

    #[test]
    fn test_builtins() {
        assert!(is_builtin("fs"));
        assert!(is_builtin("path"));
        assert!(is_builtin("node:fs"));
        assert!(is_builtin("node:test"));
        assert!(!is_builtin("lodash"));
        assert!(!is_builtin("fsevents"));
    }
}
