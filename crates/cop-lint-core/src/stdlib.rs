//! Python standard library module tables.

/// Public top-level standard library modules (CPython 3.12).
const STDLIB_MODULES: &[&str] = &[
    "__future__", "_thread", "abc", "aifc", "argparse", "array", "ast", "asynchat", "asyncio",
    "asyncore", "atexit", "audioop", "base64", "bdb", "binascii", "bisect", "builtins", "bz2",
    "cProfile", "calendar", "cgi", "cgitb", "chunk", "cmath", "cmd", "code", "codecs", "codeop",
    "collections", "colorsys", "compileall", "concurrent", "configparser", "contextlib",
    "contextvars", "copy", "copyreg", "crypt", "csv", "ctypes", "curses", "dataclasses",
    "datetime", "dbm", "decimal", "difflib", "dis", "doctest", "email", "encodings",
    "ensurepip", "enum", "errno", "faulthandler", "fcntl", "filecmp", "fileinput", "fnmatch",
    "fractions", "ftplib", "functools", "gc", "getopt", "getpass", "gettext", "glob",
    "graphlib", "grp", "gzip", "hashlib", "heapq", "hmac", "html", "http", "idlelib", "imaplib",
    "imghdr", "importlib", "inspect", "io", "ipaddress", "itertools", "json", "keyword",
    "lib2to3", "linecache", "locale", "logging", "lzma", "mailbox", "mailcap", "marshal",
    "math", "mimetypes", "mmap", "modulefinder", "msilib", "msvcrt", "multiprocessing",
    "netrc", "nis", "nntplib", "numbers", "operator", "optparse", "os", "ossaudiodev",
    "pathlib", "pdb", "pickle", "pickletools", "pipes", "pkgutil", "platform", "plistlib",
    "poplib", "posix", "pprint", "profile", "pstats", "pty", "pwd", "py_compile", "pyclbr",
    "pydoc", "pydoc_data", "queue", "quopri", "random", "re", "readline", "reprlib",
    "resource", "rlcompleter", "runpy", "sched", "secrets", "select", "selectors", "shelve",
    "shlex", "shutil", "signal", "site", "smtplib", "sndhdr", "socket", "socketserver",
    "spwd", "sqlite3", "ssl", "stat", "statistics", "string", "stringprep", "struct",
    "subprocess", "sunau", "symtable", "sys", "sysconfig", "syslog", "tabnanny", "tarfile",
    "telnetlib", "tempfile", "termios", "test", "textwrap", "threading", "time", "timeit",
    "tkinter", "token", "tokenize", "tomllib", "trace", "traceback", "tracemalloc", "tty",
    "turtle", "turtledemo", "types", "typing", "unicodedata", "unittest", "urllib", "uu",
    "uuid", "venv", "warnings", "wave", "weakref", "webbrowser", "winreg", "winsound",
    "wsgiref", "xdrlib", "xml", "xmlrpc", "zipapp", "zipfile", "zipimport", "zlib",
    "zoneinfo",
];

/// Standard library packages (directories with `__init__.py`), including
/// nested packages.
pub(crate) const STDLIB_PACKAGES: &[&str] = &[
    "asyncio", "collections", "concurrent", "concurrent.futures", "ctypes", "ctypes.macholib",
    "curses", "dbm", "email", "email.mime", "encodings", "ensurepip", "html", "http",
    "idlelib", "importlib", "importlib.metadata", "importlib.resources", "json", "lib2to3",
    "logging", "multiprocessing", "multiprocessing.dummy", "pydoc_data", "re", "sqlite3",
    "test", "tkinter", "tomllib", "turtledemo", "unittest", "urllib", "venv", "wsgiref",
    "xml", "xml.dom", "xml.etree", "xml.parsers", "xml.sax", "xmlrpc", "zoneinfo",
];

/// Well-known plain modules inside standard library packages.
pub(crate) const STDLIB_SUBMODULES: &[&str] = &[
    "asyncio.events", "asyncio.futures", "asyncio.locks", "asyncio.queues", "asyncio.subprocess",
    "asyncio.tasks", "collections.abc", "concurrent.futures.process", "concurrent.futures.thread",
    "ctypes.util", "ctypes.wintypes", "email.message", "email.parser", "email.policy",
    "email.utils", "email.mime.text", "email.mime.multipart", "html.parser", "html.entities",
    "http.client", "http.cookies", "http.cookiejar", "http.server", "importlib.abc",
    "importlib.machinery", "importlib.simple", "importlib.util", "json.decoder",
    "json.encoder", "logging.config", "logging.handlers", "multiprocessing.pool",
    "multiprocessing.shared_memory", "os.path", "unittest.mock", "urllib.error",
    "urllib.parse", "urllib.request", "urllib.response", "urllib.robotparser",
    "xml.dom.minidom", "xml.etree.ElementTree", "xml.sax.saxutils", "xmlrpc.client",
    "xmlrpc.server",
];

/// Returns true if `module` (a top-level name, no dots) belongs to the
/// standard library.
#[must_use]
pub fn is_stdlib_module(module: &str) -> bool {
    STDLIB_MODULES.contains(&module)
}

/// Returns true if the dotted path `module` names a standard library package.
#[must_use]
pub fn is_stdlib_package(module: &str) -> bool {
    STDLIB_PACKAGES.contains(&module)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_top_level_lookup() {
        assert!(is_stdlib_module("os"));
        assert!(is_stdlib_module("typing"));
        assert!(is_stdlib_module("__future__"));
        assert!(!is_stdlib_module("requests"));
        assert!(!is_stdlib_module("os.path"));
    }

    #[test]
    fn test_package_lookup() {
        assert!(is_stdlib_package("collections"));
        assert!(is_stdlib_package("xml.etree"));
        assert!(!is_stdlib_package("typing"));
    }

    #[test]
    fn test_tables_are_consistent() {
        for package in STDLIB_PACKAGES {
            let top = package.split('.').next().unwrap_or(package);
            assert!(is_stdlib_module(top), "{package} is not rooted in the stdlib");
        }
    }
}
