use std::fmt::Display;
use std::os::unix::ffi::OsStrExt;
use std::path::Path;

/// Helper to format a path.
#[derive(Debug)]
pub struct PathQuotedDisplay<'a> {
    path: &'a Path,
}

impl<'a> Display for PathQuotedDisplay<'a> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(s) = self.path.to_str() {
            if s.chars()
                .all(|c| matches!(c, '/' | '.') || c.is_alphanumeric())
            {
                return f.write_str(s);
            }
        }
        if let Ok(r) = shlex::bytes::try_quote(self.path.as_os_str().as_bytes()) {
            if let Ok(s) = std::str::from_utf8(&r) {
                return f.write_str(s);
            }
        }
        // Should not happen really
        return Err(std::fmt::Error);
    }
}

impl<'a> PathQuotedDisplay<'a> {
    /// Given a path, quote it in a way that it would be parsed by a default
    /// POSIX shell. If the path is UTF-8 with no spaces or shell meta-characters,
    /// it will be exactly the same as the input.
    pub fn new<P: AsRef<Path> + ?Sized>(path: &'a P) -> PathQuotedDisplay<'a> {
        PathQuotedDisplay {
            path: path.as_ref(),
        }
    }
}

/// Joins arguments into a single string safe to hand to a remote POSIX shell,
/// e.g. as the trailing command of an `ssh` invocation. Naive string
/// concatenation of arguments is not safe here: a workbench path or hostname
/// containing a quote or space would otherwise be split or reinterpreted by
/// the remote shell.
pub fn shell_join<S: AsRef<str>>(args: impl IntoIterator<Item = S>) -> String {
    let owned: Vec<String> = args.into_iter().map(|s| s.as_ref().to_owned()).collect();
    shlex::try_join(owned.iter().map(String::as_str)).expect("arguments must not contain NUL bytes")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unquoted() {
        for v in ["", "foo", "/foo/bar", "/foo/bar/../baz", "/foo9/bar10"] {
            assert_eq!(v, format!("{}", PathQuotedDisplay::new(&v)));
        }
    }

    #[test]
    fn test_quoted() {
        let cases = [
            (" ", "' '"),
            ("/some/path with spaces/", "'/some/path with spaces/'"),
            ("/foo/!/bar&", "'/foo/!/bar&'"),
            (r#"/path/"withquotes'"#, r#""/path/\"withquotes'""#),
        ];
        for (v, quoted) in cases {
            assert_eq!(quoted, format!("{}", PathQuotedDisplay::new(&v)));
        }
    }

    #[test]
    fn test_shell_join_roundtrips_plain_args() {
        let joined = shell_join(["ssh", "-F", "/etc/ssh/config", "-l", "deploy", "host"]);
        assert_eq!(joined, "ssh -F /etc/ssh/config -l deploy host");
    }

    #[test]
    fn test_shell_join_quotes_args_with_spaces() {
        let joined = shell_join(["REMOTE_WORKBENCH=/srv/with space", "reconcile"]);
        assert_eq!(joined, "'REMOTE_WORKBENCH=/srv/with space' reconcile");
    }
}
