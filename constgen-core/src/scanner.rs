//! Logical line joining.
//!
//! C headers continue a directive onto the next physical line with a
//! trailing backslash. The extractor only ever sees whole statements, so
//! continuation markers are folded away here before any matching happens.

/// Iterator adapter yielding logical lines from physical lines.
///
/// A line whose content ends in `\` (trailing whitespace ignored) is joined
/// with the following lines until one without the marker is reached. The
/// marker itself is dropped and the pieces are separated by a single space.
pub struct LogicalLines<I> {
    inner: I,
}

impl<I> LogicalLines<I> {
    pub fn new(inner: I) -> Self {
        Self { inner }
    }
}

impl<I, S> Iterator for LogicalLines<I>
where
    I: Iterator<Item = S>,
    S: AsRef<str>,
{
    type Item = String;

    fn next(&mut self) -> Option<String> {
        let first = self.inner.next()?;
        let mut logical = String::new();
        let mut current = strip_newline(first.as_ref()).to_string();

        loop {
            match continuation_body(&current) {
                Some(body) => {
                    logical.push_str(body);
                    logical.push(' ');
                    match self.inner.next() {
                        Some(next) => current = strip_newline(next.as_ref()).to_string(),
                        // Dangling continuation at end of input
                        None => return Some(logical.trim_end().to_string()),
                    }
                }
                None => {
                    logical.push_str(&current);
                    return Some(logical);
                }
            }
        }
    }
}

/// Returns the line without its continuation marker, or `None` if the line
/// does not continue.
fn continuation_body(line: &str) -> Option<&str> {
    line.trim_end().strip_suffix('\\')
}

fn strip_newline(line: &str) -> &str {
    line.trim_end_matches(['\n', '\r'])
}

/// Convenience constructor mirroring `Iterator` adapter style.
pub fn logical_lines<I>(lines: I) -> LogicalLines<I::IntoIter>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    LogicalLines::new(lines.into_iter())
}
