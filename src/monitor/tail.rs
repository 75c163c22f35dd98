//! Last-N-lines extraction for job logs.

/// Return the last `lines` newline-terminated lines of `log`.
///
/// Walks backwards from the end, so the cost is proportional to the size of
/// the tail rather than the whole log. A log with `lines` or fewer lines is
/// returned whole, with no spurious leading blank line.
///
/// # Examples
///
/// ```
/// use actions_wait::monitor::tail;
///
/// assert_eq!(tail(b"a\nb\nc\nd\ne\n", 3), b"c\nd\ne\n");
/// assert_eq!(tail(b"line1\nline2\n", 10), b"line1\nline2\n");
/// ```
pub fn tail(log: &[u8], lines: usize) -> &[u8] {
    if log.is_empty() {
        return log;
    }

    let mut boundary = log.len();
    for _ in 0..lines {
        // Skip the byte just before the boundary: it is the newline that
        // produced the boundary (or the log's final newline).
        let search_end = boundary - 1;
        match log[..search_end].iter().rposition(|&b| b == b'\n') {
            Some(idx) => boundary = idx + 1,
            None => return log,
        }
    }
    &log[boundary..]
}
