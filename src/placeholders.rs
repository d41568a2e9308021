//! Positional placeholder scanning.
//!
//! Counts bare `?` markers outside quoted strings and comments so compiled statements and raw
//! queries can be checked against their bind lists before they reach a driver.

#[derive(Clone, Copy)]
enum State {
    Normal,
    SingleQuoted,
    DoubleQuoted,
    Backtick,
    LineComment,
    BlockComment(u32),
}

/// Count `?` placeholders that the driver will see.
///
/// Question marks inside `'...'`, `"..."`, `` `...` ``, `-- ...` and `/* ... */` are ignored.
/// ```rust
/// use sql_fluent::placeholders::count_placeholders;
///
/// assert_eq!(count_placeholders("SELECT '?' FROM t WHERE a = ? -- ?"), 1);
/// ```
#[must_use]
pub fn count_placeholders(sql: &str) -> usize {
    let bytes = sql.as_bytes();
    let mut state = State::Normal;
    let mut count = 0;
    let mut idx = 0;

    while idx < bytes.len() {
        let b = bytes[idx];
        match state {
            State::Normal => match b {
                b'\'' => state = State::SingleQuoted,
                b'"' => state = State::DoubleQuoted,
                b'`' => state = State::Backtick,
                b'-' if bytes.get(idx + 1) == Some(&b'-') => {
                    state = State::LineComment;
                    idx += 1;
                }
                b'#' => state = State::LineComment,
                b'/' if bytes.get(idx + 1) == Some(&b'*') => {
                    state = State::BlockComment(1);
                    idx += 1;
                }
                b'?' => count += 1,
                _ => {}
            },
            State::SingleQuoted => match b {
                b'\'' if bytes.get(idx + 1) == Some(&b'\'') => idx += 1,
                b'\'' => state = State::Normal,
                _ => {}
            },
            State::DoubleQuoted => match b {
                b'"' if bytes.get(idx + 1) == Some(&b'"') => idx += 1,
                b'"' => state = State::Normal,
                _ => {}
            },
            State::Backtick => {
                if b == b'`' {
                    state = State::Normal;
                }
            }
            State::LineComment => {
                if b == b'\n' {
                    state = State::Normal;
                }
            }
            State::BlockComment(depth) => {
                if b == b'/' && bytes.get(idx + 1) == Some(&b'*') {
                    state = State::BlockComment(depth + 1);
                    idx += 1;
                } else if b == b'*' && bytes.get(idx + 1) == Some(&b'/') {
                    state = if depth == 1 {
                        State::Normal
                    } else {
                        State::BlockComment(depth - 1)
                    };
                    idx += 1;
                }
            }
        }
        idx += 1;
    }

    count
}
