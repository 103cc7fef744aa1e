//! Point file decoder and cluster file encoder.
//!
//! Point files are plain text: a sequence of integers separated by blanks
//! (spaces, tabs or line breaks), read two by two as the `x` and `y`
//! coordinates of a point.  Cluster files hold one `x y cluster` line per
//! point.

use std::error;
use std::fmt;
use std::io;
use std::num;

#[derive(Debug)]
pub enum ErrorKind {
    /// The last point only has an `x` coordinate.
    OddTokenCount,
    Io(io::Error),
    BadInteger(num::ParseIntError),
}

#[derive(Debug)]
pub struct Error {
    kind: ErrorKind,
    lineno: usize,
}

impl Error {
    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    /// 1-based line at which the error occured, zero if unknown.
    pub fn lineno(&self) -> usize {
        self.lineno
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::OddTokenCount => write!(f, "missing y coordinate of the last point"),
            ErrorKind::Io(err) => write!(f, "io error: {}", err),
            ErrorKind::BadInteger(err) => write!(f, "when parsing integer: {}", err),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "at line {}: {}", self.lineno, self.kind)
    }
}

impl error::Error for Error {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match &self.kind {
            ErrorKind::Io(err) => Some(err),
            ErrorKind::BadInteger(err) => Some(err),
            ErrorKind::OddTokenCount => None,
        }
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Error {
        Error {
            kind: ErrorKind::Io(err),
            lineno: 0,
        }
    }
}

impl From<num::ParseIntError> for Error {
    fn from(err: num::ParseIntError) -> Error {
        Error {
            kind: ErrorKind::BadInteger(err),
            lineno: 0,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

/// a token separator
fn is_separator(b: u8) -> bool {
    b == b' ' || b == b'\t' || b == b'\r' || b == b'\n'
}

/// BufRead::consume all separators found at the begining of the reader.
///
/// Returns false if the reader has been exhausted.
fn skip_separators<R: io::BufRead>(lineno: &mut usize, mut r: R) -> io::Result<bool> {
    loop {
        let buf = r.fill_buf()?;
        let n = buf.len();
        if n == 0 {
            return Ok(false);
        }

        let num_separators = buf
            .iter()
            .enumerate()
            .inspect(|&(_i, &b)| {
                if b == b'\n' {
                    *lineno += 1;
                }
            })
            .find(|&(_i, &b)| !is_separator(b))
            .map_or(n, |(i, &_b)| i);
        r.consume(num_separators);
        if num_separators < n {
            // Reached a non-separator byte.
            return Ok(true);
        }
    }
}

/// Like BufRead::read_line, except it reads til a separator byte.
fn read_token<R: io::BufRead>(token: &mut String, mut r: R) -> io::Result<()> {
    loop {
        let buf = r.fill_buf()?;
        let n = buf.len();
        if n == 0 {
            // This token is the last.
            return Ok(());
        }

        let token_size = buf
            .iter()
            .enumerate()
            .find(|&(_i, &b)| is_separator(b))
            .map_or(n, |(i, &_b)| i);
        let buf = std::str::from_utf8(&buf[..token_size])
            .map_err(|err| io::Error::new(io::ErrorKind::InvalidData, err.to_string()))?;
        token.push_str(buf);
        r.consume(token_size);
        if token_size < n {
            // Reached a separator.
            return Ok(());
        }
    }
}

fn with_lineno<E>(lineno: usize) -> impl Fn(E) -> Error
where
    E: Into<Error>,
{
    move |err: E| {
        let mut err = err.into();
        err.lineno = lineno;
        err
    }
}

/// Reads the coordinates of all points, in order.
///
/// Wrapping `r` in a [`std::io::BufReader`] is recommended.
pub fn read<R>(mut r: R) -> Result<Vec<(i32, i32)>>
where
    R: io::BufRead,
{
    let mut lineno = 1;
    let mut token = String::new();
    let mut points = Vec::new();
    let mut x = None;

    while skip_separators(&mut lineno, &mut r).map_err(with_lineno(lineno))? {
        token.clear();
        read_token(&mut token, &mut r).map_err(with_lineno(lineno))?;
        let value = token.parse::<i32>().map_err(with_lineno(lineno))?;
        match x.take() {
            None => x = Some(value),
            Some(x) => points.push((x, value)),
        }
    }

    if x.is_some() {
        return Err(Error {
            kind: ErrorKind::OddTokenCount,
            lineno,
        });
    }

    Ok(points)
}

/// Writes one `x y cluster` line per row, without a line break after the
/// last one.
///
/// Wrapping `w` in a [`std::io::BufWriter`] is recommended.
pub fn write<I, W>(mut w: W, rows: I) -> io::Result<()>
where
    I: IntoIterator<Item = (i32, i32, usize)>,
    W: io::Write,
{
    use itertools::Itertools as _;

    let lines = rows.into_iter().format_with("\n", |(x, y, cluster), f| {
        f(&format_args!("{x} {y} {cluster}"))
    });
    write!(w, "{lines}")?;
    w.flush()
}

/// Writes one `x y` line per point, in a format [`read`] understands.
pub fn write_points<I, W>(mut w: W, points: I) -> io::Result<()>
where
    I: IntoIterator<Item = (i32, i32)>,
    W: io::Write,
{
    for (x, y) in points {
        writeln!(w, "{x} {y}")?;
    }
    w.flush()
}
