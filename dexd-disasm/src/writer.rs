use std::io::{self, Write};

/// Line-oriented writer that prefixes every non-empty line with the current
/// indentation.
#[derive(Debug)]
pub struct IndentingWriter<W> {
    inner: W,
    indent: usize,
    at_line_start: bool,
}

impl<W: Write> IndentingWriter<W> {
    pub fn new(inner: W) -> Self {
        Self {
            inner,
            indent: 0,
            at_line_start: true,
        }
    }

    pub fn indent(&mut self, n: usize) {
        self.indent += n;
    }

    pub fn deindent(&mut self, n: usize) {
        self.indent = self.indent.saturating_sub(n);
    }

    pub fn get_ref(&self) -> &W {
        &self.inner
    }

    pub fn into_inner(self) -> W {
        self.inner
    }

    fn write_indent(&mut self) -> io::Result<()> {
        const SPACES: [u8; 32] = [b' '; 32];
        let mut left = self.indent;
        while left > 0 {
            let n = left.min(SPACES.len());
            self.inner.write_all(&SPACES[..n])?;
            left -= n;
        }
        Ok(())
    }
}

impl<W: Write> Write for IndentingWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut rest = buf;
        while !rest.is_empty() {
            if self.at_line_start && rest[0] != b'\n' {
                self.write_indent()?;
                self.at_line_start = false;
            }
            match rest.iter().position(|&b| b == b'\n') {
                Some(nl) => {
                    self.inner.write_all(&rest[..=nl])?;
                    self.at_line_start = true;
                    rest = &rest[nl + 1..];
                }
                None => {
                    self.inner.write_all(rest)?;
                    self.at_line_start = false;
                    rest = &[];
                }
            }
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn indents_non_empty_lines_only() {
        let mut w = IndentingWriter::new(Vec::new());
        w.write_all(b"a\n").unwrap();
        w.indent(4);
        w.write_all(b"b\n\nc").unwrap();
        w.write_all(b"d\n").unwrap();
        w.deindent(4);
        w.write_all(b"e\n").unwrap();
        assert_eq!(
            String::from_utf8(w.into_inner()).unwrap(),
            "a\n    b\n\n    cd\ne\n"
        );
    }

    #[test]
    fn deindent_saturates() {
        let mut w = IndentingWriter::new(Vec::new());
        w.deindent(8);
        w.write_all(b"x\n").unwrap();
        assert_eq!(w.get_ref(), b"x\n");
    }
}
