use embedded_io::Read;

const CHUNK: usize = 256;

/// UTF-8 解码流
///
/// Pulls bytes from storage in fixed chunks and yields whole characters,
/// tracking the absolute offset of the next undecoded byte. Malformed input
/// decodes to U+FFFD one byte at a time.
pub(crate) struct CharStream<'f, R: Read> {
    reader: &'f mut R,
    buf: [u8; CHUNK],
    start: usize,
    end: usize,
    offset: u64,
    eof: bool,
}

impl<'f, R: Read> CharStream<'f, R> {
    /// `offset` is where `reader` is currently positioned.
    pub(crate) fn new(reader: &'f mut R, offset: u64) -> Self {
        Self {
            reader,
            buf: [0; CHUNK],
            start: 0,
            end: 0,
            offset,
            eof: false,
        }
    }

    pub(crate) fn offset(&self) -> u64 {
        self.offset
    }

    fn fill(&mut self, want: usize) -> Result<(), R::Error> {
        while self.end - self.start < want && !self.eof {
            if self.start > 0 {
                self.buf.copy_within(self.start..self.end, 0);
                self.end -= self.start;
                self.start = 0;
            }
            let n = self.reader.read(&mut self.buf[self.end..])?;
            if n == 0 {
                self.eof = true;
            } else {
                self.end += n;
            }
        }
        Ok(())
    }

    pub(crate) fn next_char(&mut self) -> Result<Option<char>, R::Error> {
        self.fill(4)?;
        let pending = &self.buf[self.start..self.end];
        let Some(&lead) = pending.first() else {
            return Ok(None);
        };

        let decoded = sequence_len(lead)
            .and_then(|n| pending.get(..n))
            .and_then(|bytes| core::str::from_utf8(bytes).ok())
            .and_then(|s| s.chars().next().map(|c| (c, s.len())));
        let (c, used) = decoded.unwrap_or((char::REPLACEMENT_CHARACTER, 1));

        self.start += used;
        self.offset += used as u64;
        Ok(Some(c))
    }
}

/// Reader that stops after `remaining` bytes.
pub(crate) struct Limited<'f, R: Read> {
    inner: &'f mut R,
    remaining: u64,
}

impl<'f, R: Read> Limited<'f, R> {
    pub(crate) fn new(inner: &'f mut R, limit: u64) -> Self {
        Self {
            inner,
            remaining: limit,
        }
    }
}

impl<R: Read> embedded_io::ErrorType for Limited<'_, R> {
    type Error = R::Error;
}

impl<R: Read> Read for Limited<'_, R> {
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        let want = buf.len().min(usize::try_from(self.remaining).unwrap_or(usize::MAX));
        if want == 0 {
            return Ok(0);
        }
        let n = self.inner.read(&mut buf[..want])?;
        self.remaining -= n as u64;
        Ok(n)
    }
}

fn sequence_len(lead: u8) -> Option<usize> {
    match lead {
        0x00..=0x7F => Some(1),
        0xC0..=0xDF => Some(2),
        0xE0..=0xEF => Some(3),
        0xF0..=0xF7 => Some(4),
        _ => None,
    }
}
