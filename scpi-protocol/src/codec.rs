//! Read and write implementations for commands and TMC blocks
use std::io::{self, Read, Write};

use crate::{
    error::ReadError,
    protocol::{Command, Response, TmcBlock},
};

/// Marker byte that opens a TMC block header.
pub const BLOCK_MARKER: u8 = b'#';

/// Widest length field that can be described by a single digit-count digit.
const MAX_LENGTH_DIGITS: usize = 9;

/// Read exactly `n` bytes from `reader` into a fresh buffer.
///
/// The transport may deliver fewer bytes per read than requested;
/// [`Read::read_exact`] keeps reading until the buffer is full. A stream that
/// ends early surfaces as [`ReadError::Io`] with
/// [`io::ErrorKind::UnexpectedEof`] and never yields a short buffer.
/// `n = 0` returns an empty buffer without touching the stream.
pub fn read_exact_buf(reader: &mut impl Read, n: usize) -> Result<Box<[u8]>, ReadError> {
    let mut buf = vec![0u8; n].into_boxed_slice();
    reader.read_exact(&mut buf)?;
    Ok(buf)
}

fn read_byte(reader: &mut impl Read) -> Result<u8, ReadError> {
    let mut buf = [0u8; 1];
    reader.read_exact(&mut buf)?;
    Ok(buf[0])
}

impl TmcBlock {
    /// Read one complete block: marker, digit-count, length field, payload.
    ///
    /// Exactly the bytes belonging to the block are consumed; a truncated
    /// stream fails rather than returning a short payload.
    pub fn from_reader(reader: &mut impl Read) -> Result<TmcBlock, ReadError> {
        let marker = read_byte(reader)?;
        if marker != BLOCK_MARKER {
            return Err(ReadError::MissingBlockMarker { got: marker });
        }
        let len = Self::length_from_reader(reader)?;
        Ok(TmcBlock::new(read_exact_buf(reader, len)?))
    }

    /// Read the digit-count and length field of a block whose `#` marker the
    /// caller has already consumed, returning the payload length.
    ///
    /// The two fields are read as separate exact-width reads so that not a
    /// single byte of the payload (or of a following response) is touched
    /// while sizing the block.
    pub fn length_from_reader(reader: &mut impl Read) -> Result<usize, ReadError> {
        let digit_count = read_byte(reader)?;
        if !digit_count.is_ascii_digit() {
            return Err(ReadError::InvalidDigitCount { got: digit_count });
        }
        let digits = usize::from(digit_count - b'0');
        // `#0` is a legal empty block: no length digits follow.
        if digits == 0 {
            return Ok(0);
        }
        let field = read_exact_buf(reader, digits)?;
        parse_length_field(&field)
    }

    /// Write the block with its header: marker, digit-count, length field,
    /// payload.
    ///
    /// Fails with [`io::ErrorKind::InvalidInput`] if the payload length does
    /// not fit in nine decimal digits, the widest field a single digit-count
    /// digit can describe.
    pub fn write_to(&self, writer: &mut impl Write) -> io::Result<()> {
        let length = self.len().to_string();
        if length.len() > MAX_LENGTH_DIGITS {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                "block payload length exceeds nine decimal digits",
            ));
        }
        write!(writer, "#{}{}", length.len(), length)?;
        writer.write_all(self.payload())
    }
}

fn parse_length_field(field: &[u8]) -> Result<usize, ReadError> {
    str::from_utf8(field)
        .ok()
        .and_then(|s| s.parse::<usize>().ok())
        .ok_or_else(|| ReadError::InvalidLengthField(String::from_utf8_lossy(field).into_owned()))
}

impl Command {
    /// Serialize the command as the wire line `<KEYWORD> <PARAMS>\n`.
    ///
    /// The space separator is always present, even when the parameter string
    /// is empty. Instrument firmware is known to accept the trailing space,
    /// and the exact shape is kept for compatibility.
    pub fn write_to(&self, writer: &mut impl Write) -> io::Result<()> {
        match self {
            Command::DisplayData(options) => writeln!(writer, ":DISP:DATA? {}", options),
            Command::WaveformFormat(format) => writeln!(writer, ":WAVeform:FORMat {}", format),
            Command::WaveformData => writeln!(writer, ":WAVeform:DATA? "),
            Command::Raw(line) => writeln!(writer, "{} ", line),
        }
    }
}

impl Response {
    /// Classify one instrument reply by its first byte and copy it to `sink`.
    ///
    /// A `#` first byte announces a TMC block: its length sub-header is
    /// parsed and the declared payload is copied to the sink in a single
    /// write. Any other first byte starts a text line that is echoed byte by
    /// byte until a `\n` has been emitted; the line has no length limit.
    /// Exactly one reply is consumed, never a byte beyond the block payload
    /// or the terminating newline.
    pub fn copy_from_reader(
        reader: &mut impl Read,
        sink: &mut impl Write,
    ) -> Result<Response, ReadError> {
        let first = read_byte(reader)?;
        if first == BLOCK_MARKER {
            let len = TmcBlock::length_from_reader(reader)?;
            let payload = read_exact_buf(reader, len)?;
            sink.write_all(&payload)?;
            return Ok(Response::Block { len });
        }

        let mut len = 0;
        let mut byte = first;
        loop {
            sink.write_all(&[byte])?;
            len += 1;
            if byte == b'\n' {
                return Ok(Response::Line { len });
            }
            byte = read_byte(reader)?;
        }
    }
}

#[cfg(feature = "tokio")]
mod framed {
    use bytes::{Buf, BufMut, Bytes, BytesMut};
    use std::io;
    use tokio_util::codec::{Decoder, Encoder};

    use super::{BLOCK_MARKER, MAX_LENGTH_DIGITS, parse_length_field};
    use crate::{error::ReadError, protocol::TmcBlock};

    /// Frames TMC blocks for use with [`tokio_util::codec::FramedRead`] and
    /// [`tokio_util::codec::FramedWrite`].
    ///
    /// The decoder waits until a complete `#<d><length><payload>` block is
    /// buffered and yields the payload.
    #[derive(Copy, Clone, Debug, Default)]
    pub struct TmcBlockCodec;

    impl Decoder for TmcBlockCodec {
        type Item = Bytes;
        type Error = ReadError;

        fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Bytes>, ReadError> {
            if src.len() < 2 {
                return Ok(None);
            }
            if src[0] != BLOCK_MARKER {
                return Err(ReadError::MissingBlockMarker { got: src[0] });
            }
            let digit_count = src[1];
            if !digit_count.is_ascii_digit() {
                return Err(ReadError::InvalidDigitCount { got: digit_count });
            }
            let digits = usize::from(digit_count - b'0');
            if src.len() < 2 + digits {
                return Ok(None);
            }
            let len = if digits == 0 {
                0
            } else {
                parse_length_field(&src[2..2 + digits])?
            };
            if src.len() < 2 + digits + len {
                src.reserve(2 + digits + len - src.len());
                return Ok(None);
            }
            src.advance(2 + digits);
            Ok(Some(src.split_to(len).freeze()))
        }
    }

    impl Encoder<TmcBlock> for TmcBlockCodec {
        type Error = ReadError;

        fn encode(&mut self, item: TmcBlock, dst: &mut BytesMut) -> Result<(), ReadError> {
            let length = item.len().to_string();
            if length.len() > MAX_LENGTH_DIGITS {
                return Err(ReadError::Io(io::Error::new(
                    io::ErrorKind::InvalidInput,
                    "block payload length exceeds nine decimal digits",
                )));
            }
            dst.reserve(2 + length.len() + item.len());
            dst.put_u8(BLOCK_MARKER);
            dst.put_u8(b'0' + length.len() as u8);
            dst.put_slice(length.as_bytes());
            dst.put_slice(item.payload());
            Ok(())
        }
    }
}

#[cfg(feature = "tokio")]
pub use framed::TmcBlockCodec;


#[cfg(all(test, feature = "tokio"))]
mod framed_test {
    use super::TmcBlockCodec;
    use crate::error::ReadError;
    use crate::protocol::TmcBlock;
    use bytes::BytesMut;
    use tokio_util::codec::{Decoder, Encoder};

    #[test]
    fn decode_waits_for_complete_block() {
        let mut codec = TmcBlockCodec;
        let mut buf = BytesMut::new();

        buf.extend_from_slice(b"#15he");
        assert!(codec.decode(&mut buf).unwrap().is_none());

        buf.extend_from_slice(b"llo");
        let payload = codec.decode(&mut buf).unwrap().unwrap();
        assert_eq!(&payload[..], b"hello");
        assert!(buf.is_empty());
    }

    #[test]
    fn decode_rejects_missing_marker() {
        let mut codec = TmcBlockCodec;
        let mut buf = BytesMut::from(&b"X0"[..]);
        match codec.decode(&mut buf) {
            Err(ReadError::MissingBlockMarker { got }) => assert_eq!(got, b'X'),
            other => panic!("expected MissingBlockMarker, got {:?}", other),
        }
    }

    #[test]
    fn encode_decode_round_trip() {
        let mut codec = TmcBlockCodec;
        let mut buf = BytesMut::new();
        codec
            .encode(TmcBlock::new(b"payload".to_vec()), &mut buf)
            .unwrap();
        assert_eq!(&buf[..], b"#17payload");
        let payload = codec.decode(&mut buf).unwrap().unwrap();
        assert_eq!(&payload[..], b"payload");
    }
}
