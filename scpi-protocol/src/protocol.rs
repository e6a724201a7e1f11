use std::{error::Error, fmt::Display, str::FromStr};

/// Textual rendering of a boolean instrument parameter.
fn on_off(value: bool) -> &'static str {
    if value { "ON" } else { "OFF" }
}

/// Image encodings an instrument can render its display in.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum ImageFormat {
    Bmp24,
    Bmp8,
    Png,
    Jpeg,
    Tiff,
}

impl ImageFormat {
    /// The wire spelling, always uppercase.
    pub fn as_str(&self) -> &'static str {
        match self {
            ImageFormat::Bmp24 => "BMP24",
            ImageFormat::Bmp8 => "BMP8",
            ImageFormat::Png => "PNG",
            ImageFormat::Jpeg => "JPEG",
            ImageFormat::Tiff => "TIFF",
        }
    }
}

impl Display for ImageFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when an image format string is not one of the supported encodings.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct InvalidImageFormat(String);

impl Display for InvalidImageFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "invalid format {:?}, valid options are: {{BMP24|BMP8|PNG|JPEG|TIFF}}",
            self.0
        )
    }
}

impl Error for InvalidImageFormat {}

impl FromStr for ImageFormat {
    type Err = InvalidImageFormat;

    /// Case-insensitive; normalized to the uppercase wire spelling.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "BMP24" => Ok(ImageFormat::Bmp24),
            "BMP8" => Ok(ImageFormat::Bmp8),
            "PNG" => Ok(ImageFormat::Png),
            "JPEG" => Ok(ImageFormat::Jpeg),
            "TIFF" => Ok(ImageFormat::Tiff),
            _ => Err(InvalidImageFormat(s.to_string())),
        }
    }
}

/// Error returned when a boolean instrument flag is neither true nor false.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct InvalidFlag(String);

impl Display for InvalidFlag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "invalid flag {:?}, valid options are: {{true|false|on|off|1|0}}",
            self.0
        )
    }
}

impl Error for InvalidFlag {}

/// Parse a boolean instrument flag from user input.
///
/// Accepts `true`/`false`, `on`/`off` and `1`/`0`, case-insensitive. The
/// wire rendering is always `ON`/`OFF`.
pub fn parse_flag(s: &str) -> Result<bool, InvalidFlag> {
    match s.to_ascii_lowercase().as_str() {
        "true" | "on" | "1" => Ok(true),
        "false" | "off" | "0" => Ok(false),
        _ => Err(InvalidFlag(s.to_string())),
    }
}

/// Parameters of a `:DISP:DATA?` screenshot query.
///
/// Rendered on the wire as `<color>,<inverted>,<format>` with the booleans
/// spelled `ON`/`OFF`, e.g. `ON,OFF,PNG`.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct ScreenshotOptions {
    pub color: bool,
    pub inverted: bool,
    pub format: ImageFormat,
}

impl Default for ScreenshotOptions {
    /// `ON,OFF,BMP24`, the parameters instruments are most widely happy with.
    fn default() -> Self {
        ScreenshotOptions {
            color: true,
            inverted: false,
            format: ImageFormat::Bmp24,
        }
    }
}

impl Display for ScreenshotOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{},{},{}",
            on_off(self.color),
            on_off(self.inverted),
            self.format
        )
    }
}

#[test]
fn screenshot_options_wire_format() {
    let options = ScreenshotOptions {
        color: true,
        inverted: false,
        format: ImageFormat::Png,
    };
    assert_eq!(options.to_string(), "ON,OFF,PNG");
    assert_eq!(ScreenshotOptions::default().to_string(), "ON,OFF,BMP24");
}

/// Waveform transfer encodings negotiated with `:WAVeform:FORMat`.
///
/// Only the ASCII transfer is used; binary waveform transfers are out of
/// scope for this client.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum WaveformFormat {
    Ascii,
}

impl Display for WaveformFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // SCPI long-form spelling with the short form in uppercase.
        match self {
            WaveformFormat::Ascii => f.write_str("ASCii"),
        }
    }
}

/// A command sent from the client to the instrument.
///
/// Every command is a single text line; commands whose keyword carries a `?`
/// are queries and make the instrument produce exactly one reply. The client
/// sends one command and, where a reply is expected, reads it in full before
/// sending the next.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Command {
    /// Query the instrument display as an image, framed as a TMC block.
    DisplayData(ScreenshotOptions),
    /// Select the transfer encoding for subsequent waveform queries.
    /// The instrument does not reply to this.
    WaveformFormat(WaveformFormat),
    /// Query the current waveform record, framed as a TMC block.
    WaveformData,
    /// An arbitrary command string, passed through verbatim.
    Raw(String),
}

impl Command {
    /// Whether the instrument will answer this command.
    ///
    /// SCPI queries carry a `?`; anything else is fire-and-forget and must
    /// not be followed by a read.
    pub fn expects_reply(&self) -> bool {
        match self {
            Command::DisplayData(_) | Command::WaveformData => true,
            Command::WaveformFormat(_) => false,
            Command::Raw(line) => line.contains('?'),
        }
    }
}

/// A definite-length binary block (TMC block).
///
/// On the wire: a `#` marker, one ASCII digit giving the width of the length
/// field, that many ASCII decimal digits giving the payload length, then
/// exactly that many raw payload bytes with no trailing delimiter.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TmcBlock {
    payload: Box<[u8]>,
}

impl TmcBlock {
    /// Creates a block around a payload.
    pub fn new(payload: impl Into<Box<[u8]>>) -> TmcBlock {
        TmcBlock {
            payload: payload.into(),
        }
    }

    /// The raw payload bytes.
    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    /// The payload length in bytes.
    pub fn len(&self) -> usize {
        self.payload.len()
    }

    /// Whether this is the empty block.
    pub fn is_empty(&self) -> bool {
        self.payload.is_empty()
    }

    /// Consumes the block, returning its payload.
    pub fn into_payload(self) -> Box<[u8]> {
        self.payload
    }
}

/// Shape of a classified instrument reply.
///
/// Each variant records how many payload bytes were copied to the sink, so a
/// caller can check the postcondition of the branch that was taken.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Response {
    /// A TMC block; the declared payload was copied to the sink verbatim.
    Block { len: usize },
    /// Newline-terminated text; echoed through and including the first `\n`.
    Line { len: usize },
}
