//! # SCPI Client
//!
//! A Rust client library for controlling SCPI test and measurement
//! instruments (oscilloscopes, signal generators, power supplies) over plain
//! TCP sockets.
//!
//! ## Overview
//!
//! This crate provides a high-level session type around a TCP connection to
//! an instrument. It handles command serialization, TMC block framed
//! transfers, and reply classification, and offers convenience methods for
//! the common bulk transfers:
//!
//! - **Screenshot**: fetch the instrument display as an image
//! - **Waveform**: fetch the current waveform record as ASCII CSV
//! - **Raw**: send any SCPI command; queries have their reply copied to a sink
//!
//! For the wire format details, see the [`scpi_protocol`] crate.
//!
//! ## Basic Usage
//!
//! ### Connecting to an Instrument
//!
//! ```ignore
//! use scpi_client::ScpiClient;
//!
//! let mut client = ScpiClient::connect("192.168.0.20:5555")?;
//! ```
//!
//! ### Fetching a Screenshot
//!
//! ```ignore
//! use scpi_protocol::ScreenshotOptions;
//!
//! let image = client.screenshot(ScreenshotOptions::default())?;
//! std::fs::write("screen.bmp", &image)?;
//! ```
//!
//! ### Raw Commands
//!
//! ```ignore
//! // Fire-and-forget: nothing is read back.
//! client.raw(":TRIGger:STATe RUN", &mut std::io::sink())?;
//!
//! // Queries echo the instrument's reply into the sink.
//! let mut out = Vec::new();
//! client.raw(":WAVeform:SOURce?", &mut out)?;
//! ```
//!
//! ## Session Model
//!
//! A session owns its stream exclusively and runs one command/response
//! exchange at a time, with blocking reads and no timeout: an instrument
//! that never answers stalls the exchange. There is no retry; every
//! transport or protocol error ends the operation and is returned as-is.
use std::{
    io::{self, Write},
    net::{TcpStream, ToSocketAddrs},
};

use scpi_protocol::{
    Command, Response, ScreenshotOptions, TmcBlock, WaveformFormat, error::ReadError,
};

/// A blocking session with one SCPI instrument.
///
/// Owns the TCP connection for its entire lifetime; commands and replies
/// never interleave.
pub struct ScpiClient {
    tcp: TcpStream,
}

impl ScpiClient {
    /// Connect to an instrument's SCPI socket.
    pub fn connect(addr: impl ToSocketAddrs) -> io::Result<ScpiClient> {
        Ok(ScpiClient {
            tcp: TcpStream::connect(addr)?,
        })
    }

    /// Send a command without reading anything back.
    ///
    /// Whether the instrument will answer is the caller's concern; use this
    /// only for commands that don't, or follow it with an explicit read.
    pub fn send(&mut self, command: &Command) -> io::Result<()> {
        command.write_to(&mut self.tcp)
    }

    /// Capture the instrument display.
    ///
    /// Issues `:DISP:DATA?` with the given parameters and reads the reply,
    /// which is always TMC block framed.
    ///
    /// # Returns
    ///
    /// The raw image bytes in the requested [`scpi_protocol::ImageFormat`],
    /// exactly as the instrument produced them.
    pub fn screenshot(&mut self, options: ScreenshotOptions) -> Result<Box<[u8]>, ReadError> {
        Command::DisplayData(options).write_to(&mut self.tcp)?;
        Ok(TmcBlock::from_reader(&mut self.tcp)?.into_payload())
    }

    /// Fetch the current waveform record as ASCII CSV.
    ///
    /// Negotiates the ASCII transfer encoding with `:WAVeform:FORMat`, then
    /// issues `:WAVeform:DATA?` and reads the block framed reply.
    pub fn waveform_csv(&mut self) -> Result<Box<[u8]>, ReadError> {
        Command::WaveformFormat(WaveformFormat::Ascii).write_to(&mut self.tcp)?;
        Command::WaveformData.write_to(&mut self.tcp)?;
        Ok(TmcBlock::from_reader(&mut self.tcp)?.into_payload())
    }

    /// Send an arbitrary command string.
    ///
    /// If the command contains a `?` it is a query: the reply is classified
    /// by its first byte as either a TMC block or a newline-terminated text
    /// line, copied to `sink`, and described by the returned [`Response`].
    /// Commands without a `?` are fire-and-forget; nothing is read and
    /// `None` is returned.
    pub fn raw(
        &mut self,
        command: impl Into<String>,
        sink: &mut impl Write,
    ) -> Result<Option<Response>, ReadError> {
        let command = Command::Raw(command.into());
        command.write_to(&mut self.tcp)?;
        if !command.expects_reply() {
            return Ok(None);
        }
        Ok(Some(Response::copy_from_reader(&mut self.tcp, sink)?))
    }
}
