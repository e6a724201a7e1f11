//! # SCPI Protocol Library
//!
//! This crate implements the wire layer used by SCPI-style test and
//! measurement instruments over a plain byte stream: newline-terminated text
//! commands going out, and replies coming back either as free-form text lines
//! or as definite-length binary blocks ("TMC blocks").
//!
//! ## Overview
//!
//! Instruments frame large replies (screenshots, waveform records) as TMC
//! blocks: a `#` marker, a single digit giving the width of the length field,
//! that many decimal digits giving the payload length, then exactly that many
//! raw payload bytes. Nothing terminates the payload, so the reader must
//! consume exactly the declared number of bytes and not one more. The stream
//! carries no other length signaling, which makes the framing layer the part
//! that has to be right:
//!
//! - Serialize commands in the exact line format instrument firmware expects
//! - Parse TMC block headers and read payloads to the exact byte
//! - Classify a reply as block-framed or line-framed from its first byte
//!
//! ## Basic Usage
//!
//! ### Parsing a block response
//!
//! ```
//! use scpi_protocol::TmcBlock;
//! use std::io::Cursor;
//!
//! let mut reader = Cursor::new(b"#15hello");
//! let block = TmcBlock::from_reader(&mut reader).expect("Block should parse");
//! assert_eq!(block.payload(), b"hello");
//! ```
//!
//! ### Writing commands
//!
//! ```
//! use scpi_protocol::{Command, ScreenshotOptions};
//!
//! let cmd = Command::DisplayData(ScreenshotOptions::default());
//! let mut buffer = Vec::new();
//! cmd.write_to(&mut buffer).expect("Writing to vector shouldn't fail");
//! assert_eq!(buffer, b":DISP:DATA? ON,OFF,BMP24\n");
//! ```
//!
//! ### Classifying a reply
//!
//! ```
//! use scpi_protocol::Response;
//! use std::io::Cursor;
//!
//! let mut reader = Cursor::new(b"RIGOL TECHNOLOGIES\n");
//! let mut sink = Vec::new();
//! let response = Response::copy_from_reader(&mut reader, &mut sink).unwrap();
//! assert_eq!(response, Response::Line { len: 19 });
//! assert_eq!(sink, b"RIGOL TECHNOLOGIES\n");
//! ```
//!
//! ## Wire Format
//!
//! - **Command**: `<KEYWORD> <PARAMS>\n` — the space is always present, even
//!   with empty parameters
//! - **Block reply**: `#<d><d digits of length><length bytes of payload>`
//! - **Line reply**: arbitrary bytes terminated by `\n`
//!
//! ## Error Handling
//!
//! Reads use the [`error::ReadError`] type; transport failures and premature
//! stream ends carry the underlying [`std::io::Error`], malformed block
//! headers get their own variants. Nothing is retried: a half-read block
//! cannot be resumed, so every error propagates to the caller immediately.
//!
//! ## Blocking Model
//!
//! All readers and writers are plain [`std::io::Read`] / [`std::io::Write`]
//! implementations; reads block until satisfied. The optional `tokio` feature
//! adds a `tokio_util::codec` implementation (`codec::TmcBlockCodec`) for
//! async pipelines.

pub mod protocol;
pub use protocol::*;
pub mod codec;
pub mod error;
