//! Test support for the SCPI client crates.
//!
//! Provides an in-process mock instrument that serves a single connection on
//! a real TCP socket with scripted replies, so the end-to-end tests exercise
//! the same blocking socket path the binary uses.
use std::io::{BufRead, BufReader, Write};
use std::net::{SocketAddr, TcpListener};
use std::thread::{self, JoinHandle};

use scpi_protocol::TmcBlock;

/// A scripted reply the mock instrument sends for one received command line.
pub enum Reply {
    /// Send nothing; the command is fire-and-forget.
    None,
    /// Send the payload framed as a TMC block.
    Block(Vec<u8>),
    /// Send these bytes verbatim, e.g. a newline-terminated text reply.
    Verbatim(Vec<u8>),
}

/// One-shot mock instrument.
///
/// Accepts a single connection and consumes one command line per script
/// entry, answering with that entry's reply. Records every command line it
/// received so tests can assert on the exact wire format.
pub struct MockInstrument {
    addr: SocketAddr,
    handle: JoinHandle<Vec<String>>,
}

impl MockInstrument {
    /// Bind an ephemeral port and serve `script` from a background thread.
    pub fn serve(script: Vec<Reply>) -> MockInstrument {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let handle = thread::spawn(move || {
            let (stream, _) = listener.accept().unwrap();
            let mut writer = stream.try_clone().unwrap();
            let mut reader = BufReader::new(stream);
            let mut received = Vec::new();
            for reply in script {
                let mut line = String::new();
                if reader.read_line(&mut line).unwrap() == 0 {
                    break;
                }
                received.push(line);
                match reply {
                    Reply::None => {}
                    Reply::Block(payload) => {
                        TmcBlock::new(payload).write_to(&mut writer).unwrap();
                    }
                    Reply::Verbatim(bytes) => writer.write_all(&bytes).unwrap(),
                }
            }
            received
        });
        MockInstrument { addr, handle }
    }

    /// The address the instrument listens on.
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Wait for the instrument thread and return the command lines it saw.
    pub fn finish(self) -> Vec<String> {
        self.handle.join().unwrap()
    }
}
