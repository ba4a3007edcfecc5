//
// Copyright 2017-2026 Hans W. Uhlig. All Rights Reserved.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//      http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//

use crate::consts;
use bytes::{BufMut, BytesMut};
use std::fmt;
use std::io;
use tokio_util::codec::Decoder;
use tracing::{debug, trace};

/// Position of the filter inside the Telnet command grammar.
///
/// The state alone decides how the next raw byte is interpreted, so a command
/// split across reads resumes exactly where the previous read stopped.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FilterState {
    /// Plain data, bytes pass through.
    #[default]
    Idle,
    /// Consumed an IAC, the next byte is a command.
    SeenIac,
    /// Consumed `IAC <verb>`, the next byte is the option code. Holds the verb.
    Negotiation(u8),
    /// Inside `IAC SB ...`, discarding until `IAC SE`.
    Subnegotiation,
    /// Inside a subnegotiation and just consumed an IAC.
    SubnegotiationIac,
}

impl fmt::Display for FilterState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterState::Idle => write!(f, "idle"),
            FilterState::SeenIac => write!(f, "awaiting command"),
            FilterState::Negotiation(verb) => {
                write!(f, "awaiting option after {}", verb_name(*verb))
            }
            FilterState::Subnegotiation | FilterState::SubnegotiationIac => {
                write!(f, "inside subnegotiation")
            }
        }
    }
}

/// Counters describing what a [`TelnetFilter`] has seen so far.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FilterStats {
    /// Bytes emitted as text, including unescaped `IAC IAC` pairs.
    pub data_bytes: u64,
    /// `IAC DO|DONT|WILL|WONT <option>` sequences silently declined.
    pub negotiations: u64,
    /// Completed `IAC SB ... IAC SE` blocks discarded.
    pub subnegotiations: u64,
    /// Other two byte commands (NOP, GA, AYT, ...) discarded.
    pub commands: u64,
}

/// Streaming Telnet protocol filter.
///
/// Consumes raw bytes from a Telnet connection and yields only the user visible
/// text. Negotiations are never answered, subnegotiation blocks are dropped
/// whole, and `IAC IAC` collapses to a single `0xFF`. Everything else,
/// including ANSI escape sequences, is passed through untouched.
///
/// The filter holds no I/O of its own; feed it with [`TelnetFilter::filter`],
/// [`TelnetFilter::filter_into`], as a [`Decoder`], or wrap a source in
/// [`TelnetReader`](crate::TelnetReader).
///
/// # Example
/// ```
/// use rawtel_telnetfilter::TelnetFilter;
///
/// let mut filter = TelnetFilter::new();
/// let mut output = [0u8; 32];
/// let (consumed, produced) = filter.filter(b"Hi\xFF\xFB\x01!", &mut output);
/// assert_eq!(consumed, 6);
/// assert_eq!(&output[..produced], b"Hi!");
/// ```
#[derive(Clone, Debug, Default)]
pub struct TelnetFilter {
    state: FilterState,
    stats: FilterStats,
}

impl TelnetFilter {
    /// Creates a filter in the [`FilterState::Idle`] state.
    pub fn new() -> TelnetFilter {
        TelnetFilter::default()
    }

    /// Current decoder state.
    pub fn state(&self) -> FilterState {
        self.state
    }

    /// True when no command is partially consumed.
    pub fn is_idle(&self) -> bool {
        self.state == FilterState::Idle
    }

    /// Counters accumulated since construction.
    pub fn stats(&self) -> FilterStats {
        self.stats
    }

    /// Advances the state machine by one raw byte.
    ///
    /// Returns the byte to emit, or `None` when the byte belonged to a command.
    pub fn push(&mut self, byte: u8) -> Option<u8> {
        match (self.state, byte) {
            (FilterState::Idle, consts::IAC) => {
                self.state = FilterState::SeenIac;
                None
            }
            (FilterState::Idle, _) => {
                self.stats.data_bytes += 1;
                Some(byte)
            }
            (FilterState::SeenIac, consts::IAC) => {
                self.state = FilterState::Idle;
                self.stats.data_bytes += 1;
                Some(consts::IAC)
            }
            (FilterState::SeenIac, verb) if consts::is_negotiation(verb) => {
                self.state = FilterState::Negotiation(verb);
                None
            }
            (FilterState::SeenIac, consts::SB) => {
                debug!("Entering subnegotiation");
                self.state = FilterState::Subnegotiation;
                None
            }
            (FilterState::SeenIac, _) => {
                trace!("Discarding command {:#X}", byte);
                self.state = FilterState::Idle;
                self.stats.commands += 1;
                None
            }
            (FilterState::Negotiation(verb), _) => {
                trace!("Declining {} option {}", verb_name(verb), byte);
                self.state = FilterState::Idle;
                self.stats.negotiations += 1;
                None
            }
            (FilterState::Subnegotiation, consts::IAC) => {
                self.state = FilterState::SubnegotiationIac;
                None
            }
            (FilterState::Subnegotiation, _) => None,
            (FilterState::SubnegotiationIac, consts::SE) => {
                debug!("Leaving subnegotiation");
                self.state = FilterState::Idle;
                self.stats.subnegotiations += 1;
                None
            }
            // IAC followed by anything but SE (including an escaped IAC) is
            // discarded together with that byte.
            (FilterState::SubnegotiationIac, _) => {
                self.state = FilterState::Subnegotiation;
                None
            }
        }
    }

    /// Filters `input` into `output`.
    ///
    /// Stops when the input is exhausted or the output is full and returns
    /// `(consumed, produced)`. Bytes of `input` past `consumed` have not been
    /// inspected and must be offered again on the next call.
    pub fn filter(&mut self, input: &[u8], output: &mut [u8]) -> (usize, usize) {
        let mut consumed = 0;
        let mut produced = 0;
        while consumed < input.len() && produced < output.len() {
            let byte = input[consumed];
            consumed += 1;
            if let Some(byte) = self.push(byte) {
                output[produced] = byte;
                produced += 1;
            }
        }
        (consumed, produced)
    }

    /// Filters all of `input`, appending the decoded text to `output`.
    pub fn filter_into(&mut self, input: &[u8], output: &mut BytesMut) {
        output.reserve(input.len());
        for &byte in input {
            if let Some(byte) = self.push(byte) {
                output.put_u8(byte);
            }
        }
    }

    /// Error describing a stream that ended while a command was in progress.
    pub(crate) fn truncated(&self) -> io::Error {
        io::Error::new(
            io::ErrorKind::UnexpectedEof,
            format!("stream ended inside telnet command ({})", self.state),
        )
    }
}

impl Decoder for TelnetFilter {
    type Item = BytesMut;
    type Error = io::Error;

    /// Drains `src`, returning the decoded text if any was produced.
    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<BytesMut>, Self::Error> {
        if src.is_empty() {
            return Ok(None);
        }
        let mut output = BytesMut::with_capacity(src.len());
        self.filter_into(&src[..], &mut output);
        src.clear();
        if output.is_empty() {
            Ok(None)
        } else {
            Ok(Some(output))
        }
    }

    fn decode_eof(&mut self, src: &mut BytesMut) -> Result<Option<BytesMut>, Self::Error> {
        match self.decode(src)? {
            Some(output) => Ok(Some(output)),
            None if self.is_idle() => Ok(None),
            None => Err(self.truncated()),
        }
    }
}

fn verb_name(verb: u8) -> &'static str {
    match verb {
        consts::DO => "DO",
        consts::DONT => "DONT",
        consts::WILL => "WILL",
        consts::WONT => "WONT",
        _ => "UNKNOWN",
    }
}
