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

//! # Rawtel Telnet Filter
//!
//! A streaming decoder that removes Telnet protocol traffic from a byte stream
//! and keeps only what the user should see.
//!
//! The filter never negotiates. Every `DO`, `DONT`, `WILL` and `WONT` is consumed
//! together with its option byte and left unanswered, subnegotiation blocks
//! (`IAC SB ... IAC SE`) are dropped whole, other two byte commands vanish, and
//! `IAC IAC` becomes a literal `0xFF`. All remaining bytes, ANSI escape
//! sequences included, pass through unchanged.
//!
//! ## Core Components
//!
//! ### [`TelnetFilter`]
//!
//! The byte-level state machine. It has no I/O of its own and can be driven
//! from slices ([`TelnetFilter::filter`], [`TelnetFilter::filter_into`]) or used
//! as a `tokio_util::codec::Decoder` with `FramedRead`.
//!
//! ### [`TelnetReader`]
//!
//! An [`AsyncRead`](tokio::io::AsyncRead) adapter over any buffered source.
//! Reads return as soon as the buffered raw bytes have been filtered and at
//! least one byte of text was produced, which keeps interactive output
//! responsive.
//!
//! ## Usage Example
//!
//! ```rust
//! use rawtel_telnetfilter::TelnetFilter;
//! use bytes::BytesMut;
//!
//! let mut filter = TelnetFilter::new();
//! let mut output = BytesMut::new();
//! filter.filter_into(b"Hello\xFF\xFB\x01 World\xFF\xFF!", &mut output);
//! assert_eq!(&output[..], b"Hello World\xFF!");
//! ```
//!
//! ## Known Limitation
//!
//! Because requests are never refused explicitly, servers that insist on an
//! answer may repeat their requests. Those repeats are filtered like any other.

#![warn(
    clippy::cargo,
    missing_docs,
    clippy::pedantic,
    future_incompatible,
    rust_2018_idioms
)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]

pub mod consts;
mod filter;
mod reader;

pub use self::filter::{FilterState, FilterStats, TelnetFilter};
pub use self::reader::TelnetReader;
