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

//! Decoding properties of the telnet filter state machine

use bytes::BytesMut;
use proptest::prelude::*;
use rawtel_telnetfilter::consts::{DO, DONT, IAC, SB, SE, WILL, WONT};
use rawtel_telnetfilter::{FilterState, TelnetFilter};

// ============================================================================
// Helper Functions
// ============================================================================

fn decode_all(input: &[u8]) -> Vec<u8> {
    let mut filter = TelnetFilter::new();
    let mut output = BytesMut::new();
    filter.filter_into(input, &mut output);
    output.to_vec()
}

/// Feeds `input` in the given chunk sizes through a fixed size output buffer.
fn decode_chunked(input: &[u8], chunks: &[usize], output_size: usize) -> Vec<u8> {
    let mut filter = TelnetFilter::new();
    let mut decoded = Vec::new();
    let mut scratch = vec![0u8; output_size];
    let mut rest = input;
    let mut sizes = chunks.iter().copied().cycle();
    while !rest.is_empty() {
        let size = sizes.next().unwrap_or(rest.len()).clamp(1, rest.len());
        let mut chunk = &rest[..size];
        while !chunk.is_empty() {
            let (consumed, produced) = filter.filter(chunk, &mut scratch);
            decoded.extend_from_slice(&scratch[..produced]);
            chunk = &chunk[consumed..];
        }
        rest = &rest[size..];
    }
    decoded
}

// ============================================================================
// Passthrough
// ============================================================================

#[test]
fn ansi_sequences_survive() {
    let input = b"\x1b[2J\x1b[1;31mRED\x1b[0m\x1b]0;title\x07done\r\n";
    assert_eq!(decode_all(input), input.to_vec());
}

#[test]
fn high_bytes_other_than_iac_pass_through() {
    let input: Vec<u8> = (0x80..=0xFE).collect();
    assert_eq!(decode_all(&input), input);
}

proptest! {
    #[test]
    fn input_without_iac_is_unchanged(input in proptest::collection::vec(0u8..255, 0..512)) {
        prop_assert_eq!(decode_all(&input), input);
    }
}

// ============================================================================
// Escapes and Commands
// ============================================================================

#[test]
fn escaped_iac_decodes_to_single_byte() {
    assert_eq!(decode_all(&[IAC, IAC]), vec![255]);
    assert_eq!(decode_all(&[b'a', IAC, IAC, IAC, IAC, b'b']), vec![b'a', 255, 255, b'b']);
}

#[test]
fn negotiation_is_stripped_for_every_option() {
    for verb in [DO, DONT, WILL, WONT] {
        for option in 0..=255u8 {
            assert_eq!(
                decode_all(&[IAC, verb, option, 0x41]),
                vec![0x41],
                "verb {verb} option {option}"
            );
        }
    }
}

#[test]
fn subnegotiation_is_stripped() {
    assert_eq!(decode_all(&[255, 250, 24, 0, 255, 240, 0x59]), vec![0x59]);
}

#[test]
fn empty_subnegotiation_is_stripped() {
    assert_eq!(decode_all(&[b'<', IAC, SB, IAC, SE, b'>']), b"<>".to_vec());
}

#[test]
fn lone_se_inside_subnegotiation_is_payload() {
    // SE without a preceding IAC does not end the block.
    let input = [IAC, SB, 31, SE, 80, IAC, SE, b'!'];
    assert_eq!(decode_all(&input), b"!".to_vec());
}

#[test]
fn unknown_commands_are_discarded() {
    for command in 0..=255u8 {
        if matches!(command, DO | DONT | WILL | WONT | SB | IAC) {
            continue;
        }
        let mut filter = TelnetFilter::new();
        let mut output = BytesMut::new();
        filter.filter_into(&[b'<', IAC, command, b'>'], &mut output);
        assert_eq!(&output[..], b"<>", "command {command}");
        assert_eq!(filter.state(), FilterState::Idle);
        assert_eq!(filter.stats().commands, 1);
    }
}

#[test]
fn end_to_end_scenario() {
    let mut input = b"Hello".to_vec();
    input.extend_from_slice(&[IAC, WILL, 0x01]);
    input.extend_from_slice(b" World");
    input.extend_from_slice(&[IAC, IAC]);
    input.extend_from_slice(b"!");
    assert_eq!(decode_all(&input), b"Hello World\xFF!".to_vec());
}

// ============================================================================
// Split Reads
// ============================================================================

#[test]
fn every_split_point_matches_single_pass() {
    let mut input = b"Hello".to_vec();
    input.extend_from_slice(&[IAC, WILL, 0x01]);
    input.extend_from_slice(b" W");
    input.extend_from_slice(&[IAC, SB, 24, 0, IAC, IAC, 7, IAC, SE]);
    input.extend_from_slice(b"orld");
    input.extend_from_slice(&[IAC, IAC, IAC, 241, b'!']);
    let expected = decode_all(&input);
    assert_eq!(expected, b"Hello World\xFF!".to_vec());

    for split in 0..=input.len() {
        let mut filter = TelnetFilter::new();
        let mut output = BytesMut::new();
        filter.filter_into(&input[..split], &mut output);
        filter.filter_into(&input[split..], &mut output);
        assert_eq!(output.to_vec(), expected, "split at {split}");
    }
}

#[test]
fn byte_at_a_time_matches_single_pass() {
    let input = [
        b'a', IAC, DO, 3, b'b', IAC, SB, 1, 2, IAC, IAC, IAC, SE, b'c', IAC, IAC,
    ];
    assert_eq!(decode_chunked(&input, &[1], 1), decode_all(&input));
}

proptest! {
    #[test]
    fn arbitrary_chunking_matches_single_pass(
        input in proptest::collection::vec(any::<u8>(), 0..512),
        chunks in proptest::collection::vec(1usize..16, 1..8),
        output_size in 1usize..8,
    ) {
        prop_assert_eq!(decode_chunked(&input, &chunks, output_size), decode_all(&input));
    }

    #[test]
    fn telnet_framed_text_round_trips(
        text in proptest::collection::vec(any::<u8>(), 0..256),
        option in any::<u8>(),
    ) {
        // Escape the text the way a server would and wrap it in commands.
        let mut input = vec![IAC, WILL, option];
        for &byte in &text {
            if byte == IAC {
                input.push(IAC);
            }
            input.push(byte);
        }
        input.extend_from_slice(&[IAC, SB, option, IAC, IAC, IAC, SE]);
        prop_assert_eq!(decode_all(&input), text);
    }
}
