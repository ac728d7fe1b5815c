// Copyright 2026 The nostr_binary Authors. All rights reserved.
// This file is licensed to you under the Apache License,
// Version 2.0 (http://www.apache.org/licenses/LICENSE-2.0)
// or the MIT license (http://opensource.org/licenses/MIT),
// at your option.

// Unless required by applicable law or agreed to in writing,
// this software is distributed on an "AS IS" BASIS, WITHOUT
// WARRANTIES OR REPRESENTATIONS OF ANY KIND, either express or
// implied. See the LICENSE-MIT and LICENSE-APACHE files for the
// specific language governing permissions and limitations under
// each license.

//! Property tests: round trips over generated events and decoding of
//! arbitrary bytes.

use nostr_binary::{ErrorKind, Event, EventId, Tag, estimate_size, from_slice, to_vec};
use proptest::prelude::*;

fn hex32() -> impl Strategy<Value = String> {
    prop::array::uniform32(any::<u8>()).prop_map(hex::encode)
}

fn text() -> impl Strategy<Value = String> {
    ".{0,24}"
}

fn tag() -> impl Strategy<Value = Tag> {
    let generic = (
        "[a-zA-Z-]{0,4}"
            .prop_filter("not a dense marker", |s| !["e", "p", "a"].contains(&s.as_str())),
        prop::collection::vec(text(), 0..4),
    )
        .prop_map(|(first, rest)| Tag(std::iter::once(first).chain(rest).collect()));
    let reference = (
        prop_oneof![Just("e"), Just("p")],
        hex32(),
        prop::collection::vec(text(), 0..3),
    )
        .prop_map(|(marker, value, rest)| {
            Tag([marker.to_string(), value].into_iter().chain(rest).collect())
        });
    let coordinate = (any::<u16>(), hex32(), text(), prop::collection::vec(text(), 0..2))
        .prop_map(|(kind, key, identifier, rest)| {
            Tag(["a".to_string(), format!("{}:{}:{}", kind, key, identifier)]
                .into_iter()
                .chain(rest)
                .collect())
        });
    let lone = prop_oneof![Just("e"), Just("p"), Just("a")].prop_map(|m| Tag::new([m]));
    prop_oneof![generic, reference, coordinate, lone, Just(Tag::default())]
}

fn event() -> impl Strategy<Value = Event> {
    (
        prop::array::uniform32(any::<u8>()),
        hex32(),
        any::<u64>(),
        any::<u16>(),
        prop::collection::vec(tag(), 0..6),
        ".{0,64}",
        prop::collection::vec(any::<u8>(), 64),
    )
        .prop_map(|(id, pubkey, created_at, kind, tags, content, sig)| Event {
            id: EventId::new(id),
            pubkey,
            created_at,
            kind,
            tags,
            content,
            sig: hex::encode(sig),
        })
}

proptest! {
    #[test]
    fn roundtrip(event in event()) {
        let bytes = to_vec(&event).unwrap();
        prop_assert_eq!(from_slice(&bytes).unwrap(), event);
    }

    #[test]
    fn estimate_bounds_encoded_length(event in event()) {
        let bytes = to_vec(&event).unwrap();
        prop_assert!(bytes.len() <= estimate_size(&event));
    }

    #[test]
    fn every_prefix_is_truncated(event in event()) {
        let bytes = to_vec(&event).unwrap();
        for k in 0..bytes.len() {
            let err = from_slice(&bytes[..k]).unwrap_err();
            prop_assert_eq!(err.kind(), ErrorKind::Truncation);
        }
    }

    #[test]
    fn arbitrary_bytes_never_panic(bytes in prop::collection::vec(any::<u8>(), 0..512)) {
        match from_slice(&bytes) {
            Ok(event) => prop_assert!(to_vec(&event).is_ok()),
            Err(err) => prop_assert!(!err.to_string().is_empty()),
        }
    }

    #[test]
    fn corrupted_encoding_never_panics(
        event in event(),
        position in any::<prop::sample::Index>(),
        byte in any::<u8>(),
    ) {
        let mut bytes = to_vec(&event).unwrap();
        let i = position.index(bytes.len());
        bytes[i] = byte;
        let _ = from_slice(&bytes);
    }
}
