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

//! End-to-end encoding tests against hand-computed layouts.

use nostr_binary::{
    CodecError, ErrorKind, Event, EventId, Field, Reader, Tag, Writer, estimate_size,
    from_slice, from_slice_ref, to_vec,
};

const KEY: &str = "7e7e9c42a91bfef19fa929e5fda1b72e0ebc1a4c1141673e2794234d86addf4e";

fn scenario_event() -> Event {
    Event {
        id: EventId::new([0u8; 32]),
        pubkey: "11".repeat(32),
        created_at: 1_700_000_000,
        kind: 1,
        tags: vec![Tag::new(["e".to_string(), "aa".repeat(32)])],
        content: "hello".to_string(),
        sig: "22".repeat(64),
    }
}

fn long_form_event() -> Event {
    Event {
        id: "5c83da77af1dec6d7289834998ad7aafbd9e2191396d75ec3cc27f5a77226f36"
            .parse()
            .unwrap(),
        pubkey: KEY.to_string(),
        created_at: u64::MAX,
        kind: u16::MAX,
        tags: vec![
            Tag::new(["d", "my-article"]),
            Tag::new([
                "e".to_string(),
                "5c83da77af1dec6d7289834998ad7aafbd9e2191396d75ec3cc27f5a77226f36".to_string(),
                "wss://relay.example.com".to_string(),
                "root".to_string(),
            ]),
            Tag::new(["p".to_string(), KEY.to_string()]),
            Tag::new(["a".to_string(), format!("30023:{}:", KEY)]),
            Tag::new(["a".to_string(), format!("0:{}:🦀:nested:colons", KEY)]),
            Tag::new(["t", "rust"]),
            Tag::new(["e"]),
            Tag::new(["content-warning"]),
            Tag::new(["E", "not hex at all"]),
        ],
        content: "# Title\n\nSome *markdown* with ünïcödé and a long tail ".repeat(50),
        sig: "9f".repeat(64),
    }
}

#[test]
fn test_concrete_scenario_length() {
    let event = scenario_event();
    let bytes = to_vec(&event).unwrap();

    // id, pubkey, created_at varint, kind, tag count, element count,
    // "e" with its prefix, the 32-byte reference, content with its prefix, sig
    assert_eq!(bytes.len(), 32 + 32 + 5 + 2 + 1 + 1 + 2 + 32 + 1 + 5 + 64);
    assert_eq!(from_slice(&bytes).unwrap(), event);
}

#[test]
fn test_roundtrip_long_form() {
    let event = long_form_event();
    let bytes = to_vec(&event).unwrap();
    let decoded = from_slice(&bytes).unwrap();
    assert_eq!(decoded, event);
    assert_eq!(decoded.tags[3].0[1], format!("30023:{}:", KEY));
    assert_eq!(decoded.tags[4].0[1], format!("0:{}:🦀:nested:colons", KEY));
}

#[test]
fn test_smaller_than_json() {
    let event = long_form_event();
    let bytes = to_vec(&event).unwrap();
    let json = event.to_json().unwrap();
    assert!(bytes.len() < json.len());
}

#[test]
fn test_estimate_is_upper_bound() {
    let empty = Event {
        pubkey: KEY.to_string(),
        sig: "00".repeat(64),
        ..Event::default()
    };
    for event in [scenario_event(), long_form_event(), empty] {
        let bytes = to_vec(&event).unwrap();
        assert!(bytes.len() <= estimate_size(&event));

        let mut writer = Writer::for_event(&event);
        let capacity = writer.capacity();
        writer.write_event(&event).unwrap();
        assert_eq!(writer.capacity(), capacity, "buffer reallocated");
    }
}

#[test]
fn test_truncation_safety() {
    for event in [scenario_event(), long_form_event()] {
        let bytes = to_vec(&event).unwrap();
        for k in 0..bytes.len() {
            match from_slice(&bytes[..k]) {
                Err(err) => assert_eq!(err.kind(), ErrorKind::Truncation, "prefix {}", k),
                Ok(_) => panic!("prefix {} decoded to an event", k),
            }
        }
    }
}

#[test]
fn test_hex_ref_is_32_raw_bytes() {
    let value = "0123456789abcdef".repeat(4);
    let mut writer = Writer::new();
    writer
        .write_tags(&[Tag::new(["p".to_string(), value.clone()])])
        .unwrap();
    let bytes = writer.as_bytes();
    // tag count, element count, "p" prefix + byte, then exactly 32 bytes
    assert_eq!(bytes.len(), 4 + 32);
    assert_eq!(&bytes[4..], hex::decode(&value).unwrap().as_slice());

    let tags = Reader::new(bytes).read_tags().unwrap();
    assert_eq!(tags[0][1], value);
}

#[test]
fn test_buffer_reuse_across_events() {
    let events = [long_form_event(), scenario_event()];
    let max = events.iter().map(estimate_size).max().unwrap();
    let mut writer = Writer::with_capacity(max);
    for event in &events {
        writer.clear();
        writer.write_event(event).unwrap();
        assert_eq!(from_slice(writer.as_bytes()).unwrap(), *event);
    }
    assert!(writer.capacity() >= max);
}

#[test]
fn test_zero_copy_view_matches_owned() {
    let event = long_form_event();
    let bytes = to_vec(&event).unwrap();
    let view = from_slice_ref(&bytes).unwrap();
    assert_eq!(view.content, event.content);
    assert_eq!(view.kind, event.kind);
    assert_eq!(view.into_owned(), event);
}

#[test]
fn test_encode_errors() {
    let mut event = scenario_event();
    event.pubkey.pop();
    assert_eq!(
        to_vec(&event),
        Err(CodecError::InvalidHexLength {
            field: Field::PubKey,
            expected: 64,
            got: 63
        })
    );

    let mut event = scenario_event();
    event.sig = "ZZ".repeat(64);
    assert_eq!(to_vec(&event), Err(CodecError::InvalidHex(Field::Signature)));

    let mut event = scenario_event();
    event.tags.push(Tag::new(["a", "30023:deadbeef:slug"]));
    assert_eq!(to_vec(&event).unwrap_err().kind(), ErrorKind::Format);

    let mut event = scenario_event();
    event.tags[0].0[1] = "AA".repeat(32);
    assert_eq!(to_vec(&event), Err(CodecError::InvalidHexRef));
}

#[test]
fn test_json_then_binary() {
    let json = format!(
        r#"{{"id":"{}","pubkey":"{}","created_at":1700000000,"kind":7,"tags":[["e","{}"],["p","{}"],["k","1"]],"content":"+","sig":"{}"}}"#,
        "ab".repeat(32),
        KEY,
        "cd".repeat(32),
        KEY,
        "ef".repeat(64)
    );
    let event = Event::from_json(&json).unwrap();
    let bytes = to_vec(&event).unwrap();
    let decoded = from_slice(&bytes).unwrap();
    assert_eq!(decoded.to_json().unwrap(), json);
}
