//! Fuzz target for Envelope::decode
//!
//! Arbitrary byte sequences must either parse or return MalformedEnvelope;
//! decode must never panic. A parsed envelope must re-encode to the exact
//! input bytes (the wire format has no redundancy to normalize away).

#![no_main]

use libfuzzer_sys::fuzz_target;
use sealbox_crypto::Envelope;

fuzz_target!(|data: &[u8]| {
    if let Ok(envelope) = Envelope::decode(data) {
        assert_eq!(envelope.encode(), data);
        assert_eq!(envelope.encoded_len(), data.len());
    }
});
