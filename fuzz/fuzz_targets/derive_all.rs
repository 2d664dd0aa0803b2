#![no_main]

use hashkdf::{HashFamily, HashFunction};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if data.len() < 4 {
        return;
    }

    // selector bytes: family, digest size, output length
    let family = if data[0] & 1 == 0 { HashFamily::Sha2 } else { HashFamily::Sha3 };
    let hash = HashFunction::new(family, data[1] as usize % 72);
    let len = u16::from_be_bytes([data[2], data[3]]) as usize % 2048;
    let data = &data[4..];

    let a = (data.first().copied().unwrap_or(0) as usize) % (data.len() + 1);
    let b = (data.get(1).copied().unwrap_or(0) as usize) % (data.len() + 1);
    let (i, j) = if a <= b { (a, b) } else { (b, a) };

    let key = &data[..i];
    let msg = &data[i..j];
    let info = &data[j..];

    let check = |r: Result<Vec<u8>, hashkdf::KdfError>| {
        if let Ok(out) = r {
            assert_eq!(out.len(), len);
        }
    };

    check(hashkdf::hmac(hash, len, key, msg));
    check(hashkdf::kdf2(hash, key, info, len));
    check(hashkdf::pbkdf2(hash, key, msg, 2, len));
    check(hashkdf::hkdf_expand(hash, len, key, info));
    check(hashkdf::expand_message_xmd(hash, len, info, msg));
    check(hashkdf::expand_message_xof(hash, len, info, msg));
    let _ = hashkdf::hkdf_extract(hash, Some(key), msg);
});
