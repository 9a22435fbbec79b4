#![no_main]

use libfuzzer_sys::fuzz_target;
use regpack::unpack_file;

fuzz_target!(|data: &[u8]| {
    // Malformed containers and streams must fail with an error, never panic
    let _ = unpack_file(data);
    let _ = regpack::codec::decode(data);
});
