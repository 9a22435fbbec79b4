#![no_main]

use libfuzzer_sys::fuzz_target;
use regpack::{compress_channel, decompress_channel, ParseStrategy};

fuzz_target!(|data: &[u8]| {
    // First byte picks the window, the rest is the channel
    let Some((&window, channel)) = data.split_first() else {
        return;
    };
    let window = window as usize * 4 + 1;

    for strategy in [ParseStrategy::Greedy, ParseStrategy::Lazy, ParseStrategy::LazyCheapest] {
        let (packed, _) = compress_channel(channel, window, strategy).unwrap();
        assert_eq!(decompress_channel(&packed).unwrap(), channel);
    }
});
