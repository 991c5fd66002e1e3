#![no_main]

use libfuzzer_sys::fuzz_target;
use ticknoise::table::{parse_table_bytes, TableOptions};

fuzz_target!(|data: &[u8]| {
    // Malformed tables must surface as errors, never panics
    let _ = parse_table_bytes(data, &TableOptions::default());
    let _ = parse_table_bytes(data, &TableOptions { lenient: true });
});
