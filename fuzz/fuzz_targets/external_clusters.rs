#![no_main]

use libfuzzer_sys::fuzz_target;
use ngeval::io::parse_external_clusters;

fuzz_target!(|data: &[u8]| {
    if let Ok(input) = std::str::from_utf8(data) {
        let names: Vec<String> = ["YAL001C", "YAL002W", "YAL003W", "YBR001C"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        // Must not panic, and every parsed clustering covers all names
        if let Ok(partition) = parse_external_clusters(&names, input) {
            assert_eq!(partition.len(), names.len());
        }
    }
});
