#![no_main]
use libfuzzer_sys::fuzz_target;
use parsers::parse_php;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        if let Ok(file) = parse_php(s, "fuzz.php") {
            for r in file.regions() {
                assert!(r.opener > r.owner);
                assert!(r.closer.map_or(true, |c| c > r.opener));
            }
        }
    }
});
