#![no_main]
use engine::Analyzer;
use libfuzzer_sys::fuzz_target;
use loader::Settings;

fuzz_target!(|data: &[u8]| {
    let Ok(s) = std::str::from_utf8(data) else {
        return;
    };
    let Ok(file) = parsers::parse_php(s, "fuzz.php") else {
        return;
    };
    let analyzer = Analyzer::from_settings(&Settings::default()).expect("default analyzer");
    let first = analyzer.analyze(&file);
    assert!(first.windows(2).all(|w| w[0].position <= w[1].position));
    assert_eq!(first, analyzer.analyze(&file));
});
