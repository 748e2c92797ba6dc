#![no_main]
use libfuzzer_sys::fuzz_target;
use wrongmath_syntax::{normalize, segment};

fuzz_target!(|data: &[u8]| {
    // Lossy conversion keeps "almost text" inputs in play.
    let s = String::from_utf8_lossy(data);

    for text in [s.to_string(), normalize(&s)] {
        let mut cursor = 0;
        for seg in segment(&text) {
            let span = seg.span();
            assert_eq!(span.start, cursor);
            cursor = span.end;
        }
        assert_eq!(cursor, text.len());
    }

    let once = normalize(&s);
    assert_eq!(normalize(&once), once);
});
