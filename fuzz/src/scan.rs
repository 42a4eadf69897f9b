#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: (&str, &str, &str)| {
    let (open, close, text) = data;
    if open.is_empty() || close.is_empty() {
        return;
    }
    let syntax = unbrace::Syntax::builder().delimiters(open, close).build();
    let engine = unbrace::Engine::with_syntax(syntax);
    let mut last = 0;
    for m in engine.scan(text) {
        assert!(m.start() >= last);
        let inner = &m.as_str()[open.len()..m.as_str().len() - close.len()];
        assert!(!inner.contains('\n'));
        last = m.end();
    }
});
