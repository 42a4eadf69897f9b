#![no_main]

use std::collections::BTreeMap;

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use serde::Serialize;

#[derive(Debug, Serialize, Arbitrary)]
enum Value {
    None,
    Bool(bool),
    Integer(i64),
    Float(f64),
    String(String),
    List(Vec<Value>),
    Map(BTreeMap<String, Value>),
}

fuzz_target!(|data: (&str, BTreeMap<String, Value>)| {
    let (template, context) = data;
    let engine = unbrace::Engine::new();
    let _ = engine.renderer_serde(template, &context).with_max_passes(8).to_string();
});
