#![no_main]

use libfuzzer_sys::fuzz_target;
use berschema::{oid, Schema, Value};

fuzz_target!(|data: &[u8]| {
    let schema = Schema::object_identifier();
    let value = match berschema::decode(&schema, data) {
        Ok(value) => value,
        Err(_) => return,
    };
    let text = match value {
        Value::ObjectId(ref text) => text.clone(),
        _ => panic!("not an object identifier"),
    };
    let mut content = Vec::new();
    oid::append_content(&text, &mut content).unwrap();
    assert_eq!(oid::from_content(&content).unwrap(), text);

    let encoded = berschema::encode(&schema, &value).unwrap();
    assert_eq!(berschema::decode(&schema, &encoded).unwrap(), value);
});
