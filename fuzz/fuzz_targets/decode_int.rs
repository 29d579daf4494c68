#![no_main]

use libfuzzer_sys::fuzz_target;
use berschema::{Mode, Schema, Tag};

fuzz_target!(|data: &[u8]| {
    for schema in [
        Schema::integer(),
        Schema::integer_in(Some(-128), Some(127)),
        Schema::integer().with_implicit_tag(Tag::ctx(0)),
        Schema::enumerated([("zero", 0), ("one", 1)]),
    ] {
        for mode in [Mode::Lenient, Mode::Strict] {
            if let Ok(value) = mode.decode(&schema, data) {
                let encoded = berschema::encode(&schema, &value).unwrap();
                assert_eq!(
                    berschema::decode(&schema, &encoded).unwrap(), value
                );
            }
        }
    }
});
