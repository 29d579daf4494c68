#![no_main]

use libfuzzer_sys::fuzz_target;
use berschema::{Flavor, Mode, Schema};

fuzz_target!(|data: &[u8]| {
    let bits = Schema::bit_string([("a", 0), ("b", 1), ("c", 9)]);
    for schema in [
        bits,
        Schema::octet_string(),
        Schema::string(Flavor::Ia5),
        Schema::string(Flavor::Visible),
        Schema::string(Flavor::Numeric),
        Schema::string(Flavor::Printable),
        Schema::string(Flavor::Utf8),
        Schema::octet_string_sized(Flavor::Generic, Some(1), Some(4)),
    ] {
        for mode in [Mode::Lenient, Mode::Strict] {
            // Clear named bits may get lost, so compare encodings.
            if let Ok(value) = mode.decode(&schema, data) {
                let encoded = berschema::encode(&schema, &value).unwrap();
                let again = berschema::decode(&schema, &encoded).unwrap();
                assert_eq!(
                    berschema::encode(&schema, &again).unwrap(), encoded
                );
            }
        }
    }
});
