//! Prints the encoded content of object identifiers.
//!
//! Provide a sequence of object identifiers in ‘dot integer’ notation and
//! you will receive the content octets of their BER encoding, e.g., for
//! defining values of an ANY field in a schema by hand.

use std::env;
use berschema::oid;
use berschema::EncodeErrorKind;

fn process_one(arg: &str) -> Result<(), EncodeErrorKind> {
    let mut content = Vec::new();
    oid::append_content(arg, &mut content)?;

    let mut first = true;
    print!("[");
    for item in content {
        if !first { print!(", "); }
        else { first = false }
        print!("{:#04x}", item);
    }
    println!("]");

    Ok(())
}

fn main() {
    for arg in env::args().skip(1) {
        if let Err(err) = process_one(arg.as_ref()) {
            println!("{}: {}.", arg, err)
        }
    }
}
