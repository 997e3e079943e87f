//! Parse, inspect and format a CDCN document.
//!
//! Run with: cargo run --example simple

use cdcn::{format_collection, parse_source, Primitive};
use std::error::Error;

const SOURCE: &str = r#"[
    "name": "Alice Johnson"
    "id": 0x2a
    "scores": [
        98.5
        87.0
    ](List)
    "roles": ["admin"](Set)
](Map)
"#;

fn main() -> Result<(), Box<dyn Error>> {
    let value = parse_source(SOURCE)?;

    let user = value.as_collection().ok_or("expected a collection")?;
    let name = user.get(&Primitive::from("name")).and_then(|v| v.as_str());
    println!("name: {:?}", name);
    println!("id: {:?}", user.get(&Primitive::from("id")).and_then(|v| v.as_u64()));

    // Format back to canonical text
    let text = format_collection(&value)?;
    println!("CDCN output:\n{}", text);

    assert_eq!(text, SOURCE);
    println!("✓ Round-trip successful");

    // Native Rust data uses the untyped `array` and `map` tags
    let matrix = vec![vec![1, 2], vec![3, 4]];
    println!("{}", format_collection(&matrix)?);

    Ok(())
}
