//! Customizing CDCN output with FormatOptions.
//!
//! Run with: cargo run --example custom_options

use cdcn::{format_collection, format_collection_with_options, parse_source, FormatOptions};
use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    let nested = vec![vec![vec![vec!["deep"; 2]; 2]; 2]; 2];

    // Canonical layout (4-space indent, depth 8)
    println!("Canonical:");
    println!("{}", format_collection(&nested)?);

    // Two-space indentation still parses back to the same value
    println!("Indent 2:");
    let compact = format_collection_with_options(&nested, FormatOptions::new().with_indent(2))?;
    println!("{}", compact);
    let reparsed = parse_source(&compact)?;
    assert_eq!(format_collection(&reparsed)?, format_collection(&nested)?);

    // Collections past the depth limit are written as `...`
    println!("Max depth 2:");
    let shallow = FormatOptions::new().with_max_depth(2);
    println!("{}", format_collection_with_options(&nested, shallow)?);

    Ok(())
}
