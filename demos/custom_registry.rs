//! Replacing collection constructors with a custom Registry.
//!
//! Run with: cargo run --example custom_registry

use cdcn::{parse_source_with, Collection, Context, Error, Registry, Value};

fn main() {
    let mut registry = Registry::default();

    // Sets may only hold primitives
    registry.register_values(Context::Set, |values: Vec<Value>| {
        if values.iter().any(Value::is_collection) {
            return Err(Error::custom("sets hold primitives only"));
        }
        Ok(Collection::set(values))
    });

    // Every `Array` is built as a `List`
    registry.register_values(Context::Array, |values| Ok(Collection::List(values)));

    println!("registry: {:?}", registry);

    for source in [
        "[1, 2, 2](Set)\n",
        "[[1](Array)](Set)\n",
        "['a', 'b'](Array)\n",
        "[1: 2](Set)\n",
    ] {
        match parse_source_with(source, &registry) {
            Ok(value) => println!("{:?} -> {}", source, value),
            Err(e) => println!("{:?} failed:\n{}\n", source, e),
        }
    }
}
