//! Example of walking a parsed tree by hand.
//!
//! cargo run --package nbt --example nested_access

use nbt::{Tag, parse::parse};

fn main() -> Result<(), nbt::Error> {
    let root = parse(r#"{users: [{name: "Amy"}, {name: "Bob"}]}"#)?;

    // node = root
    let Some(node) = root.compound() else {
        panic!()
    };

    // node = root["users"]
    let Some(Tag::List(node)) = node.get("users") else {
        panic!()
    };

    // node = root["users"][1]
    let Some(Tag::Compound(node)) = node.items().get(1) else {
        panic!()
    };

    // node = root["users"][1]["name"]
    let Some(Tag::String(name)) = node.get("name") else {
        panic!()
    };

    println!("{}", name.to_string_lossy());
    Ok(())
}
