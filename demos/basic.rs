//! Basic introduction to errnote.
//!
//! This demo walks through the annotation axes:
//! 1. Creating errors with `new()` and `errorf!()`
//! 2. Adding messages and stack traces with `.wrap()`
//! 3. Attaching key/value data with `.with_data()`
//! 4. Reading the chain back: data, root cause and stack trace

use std::fs;

use errnote::prelude::*;

/// Simplest usage: the `?` operator does not add anything on its own.
fn read_config_file(path: &str) -> Result<String, Annotated> {
    // .wrap() adds a message and captures the stack at this call site
    let data = fs::read_to_string(path).wrap("failed to read config file")?;
    Ok(data)
}

/// Data answers "which one?" without baking it into the message.
fn load_user_config(user: &str) -> Result<String, Annotated> {
    let path = format!("/nonexistent/{user}/config.toml");
    let config = read_config_file(&path)
        .with_data(kv! { "user" => user.to_string(), "path" => path })?;
    Ok(config)
}

/// Each layer adds its own message. The stack captured here is abbreviated
/// against the one captured in `read_config_file`.
fn startup() -> Result<(), Annotated> {
    let _config = load_user_config("alice").wrap("application startup failed")?;
    Ok(())
}

fn validate_port(port: u32) -> Result<u16, Annotated> {
    if port > u32::from(u16::MAX) {
        bail!("port {} is out of range", port);
    }
    u16::try_from(port).wrap("converting port")
}

fn main() {
    println!("=== Basic Error Annotation ===\n");

    println!("Example 1: Short form");
    if let Err(err) = validate_port(70_000) {
        println!("{err}");
    }
    println!();

    let Err(err) = startup() else {
        return;
    };

    println!("Example 2: Short form of a chain");
    println!("{err}\n");

    println!("Example 3: Outermost message only");
    println!("{err:#}\n");

    println!("Example 4: Data merged over the whole chain");
    println!("{}\n", err.get_all_data());

    println!("Example 5: The deepest cause");
    println!("{}\n", err.root_cause());

    println!("Example 6: Extended form with data and stack traces");
    println!("{err:?}");
}
