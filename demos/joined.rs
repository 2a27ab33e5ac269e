//! Fan-in: reporting several failures as one error.
//!
//! Batch operations often want to keep going after the first failure and
//! report everything that went wrong. `collect_joined` gathers every error of
//! an iterator into a `Joined`, and wrapping it keeps the usual annotations.

use errnote::{Joined, chain, prelude::*};

#[derive(Debug)]
struct Record {
    id: u32,
    amount: &'static str,
}

fn parse_amount(record: &Record) -> Result<i64, Annotated> {
    record
        .amount
        .parse::<i64>()
        .wrap_with_data("invalid amount", kv! { "record_id" => record.id })
}

fn total(records: &[Record]) -> Result<i64, Annotated> {
    let amounts: Vec<i64> = records
        .iter()
        .map(parse_amount)
        .collect_joined()
        .wrap("failed to total the batch")?;
    Ok(amounts.iter().sum())
}

fn main() {
    let records = [
        Record { id: 1, amount: "120" },
        Record { id: 2, amount: "twelve" },
        Record { id: 3, amount: "7" },
        Record { id: 4, amount: "" },
    ];

    let Err(err) = total(&records) else {
        return;
    };

    println!("=== Short form ===");
    println!("{err}\n");

    if let Some(joined) = chain::find::<Joined>(&err) {
        println!("=== {} failures ===", joined.len());
        for member in joined.iter() {
            let id = chain::get_value(member, "record_id").map(ToString::to_string);
            println!("record {}: {member}", id.as_deref().unwrap_or("?"));
        }
        println!();
    }

    println!("=== Merged data (later failures win) ===");
    println!("{}\n", err.get_all_data());

    println!("=== Extended form ===");
    println!("{err:?}");
}
