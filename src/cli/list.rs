//! List command implementation

use anyhow::Result;

use super::{format_timestamp, truncate};
use crate::store::ThreadStore;

pub fn run(store: &ThreadStore) -> Result<()> {
    let threads = store.list_threads()?;

    if threads.is_empty() {
        println!("No threads found. Run 'dittseek new <title>' to create one.");
        return Ok(());
    }

    println!("{:<12} {:<38} {}", "Created", "ID", "Title");
    println!("{}", "-".repeat(90));

    for thread in threads {
        println!(
            "{:<12} {:<38} {}",
            format_timestamp(&thread.created_at),
            thread.id,
            truncate(&thread.title, 35),
        );
    }

    Ok(())
}
