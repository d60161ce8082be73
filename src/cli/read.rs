//! Read command implementation

use anyhow::Result;

use super::{format_timestamp, truncate};
use crate::store::ThreadStore;

pub fn run(store: &ThreadStore, thread_id: &str, thoughts: bool) -> Result<()> {
    let thread = match store.get_thread(thread_id)? {
        Some(t) => t,
        None => {
            println!("Thread '{}' not found.", thread_id);
            return Ok(());
        }
    };

    let messages = store.list_messages(&thread.id)?;

    // Header mirrors the chat page: first message, truncated, falling back
    // to the thread title for an empty thread.
    let header = messages
        .first()
        .map(|m| truncate(&m.content, 30))
        .unwrap_or_else(|| thread.title.clone());

    println!("\n{}", "=".repeat(80));
    println!("Thread: {} ({})", header, thread.id);
    println!("{}", "=".repeat(80));

    if messages.is_empty() {
        println!("\nNo messages yet. Run 'dittseek chat {}' to start.", thread.id);
        return Ok(());
    }

    for msg in messages {
        println!(
            "\n[{}] ({})",
            msg.role.as_str().to_uppercase(),
            format_timestamp(&msg.created_at)
        );

        if thoughts && !msg.thought.is_empty() {
            println!("  💭 [Thought]\n{}", msg.thought);
        }

        println!("{}", msg.content);
        println!("{}", "-".repeat(40));
    }

    Ok(())
}
