//! New-thread command implementation

use anyhow::Result;

use crate::store::ThreadStore;

pub fn run(store: &ThreadStore, title: String) -> Result<()> {
    let thread = store.create_thread(&title)?;
    println!("Thread '{}' created with ID: {}", thread.title, thread.id);
    println!("Start chatting with: dittseek chat {}", thread.id);
    Ok(())
}
