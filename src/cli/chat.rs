//! Chat command implementation
//!
//! One turn: persist the user message, stream the model response through the
//! thought/answer splitter while publishing deltas for live display, then
//! persist exactly one assistant message once the stream ends. A turn that
//! fails mid-stream persists nothing for the assistant.

use std::io::{self, BufRead, Write};
use std::sync::mpsc::Receiver;

use anyhow::Result;
use futures::StreamExt;

use crate::ollama::{ChatClient, ChatMessage};
use crate::splitter::{Segment, ThoughtSplitter};
use crate::store::{MessageRow, NewMessage, Role, StoreEvent, ThreadStore};

pub async fn run(
    store: &ThreadStore,
    client: &dyn ChatClient,
    model: &str,
    thread_id: &str,
) -> Result<()> {
    let thread = store
        .get_thread(thread_id)?
        .ok_or_else(|| anyhow::anyhow!("Thread not found: {}", thread_id))?;

    // Store notifications stand in for the original's live queries: the
    // transcript refreshes from events, skipping rows this loop already
    // rendered while streaming.
    let events = store.subscribe();
    let mut shown: Vec<i64> = Vec::new();

    for msg in store.list_messages(&thread.id)? {
        print_message(&msg);
    }

    println!("\nChatting on '{}' with {} (Ctrl-D to quit)", thread.title, model);

    let stdin = io::stdin();
    loop {
        print!("\n> ");
        io::stdout().flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let input = line.trim_end_matches('\n');

        let mut printer = LivePrinter::new();
        match run_turn(store, client, model, &thread.id, input, &mut |segment, fragment| {
            printer.delta(segment, fragment)
        })
        .await
        {
            Ok(turn) => {
                shown.push(turn.user.id);
                shown.push(turn.assistant.id);
                println!();
            }
            Err(e) => println!("\nerror: {:#}", e),
        }

        drain_events(&events, &thread.id, &mut shown);
    }

    Ok(())
}

/// Messages persisted by one completed turn.
pub struct TurnRecord {
    pub user: MessageRow,
    pub assistant: MessageRow,
}

/// One chat turn against the store and the inference service.
///
/// The user message is persisted (raw text, empty thought) before the request
/// goes out; the request itself carries the trimmed text as a single
/// user-role message. Every submission is sent, including empty input.
pub async fn run_turn(
    store: &ThreadStore,
    client: &dyn ChatClient,
    model: &str,
    thread_id: &str,
    input: &str,
    on_delta: &mut dyn FnMut(Segment, &str),
) -> Result<TurnRecord> {
    let user = store.create_message(NewMessage {
        thread_id,
        role: Role::User,
        content: input,
        thought: "",
    })?;

    let mut stream = client
        .chat_stream(model, vec![ChatMessage::user(input.trim())])
        .await?;

    let mut splitter = ThoughtSplitter::new();
    while let Some(chunk) = stream.next().await {
        let chunk = chunk?;
        if let Some(content) = chunk.content() {
            if let Some(segment) = splitter.push(content) {
                on_delta(segment, content);
            }
        }
    }

    let (thought, answer) = splitter.finish();
    let assistant = store.create_message(NewMessage {
        thread_id,
        role: Role::Assistant,
        content: &answer,
        thought: &thought,
    })?;

    Ok(TurnRecord { user, assistant })
}

/// Progressive rendering of one streamed response: thought first, dimly
/// marked, then the answer.
struct LivePrinter {
    current: Option<Segment>,
}

impl LivePrinter {
    fn new() -> Self {
        Self { current: None }
    }

    fn delta(&mut self, segment: Segment, fragment: &str) {
        if self.current != Some(segment) {
            match segment {
                Segment::Thought => print!("\n💭 "),
                Segment::Answer => print!("\n\n"),
            }
            self.current = Some(segment);
        }
        print!("{}", fragment);
        let _ = io::stdout().flush();
    }
}

fn print_message(msg: &MessageRow) {
    println!("\n[{}]", msg.role.as_str().to_uppercase());
    if !msg.thought.is_empty() {
        println!("💭 {}", msg.thought);
    }
    println!("{}", msg.content);
}

fn drain_events(events: &Receiver<StoreEvent>, thread_id: &str, shown: &mut Vec<i64>) {
    while let Ok(event) = events.try_recv() {
        if let StoreEvent::MessageCreated(msg) = event {
            if msg.thread_id == thread_id && !shown.contains(&msg.id) {
                print_message(&msg);
                shown.push(msg.id);
            }
        }
    }
}
