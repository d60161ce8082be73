//! Thread and message storage with SQLite
//!
//! Insert-only store: threads are created from the new-chat action, messages
//! are appended one per turn, and nothing is ever mutated. Listing order is
//! creation order for both tables.
//!
//! The original's live-query behavior is expressed as an explicit
//! subscription: every successful insert is broadcast to subscribers as a
//! [`StoreEvent`], and views drain their receiver to refresh.

mod schema;

use anyhow::Result;
use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSqlOutput, ValueRef};
use rusqlite::{params, Connection, ToSql};
use std::cell::RefCell;
use std::path::Path;
use std::sync::mpsc::{self, Receiver, Sender};
use uuid::Uuid;

pub use schema::SCHEMA;

/// Author of a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

impl ToSql for Role {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(self.as_str().into())
    }
}

impl FromSql for Role {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        match value.as_str()? {
            "user" => Ok(Role::User),
            "assistant" => Ok(Role::Assistant),
            other => Err(FromSqlError::Other(
                format!("unknown role: {}", other).into(),
            )),
        }
    }
}

/// Change notification delivered to subscribers after a successful insert.
#[derive(Debug, Clone)]
pub enum StoreEvent {
    ThreadCreated(ThreadRow),
    MessageCreated(MessageRow),
}

/// Fields for a message about to be persisted.
#[derive(Debug, Clone, Copy)]
pub struct NewMessage<'a> {
    pub thread_id: &'a str,
    pub role: Role,
    pub content: &'a str,
    pub thought: &'a str,
}

pub struct ThreadStore {
    conn: Connection,
    watchers: RefCell<Vec<Sender<StoreEvent>>>,
}

impl ThreadStore {
    pub fn open(path: &Path) -> Result<Self> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(path)?;
        // Every message must belong to an existing thread.
        conn.pragma_update(None, "foreign_keys", true)?;

        let store = Self {
            conn,
            watchers: RefCell::new(Vec::new()),
        };
        store.init_schema()?;
        Ok(store)
    }

    fn init_schema(&self) -> Result<()> {
        self.conn.execute_batch(SCHEMA)?;
        Ok(())
    }

    // ============================================
    // SUBSCRIPTIONS
    // ============================================

    /// Register a change listener. Events are delivered for every insert made
    /// through this store handle; dropped receivers are pruned on the next
    /// notification.
    pub fn subscribe(&self) -> Receiver<StoreEvent> {
        let (tx, rx) = mpsc::channel();
        self.watchers.borrow_mut().push(tx);
        rx
    }

    fn notify(&self, event: StoreEvent) {
        self.watchers
            .borrow_mut()
            .retain(|tx| tx.send(event.clone()).is_ok());
    }

    // ============================================
    // THREADS
    // ============================================

    /// Create a thread with a generated identifier.
    pub fn create_thread(&self, title: &str) -> Result<ThreadRow> {
        let id = Uuid::new_v4().to_string();

        let row = self.conn.query_row(
            "INSERT INTO threads (id, title) VALUES (?, ?)
             RETURNING id, title, created_at",
            params![id, title],
            map_thread_row,
        )?;

        self.notify(StoreEvent::ThreadCreated(row.clone()));
        Ok(row)
    }

    pub fn get_thread(&self, thread_id: &str) -> Result<Option<ThreadRow>> {
        let result = self.conn.query_row(
            "SELECT id, title, created_at FROM threads WHERE id = ?",
            params![thread_id],
            map_thread_row,
        );

        match result {
            Ok(row) => Ok(Some(row)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// All threads in creation order.
    pub fn list_threads(&self) -> Result<Vec<ThreadRow>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, title, created_at FROM threads ORDER BY rowid")?;

        let rows = stmt.query_map([], map_thread_row)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    // ============================================
    // MESSAGES
    // ============================================

    /// Append a message to its thread. Fails if the thread does not exist.
    pub fn create_message(&self, message: NewMessage) -> Result<MessageRow> {
        let row = self.conn.query_row(
            "INSERT INTO messages (thread_id, role, content, thought)
             VALUES (?, ?, ?, ?)
             RETURNING id, thread_id, role, content, thought, created_at",
            params![
                message.thread_id,
                message.role,
                message.content,
                message.thought
            ],
            map_message_row,
        )?;

        self.notify(StoreEvent::MessageCreated(row.clone()));
        Ok(row)
    }

    /// Messages of one thread in creation order.
    pub fn list_messages(&self, thread_id: &str) -> Result<Vec<MessageRow>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, thread_id, role, content, thought, created_at
             FROM messages
             WHERE thread_id = ?
             ORDER BY id",
        )?;

        let rows = stmt.query_map(params![thread_id], map_message_row)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }
}

fn map_thread_row(row: &rusqlite::Row) -> rusqlite::Result<ThreadRow> {
    Ok(ThreadRow {
        id: row.get(0)?,
        title: row.get(1)?,
        created_at: row.get(2)?,
    })
}

fn map_message_row(row: &rusqlite::Row) -> rusqlite::Result<MessageRow> {
    Ok(MessageRow {
        id: row.get(0)?,
        thread_id: row.get(1)?,
        role: row.get(2)?,
        content: row.get(3)?,
        thought: row.get(4)?,
        created_at: row.get(5)?,
    })
}

// ============================================
// ROW TYPES
// ============================================

#[derive(Debug, Clone)]
pub struct ThreadRow {
    pub id: String,
    pub title: String,
    pub created_at: String,
}

#[derive(Debug, Clone)]
pub struct MessageRow {
    pub id: i64,
    pub thread_id: String,
    pub role: Role,
    pub content: String,
    pub thought: String,
    pub created_at: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open_store() -> (tempfile::TempDir, ThreadStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = ThreadStore::open(&dir.path().join("dittseek.db")).unwrap();
        (dir, store)
    }

    #[test]
    fn threads_list_in_creation_order() {
        let (_dir, store) = open_store();
        let first = store.create_thread("first").unwrap();
        let second = store.create_thread("second").unwrap();

        let threads = store.list_threads().unwrap();
        assert_eq!(threads.len(), 2);
        assert_eq!(threads[0].id, first.id);
        assert_eq!(threads[1].id, second.id);
        assert_eq!(threads[1].title, "second");
        assert_ne!(first.id, second.id);
    }

    #[test]
    fn messages_roundtrip_in_creation_order() {
        let (_dir, store) = open_store();
        let thread = store.create_thread("chat").unwrap();

        store
            .create_message(NewMessage {
                thread_id: &thread.id,
                role: Role::User,
                content: "hi",
                thought: "",
            })
            .unwrap();
        store
            .create_message(NewMessage {
                thread_id: &thread.id,
                role: Role::Assistant,
                content: "hello",
                thought: "greeting detected",
            })
            .unwrap();

        let messages = store.list_messages(&thread.id).unwrap();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, Role::User);
        assert_eq!(messages[0].content, "hi");
        assert_eq!(messages[0].thought, "");
        assert_eq!(messages[1].role, Role::Assistant);
        assert_eq!(messages[1].thought, "greeting detected");
    }

    #[test]
    fn message_requires_existing_thread() {
        let (_dir, store) = open_store();
        let result = store.create_message(NewMessage {
            thread_id: "no-such-thread",
            role: Role::User,
            content: "orphan",
            thought: "",
        });
        assert!(result.is_err());
    }

    #[test]
    fn messages_are_scoped_to_their_thread() {
        let (_dir, store) = open_store();
        let a = store.create_thread("a").unwrap();
        let b = store.create_thread("b").unwrap();

        store
            .create_message(NewMessage {
                thread_id: &a.id,
                role: Role::User,
                content: "in a",
                thought: "",
            })
            .unwrap();

        assert_eq!(store.list_messages(&a.id).unwrap().len(), 1);
        assert!(store.list_messages(&b.id).unwrap().is_empty());
    }

    #[test]
    fn subscribers_see_inserts() {
        let (_dir, store) = open_store();
        let events = store.subscribe();

        let thread = store.create_thread("watched").unwrap();
        store
            .create_message(NewMessage {
                thread_id: &thread.id,
                role: Role::User,
                content: "ping",
                thought: "",
            })
            .unwrap();

        match events.recv().unwrap() {
            StoreEvent::ThreadCreated(row) => assert_eq!(row.id, thread.id),
            other => panic!("unexpected event: {:?}", other),
        }
        match events.recv().unwrap() {
            StoreEvent::MessageCreated(row) => {
                assert_eq!(row.thread_id, thread.id);
                assert_eq!(row.content, "ping");
            }
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[test]
    fn dropped_subscribers_are_pruned() {
        let (_dir, store) = open_store();
        drop(store.subscribe());
        // Next insert must not fail because of the dead channel.
        store.create_thread("still fine").unwrap();
    }

    #[test]
    fn get_thread_returns_none_for_unknown_id() {
        let (_dir, store) = open_store();
        assert!(store.get_thread("missing").unwrap().is_none());
    }
}
