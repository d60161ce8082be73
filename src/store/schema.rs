//! SQLite schema definition
//!
//! Two tables: threads (named conversations) and messages (turns within a
//! thread). Rows are insert-only; creation order is the display order, so the
//! integer rowid doubles as the message sort key.

pub const SCHEMA: &str = r#"
-- ============================================
-- THREADS
-- ============================================

-- Named conversations, created from the new-chat action. Never mutated.
CREATE TABLE IF NOT EXISTS threads (
    id TEXT PRIMARY KEY,                   -- UUID
    title TEXT NOT NULL,
    created_at DATETIME DEFAULT CURRENT_TIMESTAMP
);

-- ============================================
-- MESSAGES
-- ============================================

-- One turn in a thread. 'thought' holds the reasoning segment extracted from
-- the response stream; always empty for user messages.
CREATE TABLE IF NOT EXISTS messages (
    id INTEGER PRIMARY KEY,
    thread_id TEXT NOT NULL,
    role TEXT NOT NULL,                    -- 'user' | 'assistant'
    content TEXT NOT NULL,
    thought TEXT NOT NULL DEFAULT '',
    created_at DATETIME DEFAULT CURRENT_TIMESTAMP,
    FOREIGN KEY(thread_id) REFERENCES threads(id) ON DELETE CASCADE
);

-- ============================================
-- INDEXES
-- ============================================

CREATE INDEX IF NOT EXISTS idx_messages_thread ON messages(thread_id);
"#;
