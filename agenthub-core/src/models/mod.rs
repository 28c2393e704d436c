mod agent;
mod chat;
mod task;

use std::sync::atomic::{AtomicI64, Ordering};

use chrono::{DateTime, Utc};

pub use agent::{Agent, AgentPatch, AgentSettings, NewAgent, SettingItem, SettingKind};
pub use chat::{Chat, Message, Sender};
pub use task::{AgentKind, AgentStatus, ChatMessage, Task, TaskAgent, TaskCreate, TaskStatus};

static LAST_STAMP: AtomicI64 = AtomicI64::new(0);

/// Unix millis for locally generated ids, strictly increasing per process.
///
/// Two ids issued within the same millisecond get consecutive values, so
/// `c<stamp>` and `agent_<stamp>` never repeat.
pub fn unique_stamp(now: DateTime<Utc>) -> i64 {
    let millis = now.timestamp_millis();
    let previous = LAST_STAMP
        .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |last| {
            Some(millis.max(last + 1))
        })
        .unwrap_or_else(|last| last);
    millis.max(previous + 1)
}
