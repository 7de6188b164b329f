//! Thread sources
//!
//! A [`ThreadSource`] turns some chat archive into [`Thread`]s. The rest of
//! the crate only sees threads and messages, never the archive format.

pub mod wechat;

pub use wechat::WeChatDatabase;

use crate::error::Result;
use crate::types::Thread;

/// Anything that can produce the owner's conversation threads.
pub trait ThreadSource {
    /// Load every thread with its messages in time order.
    ///
    /// Threads are returned in the order their first message appears.
    fn load_threads(&self) -> Result<Vec<Thread>>;
}
