//! Domain layer: session identity, live events, mailboxes, the stream
//! registry, and todo records.
//!
//! The push core lives here: [`SessionRegistry`] maps each
//! [`SessionId`] to the [`mailbox::MailboxSender`] of its open stream, and
//! [`LiveEvent`] is what travels through a mailbox.

pub mod live_event;
pub mod mailbox;
pub mod session_id;
pub mod session_registry;
pub mod todo;

pub use live_event::LiveEvent;
pub use mailbox::{HandOff, Mailbox, MailboxId, MailboxSender};
pub use session_id::{SESSION_COOKIE, SessionId};
pub use session_registry::{Registration, SessionRegistry};
pub use todo::{NewTodo, ShowFilter, Todo, TodoFilter};
