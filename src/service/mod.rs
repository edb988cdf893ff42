//! Service layer: business logic orchestration.
//!
//! [`TodoService`] coordinates todo mutations over the store, and
//! [`LiveViewService`] hands the resulting view updates to the
//! [`super::domain::SessionRegistry`] for delivery on open streams.

pub mod live_view;
pub mod todo_service;

pub use live_view::LiveViewService;
pub use todo_service::TodoService;
