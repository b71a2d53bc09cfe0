//! Page-side binding: list pages, their create forms, the login badge and
//! edit dialogs. Nothing here talks to the backend except through
//! [`crate::PortalClient`].

pub mod badge;
pub mod form;
pub mod list;
pub mod modal;
pub mod pages;

pub use badge::{spawn_badge_redraw, BadgeSurface, LoginBadge};
pub use form::{FormData, FormSlot};
pub use list::{ListPage, ListResource, ListRow, ListState, ListSurface};
pub use modal::{CheckInDialog, CollectionDialog, DialogRecord, EditDialog, StoryDialog};
pub use pages::{CheckInList, CollectionList, FootprintList, StoryList};
