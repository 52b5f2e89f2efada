//! State layer between `oltnms-api` and frontends.
//!
//! - **[`Nms`]**: facade owning the API client, the [`Session`] and the
//!   installed [`Notifier`]. Hands out resource lists that share them.
//!
//! - **[`Session`]**: authenticated/anonymous state restored from credential
//!   storage once at startup, ended by logout or by any 401. Also answers
//!   route guards.
//!
//! - **[`ResourceList<R>`]**: one generic list container for OLTs, ONUs and
//!   alarms. Fetch errors land in the list state; mutator errors are
//!   returned. [`ResourceList::auto_refresh`] returns a [`RefreshHandle`]
//!   whose drop stops the timer.
//!
//! - **[`view`]** and **[`map`]**: client-side search, pagination and the
//!   coordinate projection used by the map screen.

pub mod config;
pub mod error;
pub mod map;
pub mod nms;
pub mod notice;
pub mod resource;
pub mod session;
pub mod validate;
pub mod view;

pub use config::{NmsConfig, TlsVerification};
pub use error::CoreError;
pub use map::{Bounds, MapPoint, PointKind, Projected};
pub use nms::Nms;
pub use notice::{ChannelNotifier, Notice, NoticeLevel, Notifier, SharedNotifier, TracingNotifier};
pub use resource::{Editable, ListState, RefreshHandle, Resource, ResourceList};
pub use session::{AuthState, Navigation, Redirect, Route, Session};
pub use view::{PageInfo, PageRequest, Searchable};

pub use oltnms_api::types;
