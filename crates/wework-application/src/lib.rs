//! Widget controller and the presentation boundary it drives.

pub mod headless;
pub mod view;
pub mod widget;

pub use headless::{HeadlessView, ViewEvent};
pub use view::{MessageBody, RenderedMessage, WidgetView};
pub use widget::{ChatWidget, IgnoreReason, SubmitOutcome};
