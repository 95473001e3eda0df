//! Action enum: every user intent the dashboard understands.

use ecboard_proto::protocol::ViewState;

/// The key map produces Actions; the App dispatches them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Re-fetch now, outside the refresh timer.
    Refresh,
    SelectView(ViewState),
    ToggleView,
    ToggleSidebar,
    Quit,
}
