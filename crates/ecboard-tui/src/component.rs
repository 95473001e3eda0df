//! Component trait: the interface every dashboard panel implements.
//!
//! - Components own their UI state and render themselves.
//! - Components read `AppState` for data they don't own.
//! - Components never talk to the scheduler; the App does.

use ratatui::{layout::Rect, Frame};

use crate::action::Action;
use crate::app_state::AppState;

pub trait Component {
    /// React to an action the App has already applied to the scheduler.
    fn on_action(&mut self, _action: &Action, _state: &AppState) {}

    /// Render the component into `area`.
    fn draw(&mut self, frame: &mut Frame, area: Rect, state: &AppState);
}
