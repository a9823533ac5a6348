/// User interface module
///
/// - Focus bookkeeping that lets modal sessions drive iced focus (focus.rs)
/// - Reusable widgets: cards, sidebar, highlighted YAML, modal overlay (views.rs)

pub mod focus;
pub mod views;
