/// State management module
///
/// This module handles all application state, including:
/// - The in-memory compose catalog (library.rs)
/// - Shared data structures (data.rs)
/// - Sidebar categories and live counts (categories.rs)
/// - Search and category filtering (search.rs)
/// - Turning add-form input into a new entry (draft.rs)
/// - The view/edit modal session and focus containment (session.rs)
/// - The command loop tying it all together (controller.rs)

pub mod categories;
pub mod controller;
pub mod data;
pub mod draft;
pub mod library;
pub mod search;
pub mod session;
