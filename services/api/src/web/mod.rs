pub mod rest;
pub mod state;

// Re-export the handlers so the server binary can assemble the router
// without reaching into the module tree.
pub use rest::{
    add_text_handler, delete_text_handler, get_text_handler, health_handler, leaderboard_handler,
    list_texts_handler, submit_result_handler,
};
