pub mod debounce;
pub mod state;
