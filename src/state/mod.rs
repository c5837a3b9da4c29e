pub mod shared_state;
