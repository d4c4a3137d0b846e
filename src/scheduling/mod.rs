pub mod poll_loop;
pub mod sleeper;
