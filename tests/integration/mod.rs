//! Integration tests for pre-initialized context startup

mod cli_launch;
mod environment_overlay;
mod slow_path;
mod test_utils;
