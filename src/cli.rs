//! CLI domain: parse, route, help, output, and presentation only.
//! No lifecycle logic; the route table dispatches to the lifecycle manager.

mod help;
mod output;
mod parse;
mod presentation;
mod route;

pub use help::command_name;
pub use output::map_error;
pub use parse::{Cli, Commands};
pub use presentation::{format_check, format_inspect, InspectView};
pub use route::RunContext;
