//! Version command implementation

use crate::console::CLIConsole;

pub fn execute(console: &CLIConsole) {
    console.print(&format!("batcha {}", env!("CARGO_PKG_VERSION")));
}
