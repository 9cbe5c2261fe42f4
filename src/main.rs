//! # barcode-rename CLI
//!
//! Command-line interface for the barcode renamer.
//!
//! ## Usage
//! ```bash
//! barcode-rename run ~/Shoots/2024-05-02
//! barcode-rename run ~/Shoots --recursive --order created --dry-run
//! barcode-rename check 012345678905
//! ```

mod cli;

use barcode_renamer::Result;

fn main() -> Result<()> {
    cli::run()
}
