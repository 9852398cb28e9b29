//! # crop-collage CLI
//!
//! Command-line interface for the crop collage planner.
//!
//! ## Usage
//! ```bash
//! crop-collage plan ./images --crops ./data --seed 7
//! crop-collage plan ./images --crops ./data --output json > plan.json
//! ```

mod cli;

use crop_collage::Result;

fn main() -> Result<()> {
    cli::run()
}
