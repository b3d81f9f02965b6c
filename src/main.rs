//! Main entry point for psbridge.
//!
//! Initializes file-based logging, builds the interactive session (loading
//! any stored API key), and runs the resolution loop until the user leaves.

use anyhow::Result;
use psbridge::app::Session;
use psbridge::utils;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging before anything else
    utils::logger::init_logging();

    let mut session = Session::new()?;
    session.run().await
}
