//! # Pickflow Station Entry Point
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Pickflow Station                                 │
//! │                                                                         │
//! │   scanner / keyboard ──► stdin ──► command loop ──► stdout (JSON)       │
//! │                                        │                                │
//! │                                        ├──► pickflow-core (workflow)    │
//! │                                        └──► pickflow-store (favorites)  │
//! │                                                                         │
//! │   logs ──► stderr                                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The actual setup is in lib.rs so the command loop can be tested.

use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    match pickflow_cli::run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("pickflow: {}", e);
            ExitCode::FAILURE
        }
    }
}
