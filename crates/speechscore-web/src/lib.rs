//! speechscore-web: HTTP API for the rubric scoring engine.
//! Provides:
//!   - `POST /score` with a JSON transcript
//!   - `POST /score-file` with an uploaded UTF-8 text file
//!   - `GET /rubric` and `GET /health` for inspection

pub mod config;
pub mod error;
pub mod handlers;
pub mod router;
pub mod state;
