//! # qa-finder
//!
//! Fuzzy question lookup over question/answer pairs extracted from Word
//! documents.
//!
//! Source `.docx` files are read once at startup. Every paragraph line
//! carrying an `S:` marker becomes a question; its answer sits after a
//! delimiter on the same line or on the next line. A query is answered with
//! the stored answer of the most similar question, provided the similarity
//! clears a threshold.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐   ┌──────────────┐   ┌──────────────┐
//! │   extract    │──▶│    parse     │──▶│    corpus    │
//! │ docx → lines │   │ lines → Q/A  │   │  load once   │
//! └──────────────┘   └──────────────┘   └──────┬───────┘
//!                                              ▼
//!                    ┌──────────────┐   ┌──────────────┐
//!                    │  similarity  │◀──│   matcher    │
//!                    │ normalize +  │   │  best match  │
//!                    │    ratio     │   └──────┬───────┘
//!                    └──────────────┘          │
//!                                      ┌───────┴───────┐
//!                                      ▼               ▼
//!                                 ┌─────────┐    ┌──────────┐
//!                                 │   CLI   │    │   HTTP   │
//!                                 │  (qaf)  │    │  server  │
//!                                 └─────────┘    └──────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```bash
//! qaf load                         # scan docs/ and report what was found
//! qaf ask "что такое ось"          # answer one question
//! qaf serve                        # start the form server
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration parsing |
//! | [`extract`] | Paragraph text from `.docx` files |
//! | [`parse`] | Question/answer pair extraction |
//! | [`similarity`] | Normalization and similarity ratio |
//! | [`corpus`] | Directory scan and corpus loading |
//! | [`matcher`] | Best-match lookup |
//! | [`server`] | HTTP form and JSON API |

pub mod config;
pub mod corpus;
pub mod extract;
pub mod matcher;
pub mod parse;
pub mod server;
pub mod similarity;
