//! # Platen Architecture
//!
//! Platen is a **UI-agnostic blog engine**. This is not a CLI application that happens
//! to have some library code—it's a content engine that happens to ship with a CLI client.
//!
//! This distinction drives the entire architecture and should guide all development.
//!
//! ## The Four-Layer Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │  Host Layer (main.rs + args.rs)                              │
//! │  - Parses arguments, owns the terminal, maps input to        │
//! │    actions                                                   │
//! │  - The ONLY place that knows about stdout/stderr/exit codes  │
//! └──────────────────────────────────────────────────────────────┘
//!                              │ UiAction
//!                              ▼
//! ┌──────────────────────────────────────────────────────────────┐
//! │  App Layer (app.rs)                                          │
//! │  - Wires store, view, editor, address bar, and surface       │
//! │  - Dispatches each UiAction to the right controller          │
//! └──────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌──────────────────────────────────────────────────────────────┐
//! │  Controller Layer (view.rs, editor.rs, router.rs)            │
//! │  - State machines over the RenderSurface abstraction         │
//! │  - No I/O assumptions whatsoever                             │
//! └──────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌──────────────────────────────────────────────────────────────┐
//! │  Storage Layer (store/)                                      │
//! │  - Abstract StoreBackend trait                               │
//! │  - FileStore (production), InMemoryStore (testing)           │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## The Render Surface
//!
//! Controllers never touch a concrete UI. They describe what should be on
//! screen through the [`render::RenderSurface`] trait: named anchor nodes,
//! text, attributes, and **bindings**—plain [`render::UiAction`] values
//! attached to nodes. A host walks the surface, shows it however it likes,
//! and feeds triggered actions back into [`app::App::dispatch`]. See
//! `render/` for more information.
//!
//! ## Key Principle: No I/O Assumptions in Core
//!
//! From `app.rs` inward (app, controllers, storage), code:
//! - Takes regular Rust function arguments
//! - Returns regular Rust types (`Result<T>`)
//! - **Never** writes to stdout/stderr
//! - **Never** calls `std::process::exit`
//! - **Never** assumes a terminal environment
//!
//! This means the same core could serve a web front end, a TUI, or any other UI.
//!
//! ## Testing Strategy
//!
//! The architecture enables focused testing at each layer:
//!
//! 1. **Controllers** (`view.rs`, `editor.rs`): Thorough unit tests of state
//!    transitions against [`render::tree::TreeSurface`]. This is where the
//!    lion's share of testing lives.
//!
//! 2. **App** (`app.rs`): Tests verifying correct dispatch—that the right
//!    controller is called with the right collaborators, not the logic itself.
//!
//! 3. **Host** (`main.rs` + thin `args.rs`): Integration tests driving the
//!    binary end to end with a temporary site directory.
//!
//! ## Development Workflow
//!
//! When implementing features, work **inside-out**:
//!
//! 1. **Logic**: Implement and fully test in the controller that owns it
//! 2. **App**: Route the new action in `app.rs`, test dispatch
//! 3. **Host**: Add the handler in `main.rs`, test arg parsing and output
//!
//! ## Module Overview
//!
//! - [`app`]: The dispatch hub—entry point for all operations
//! - [`view`]: Reader-facing content rendering
//! - [`editor`]: The overlay editor state machine
//! - [`router`]: Address fragments and content resolution
//! - [`render`]: The surface abstraction and its in-memory tree
//! - [`store`]: Storage abstraction and implementations
//! - [`model`]: Core data types (`ContentItem`, `ContentType`, `SiteData`)
//! - [`widget`]: Rich-text widget seam for hosts
//! - [`compose`]: External editor integration
//! - [`config`]: Configuration management
//! - [`error`]: Error types

pub mod app;
pub mod compose;
pub mod config;
pub mod editor;
pub mod error;
pub mod model;
pub mod render;
pub mod router;
pub mod store;
pub mod view;
pub mod widget;
