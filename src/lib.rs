//! Ordered snippet registry, drag reordering, clipboard HTML conversion and
//! JSON document projection for a snippet-based content composer.
//!
//! # Examples
//!
//! In-memory usage with [`core::registry::Registry`]:
//! ```
//! use snippet_composer::{
//!     core::registry::Registry,
//!     serialize::to_pretty_json,
//!     snippet::SnippetPayload,
//!     types::SnippetKind,
//! };
//!
//! let mut registry = Registry::starting_at(1);
//! let (para, _) = registry.add(SnippetKind::Paragraph).expect("add paragraph");
//! let (meta, _) = registry.add(SnippetKind::Meta).expect("add meta");
//! assert_eq!(registry.ordered_ids(), &[meta, para]);
//!
//! registry
//!     .update(para, SnippetPayload::paragraph("**Grace** and peace"))
//!     .expect("update");
//! let json = to_pretty_json(registry.iter()).expect("serialize");
//! assert!(json.contains("\"type\": \"paragraph\""));
//! ```
//!
//! Converting a paste:
//! ```
//! assert_eq!(snippet_composer::convert::convert("<b>Hi</b> there"), "**Hi** there");
//! ```
//!
//! Runtime usage with debounced paragraph edits:
//! ```no_run
//! use snippet_composer::{
//!     core::registry::Registry,
//!     runtime::handle::{spawn_composer, ComposerConfig},
//!     types::SnippetKind,
//! };
//!
//! # #[tokio::main]
//! # async fn main() {
//! let handle = spawn_composer(Registry::new(), ComposerConfig::default());
//! let id = handle.add(SnippetKind::Paragraph).await.expect("add");
//! handle.edit_paragraph(id, "Draft").await.expect("edit");
//! let preview = handle.preview();
//! println!("{}", *preview.borrow());
//! handle.shutdown().await.expect("shutdown");
//! # }
//! ```
#![deny(missing_docs)]

/// Converts clipboard HTML into restricted Markdown.
pub mod convert;
/// Snippet registry and drag-reorder engine.
pub mod core;
/// Download naming and content.
pub mod export;
/// Registry change records.
pub mod op;
/// Single-writer runtime, debounce timers and events.
pub mod runtime;
/// Public JSON document projection.
pub mod serialize;
/// Snippet records and payloads.
pub mod snippet;
/// Shared primitive types and enums.
pub mod types;
