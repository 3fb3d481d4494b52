//! Page Annotations
//!
//! Attach operator feedback to elements of a live document, keep it in a
//! local store with 7-day retention, and export it as markdown or JSON for a
//! reviewer or a coding agent.
//!
//! # Modules
//!
//! - `annotations`: records and the persistent, observable store
//! - `fingerprint`: stable locators and context snapshots for elements
//! - `dom`: the element accessor trait and an in-memory document tree
//! - `output`: detail-profiled markdown and JSON rendering
//! - `storage`: durable key-value slots backing the store
//! - `config`: runtime settings
//! - `export`: report rendering for the file-backed store
//!
//! # Example
//!
//! ```rust,ignore
//! use page_annotations::annotations::{AnnotationStore, NewAnnotation};
//! use page_annotations::dom::DocumentTree;
//! use page_annotations::fingerprint::get_element_info;
//! use page_annotations::output::{generate_output, OutputDetail, OutputFormat};
//! use page_annotations::storage::FileSlot;
//!
//! let tree = DocumentTree::from_markup(html)?;
//! let target = tree.find_by_id("checkout").unwrap();
//! let info = get_element_info(Some(&target)).unwrap();
//!
//! let mut store = AnnotationStore::open(FileSlot::new(".annotations"), "https://shop.test/cart");
//! store.add(NewAnnotation::from_element_info(&info, "Button is hidden on mobile"));
//!
//! let report = generate_output(&store.get_all(), OutputFormat::Markdown, OutputDetail::Detailed)?;
//! ```

pub mod annotations;
pub mod config;
pub mod dom;
pub mod error;
pub mod export;
pub mod fingerprint;
pub mod output;
pub mod storage;

pub use annotations::{Annotation, AnnotationStore, NewAnnotation};
pub use config::Settings;
pub use error::{Error, Result};
