//! # mdx-timeline
//!
//! Content aggregation for an `.mdx`-backed personal site.
//!
//! mdx-timeline fetches documents from a content repository (the GitHub
//! contents API or a local checkout), parses their front-matter headers,
//! and merges four content categories into one date-ordered timeline that
//! can be searched, filtered, and walked item by item.
//!
//! ## Architecture
//!
//! ```text
//! ┌───────────────┐   ┌──────────────┐   ┌──────────────┐
//! │ ContentSource │──▶│  Aggregator  │──▶│ TimelineView │
//! │  GitHub / FS  │   │ parse + sort │   │ query/detail │
//! └───────────────┘   └──────────────┘   └──────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```bash
//! tml fetch                              # print the merged timeline
//! tml fetch --json --limit 3             # featured slice, for piping
//! tml search "rust" --category project   # filtered text search
//! tml show ditto                         # one item with its neighbors
//! tml sources                            # per-category health
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration parsing |
//! | [`models`] | Core data types |
//! | [`source`] | Content source trait and error taxonomy |
//! | [`source_github`] | GitHub contents-API source |
//! | [`source_fs`] | Local directory source |
//! | [`frontmatter`] | Front-matter header parsing |
//! | [`normalize`] | Header and body to [`models::ContentItem`] |
//! | [`aggregate`] | Concurrent category fetch and merge |
//! | [`query`] | Filtering, search, and lookup |
//! | [`view`] | Timeline presentation state |

pub mod aggregate;
pub mod config;
pub mod fetch;
pub mod frontmatter;
pub mod models;
pub mod normalize;
pub mod query;
pub mod show;
pub mod source;
pub mod source_fs;
pub mod source_github;
pub mod sources;
pub mod view;
