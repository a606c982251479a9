//! Typed computation trees.
//!
//! A computation is built bottom-up from nine node kinds: leaves
//! (`Reference`, `Intrinsic`, `Data`, `CompiledComputation`) composed into
//! `Tuple`, `Selection`, `Call`, `Lambda` and `Block` nodes. Every
//! constructor derives the node's type from its children through the
//! `fed_types` capability and refuses ill-typed input, so a `Node` that
//! exists always type-checks.
//!
//! Nodes are immutable and own their children. Rewrites build new nodes
//! from old children (`Clone` is cheap enough for that and keeps the tree
//! shape). Built trees are `Send + Sync` and may be read from many threads.
//!
//! # Debugging
//!
//! - `RUST_LOG=fed_ir=trace`: one event per constructed node.
//! - `RUST_LOG=fed_ir=debug`: rejected constructions only.
//!
//! Call [`init_tracing`] once at startup to install a subscriber.

mod build;
mod computation;
mod error;
mod node;
mod render;
pub mod visitor;

pub use computation::Computation;
pub use error::{BuildError, ErrorKind};
pub use node::{
    Block, Call, CompiledComputation, Data, Intrinsic, Lambda, Node, NodeKind, Reference,
    Selection, Selector, Tuple, TupleElement,
};
pub use visitor::Visitor;

use std::sync::Once;

static TRACING_INIT: Once = Once::new();

/// Install a `tracing` subscriber filtered by `RUST_LOG`.
///
/// Does nothing when `RUST_LOG` is unset. Safe to call more than once.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        if std::env::var("RUST_LOG").is_ok() {
            let filter = EnvFilter::from_default_env();
            // Another subscriber may already be installed by the host.
            let _ = tracing_subscriber::registry()
                .with(fmt::layer().with_target(true).with_level(true))
                .with(filter)
                .try_init();
        }
    });
}
