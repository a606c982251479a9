//! Stack safety for deep recursion.
//!
//! Computation trees built bottom-up by a front end can nest arbitrarily
//! deep (long `let` chains, curried calls, nested selections). Walks that
//! recurse once per level (rendering, cloning, comparing, hashing,
//! assignability checks, visiting) route each recursive step through
//! [`ensure_sufficient_stack`]. Releasing a tree cannot go through this
//! guard, since drop glue recurses after `Drop::drop` returns, so nodes
//! and types free their children with worklists instead.
//!
//! - **Native targets**: grows the stack on demand via `stacker`.
//! - **WASM targets**: plain passthrough.

/// Remaining stack below which a new segment is allocated (100KB).
const RED_ZONE: usize = 100 * 1024;

/// Size of each newly allocated stack segment (1MB).
const STACK_PER_RECURSION: usize = 1024 * 1024;

/// Run `f`, growing the stack first if less than the red zone remains.
///
/// ```text
/// fn render(node: &Node, out: &mut String) {
///     ensure_sufficient_stack(|| {
///         for child in node.children() {
///             render(child, out);
///         }
///     });
/// }
/// ```
#[inline]
#[cfg(not(target_arch = "wasm32"))]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(RED_ZONE, STACK_PER_RECURSION, f)
}

/// WASM version: call directly.
#[inline]
#[cfg(target_arch = "wasm32")]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    f()
}
