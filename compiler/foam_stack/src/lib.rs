//! Stack growth for the recursive FOAM walks.
//!
//! Equality, hashing, copying, encoding, decoding and auditing all recurse
//! once per tree level. FOAM trees produced from deeply nested source (long
//! `Seq` chains inside nested `If`/`Prog` bodies, chunked literal
//! expressions) can exceed the default thread stack, so every recursive
//! step goes through [`ensure_sufficient_stack`].
//!
//! On native targets the stack is grown on demand through `stacker`; on
//! wasm32 the guard is a plain call.

/// Remaining stack below which a new segment is allocated.
const RED_ZONE: usize = 128 * 1024;

/// Size of each newly allocated stack segment.
const SEGMENT_SIZE: usize = 2 * 1024 * 1024;

/// Run `f`, first growing the stack if less than the red zone remains.
#[inline]
#[cfg(not(target_arch = "wasm32"))]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(RED_ZONE, SEGMENT_SIZE, f)
}

/// wasm32 manages its own stack.
#[inline]
#[cfg(target_arch = "wasm32")]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    f()
}

#[cfg(test)]
mod tests;
