/// Default cap on Array/Table nesting during parsing.
pub const MAX_NESTING_DEPTH: usize = 128;

/// Fixed fractional precision used when rendering floats.
pub(crate) const FLOAT_PRECISION: usize = 6;
