// Queue service constants (no magic values)

/// Queue capacity per unit of max party size (placeholder capacity policy)
pub const CAPACITY_PER_MAX_PARTY_SIZE: u32 = 10;

/// Parties strictly larger than this wait longer
pub const LARGE_PARTY_THRESHOLD: u32 = 4;

/// Wait multiplier applied to large parties
pub const LARGE_PARTY_MULTIPLIER: f64 = 1.5;

/// Every started block of this many queued parties adds a surcharge
pub const LOAD_BLOCK_SIZE: u32 = 5;

/// Surcharge per load block (10%)
pub const LOAD_BLOCK_SURCHARGE: f64 = 0.1;
