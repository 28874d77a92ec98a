// * Configuration Constants
// * Central location for all configurable thresholds and timeouts

// * Record validity: a name must be longer than this many characters
pub const MIN_ENTITY_NAME_LEN: usize = 2;

// * Record validity: an address must be longer than this many characters
pub const MIN_ADDRESS_LEN: usize = 5;

// * Splitter success: the separated name must be longer than this
pub const SPLIT_MIN_NAME_LEN: usize = 3;

// * Splitter success: the separated address must be longer than this
pub const SPLIT_MIN_ADDRESS_LEN: usize = 5;

// * Number of leading data rows handed to the column classifier
pub const TABLE_SAMPLE_ROWS: usize = 10;

// * Rows concatenated per column during the cell-content keyword scan
pub const CONTENT_SCAN_ROWS: usize = 5;

// * Rows concatenated per column during the length/keyword heuristic
pub const LENGTH_SCAN_ROWS: usize = 3;

// * Entity columns are expected to be short (concatenated sample under this)
pub const ENTITY_SAMPLE_MAX_CHARS: usize = 100;

// * Address columns are expected to be long (concatenated sample over this)
pub const ADDRESS_SAMPLE_MIN_CHARS: usize = 50;

// * List items at or below this length are ignored
pub const LIST_ITEM_MIN_LEN: usize = 10;

// * HTTP request timeout in seconds
pub const REQUEST_TIMEOUT_SECS: u64 = 30;

// * Attempts for transient HTTP failures (timeouts, 5xx)
pub const MAX_RETRIES: u32 = 3;

// * Delay between transient-failure retries in milliseconds
pub const RETRY_DELAY_MS: u64 = 2_000;

// * Page navigation timeout in milliseconds for the rendered path
pub const PAGE_TIMEOUT_MS: u64 = 60_000;

// * Wait after navigation before scrolling, in milliseconds
pub const BROWSER_SETTLE_MS: u64 = 3_000;

// * Pause after the scroll-to-bottom step, in milliseconds
pub const SCROLL_PAUSE_MS: u64 = 2_000;

// * Default pacing for batch runs
pub const DEFAULT_REQUESTS_PER_MINUTE: u32 = 30;
