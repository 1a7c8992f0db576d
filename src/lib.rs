pub mod core;
pub mod cache;
pub mod analysis;
pub mod scoring;
pub mod search;
pub mod index;
pub mod queue;
pub mod query;

pub use crate::core::config::Config;
pub use crate::core::coordinator::CacheCoordinator;
pub use crate::core::error::{Error, ErrorKind, Result};
pub use crate::core::types::{CacheStrategy, CacheValue, DocId, RequestPayload};
pub use crate::queue::priority::Priority;

/*
┌──────────────────────────────────────────────────────────────────────────────────────┐
│                              CACHELAYER STRUCT ARCHITECTURE                          │
└──────────────────────────────────────────────────────────────────────────────────────┘

┌──────────────────────────────────── CORE LAYER ──────────────────────────────────────┐
│                                                                                      │
│  ┌──────────────────────────────────────────────────────────────────────────────┐   │
│  │                          struct CacheCoordinator                              │   │
│  │ config: Config                       // Capacities, limits, thresholds        │   │
│  │ lru: LruCache<CacheValue>            // Recency-evicted store                 │   │
│  │ lfu: LfuCache<CacheValue>            // Frequency-evicted store               │   │
│  │ search_index: TextSearchIndex        // Inverted index, TF-IDF at query time  │   │
│  │ request_queue: PriorityRequestQueue  // High/normal/low + rate limiter        │   │
│  │ query_planner: QueryPlanner          // Complexity → strategy + TTL           │   │
│  │ // Metrics                                                                    │   │
│  │ hits, misses, requests_processed, queries_optimized: AtomicU64                │   │
│  └──────────────────────────────────────────────────────────────────────────────┘   │
│                                                                                      │
│  ┌──────────────────┐  ┌──────────────────────┐  ┌────────────────────────────┐     │
│  │ struct Config    │  │ enum CacheStrategy   │  │ struct CoordinatorMetrics  │     │
│  │ • lru_capacity   │  │ • Lru                │  │ • hits / misses / hit_rate │     │
│  │ • lfu_capacity   │  │ • Lfu                │  │ • cache_utilization        │     │
│  │ • queue_max_size │  └──────────────────────┘  │ • requests_processed       │     │
│  │ • rate_limit_*   │                            │ • queries_optimized        │     │
│  │ • complexity_... │  ┌──────────────────────┐  └────────────────────────────┘     │
│  │ • cache_ttl_secs │  │ struct DocId(u64)    │                                     │
│  └──────────────────┘  └──────────────────────┘                                     │
└──────────────────────────────────────────────────────────────────────────────────────┘

┌──────────────────────────────────── CACHE LAYER ─────────────────────────────────────┐
│                                                                                      │
│  trait BoundedCache<V>: get / put / remove / len / capacity / clear / stats          │
│                                                                                      │
│  ┌────────────────────────────────┐   ┌──────────────────────────────────────────┐  │
│  │ struct LruCache<V>             │   │ struct LfuCache<V>                       │  │
│  │ Mutex<lru::LruCache<String,V>> │   │ Mutex<{ entries: HashMap<String, Entry>, │  │
│  │ + hits / misses / evictions    │   │         buckets: HashMap<freq, OrderedSet>│  │
│  └────────────────────────────────┘   │         min_frequency }>                 │  │
│                                       └──────────────────────────────────────────┘  │
└──────────────────────────────────────────────────────────────────────────────────────┘

┌──────────────────────────────────── SEARCH LAYER ────────────────────────────────────┐
│                                                                                      │
│  SimpleTokenizer ──► TextSearchIndex { postings: term → BTreeSet<DocId>,             │
│                                        documents: DocId → fingerprint + terms }      │
│                          │                                                           │
│                          ▼                                                           │
│              PresenceTfIdfScorer (tf = 1.0, idf = ln(N/df)) ──► TopKCollector        │
└──────────────────────────────────────────────────────────────────────────────────────┘

┌──────────────────────────────── QUEUE / PLANNER LAYER ───────────────────────────────┐
│                                                                                      │
│  PriorityRequestQueue { tiers: [VecDeque; 3], SlidingWindowRateLimiter }             │
│                                                                                      │
│  QueryPlanner ─► QueryValidator (deny-list) ─► plan_cache_key (SHA-256)              │
│               ─► PlanCache (LruCache<QueryPlan>, usage per query text)               │
└──────────────────────────────────────────────────────────────────────────────────────┘
*/
