pub mod collections;
pub mod core;
pub mod engine;
pub mod ingest;

/*
┌──────────────────────────────────────────────────────────────────────────┐
│                        EQUIDEX STRUCT ARCHITECTURE                       │
└──────────────────────────────────────────────────────────────────────────┘

┌────────────────────────────── ENGINE LAYER ──────────────────────────────┐
│                                                                          │
│  ┌────────────────────────────────────────────────────────────────────┐  │
│  │                        struct IndexEngine                          │  │
│  │  ┌──────────────────────────────────────────────────────────────┐  │  │
│  │  │ config: Config                 // thresholds, horizons       │  │  │
│  │  │ records: DynArray<Record>      // canonical arena, append-only│ │  │
│  │  │ by_name: ChainedMap<String, usize>    // normalized name     │  │  │
│  │  │ sectors: ChainedMap<String, DynArray<usize>>                 │  │  │
│  │  │ by_pe: AvlTree<PeKey>          // ordered P/E walk           │  │  │
│  │  │ low_pe: MinHeap<PeKey>         // cheapest-first ranking     │  │  │
│  │  │ high_roe: MaxHeap<RoeKey>      // best-first ranking         │  │  │
│  │  │ similarity: Graph<usize>       // edge = distance < 0.3      │  │  │
│  │  └──────────────────────────────────────────────────────────────┘  │  │
│  └────────────────────────────────────────────────────────────────────┘  │
│                                                                          │
│  Queries: find_by_name, filter_by_sector, top_n_roe, lowest_n_pe,        │
│  records_in_pe_range, recommend, sector_stats, similar,                  │
│  company_history, forecast_next_year, forecast_all                       │
└──────────────────────────────────────────────────────────────────────────┘

┌───────────────────────────── CONTAINER LAYER ────────────────────────────┐
│                                                                          │
│  ┌───────────────┐ ┌────────────────┐ ┌──────────────┐ ┌──────────────┐  │
│  │ DynArray<T>   │ │ ChainedMap<K,V>│ │ AvlTree<T>   │ │ Min/MaxHeap  │  │
│  │ • ptr/cap/len │ │ • poly hashing │ │ • balance in │ │ • sift up/dn │  │
│  │ • 2x growth   │ │ • 0.75 rehash  │ │   {-1, 0, 1} │ │ • Clone =    │  │
│  │ • slice deref │ │ • chain prepend│ │ • pred delete│ │   snapshot   │  │
│  └───────────────┘ └────────────────┘ └──────────────┘ └──────────────┘  │
│  ┌──────────────────────────┐                                            │
│  │ Graph<T> (adjacency list)│  bfs / dfs visit orders, mirrored edges    │
│  └──────────────────────────┘                                            │
└──────────────────────────────────────────────────────────────────────────┘

┌────────────────────────────── INGEST LAYER ──────────────────────────────┐
│  csv_parser: 21-column fundamentals rows -> validated Records            │
│  synthetic: drifted yearly variants (price/eps/pe factor families)       │
└──────────────────────────────────────────────────────────────────────────┘

Data flow: ingest hands the engine a finalized Vec<Record>; load() rebuilds
every index in one pass (the O(n^2) similarity sweep dominates); queries
are read-only until the next load/reload/clear. Single-threaded by design:
mutators take &mut self, a concurrent host must bring its own lock.
*/
